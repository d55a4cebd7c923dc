pub mod driver;
pub mod report;

pub use driver::{ExportDriver, ExportError};
pub use report::{ExportOutcome, GroupFailure, SweepReport};
