pub mod config;
pub mod run;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
