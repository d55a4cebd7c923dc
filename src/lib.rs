pub mod cli;
pub mod clock;
pub mod config;
pub mod export;
pub mod logs;
pub mod window;
