pub mod config;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod platform;
pub mod progress;
pub mod scanner;
pub mod storage;

pub use config::AppConfig;
pub use engine::{ScanEngine, ScanResult};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
