pub mod config;
pub mod error;
pub mod snapshot;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
