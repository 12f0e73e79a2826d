pub mod config;
pub mod error;
pub mod types;

pub use config::{SpeakHidePolicy, UnitConfig};
pub use error::{Result, UnitError};
pub use types::UnitId;
