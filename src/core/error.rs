use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnitError {
    #[error("Unknown character type: {0}")]
    UnknownCharacter(String),

    #[error("Invalid battle side: {0:?} (expected \"left\" or \"right\")")]
    InvalidSide(String),

    #[error("No tokio runtime available to schedule unit timers")]
    NoRuntime,

    #[error("Action cancelled before completion")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, UnitError>;
