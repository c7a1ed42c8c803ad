use thiserror::Error;

#[derive(Error, Debug)]
pub enum DerbyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl DerbyError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        DerbyError::InvalidArgument(message.into())
    }
}

pub type Result<T> = std::result::Result<T, DerbyError>;
