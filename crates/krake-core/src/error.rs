use thiserror::Error;

/// Top-level error type for Krake.
///
/// Subsystem crates define their own error types and convert into
/// `KrakeError` where a failure has to cross a crate boundary, so that the
/// `?` operator works from the binary down.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KrakeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for KrakeError {
    fn from(err: toml::de::Error) -> Self {
        KrakeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for KrakeError {
    fn from(err: toml::ser::Error) -> Self {
        KrakeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for KrakeError {
    fn from(err: serde_json::Error) -> Self {
        KrakeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Krake operations.
pub type Result<T> = std::result::Result<T, KrakeError>;
