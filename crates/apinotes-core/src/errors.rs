use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiNotesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported configuration file extension: {0}")]
    UnsupportedConfigFormat(String),

    #[error("Invalid version '{0}': expected MAJOR[.MINOR[.PATCH]]")]
    InvalidVersion(String),
}

pub type Result<T> = std::result::Result<T, ApiNotesError>;
