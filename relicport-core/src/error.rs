use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Incorrect source string, was '{found}', expected '{expected}'")]
    SignatureMismatch { found: String, expected: String },

    #[error("Unsupported snapshot version {found}, expected one of 3, 4")]
    UnsupportedVersion { found: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
