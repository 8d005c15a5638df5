use thiserror::Error;

/// Errors raised by the chat library
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown contact: {0}")]
    UnknownContact(String),

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
