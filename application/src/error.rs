use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("configuration error: {message}")]
    ConfigError { message: String },

    #[error("storage error: {message}")]
    StorageError { message: String },

    #[error("paste validation transport error: {message}")]
    PasteTransportError { message: String },

    #[error("paste not found")]
    PasteNotFound,

    #[error("paste uid does not match claimed uid")]
    UidMismatch,

    #[error("paste content does not match the configured validation string")]
    ContentMismatch,

    #[error("uid exceeds the configured maximum allowed uid")]
    UidNotAllowed,

    #[error("unauthorized")]
    Unauthorized,

    #[error("codec error: {message}")]
    CodecError { message: String },
}

pub type AppResult<T> = Result<T, AppError>;
