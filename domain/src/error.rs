use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid pixel coordinates: {0}")]
    InvalidPixelCoordinates(String),

    #[error("stored board dimensions do not match configured dimensions: {0}")]
    DimensionMismatch(String),

    #[error("codec error: {0}")]
    CodecError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
