use thiserror::Error;

/// SPHORB error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Bad input: {0}")]
    BadInput(String),

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
