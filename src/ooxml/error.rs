/// Error types for OOXML package generation.
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// XML generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<std::fmt::Error> for OoxmlError {
    fn from(err: std::fmt::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for OoxmlError {
    fn from(err: zip::result::ZipError) -> Self {
        OoxmlError::Zip(err.to_string())
    }
}

impl From<image::ImageError> for OoxmlError {
    fn from(err: image::ImageError) -> Self {
        OoxmlError::Image(err.to_string())
    }
}
