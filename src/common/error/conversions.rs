//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from internal
//! error types to the unified Error type.

use super::types::Error;

impl From<crate::ooxml::error::OoxmlError> for Error {
    fn from(err: crate::ooxml::error::OoxmlError) -> Self {
        match err {
            crate::ooxml::error::OoxmlError::Io(e) => Error::Io(e),
            crate::ooxml::error::OoxmlError::InvalidFormat(s) => Error::Ooxml(s),
            crate::ooxml::error::OoxmlError::Xml(s) => Error::Ooxml(s),
            crate::ooxml::error::OoxmlError::Zip(s) => Error::Ooxml(s),
            crate::ooxml::error::OoxmlError::Image(s) => Error::Ooxml(s),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<serde_saphyr::Error> for Error {
    fn from(err: serde_saphyr::Error) -> Self {
        Error::Config(err.to_string())
    }
}
