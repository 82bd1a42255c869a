//! Export errors.

use recut_core::RecutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FcpxmlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error(transparent)]
    Core(#[from] RecutError),

    #[error("Nothing to export: {0}")]
    Empty(String),
}

impl From<quick_xml::Error> for FcpxmlError {
    fn from(err: quick_xml::Error) -> Self {
        FcpxmlError::Xml(err.to_string())
    }
}

impl From<FcpxmlError> for RecutError {
    fn from(err: FcpxmlError) -> Self {
        match err {
            FcpxmlError::Io(e) => RecutError::Io(e),
            FcpxmlError::Core(e) => e,
            other => RecutError::Export(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FcpxmlError>;
