//! Error types for Recut.

use thiserror::Error;

/// Error shared by every Recut crate.
///
/// Crates with richer failure modes (`TimelineError`, `OverlayError`,
/// `FcpxmlError`) convert into this at their public boundary.
#[derive(Error, Debug)]
pub enum RecutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ffprobe missing, failing, or printing something unreadable.
    #[error("Media error: {0}")]
    Media(String),

    /// A frame count, frame rate or similar value outside its domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Chunks or clips that break the timeline's ordering rules.
    #[error("Timeline error: {0}")]
    Timeline(String),

    /// User configuration that cannot be resolved. Always fatal.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl RecutError {
    /// True for errors caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter(_) | Self::Config(_) | Self::Serialization(_)
        )
    }
}

/// Result type alias for Recut operations.
pub type Result<T> = std::result::Result<T, RecutError>;
