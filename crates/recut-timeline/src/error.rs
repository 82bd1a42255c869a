//! Timeline errors.

use recut_core::RecutError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("clip has source {0}, only source 0 can be converted to a speed list")]
    ForeignSource(usize),
    #[error("clip layer has null frames: clip starts at {start} but only {covered} frames are covered")]
    NullFrames { start: usize, covered: usize },
    #[error("clip layer too complex, cannot convert to speed list: offset {offset} after frame {previous}")]
    TooComplex { offset: usize, previous: usize },
    #[error("clip layer is empty")]
    EmptyLayer,
    #[error("chunk {index} starts at {start} but the previous chunk ends at {previous_end}")]
    NonContiguousChunks {
        index: usize,
        start: usize,
        previous_end: usize,
    },
    #[error("chunk {index} has reversed bounds {start}..{end}")]
    ReversedChunk {
        index: usize,
        start: usize,
        end: usize,
    },
    #[error("chunk {index} has invalid speed {speed}")]
    InvalidSpeed { index: usize, speed: f64 },
    #[error("no input files")]
    NoInputs,
    #[error("got {lists} speed lists for {inputs} inputs")]
    SpeedListCount { inputs: usize, lists: usize },
}

impl TimelineError {
    /// Structural errors mean a clip layer cannot be expressed as one speed
    /// list. They are expected for complex timelines and are not fatal.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::ForeignSource(_)
                | Self::NullFrames { .. }
                | Self::TooComplex { .. }
                | Self::EmptyLayer
        )
    }
}

impl From<TimelineError> for RecutError {
    fn from(err: TimelineError) -> Self {
        RecutError::Timeline(err.to_string())
    }
}
