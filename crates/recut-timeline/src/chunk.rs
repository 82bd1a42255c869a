//! Per-frame speeds and runs of constant speed.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Raw speed value that marks a frame as cut. Only appears at serialization
/// boundaries; in memory a cut frame is [`Speed::Dropped`].
pub const DROP_SENTINEL: f64 = 99999.0;

/// Playback speed of one source frame.
///
/// Serialized as a plain number, with `null` (or the drop sentinel) for cut
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Speed {
    /// Frame is kept and played at this multiplier (1.0 = normal speed).
    Kept(f64),
    /// Frame is cut from the output.
    Dropped,
}

impl Speed {
    /// Normal playback speed.
    pub const NORMAL: Self = Self::Kept(1.0);

    /// Interpret a raw speed, mapping the drop sentinel to [`Speed::Dropped`].
    pub fn from_raw(value: f64) -> Self {
        if value == DROP_SENTINEL {
            Self::Dropped
        } else {
            Self::Kept(value)
        }
    }

    /// Raw speed, with the drop sentinel for cut frames.
    pub fn to_raw(self) -> f64 {
        match self {
            Self::Kept(speed) => speed,
            Self::Dropped => DROP_SENTINEL,
        }
    }

    /// The speed multiplier, if the frame is kept.
    pub fn kept(self) -> Option<f64> {
        match self {
            Self::Kept(speed) => Some(speed),
            Self::Dropped => None,
        }
    }

    pub fn is_dropped(self) -> bool {
        matches!(self, Self::Dropped)
    }
}

impl From<Option<f64>> for Speed {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Dropped, Self::from_raw)
    }
}

impl From<Speed> for Option<f64> {
    fn from(speed: Speed) -> Self {
        speed.kept()
    }
}

/// A maximal run of frames sharing one speed.
///
/// Bounds use shared-boundary form: `end` is the last frame of the run and
/// `start` is the `end` of the previous run. The first chunk of a source
/// covers `start..=end`; every later chunk covers `start+1..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
    pub speed: Speed,
}

impl Chunk {
    pub fn new(start: usize, end: usize, speed: Speed) -> Self {
        Self { start, end, speed }
    }

    /// Source frames covered by this chunk.
    pub fn frames(&self, first: bool) -> Range<usize> {
        if first {
            self.start..self.end + 1
        } else {
            self.start + 1..self.end + 1
        }
    }
}

/// Group a per-frame speed list into chunks.
pub fn chunkify(speeds: &[Speed]) -> Vec<Chunk> {
    let Some(&last) = speeds.last() else {
        return Vec::new();
    };

    let mut chunks = Vec::new();
    let mut start = 0;
    for j in 1..speeds.len() {
        if speeds[j] != speeds[j - 1] {
            chunks.push(Chunk::new(start, j - 1, speeds[j - 1]));
            start = j - 1;
        }
    }
    chunks.push(Chunk::new(start, speeds.len() - 1, last));
    chunks
}

/// Output length in frames of the kept chunks.
pub fn chunks_len(chunks: &[Chunk]) -> f64 {
    chunks
        .iter()
        .enumerate()
        .filter_map(|(i, chunk)| {
            chunk
                .speed
                .kept()
                .map(|speed| chunk.frames(i == 0).len() as f64 / speed)
        })
        .sum()
}
