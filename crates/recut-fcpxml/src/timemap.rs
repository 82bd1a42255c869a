//! Time maps: retiming curves attached to clips.

use recut_core::{FrameRate, RationalTimecode, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Interpolation between two time points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    Linear,
    Smooth,
    #[default]
    Smooth2,
}

impl Interpolation {
    /// Value of the `interp` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Smooth => "smooth",
            Self::Smooth2 => "smooth2",
        }
    }
}

/// Maps a time in the clip to a time in its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePoint {
    pub time: RationalTimecode,
    pub value: RationalTimecode,
    pub interp: Interpolation,
}

impl TimePoint {
    pub fn new(time: RationalTimecode, value: RationalTimecode, interp: Interpolation) -> Self {
        Self {
            time,
            value,
            interp,
        }
    }
}

/// A retiming curve. Constant-speed clips need exactly two points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeMap {
    points: SmallVec<[TimePoint; 2]>,
}

impl TimeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Curve that plays `total_frames` of source at `speed` across the
    /// whole clip.
    pub fn constant_speed(total_frames: f64, speed: f64, rate: FrameRate) -> Result<Self> {
        let mut map = Self::new();
        map.push(TimePoint::new(
            RationalTimecode::ZERO,
            RationalTimecode::ZERO,
            Interpolation::Smooth2,
        ));
        map.push(TimePoint::new(
            RationalTimecode::from_frames_f64(total_frames / speed, rate)?,
            RationalTimecode::from_frames_f64(total_frames, rate)?,
            Interpolation::Smooth2,
        ));
        Ok(map)
    }

    pub fn push(&mut self, point: TimePoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when both clip time and source time never go backwards.
    pub fn is_monotonic(&self) -> bool {
        self.points.windows(2).all(|w| {
            w[0].time.value() <= w[1].time.value() && w[0].value.value() <= w[1].value.value()
        })
    }
}
