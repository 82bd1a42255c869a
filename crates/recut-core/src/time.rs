//! Media durations and frame rates.
//!
//! Both are kept as exact fractions so that frame counts derived from them
//! do not drift.

use num_rational::{Ratio, Rational64};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RecutError, Result};
use crate::ratio::{limit_denominator, MAX_DENOMINATOR};

/// A length of media in seconds, as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    value: Rational64,
}

impl RationalTime {
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Seconds as reported by a prober, e.g. `"12.345"` parsed to f64.
    ///
    /// Non-finite or negative values give zero.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Self::ZERO;
        }
        match Ratio::<i64>::approximate_float(seconds) {
            Some(approx) => {
                let exact = Ratio::new(*approx.numer() as i128, *approx.denom() as i128);
                let reduced = limit_denominator(exact, MAX_DENOMINATOR);
                match (i64::try_from(*reduced.numer()), i64::try_from(*reduced.denom())) {
                    (Ok(n), Ok(d)) => Self::new(n, d),
                    _ => Self::ZERO,
                }
            }
            None => Self::ZERO,
        }
    }

    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Whole frames that fit in this duration at `rate`.
    pub fn to_frames(self, rate: FrameRate) -> i64 {
        (self.value * rate.as_ratio()).floor().to_integer()
    }

    #[inline]
    pub fn as_ratio(self) -> Rational64 {
        self.value
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frames per second as a fraction, e.g. 30000/1001 for NTSC 29.97.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);

    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Frame rate given on the command line or in a job file, such as
    /// `29.97`. Reduced to the closest fraction whose denominator is at most
    /// one million, so `29.97` becomes 2997/100.
    pub fn from_fps_f64(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(RecutError::InvalidParameter(format!(
                "frame rate must be a positive number, got {}",
                fps
            )));
        }
        let approx = Ratio::<i64>::approximate_float(fps).ok_or_else(|| {
            RecutError::InvalidParameter(format!("frame rate {} is not representable", fps))
        })?;
        let exact = Ratio::new(*approx.numer() as i128, *approx.denom() as i128);
        let reduced = limit_denominator(exact, MAX_DENOMINATOR);

        match (
            u32::try_from(*reduced.numer()),
            u32::try_from(*reduced.denom()),
        ) {
            (Ok(numerator), Ok(denominator)) if numerator > 0 => {
                Ok(Self::new(numerator, denominator))
            }
            _ => Err(RecutError::InvalidParameter(format!(
                "frame rate {} is out of range",
                fps
            ))),
        }
    }

    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    #[inline]
    pub fn as_ratio(self) -> Rational64 {
        Rational64::new(self.numerator as i64, self.denominator as i64)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}
