//! Rational timecodes for exact-timeline exchange formats.
//!
//! Exchange formats such as FCPXML express every time value as
//! `"<numerator>/<denominator>s"`. Consumers accept arbitrary fractions in
//! theory but behave best with small, standard denominators, so values are
//! normalized onto a denominator of 3000 whenever that is exact. When it is
//! not, the value is rounded up to the next multiple of 1/30 second.

use num_rational::{Ratio, Rational64};
use std::fmt;

use crate::error::{RecutError, Result};
use crate::ratio::{limit_denominator, MAX_DENOMINATOR};
use crate::time::FrameRate;

/// Preferred denominator for encoded values.
pub const TARGET_DENOMINATOR: i128 = 3000;

/// Fallback grid: values that cannot be scaled onto the target denominator
/// are rounded up to a whole number of `1 / FALLBACK_STEPS_PER_SECOND`.
pub const FALLBACK_STEPS_PER_SECOND: i128 = 30;

/// A time value in seconds, stored as the exact numerator/denominator pair
/// that will be written out.
///
/// The pair is deliberately not reduced: `3000/3000s` and `1/1s` are the same
/// value but different encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RationalTimecode {
    numerator: i64,
    denominator: i64,
}

impl RationalTimecode {
    /// Canonical zero, written as `0s`.
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// Encode `frames` at `rate` as a rational number of seconds.
    ///
    /// `frames` must be non-negative.
    pub fn from_frames(frames: Rational64, rate: FrameRate) -> Result<Self> {
        let frames = Ratio::new(*frames.numer() as i128, *frames.denom() as i128);
        Self::from_frames_exact(frames, rate)
    }

    /// Encode a floating point frame count, e.g. a clip length divided by
    /// its speed.
    pub fn from_frames_f64(frames: f64, rate: FrameRate) -> Result<Self> {
        if !frames.is_finite() {
            return Err(RecutError::InvalidParameter(format!(
                "cannot encode non-finite frame count {}",
                frames
            )));
        }
        if frames == 0.0 {
            return Ok(Self::ZERO);
        }
        let approx = Ratio::<i64>::approximate_float(frames).ok_or_else(|| {
            RecutError::InvalidParameter(format!("frame count {} is out of range", frames))
        })?;
        let frames = Ratio::new(*approx.numer() as i128, *approx.denom() as i128);
        Self::from_frames_exact(frames, rate)
    }

    fn from_frames_exact(frames: Ratio<i128>, rate: FrameRate) -> Result<Self> {
        if *frames.numer() == 0 {
            return Ok(Self::ZERO);
        }
        if *frames.numer() < 0 {
            return Err(RecutError::InvalidParameter(format!(
                "cannot encode negative frame count {}/{}",
                frames.numer(),
                frames.denom()
            )));
        }
        if rate.numerator == 0 || rate.denominator == 0 {
            return Err(RecutError::InvalidParameter(format!(
                "invalid frame rate {}/{}",
                rate.numerator, rate.denominator
            )));
        }

        let fps = Ratio::new(rate.numerator as i128, rate.denominator as i128);
        let seconds = limit_denominator(frames / fps, MAX_DENOMINATOR);

        let (numerator, denominator) = normalize(seconds);
        Ok(Self {
            numerator: narrow(numerator)?,
            denominator: narrow(denominator)?,
        })
    }

    /// Numerator as written.
    #[inline]
    pub fn numerator(self) -> i64 {
        self.numerator
    }

    /// Denominator as written.
    #[inline]
    pub fn denominator(self) -> i64 {
        self.denominator
    }

    /// The encoded value as a reduced rational number of seconds.
    #[inline]
    pub fn value(self) -> Rational64 {
        Rational64::new(self.numerator, self.denominator)
    }

    /// Check if this is the canonical zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Approximate value in seconds.
    pub fn to_seconds_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Default for RationalTimecode {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for RationalTimecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("0s")
        } else {
            write!(f, "{}/{}s", self.numerator, self.denominator)
        }
    }
}

/// Encode `frames` at `rate` straight to its `"<num>/<den>s"` string form.
pub fn encode_timecode(frames: f64, rate: FrameRate) -> Result<String> {
    RationalTimecode::from_frames_f64(frames, rate).map(|tc| tc.to_string())
}

/// Scale onto the target denominator, or fall back to the 1/30 s grid.
fn normalize(seconds: Ratio<i128>) -> (i128, i128) {
    let numerator = *seconds.numer();
    let denominator = *seconds.denom();

    if denominator >= TARGET_DENOMINATOR {
        return (numerator, denominator);
    }

    if TARGET_DENOMINATOR % denominator == 0 {
        let factor = TARGET_DENOMINATOR / denominator;
        return (numerator * factor, denominator * factor);
    }

    // First multiple of the grid step that reaches the value.
    let steps = (seconds * FALLBACK_STEPS_PER_SECOND).ceil().to_integer();
    let total = Ratio::new(steps, FALLBACK_STEPS_PER_SECOND);
    (*total.numer(), *total.denom())
}

fn narrow(value: i128) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| RecutError::InvalidParameter(format!("timecode component {} overflows", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode(frames: i64, rate: FrameRate) -> String {
        RationalTimecode::from_frames(Rational64::from_integer(frames), rate)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_zero_is_canonical() {
        assert_eq!(encode(0, FrameRate::FPS_30), "0s");
        assert_eq!(encode_timecode(0.0, FrameRate::FPS_29_97).unwrap(), "0s");
    }

    #[test]
    fn test_one_second_scales_to_target_denominator() {
        assert_eq!(encode(30, FrameRate::FPS_30), "3000/3000s");
        assert_eq!(encode(24, FrameRate::FPS_24), "3000/3000s");
    }

    #[test]
    fn test_single_frame_durations() {
        assert_eq!(encode(1, FrameRate::FPS_30), "100/3000s");
        assert_eq!(encode(1, FrameRate::FPS_25), "120/3000s");
        assert_eq!(encode(1, FrameRate::FPS_29_97), "1001/30000s");
    }

    #[test]
    fn test_fallback_rounds_up_to_thirtieth() {
        // 1/7 s cannot be scaled onto 3000; the next multiple of 1/30 is 5/30.
        let tc = RationalTimecode::from_frames(Rational64::new(30, 7), FrameRate::FPS_30).unwrap();
        assert_eq!(tc.to_string(), "1/6s");
        assert_eq!(tc.value(), Rational64::new(5, 30));
    }

    #[test]
    fn test_fallback_at_23_976() {
        // 25 frames at 23.976 is 1001/960 s; rounds up to 32/30 = 16/15.
        let tc = RationalTimecode::from_frames(Rational64::from_integer(25), FrameRate::FPS_23_976)
            .unwrap();
        assert_eq!(tc.to_string(), "16/15s");
    }

    #[test]
    fn test_float_frames_at_150_percent() {
        // 100 frames played at 150% is 20/9 s, which lands on the 1/30 grid at 67/30.
        let tc = RationalTimecode::from_frames_f64(100.0 / 1.5, FrameRate::FPS_30).unwrap();
        assert_eq!(tc.to_string(), "67/30s");
        assert!(tc.value() - Rational64::new(20, 9) < Rational64::new(1, 30));
    }

    #[test]
    fn test_negative_rejected() {
        assert!(RationalTimecode::from_frames_f64(-1.0, FrameRate::FPS_30).is_err());
        assert!(RationalTimecode::from_frames_f64(f64::INFINITY, FrameRate::FPS_30).is_err());
    }

    proptest! {
        #[test]
        fn prop_zero_law(num in 1u32..240_000, den in 1u32..2_000) {
            let rate = FrameRate::new(num, den);
            prop_assert_eq!(encode(0, rate), "0s");
        }

        #[test]
        fn prop_monotonic_whole_frames(
            a in 0i64..100_000,
            gap in 1i64..1_000,
            rate in prop::sample::select(vec![
                FrameRate::FPS_23_976,
                FrameRate::FPS_24,
                FrameRate::FPS_25,
                FrameRate::FPS_29_97,
                FrameRate::FPS_30,
            ]),
        ) {
            let lo = RationalTimecode::from_frames(Rational64::from_integer(a), rate).unwrap();
            let hi = RationalTimecode::from_frames(Rational64::from_integer(a + gap), rate).unwrap();
            prop_assert!(lo.value() < hi.value());
        }

        #[test]
        fn prop_fallback_error_bounded(num in 1i64..1_000_000, den in 1i64..2_999) {
            // Reduced denominators below 3000 either scale exactly or land on
            // the fallback grid.
            let frames = Rational64::new(num, den) * 30;
            let tc = RationalTimecode::from_frames(frames, FrameRate::FPS_30).unwrap();
            let ideal = Rational64::new(num, den);
            let error = tc.value() - ideal;
            prop_assert!(error >= Rational64::from_integer(0));
            prop_assert!(error < Rational64::new(1, 30));
        }
    }
}
