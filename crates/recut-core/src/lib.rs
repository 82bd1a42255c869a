//! Recut Core - Foundation types for speed-schedule editing
//!
//! This crate provides the fundamental types used throughout Recut:
//! - Time representation (RationalTime, FrameRate)
//! - Rational timecode encoding for exchange formats
//! - Overlay colors

pub mod color;
pub mod error;
pub mod ratio;
pub mod time;
pub mod timecode;

pub use color::Color;
pub use error::{RecutError, Result};
pub use ratio::limit_denominator;
pub use time::{FrameRate, RationalTime};
pub use timecode::{encode_timecode, RationalTimecode};
