//! Recut Media - FFmpeg integration for media metadata
//!
//! This crate handles media file probing: frame rate, resolution,
//! sample rate and audio track layout of the inputs being edited.

pub mod probe;

pub use probe::{AudioStreamInfo, FfprobeProber, MediaInfo, MediaProber, VideoStreamInfo};
