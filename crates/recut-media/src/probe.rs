//! Media file probing to get metadata without full decode.

use recut_core::{FrameRate, RationalTime, RecutError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Resolution assumed for inputs without a video stream.
pub const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// File path
    pub path: PathBuf,
    /// Duration
    pub duration: RationalTime,
    /// Video streams
    pub video_streams: Vec<VideoStreamInfo>,
    /// Audio streams
    pub audio_streams: Vec<AudioStreamInfo>,
    /// Container format
    pub format: String,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub index: usize,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<FrameRate>,
    pub pixel_format: String,
    pub bit_rate: Option<u64>,
}

/// Information about an audio stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub index: usize,
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_rate: Option<u64>,
}

/// Source of media metadata.
pub trait MediaProber {
    /// Read the metadata of the file at `path`.
    fn probe(&self, path: &Path) -> Result<MediaInfo>;
}

/// Prober backed by the `ffprobe` executable that ships next to FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfprobeProber;

impl MediaProber for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        MediaInfo::probe(path)
    }
}

impl MediaInfo {
    /// Create metadata for a file with no streams; useful for building
    /// inputs by hand.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            duration: RationalTime::ZERO,
            video_streams: Vec::new(),
            audio_streams: Vec::new(),
            format: String::new(),
        }
    }

    /// Probe a media file with ffprobe.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RecutError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let ffprobe = ffmpeg_sidecar::ffprobe::ffprobe_path();
        debug!("Probing {} with {}", path.display(), ffprobe.display());

        let output = Command::new(&ffprobe)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| {
                RecutError::Media(format!("Failed to run {}: {}", ffprobe.display(), e))
            })?;

        if !output.status.success() {
            return Err(RecutError::Media(format!(
                "ffprobe failed on {} ({})",
                path.display(),
                output.status
            )));
        }

        Self::from_ffprobe_json(path, &output.stdout)
    }

    /// Build metadata from ffprobe's `-print_format json` output.
    pub fn from_ffprobe_json(path: impl Into<PathBuf>, json: &[u8]) -> Result<Self> {
        let raw: FfprobeOutput = serde_json::from_slice(json)
            .map_err(|e| RecutError::Media(format!("Invalid ffprobe output: {}", e)))?;

        let mut info = Self::new(path);

        for stream in raw.streams {
            match stream.codec_type.as_deref() {
                Some("video") => info.video_streams.push(VideoStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name.unwrap_or_default(),
                    width: stream.width.unwrap_or(0),
                    height: stream.height.unwrap_or(0),
                    frame_rate: stream
                        .avg_frame_rate
                        .as_deref()
                        .and_then(parse_rate)
                        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate)),
                    pixel_format: stream.pix_fmt.unwrap_or_default(),
                    bit_rate: stream.bit_rate.as_deref().and_then(|b| b.parse().ok()),
                }),
                Some("audio") => info.audio_streams.push(AudioStreamInfo {
                    index: stream.index,
                    codec: stream.codec_name.unwrap_or_default(),
                    sample_rate: stream
                        .sample_rate
                        .as_deref()
                        .and_then(|r| r.parse().ok())
                        .unwrap_or(0),
                    channels: stream.channels.unwrap_or(0),
                    bit_rate: stream.bit_rate.as_deref().and_then(|b| b.parse().ok()),
                }),
                _ => {}
            }
        }

        if let Some(format) = raw.format {
            info.format = format.format_name.unwrap_or_default();
            if let Some(seconds) = format.duration.as_deref().and_then(|d| d.parse::<f64>().ok())
            {
                info.duration = RationalTime::from_seconds_f64(seconds);
            }
        }

        Ok(info)
    }

    /// Check if the file has video.
    pub fn has_video(&self) -> bool {
        !self.video_streams.is_empty()
    }

    /// Check if the file has audio.
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// Get the primary video stream info.
    pub fn primary_video(&self) -> Option<&VideoStreamInfo> {
        self.video_streams.first()
    }

    /// Get the primary audio stream info.
    pub fn primary_audio(&self) -> Option<&AudioStreamInfo> {
        self.audio_streams.first()
    }

    /// Frame rate of the primary video stream, or 30 fps when unknown.
    pub fn frame_rate(&self) -> FrameRate {
        match self.primary_video().and_then(|v| v.frame_rate) {
            Some(rate) => rate,
            None => {
                warn!(
                    "No frame rate found for {}, assuming {}",
                    self.path.display(),
                    FrameRate::FPS_30
                );
                FrameRate::FPS_30
            }
        }
    }

    /// Width and height of the primary video stream.
    pub fn resolution(&self) -> (u32, u32) {
        self.primary_video()
            .map(|v| (v.width, v.height))
            .filter(|&(w, h)| w > 0 && h > 0)
            .unwrap_or(DEFAULT_RESOLUTION)
    }

    /// Sample rate of the primary audio stream.
    pub fn sample_rate(&self) -> Option<u32> {
        self.primary_audio()
            .map(|a| a.sample_rate)
            .filter(|&rate| rate > 0)
    }

    /// Number of audio tracks.
    pub fn audio_track_count(&self) -> usize {
        self.audio_streams.len()
    }

    /// File name shown in editors.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Absolute path of the file, resolved against the working directory
    /// when the file cannot be canonicalized.
    pub fn abs_path(&self) -> PathBuf {
        std::fs::canonicalize(&self.path).unwrap_or_else(|_| {
            if self.path.is_absolute() {
                self.path.clone()
            } else {
                std::env::current_dir()
                    .map(|dir| dir.join(&self.path))
                    .unwrap_or_else(|_| self.path.clone())
            }
        })
    }

    /// `file://` URL of the absolute path.
    pub fn path_url(&self) -> String {
        format!("file://{}", self.abs_path().to_string_lossy())
    }
}

/// Parse an ffprobe rate such as `30000/1001`. `0/0` means unknown.
fn parse_rate(text: &str) -> Option<FrameRate> {
    let (num, den) = text.split_once('/').unwrap_or((text, "1"));
    let num: u32 = num.trim().parse().ok()?;
    let den: u32 = den.trim().parse().ok()?;
    (num > 0 && den > 0).then(|| FrameRate::new(num, den))
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: usize,
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    pix_fmt: Option<String>,
    bit_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "h264",
                "codec_type": "video",
                "width": 1280,
                "height": 720,
                "pix_fmt": "yuv420p",
                "r_frame_rate": "30000/1001",
                "avg_frame_rate": "30000/1001",
                "bit_rate": "2500000"
            },
            {
                "index": 1,
                "codec_name": "aac",
                "codec_type": "audio",
                "sample_rate": "44100",
                "channels": 2,
                "r_frame_rate": "0/0",
                "avg_frame_rate": "0/0"
            },
            {
                "index": 2,
                "codec_name": "aac",
                "codec_type": "audio",
                "sample_rate": "44100",
                "channels": 1
            },
            {
                "index": 3,
                "codec_name": "mov_text",
                "codec_type": "subtitle"
            }
        ],
        "format": {
            "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
            "duration": "12.345000"
        }
    }"#;

    #[test]
    fn test_parse_ffprobe_output() {
        let info = MediaInfo::from_ffprobe_json("clip.mp4", SAMPLE.as_bytes()).unwrap();
        assert_eq!(info.frame_rate(), FrameRate::FPS_29_97);
        assert_eq!(info.resolution(), (1280, 720));
        assert_eq!(info.sample_rate(), Some(44100));
        assert_eq!(info.audio_track_count(), 2);
        assert_eq!(info.duration, RationalTime::new(12_345, 1000));
        assert_eq!(info.primary_video().unwrap().bit_rate, Some(2_500_000));
        assert_eq!(info.name(), "clip.mp4");
    }

    #[test]
    fn test_defaults_without_video() {
        let info = MediaInfo::new("voice.wav");
        assert_eq!(info.resolution(), DEFAULT_RESOLUTION);
        assert_eq!(info.frame_rate(), FrameRate::FPS_30);
        assert_eq!(info.sample_rate(), None);
        assert!(!info.has_video());
    }

    #[test]
    fn test_invalid_json_is_media_error() {
        let err = MediaInfo::from_ffprobe_json("x.mp4", b"not json").unwrap_err();
        assert!(matches!(err, RecutError::Media(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = MediaInfo::probe("/definitely/not/here.mp4").unwrap_err();
        assert!(matches!(err, RecutError::NotFound(_)));
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("25/1"), Some(FrameRate::FPS_25));
        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("24"), Some(FrameRate::FPS_24));
    }
}
