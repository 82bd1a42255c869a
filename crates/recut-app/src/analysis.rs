//! Speed lists precomputed by an analysis pass and stored as JSON.

use recut_core::{FrameRate, RecutError, Result};
use recut_media::MediaInfo;
use recut_timeline::{EditParams, Speed, SpeedAnalyzer};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads the speed list of input `i` from the `i`th file.
///
/// Each file holds a JSON array with one entry per source frame: a speed
/// multiplier, or `null`/`99999` for a cut frame.
#[derive(Debug, Clone)]
pub struct SpeedListFiles {
    paths: Vec<PathBuf>,
}

impl SpeedListFiles {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    fn read(path: &Path) -> Result<Vec<Speed>> {
        let data = std::fs::read(path).map_err(|e| {
            RecutError::NotFound(format!("speed list {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&data).map_err(|e| {
            RecutError::Serialization(format!("invalid speed list {}: {}", path.display(), e))
        })
    }
}

impl SpeedAnalyzer for SpeedListFiles {
    fn speed_list(
        &mut self,
        source: usize,
        input: &MediaInfo,
        frame_rate: FrameRate,
        _params: &EditParams,
    ) -> Result<Vec<Speed>> {
        let path = self.paths.get(source).ok_or_else(|| {
            RecutError::NotFound(format!("no speed list for input {}", source))
        })?;
        let speeds = Self::read(path)?;

        let expected = input.duration.to_frames(frame_rate);
        if expected > 0 && (speeds.len() as i64 - expected).abs() > 1 {
            warn!(
                "{} has {} frames at {} but its speed list has {} entries",
                input.name(),
                expected,
                frame_rate,
                speeds.len()
            );
        }
        debug!("Loaded {} speeds from {}", speeds.len(), path.display());
        Ok(speeds)
    }
}
