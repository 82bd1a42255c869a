//! The timeline aggregate.

use recut_core::{Color, FrameRate};
use recut_media::MediaInfo;

use crate::chunk::Chunk;
use crate::clip::Clip;
use crate::layers::{AudioSpace, VisualSpace};
use crate::objects::Visual;

/// Everything produced by one editing run.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Input files, in chaining order
    pub inputs: Vec<MediaInfo>,
    /// Output frame rate
    pub frame_rate: FrameRate,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Output width and height
    pub resolution: (u32, u32),
    pub background: Color,
    /// Visual layers, later layers render on top
    pub visual: VisualSpace,
    /// Audio layers, one per audio track
    pub audio: AudioSpace,
    /// Chunks recovered from the clip layer, when it is a single speed list
    pub chunks: Option<Vec<Chunk>>,
}

impl Timeline {
    /// First input file.
    pub fn inp(&self) -> Option<&MediaInfo> {
        self.inputs.first()
    }

    /// Last output frame covered by any layer, judged by each layer's last
    /// object.
    pub fn end(&self) -> usize {
        let visual = self
            .visual
            .iter()
            .filter_map(|layer| layer.last())
            .map(Visual::end);
        let audio = self
            .audio
            .iter()
            .filter_map(|layer| layer.last())
            .map(|obj| obj.clip.output_end());
        visual.chain(audio).max().unwrap_or(0)
    }

    /// Output length in frames of the longest layer.
    pub fn out_len(&self) -> f64 {
        let visual = self
            .visual
            .iter()
            .map(|layer| layer.iter().map(Visual::output_duration).sum::<f64>());
        let audio = self
            .audio
            .iter()
            .map(|layer| layer.iter().map(|obj| obj.clip.output_duration()).sum::<f64>());
        visual.chain(audio).fold(0.0, f64::max)
    }

    /// Clips of the bottom visual layer.
    pub fn primary_clips(&self) -> Vec<Clip> {
        self.visual
            .first()
            .map(|layer| layer.iter().filter_map(Visual::as_clip).copied().collect())
            .unwrap_or_default()
    }

    /// Put `visual` on a new layer above all others.
    pub fn push_overlay(&mut self, visual: Visual) {
        self.visual.push(vec![visual]);
    }
}
