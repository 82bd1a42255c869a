//! Builds a timeline from input files and editing parameters.

use recut_core::{Color, FrameRate, RecutError, Result};
use recut_media::MediaInfo;
use tracing::{debug, info};

use crate::chunk::Speed;
use crate::layers::make_layers;
use crate::overlay::TimelineVars;
use crate::params::EditParams;
use crate::timeline::Timeline;

/// Sample rate used when neither the parameters nor the first input give one.
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;

/// Produces the per-frame speed list of one input.
///
/// Implemented for closures, so a fixed list or a call into an analysis
/// stage can be passed directly.
pub trait SpeedAnalyzer {
    fn speed_list(
        &mut self,
        source: usize,
        input: &MediaInfo,
        frame_rate: FrameRate,
        params: &EditParams,
    ) -> Result<Vec<Speed>>;
}

impl<F> SpeedAnalyzer for F
where
    F: FnMut(usize, &MediaInfo, FrameRate, &EditParams) -> Result<Vec<Speed>>,
{
    fn speed_list(
        &mut self,
        source: usize,
        input: &MediaInfo,
        frame_rate: FrameRate,
        params: &EditParams,
    ) -> Result<Vec<Speed>> {
        self(source, input, frame_rate, params)
    }
}

/// Analyze every input, lay the results out and add the overlays.
///
/// Inputs are analyzed in order; frame rate and resolution come from the
/// first input unless overridden.
pub fn make_timeline<A: SpeedAnalyzer + ?Sized>(
    inputs: Vec<MediaInfo>,
    params: &EditParams,
    analyzer: &mut A,
) -> Result<Timeline> {
    let first = inputs
        .first()
        .ok_or_else(|| RecutError::InvalidParameter("no input files".to_string()))?;

    let frame_rate = match params.frame_rate {
        Some(fps) => FrameRate::from_fps_f64(fps)?,
        None => first.frame_rate(),
    };
    let resolution = first.resolution();
    let sample_rate = params
        .sample_rate
        .or_else(|| first.sample_rate())
        .unwrap_or(DEFAULT_SAMPLE_RATE);
    let background: Color = params
        .background
        .parse()
        .map_err(|e| RecutError::Config(format!("Invalid background: {}", e)))?;

    let mut speed_lists = Vec::with_capacity(inputs.len());
    for (source, input) in inputs.iter().enumerate() {
        let speeds = analyzer.speed_list(source, input, frame_rate, params)?;
        debug!("Got {} speeds for {}", speeds.len(), input.name());
        speed_lists.push(speeds);
    }

    let (chunks, visual, audio) = make_layers(&inputs, &speed_lists)?;

    let mut timeline = Timeline {
        inputs,
        frame_rate,
        sample_rate,
        resolution,
        background,
        visual,
        audio,
        chunks,
    };

    let vars = TimelineVars::new(resolution, timeline.end());
    for spec in &params.overlays {
        let visual = spec.resolve(&vars)?;
        timeline.push_overlay(visual);
    }

    info!(
        "Timeline: {} inputs at {}, {}x{}, {} visual / {} audio layers, ends at frame {}",
        timeline.inputs.len(),
        frame_rate,
        resolution.0,
        resolution.1,
        timeline.visual.len(),
        timeline.audio.len(),
        timeline.end()
    );

    Ok(timeline)
}
