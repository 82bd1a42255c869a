//! FCPXML document writer.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use recut_core::{FrameRate, RationalTimecode};
use recut_media::MediaInfo;
use recut_timeline::{Clip, Timeline};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{FcpxmlError, Result};
use crate::timemap::TimeMap;

/// Schema version written on the root element.
pub const FCPXML_VERSION: &str = "1.9";

const FORMAT_ID: &str = "r1";
const ASSET_ID: &str = "r2";
const EVENT_NAME: &str = "recut output";

/// Everything besides the clips that goes into the document.
#[derive(Debug, Clone, Copy)]
pub struct ExportSettings<'a> {
    /// The single source every clip refers to
    pub input: &'a MediaInfo,
    pub frame_rate: FrameRate,
    /// Sample rate in Hz
    pub sample_rate: u32,
    pub resolution: (u32, u32),
    /// Output length in frames, used for time maps
    pub total_duration: f64,
}

impl<'a> ExportSettings<'a> {
    /// Settings for the first input of `timeline`.
    pub fn from_timeline(timeline: &'a Timeline) -> Result<Self> {
        let input = timeline
            .inp()
            .ok_or_else(|| FcpxmlError::Empty("timeline has no inputs".to_string()))?;
        Ok(Self {
            input,
            frame_rate: timeline.frame_rate,
            sample_rate: timeline.sample_rate,
            resolution: timeline.resolution,
            total_duration: timeline.out_len(),
        })
    }
}

/// `FFVideoFormat1080p30`, `FFVideoFormat1080p2997`, ...
fn format_name(height: u32, rate: FrameRate) -> String {
    let fps = rate.to_fps_f64();
    if (fps - fps.round()).abs() < 1e-9 {
        format!("FFVideoFormat{}p{}", height, fps.round() as u32)
    } else {
        format!("FFVideoFormat{}p{}", height, (fps * 100.0).round() as u32)
    }
}

/// Sequence audio rate such as `48k` or `44.1k`.
fn audio_rate_name(sample_rate: u32) -> String {
    if sample_rate % 1000 == 0 {
        format!("{}k", sample_rate / 1000)
    } else {
        let khz = format!("{:.3}", sample_rate as f64 / 1000.0);
        format!("{}k", khz.trim_end_matches('0').trim_end_matches('.'))
    }
}

struct FcpxmlWriter<W: Write> {
    xml: Writer<W>,
}

impl<W: Write> FcpxmlWriter<W> {
    fn new(out: W) -> Self {
        Self {
            xml: Writer::new_with_indent(out, b'\t', 1),
        }
    }

    fn start(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.xml.write_event(Event::Start(element))?;
        Ok(())
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.xml.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn header(&mut self) -> Result<()> {
        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.xml
            .write_event(Event::DocType(BytesText::from_escaped("fcpxml")))?;
        let mut root = BytesStart::new("fcpxml");
        root.push_attribute(("version", FCPXML_VERSION));
        self.start(root)
    }

    fn resources(&mut self, settings: &ExportSettings<'_>) -> Result<()> {
        let (width, height) = settings.resolution;
        let input = settings.input;
        let frame_duration = RationalTimecode::from_frames_f64(1.0, settings.frame_rate)?;

        self.start(BytesStart::new("resources"))?;

        let mut format = BytesStart::new("format");
        format.push_attribute(("id", FORMAT_ID));
        format.push_attribute(("name", format_name(height, settings.frame_rate).as_str()));
        format.push_attribute(("frameDuration", frame_duration.to_string().as_str()));
        format.push_attribute(("width", width.to_string().as_str()));
        format.push_attribute(("height", height.to_string().as_str()));
        format.push_attribute(("colorSpace", "1-1-1 (Rec. 709)"));
        self.empty(format)?;

        let channels = input.primary_audio().map_or(2, |a| a.channels.max(1));
        let mut asset = BytesStart::new("asset");
        asset.push_attribute(("id", ASSET_ID));
        asset.push_attribute(("name", input.name().as_str()));
        asset.push_attribute(("start", "0s"));
        asset.push_attribute(("hasVideo", "1"));
        asset.push_attribute(("format", FORMAT_ID));
        asset.push_attribute(("hasAudio", if input.has_audio() { "1" } else { "0" }));
        if input.has_audio() {
            asset.push_attribute((
                "audioSources",
                input.audio_track_count().to_string().as_str(),
            ));
            asset.push_attribute(("audioChannels", channels.to_string().as_str()));
            asset.push_attribute(("audioRate", settings.sample_rate.to_string().as_str()));
        }
        self.start(asset)?;

        let mut media_rep = BytesStart::new("media-rep");
        media_rep.push_attribute(("kind", "original-media"));
        media_rep.push_attribute(("src", input.path_url().as_str()));
        self.empty(media_rep)?;

        self.end("asset")?;
        self.end("resources")
    }

    fn open_spine(&mut self, settings: &ExportSettings<'_>) -> Result<()> {
        let name = settings.input.name();

        self.start(BytesStart::new("library"))?;

        let mut event = BytesStart::new("event");
        event.push_attribute(("name", EVENT_NAME));
        self.start(event)?;

        let mut project = BytesStart::new("project");
        project.push_attribute(("name", name.as_str()));
        self.start(project)?;

        let mut sequence = BytesStart::new("sequence");
        sequence.push_attribute(("format", FORMAT_ID));
        sequence.push_attribute(("tcStart", "0s"));
        sequence.push_attribute(("tcFormat", "NDF"));
        sequence.push_attribute(("audioLayout", "stereo"));
        sequence.push_attribute(("audioRate", audio_rate_name(settings.sample_rate).as_str()));
        self.start(sequence)?;

        self.start(BytesStart::new("spine"))
    }

    fn close_spine(&mut self) -> Result<()> {
        for name in ["spine", "sequence", "project", "event", "library", "fcpxml"] {
            self.end(name)?;
        }
        Ok(())
    }

    fn asset_clip(
        &mut self,
        clip: &Clip,
        offset: f64,
        first: bool,
        settings: &ExportSettings<'_>,
    ) -> Result<()> {
        let rate = settings.frame_rate;
        let name = settings.input.name();
        let duration = RationalTimecode::from_frames_f64(clip.output_duration(), rate)?;
        let offset = RationalTimecode::from_frames_f64(offset, rate)?;
        let start = RationalTimecode::from_frames_f64(clip.offset as f64 / clip.speed, rate)?;

        let mut element = BytesStart::new("asset-clip");
        element.push_attribute(("name", name.as_str()));
        element.push_attribute(("offset", offset.to_string().as_str()));
        element.push_attribute(("ref", ASSET_ID));
        element.push_attribute(("duration", duration.to_string().as_str()));
        if !(first && start.is_zero()) {
            element.push_attribute(("start", start.to_string().as_str()));
        }
        element.push_attribute(("audioRole", "dialogue"));
        element.push_attribute(("tcFormat", "NDF"));

        if clip.speed == 1.0 {
            return self.empty(element);
        }

        self.start(element)?;
        let map = TimeMap::constant_speed(settings.total_duration, clip.speed, rate)?;
        self.time_map(&map)?;
        self.end("asset-clip")
    }

    fn time_map(&mut self, map: &TimeMap) -> Result<()> {
        self.start(BytesStart::new("timeMap"))?;
        for point in map.points() {
            let mut timept = BytesStart::new("timept");
            timept.push_attribute(("time", point.time.to_string().as_str()));
            timept.push_attribute(("value", point.value.to_string().as_str()));
            timept.push_attribute(("interp", point.interp.as_str()));
            self.empty(timept)?;
        }
        self.end("timeMap")
    }

    fn into_inner(self) -> W {
        self.xml.into_inner()
    }
}

/// Write `clips` as an FCPXML document to `out` and hand the writer back.
///
/// Every clip is taken to come from `settings.input`.
pub fn write_fcpxml<W: Write>(out: W, clips: &[Clip], settings: &ExportSettings<'_>) -> Result<W> {
    let mut writer = FcpxmlWriter::new(out);
    writer.header()?;
    writer.resources(settings)?;
    writer.open_spine(settings)?;

    let mut last_dur = 0.0;
    for (i, clip) in clips.iter().enumerate() {
        writer.asset_clip(clip, last_dur, i == 0, settings)?;
        last_dur += clip.output_duration();
    }

    writer.close_spine()?;
    debug!("Wrote {} asset clips, {:.2} frames", clips.len(), last_dur);
    Ok(writer.into_inner())
}

/// Clips of the first source on the bottom layer of `timeline`.
fn export_clips(timeline: &Timeline) -> Vec<Clip> {
    let clips = timeline.primary_clips();
    let total = clips.len();
    let clips: Vec<Clip> = clips.into_iter().filter(|c| c.source == 0).collect();
    if clips.len() < total {
        warn!(
            "FCPXML export covers the first input only, skipping {} clips",
            total - clips.len()
        );
    }
    clips
}

/// Render `timeline` as an FCPXML string.
pub fn timeline_to_string(timeline: &Timeline) -> Result<String> {
    let settings = ExportSettings::from_timeline(timeline)?;
    let bytes = write_fcpxml(Vec::new(), &export_clips(timeline), &settings)?;
    String::from_utf8(bytes).map_err(|e| FcpxmlError::Xml(e.to_string()))
}

/// Write `timeline` as FCPXML to the file at `path`.
pub fn export_timeline(timeline: &Timeline, path: &Path) -> Result<()> {
    let settings = ExportSettings::from_timeline(timeline)?;
    let clips = export_clips(timeline);

    let file = File::create(path)?;
    let mut out = write_fcpxml(BufWriter::new(file), &clips, &settings)?;
    out.flush()?;

    info!("Exported {} clips to {}", clips.len(), path.display());
    Ok(())
}
