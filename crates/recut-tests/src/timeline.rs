//! Integration tests for the timeline subsystem.
//!
//! Exercises recut-media inputs flowing through recut-timeline's builder.

use recut_core::{FrameRate, RecutError, Result};
use recut_media::MediaInfo;
use recut_timeline::{
    chunkify, clipify, make_timeline, unclipify, EditParams, Speed, Visual, DROP_SENTINEL,
};

// ── Helpers ────────────────────────────────────────────────────

const FFPROBE_JSON: &str = r#"{
    "streams": [
        {"index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920,
         "height": 1080, "r_frame_rate": "30/1", "pix_fmt": "yuv420p"},
        {"index": 1, "codec_type": "audio", "codec_name": "aac",
         "sample_rate": "48000", "channels": 2},
        {"index": 2, "codec_type": "audio", "codec_name": "aac",
         "sample_rate": "48000", "channels": 1}
    ],
    "format": {"format_name": "mov,mp4", "duration": "10.0"}
}"#;

fn probed(name: &str) -> MediaInfo {
    MediaInfo::from_ffprobe_json(name, FFPROBE_JSON.as_bytes()).unwrap()
}

fn speeds(raw: &[f64]) -> Vec<Speed> {
    raw.iter().copied().map(Speed::from_raw).collect()
}

fn run(runs: &[(usize, f64)]) -> Vec<f64> {
    runs.iter()
        .flat_map(|&(len, speed)| std::iter::repeat(speed).take(len))
        .collect()
}

fn analyzer(
    lists: Vec<Vec<Speed>>,
) -> impl FnMut(usize, &MediaInfo, FrameRate, &EditParams) -> Result<Vec<Speed>> {
    move |source, _, _, _| {
        lists
            .get(source)
            .cloned()
            .ok_or_else(|| RecutError::NotFound(format!("speed list {}", source)))
    }
}

// ── Timeline algebra ───────────────────────────────────────────

#[test]
fn speed_list_round_trips_through_clips() {
    let list = speeds(&run(&[
        (12, 1.0),
        (8, DROP_SENTINEL),
        (20, 2.0),
        (5, 0.5),
        (30, DROP_SENTINEL),
        (9, 1.0),
    ]));
    let (clips, _) = clipify(&chunkify(&list), 0, 0.0).unwrap();
    assert_eq!(unclipify(&clips).unwrap(), list);
}

#[test]
fn dropped_middle_run_is_skipped() {
    let list = speeds(&run(&[(10, 1.0), (20, DROP_SENTINEL), (20, 1.0)]));
    let (clips, cursor) = clipify(&chunkify(&list), 0, 0.0).unwrap();

    assert_eq!(clips.len(), 2);
    assert_eq!(cursor, 30.0);
    assert_eq!((clips[1].start, clips[1].offset), (10, 30));
}

// ── Builder ────────────────────────────────────────────────────

#[test]
fn builder_uses_probed_metadata() {
    let list = speeds(&run(&[(60, 1.0), (30, DROP_SENTINEL), (60, 1.5)]));
    let mut analyze = analyzer(vec![list]);
    let tl = make_timeline(vec![probed("talk.mp4")], &EditParams::default(), &mut analyze)
        .unwrap();

    assert_eq!(tl.frame_rate, FrameRate::FPS_30);
    assert_eq!(tl.resolution, (1920, 1080));
    assert_eq!(tl.sample_rate, 48000);
    assert_eq!(tl.audio.len(), 2);
    assert!(tl.audio.iter().all(|layer| layer.len() == tl.visual[0].len()));
    assert_eq!(tl.end(), 100);
    assert!(tl.chunks.is_some());
}

#[test]
fn two_inputs_chain_but_lose_chunk_summary() {
    let a = speeds(&run(&[(30, 1.0)]));
    let b = speeds(&run(&[(30, 1.0)]));
    let mut analyze = analyzer(vec![a, b]);
    let tl = make_timeline(
        vec![probed("a.mp4"), probed("b.mp4")],
        &EditParams::default(),
        &mut analyze,
    )
    .unwrap();

    assert!(tl.chunks.is_none());
    assert_eq!(tl.primary_clips().len(), 2);
    assert_eq!(tl.end(), 60);
}

#[test]
fn overlays_from_json_params() {
    let params: EditParams = serde_json::from_str(
        r##"{
            "background": "#101010",
            "overlays": [
                {"type": "text", "start": 0, "dur": "end", "content": "Intro"},
                {"type": "image", "start": 10, "dur": 20, "src": "logo.png", "x": 0, "y": 0,
                 "anchor": "tl", "opacity": "80%"}
            ]
        }"##,
    )
    .unwrap();
    let mut analyze = analyzer(vec![speeds(&run(&[(90, 1.0)]))]);
    let tl = make_timeline(vec![probed("talk.mp4")], &params, &mut analyze).unwrap();

    assert_eq!(tl.visual.len(), 3);
    assert_eq!(tl.background.to_hex(), "#101010");
    let Visual::Text(text) = &tl.visual[1][0] else {
        panic!("expected text overlay");
    };
    assert_eq!((text.x, text.y, text.dur), (960, 540, 90));
    let Visual::Image(image) = &tl.visual[2][0] else {
        panic!("expected image overlay");
    };
    assert_eq!(image.opacity, 0.8);
}

#[test]
fn overlay_errors_are_config_errors() {
    let params: EditParams = serde_json::from_str(
        r#"{"overlays": [{"type": "text", "start": 0, "dur": 10, "content": "x", "y": "bottom"}]}"#,
    )
    .unwrap();
    let mut analyze = analyzer(vec![speeds(&run(&[(30, 1.0)]))]);
    let err = make_timeline(vec![probed("talk.mp4")], &params, &mut analyze).unwrap_err();

    assert!(matches!(err, RecutError::Config(_)));
    assert!(err.to_string().contains("variable 'bottom' is not defined."));
}

#[test]
fn invalid_speed_aborts_build() {
    let mut analyze = analyzer(vec![speeds(&run(&[(10, 1.0), (10, -2.0)]))]);
    let err = make_timeline(vec![probed("talk.mp4")], &EditParams::default(), &mut analyze)
        .unwrap_err();
    assert!(matches!(err, RecutError::Timeline(_)));
}
