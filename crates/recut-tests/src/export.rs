//! Integration tests for FCPXML export of built timelines.

use recut_core::{FrameRate, Result};
use recut_fcpxml::{export_timeline, timeline_to_string, write_fcpxml, ExportSettings};
use recut_media::MediaInfo;
use recut_timeline::{make_timeline, Clip, EditParams, Speed, Timeline};

fn input() -> MediaInfo {
    let mut info = MediaInfo::new("/footage/interview.mov");
    info.duration = recut_core::RationalTime::new(5, 1);
    info
}

fn build(list: Vec<Speed>) -> Timeline {
    let mut analyze =
        move |_: usize, _: &MediaInfo, _: FrameRate, _: &EditParams| -> Result<Vec<Speed>> {
            Ok(list.clone())
        };
    let params = EditParams {
        frame_rate: Some(30.0),
        ..EditParams::default()
    };
    make_timeline(vec![input()], &params, &mut analyze).unwrap()
}

fn list(runs: &[(usize, Option<f64>)]) -> Vec<Speed> {
    runs.iter()
        .flat_map(|&(len, speed)| std::iter::repeat(Speed::from(speed)).take(len))
        .collect()
}

#[test]
fn cut_timeline_exports_one_clip_per_kept_run() {
    let tl = build(list(&[(30, Some(1.0)), (15, None), (45, Some(1.0))]));
    let xml = timeline_to_string(&tl).unwrap();

    assert_eq!(xml.matches("<asset-clip ").count(), 2);
    assert!(xml.contains(r#"offset="0s" ref="r2" duration="3000/3000s" audioRole"#));
    assert!(xml.contains(r#"offset="3000/3000s" ref="r2" duration="4500/3000s" start="4500/3000s""#));
    assert!(!xml.contains("timeMap"));
}

#[test]
fn double_speed_clip_is_half_length_with_remap() {
    let mut info = input();
    info.path = "/footage/fast.mov".into();
    let settings = ExportSettings {
        input: &info,
        frame_rate: FrameRate::FPS_30,
        sample_rate: 48000,
        resolution: (1920, 1080),
        total_duration: 50.0,
    };
    let clips = [Clip::new(0, 100, 0, 2.0, 0)];
    let xml = String::from_utf8(write_fcpxml(Vec::new(), &clips, &settings).unwrap()).unwrap();

    // 100 source frames at 200% last 50 output frames.
    assert!(xml.contains(r#"duration="5000/3000s""#));
    assert!(xml.contains(r#"<timept time="0s" value="0s" interp="smooth2"/>"#));
    assert!(xml.contains(r#"<timept time="2500/3000s" value="5000/3000s" interp="smooth2"/>"#));
}

#[test]
fn remap_total_is_timeline_length() {
    let tl = build(list(&[(60, Some(2.0)), (30, Some(1.0))]));
    assert_eq!(tl.out_len(), 60.0);
    let xml = timeline_to_string(&tl).unwrap();

    assert_eq!(xml.matches("<timeMap>").count(), 1);
    assert!(xml.contains(r#"<timept time="3000/3000s" value="6000/3000s" interp="smooth2"/>"#));
}

#[test]
fn export_writes_file() {
    let tl = build(list(&[(30, Some(1.0))]));
    let path = std::env::temp_dir().join(format!("recut-export-{}.fcpxml", std::process::id()));
    export_timeline(&tl, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, timeline_to_string(&tl).unwrap());
    std::fs::remove_file(&path).ok();
}
