//! Layer assembly: clips to visual and audio layers.

use recut_media::MediaInfo;
use tracing::debug;

use crate::chunk::{chunkify, Chunk, Speed};
use crate::clip::{clipify, unclipify, Clip};
use crate::error::TimelineError;
use crate::objects::{AudioObj, Visual};

/// Visual objects stacked on one layer.
pub type VisualLayer = Vec<Visual>;
/// Visual layers, later layers render on top.
pub type VisualSpace = Vec<VisualLayer>;
/// Audio objects on one track.
pub type AudioLayer = Vec<AudioObj>;
/// One audio layer per source audio track.
pub type AudioSpace = Vec<AudioLayer>;

/// Mirror a clip list into one visual layer and one audio layer per audio
/// track of `input`.
pub fn make_av(clips: &[Clip], input: &MediaInfo) -> (VisualSpace, AudioSpace) {
    let visual = vec![clips.iter().copied().map(Visual::Video).collect()];
    let audio = (0..input.audio_track_count())
        .map(|stream| {
            clips
                .iter()
                .map(|&clip| AudioObj::new(clip, stream))
                .collect()
        })
        .collect();
    (visual, audio)
}

/// Chain every input's speed list onto one output timeline.
///
/// Returns the recovered chunk summary (when the clip layer can be expressed
/// as a single speed list) and the layers. Only the first input's audio
/// tracks are laid out.
pub fn make_layers(
    inputs: &[MediaInfo],
    speed_lists: &[Vec<Speed>],
) -> Result<(Option<Vec<Chunk>>, VisualSpace, AudioSpace), TimelineError> {
    let first = inputs.first().ok_or(TimelineError::NoInputs)?;
    if speed_lists.len() != inputs.len() {
        return Err(TimelineError::SpeedListCount {
            inputs: inputs.len(),
            lists: speed_lists.len(),
        });
    }

    let mut clips = Vec::new();
    let mut cursor = 0.0;
    for (source, speeds) in speed_lists.iter().enumerate() {
        let (source_clips, end) = clipify(&chunkify(speeds), source, cursor)?;
        debug!(
            "Source {}: {} clips, output {:.2} -> {:.2}",
            source,
            source_clips.len(),
            cursor,
            end
        );
        clips.extend(source_clips);
        cursor = end;
    }

    let chunks = match unclipify(&clips) {
        Ok(speeds) => Some(chunkify(&speeds)),
        Err(err) => {
            debug!("No chunk summary: {}", err);
            None
        }
    };

    let (visual, audio) = make_av(&clips, first);
    Ok((chunks, visual, audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use recut_media::AudioStreamInfo;

    fn input(tracks: usize) -> MediaInfo {
        let mut info = MediaInfo::new("input.mp4");
        info.audio_streams = (0..tracks)
            .map(|index| AudioStreamInfo {
                index: index + 1,
                codec: "aac".to_string(),
                sample_rate: 48000,
                channels: 2,
                bit_rate: None,
            })
            .collect();
        info
    }

    fn speeds(runs: &[(usize, Option<f64>)]) -> Vec<Speed> {
        runs.iter()
            .flat_map(|&(len, speed)| std::iter::repeat(Speed::from(speed)).take(len))
            .collect()
    }

    #[test]
    fn test_make_av_mirrors_clips() {
        let clips = vec![Clip::new(0, 10, 0, 1.0, 0), Clip::new(10, 20, 30, 2.0, 0)];
        let (visual, audio) = make_av(&clips, &input(2));

        assert_eq!(visual.len(), 1);
        assert_eq!(visual[0][1].as_clip(), Some(&clips[1]));
        assert_eq!(audio.len(), 2);
        assert_eq!(audio[1][0], AudioObj::new(clips[0], 1));
    }

    #[test]
    fn test_make_av_without_audio() {
        let clips = vec![Clip::new(0, 10, 0, 1.0, 0)];
        let (visual, audio) = make_av(&clips, &input(0));
        assert_eq!(visual[0].len(), 1);
        assert!(audio.is_empty());
    }

    #[test]
    fn test_single_source_recovers_chunks() {
        let list = speeds(&[(10, Some(1.0)), (20, None), (20, Some(1.0))]);
        let (chunks, visual, audio) = make_layers(&[input(1)], &[list.clone()]).unwrap();

        assert_eq!(visual[0].len(), 2);
        assert_eq!(audio[0].len(), 2);
        let chunks = chunks.expect("single source has a chunk summary");
        assert_eq!(chunks, chunkify(&list));
    }

    #[test]
    fn test_second_source_chains_after_first() {
        let a = speeds(&[(30, Some(1.0))]);
        let b = speeds(&[(20, Some(2.0))]);
        let (chunks, visual, _) = make_layers(&[input(1), input(1)], &[a, b]).unwrap();

        // Source 1 cannot be folded into one speed list.
        assert!(chunks.is_none());
        let clips: Vec<&Clip> = visual[0].iter().filter_map(Visual::as_clip).collect();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[1].source, 1);
        assert_eq!(clips[1].start, 30);
    }

    #[test]
    fn test_input_count_checked() {
        assert_eq!(make_layers(&[], &[]).unwrap_err(), TimelineError::NoInputs);
        assert_eq!(
            make_layers(&[input(1)], &[]).unwrap_err(),
            TimelineError::SpeedListCount {
                inputs: 1,
                lists: 0
            }
        );
    }

    proptest! {
        #[test]
        fn prop_layer_mirroring(
            runs in prop::collection::vec(
                (1usize..20, prop::option::of(prop::sample::select(vec![0.5, 1.0, 2.0]))),
                1..8,
            ),
            tracks in 0usize..4,
        ) {
            let list = speeds(&runs);
            let (_, visual, audio) = make_layers(&[input(tracks)], &[list]).unwrap();
            prop_assert_eq!(visual.len(), 1);
            prop_assert_eq!(audio.len(), tracks);
            for layer in &audio {
                prop_assert_eq!(layer.len(), visual[0].len());
            }
        }
    }
}
