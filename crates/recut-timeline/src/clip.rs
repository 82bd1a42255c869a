//! Clips and the conversions between chunk lists and clip lists.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::chunk::{Chunk, Speed};
use crate::error::TimelineError;

/// A contiguous run of source frames played at one speed, placed on the
/// output timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Position on the output timeline, in frames
    pub start: usize,
    /// Length in source frames
    pub duration: usize,
    /// Frames into the source
    pub offset: usize,
    /// Playback speed multiplier, always positive
    pub speed: f64,
    /// Index of the source file
    pub source: usize,
}

impl Clip {
    pub fn new(start: usize, duration: usize, offset: usize, speed: f64, source: usize) -> Self {
        Self {
            start,
            duration,
            offset,
            speed,
            source,
        }
    }

    /// Source frames covered by this clip.
    pub fn source_range(&self) -> Range<usize> {
        self.offset..self.offset + self.duration
    }

    /// Length on the output timeline, in frames.
    pub fn output_duration(&self) -> f64 {
        self.duration as f64 / self.speed
    }

    /// Last output frame touched by this clip, never less than 1.
    pub fn output_end(&self) -> usize {
        (self.start as f64 + self.output_duration())
            .round_ties_even()
            .max(1.0) as usize
    }
}

fn to_frame(cursor: f64) -> usize {
    cursor.round_ties_even() as usize
}

/// Place the kept chunks of one source on the output timeline.
///
/// `cursor` is the output position (in frames, unrounded) where the source
/// begins. Returns the clips and the cursor after the last kept chunk, so
/// several sources can be chained.
pub fn clipify(
    chunks: &[Chunk],
    source: usize,
    mut cursor: f64,
) -> Result<(Vec<Clip>, f64), TimelineError> {
    validate_chunks(chunks)?;

    let mut clips: Vec<Clip> = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let Speed::Kept(speed) = chunk.speed else {
            continue;
        };

        let frames = chunk.frames(i == 0);
        let duration = frames.len();

        // A clip that would land on the previous clip's start is collapsed.
        let collapsed = clips
            .last()
            .is_some_and(|last| last.start == to_frame(cursor));
        if !collapsed {
            clips.push(Clip::new(to_frame(cursor), duration, frames.start, speed, source));
        }

        cursor += duration as f64 / speed;
    }

    Ok((clips, cursor))
}

fn validate_chunks(chunks: &[Chunk]) -> Result<(), TimelineError> {
    for (index, chunk) in chunks.iter().enumerate() {
        if index > 0 {
            let previous_end = chunks[index - 1].end;
            if chunk.start != previous_end {
                return Err(TimelineError::NonContiguousChunks {
                    index,
                    start: chunk.start,
                    previous_end,
                });
            }
        }
        if chunk.frames(index == 0).is_empty() {
            return Err(TimelineError::ReversedChunk {
                index,
                start: chunk.start,
                end: chunk.end,
            });
        }
        if let Speed::Kept(speed) = chunk.speed {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(TimelineError::InvalidSpeed { index, speed });
            }
        }
    }
    Ok(())
}

/// Expand a single-source clip layer back into a per-frame speed list.
///
/// Fails when the layer cannot be expressed as one speed list: a clip from
/// another source, a clip placed after uncovered output frames, or source
/// ranges that overlap or go backwards. Source frames not covered by any
/// clip come back as [`Speed::Dropped`].
pub fn unclipify(clips: &[Clip]) -> Result<Vec<Speed>, TimelineError> {
    let last = clips.last().ok_or(TimelineError::EmptyLayer)?;

    let mut emitted = 0usize;
    let mut output = 0.0f64;
    let mut next_offset = 0usize;

    for (i, clip) in clips.iter().enumerate() {
        if clip.source != 0 {
            return Err(TimelineError::ForeignSource(clip.source));
        }

        let covered = emitted.max(output.ceil() as usize);
        if clip.start > covered {
            return Err(TimelineError::NullFrames {
                start: clip.start,
                covered,
            });
        }

        if i > 0 && clip.offset < next_offset {
            return Err(TimelineError::TooComplex {
                offset: clip.offset,
                previous: next_offset.saturating_sub(1),
            });
        }

        emitted += clip.duration;
        output += clip.output_duration();
        if clip.duration > 0 {
            next_offset = clip.offset + clip.duration;
        }
    }

    let mut speeds = vec![Speed::Dropped; last.offset + last.duration];
    for clip in clips {
        speeds[clip.source_range()].fill(Speed::Kept(clip.speed));
    }
    Ok(speeds)
}
