//! Objects placed on visual and audio layers.

use recut_core::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clip::Clip;

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!(
                "invalid alignment '{}', expected left, center or right",
                other
            )),
        }
    }
}

/// Which point of an object its `x`/`y` position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Anchor {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "br")]
    BottomRight,
    #[default]
    #[serde(rename = "ce")]
    Center,
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "tl",
            Self::TopRight => "tr",
            Self::BottomLeft => "bl",
            Self::BottomRight => "br",
            Self::Center => "ce",
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tl" => Ok(Self::TopLeft),
            "tr" => Ok(Self::TopRight),
            "bl" => Ok(Self::BottomLeft),
            "br" => Ok(Self::BottomRight),
            "ce" => Ok(Self::Center),
            other => Err(format!(
                "invalid anchor '{}', expected one of tl, tr, bl, br, ce",
                other
            )),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObj {
    pub start: usize,
    pub dur: usize,
    pub content: String,
    pub x: i64,
    pub y: i64,
    pub size: i64,
    pub font: String,
    pub align: Align,
    pub fill: Color,
    pub stroke: i64,
    pub strokecolor: Color,
    pub anchor: Anchor,
    pub rotate: f64,
    pub opacity: f64,
}

/// Image overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObj {
    pub start: usize,
    pub dur: usize,
    pub src: String,
    pub x: i64,
    pub y: i64,
    pub anchor: Anchor,
    pub opacity: f64,
    pub rotate: f64,
    pub stroke: i64,
    pub strokecolor: Color,
}

/// Rectangle or ellipse overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeObj {
    pub start: usize,
    pub dur: usize,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub anchor: Anchor,
    pub rotate: f64,
    pub fill: Color,
    pub stroke: i64,
    pub strokecolor: Color,
}

/// Anything that can sit on a visual layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Visual {
    Video(Clip),
    Text(TextObj),
    Image(ImageObj),
    Rectangle(ShapeObj),
    Ellipse(ShapeObj),
}

impl Visual {
    /// Position on the output timeline, in frames.
    pub fn start(&self) -> usize {
        match self {
            Self::Video(clip) => clip.start,
            Self::Text(obj) => obj.start,
            Self::Image(obj) => obj.start,
            Self::Rectangle(obj) | Self::Ellipse(obj) => obj.start,
        }
    }

    /// Length on the output timeline, in frames.
    pub fn output_duration(&self) -> f64 {
        match self {
            Self::Video(clip) => clip.output_duration(),
            Self::Text(obj) => obj.dur as f64,
            Self::Image(obj) => obj.dur as f64,
            Self::Rectangle(obj) | Self::Ellipse(obj) => obj.dur as f64,
        }
    }

    /// Output frame where this object ends.
    pub fn end(&self) -> usize {
        match self {
            Self::Video(clip) => clip.output_end(),
            Self::Text(obj) => obj.start + obj.dur,
            Self::Image(obj) => obj.start + obj.dur,
            Self::Rectangle(obj) | Self::Ellipse(obj) => obj.start + obj.dur,
        }
    }

    /// The backing clip, for clip-backed video objects.
    pub fn as_clip(&self) -> Option<&Clip> {
        match self {
            Self::Video(clip) => Some(clip),
            _ => None,
        }
    }
}

/// A clip on one audio track of its source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioObj {
    pub clip: Clip,
    /// Audio track index within the source
    pub stream: usize,
}

impl AudioObj {
    pub fn new(clip: Clip, stream: usize) -> Self {
        Self { clip, stream }
    }
}
