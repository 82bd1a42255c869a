//! Overlay objects built from user configuration.
//!
//! Each overlay kind declares a static field table. A field's kind picks the
//! parser for its raw value; defaults are raw values too and go through the
//! same parsers, so `x = "centerX"` resolves the same way whether it was
//! written by the user or implied.

use recut_core::{Color, RecutError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

use crate::objects::{Align, Anchor, ImageObj, ShapeObj, TextObj, Visual};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    #[error("{kind} has no field named '{field}'")]
    UnknownField { kind: OverlayKind, field: String },
    #[error("{kind} requires field '{field}'")]
    MissingField { kind: OverlayKind, field: &'static str },
    #[error("variable '{0}' is not defined.")]
    UndefinedVariable(String),
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("dur's value must be greater than 0. Was '{0}'.")]
    NonPositiveDuration(i64),
}

impl From<OverlayError> for RecutError {
    fn from(err: OverlayError) -> Self {
        RecutError::Config(err.to_string())
    }
}

/// A configuration value as the user wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Text,
    Image,
    Rectangle,
    Ellipse,
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
        })
    }
}

/// One overlay declaration: `{"type": "text", "start": 0, "dur": 30, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    #[serde(flatten)]
    pub fields: BTreeMap<String, RawValue>,
}

impl OverlaySpec {
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: &str, value: impl Into<RawValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

/// Named numbers available to overlay fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineVars {
    pub width: i64,
    pub height: i64,
    pub end: i64,
}

impl TimelineVars {
    pub fn new(resolution: (u32, u32), end: usize) -> Self {
        Self {
            width: resolution.0 as i64,
            height: resolution.1 as i64,
            end: end as i64,
        }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        match name {
            "width" => Some(self.width),
            "height" => Some(self.height),
            "centerX" => Some(self.width / 2),
            "centerY" => Some(self.height / 2),
            "start" => Some(0),
            "end" => Some(self.end),
            _ => None,
        }
    }
}

/// How a field's raw value is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer literal or timeline variable name
    Number,
    Alignment,
    Anchor,
    Color,
    /// Kept as written; converted by the object that owns the field
    Raw,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: Option<&'static str>,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }
}

const TEXT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("start", FieldKind::Number),
    FieldSpec::required("dur", FieldKind::Number),
    FieldSpec::required("content", FieldKind::Raw),
    FieldSpec::optional("x", FieldKind::Number, "centerX"),
    FieldSpec::optional("y", FieldKind::Number, "centerY"),
    FieldSpec::optional("size", FieldKind::Number, "30"),
    FieldSpec::optional("font", FieldKind::Raw, "default"),
    FieldSpec::optional("align", FieldKind::Alignment, "left"),
    FieldSpec::optional("fill", FieldKind::Color, "#000"),
    FieldSpec::optional("stroke", FieldKind::Number, "0"),
    FieldSpec::optional("strokecolor", FieldKind::Color, "#000"),
    FieldSpec::optional("anchor", FieldKind::Anchor, "ce"),
    FieldSpec::optional("rotate", FieldKind::Raw, "0"),
    FieldSpec::optional("opacity", FieldKind::Raw, "1"),
];

const IMAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("start", FieldKind::Number),
    FieldSpec::required("dur", FieldKind::Number),
    FieldSpec::required("src", FieldKind::Raw),
    FieldSpec::optional("x", FieldKind::Number, "centerX"),
    FieldSpec::optional("y", FieldKind::Number, "centerY"),
    FieldSpec::optional("anchor", FieldKind::Anchor, "ce"),
    FieldSpec::optional("opacity", FieldKind::Raw, "1"),
    FieldSpec::optional("rotate", FieldKind::Raw, "0"),
    FieldSpec::optional("stroke", FieldKind::Number, "0"),
    FieldSpec::optional("strokecolor", FieldKind::Color, "#000"),
];

const SHAPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("start", FieldKind::Number),
    FieldSpec::required("dur", FieldKind::Number),
    FieldSpec::required("x", FieldKind::Number),
    FieldSpec::required("y", FieldKind::Number),
    FieldSpec::required("width", FieldKind::Number),
    FieldSpec::required("height", FieldKind::Number),
    FieldSpec::optional("anchor", FieldKind::Anchor, "ce"),
    FieldSpec::optional("rotate", FieldKind::Raw, "0"),
    FieldSpec::optional("fill", FieldKind::Color, "#c4c4c4"),
    FieldSpec::optional("stroke", FieldKind::Number, "0"),
    FieldSpec::optional("strokecolor", FieldKind::Color, "#000"),
];

impl OverlayKind {
    /// Field table for this kind of overlay.
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Text => TEXT_FIELDS,
            Self::Image => IMAGE_FIELDS,
            Self::Rectangle | Self::Ellipse => SHAPE_FIELDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Number(i64),
    Align(Align),
    Anchor(Anchor),
    Color(Color),
    Raw(RawValue),
}

fn parse_field(
    spec: &FieldSpec,
    raw: &RawValue,
    vars: &TimelineVars,
) -> Result<FieldValue, OverlayError> {
    let invalid = |reason: String| OverlayError::InvalidValue {
        field: spec.name,
        reason,
    };

    match spec.kind {
        FieldKind::Number => match raw {
            RawValue::Int(v) => Ok(FieldValue::Number(*v)),
            RawValue::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                Ok(FieldValue::Number(*v as i64))
            }
            RawValue::Float(v) => Err(invalid(format!("expected a whole number, got {}", v))),
            RawValue::Text(text) => {
                let text = text.trim();
                if let Some(value) = vars.get(text) {
                    Ok(FieldValue::Number(value))
                } else if let Ok(value) = text.parse::<i64>() {
                    Ok(FieldValue::Number(value))
                } else if text.parse::<f64>().is_ok() {
                    Err(invalid(format!("expected a whole number, got {}", text)))
                } else {
                    Err(OverlayError::UndefinedVariable(text.to_string()))
                }
            }
        },
        FieldKind::Alignment => text_of(raw)
            .ok_or_else(|| invalid(format!("expected an alignment, got {}", raw)))?
            .parse()
            .map(FieldValue::Align)
            .map_err(invalid),
        FieldKind::Anchor => text_of(raw)
            .ok_or_else(|| invalid(format!("expected an anchor, got {}", raw)))?
            .parse()
            .map(FieldValue::Anchor)
            .map_err(invalid),
        FieldKind::Color => text_of(raw)
            .ok_or_else(|| invalid(format!("expected a color, got {}", raw)))?
            .parse::<Color>()
            .map(FieldValue::Color)
            .map_err(|e| invalid(e.to_string())),
        FieldKind::Raw => Ok(FieldValue::Raw(raw.clone())),
    }
}

fn text_of(raw: &RawValue) -> Option<&str> {
    match raw {
        RawValue::Text(text) => Some(text),
        _ => None,
    }
}

/// Field values of one overlay after parsing.
struct Resolved {
    values: HashMap<&'static str, FieldValue>,
}

impl Resolved {
    fn get(&self, field: &'static str) -> Result<&FieldValue, OverlayError> {
        self.values.get(field).ok_or(OverlayError::InvalidValue {
            field,
            reason: "field was not resolved".to_string(),
        })
    }

    fn mismatch(field: &'static str, expected: &str) -> OverlayError {
        OverlayError::InvalidValue {
            field,
            reason: format!("expected {}", expected),
        }
    }

    fn number(&self, field: &'static str) -> Result<i64, OverlayError> {
        match self.get(field)? {
            FieldValue::Number(v) => Ok(*v),
            _ => Err(Self::mismatch(field, "a number")),
        }
    }

    fn frame(&self, field: &'static str) -> Result<usize, OverlayError> {
        let value = self.number(field)?;
        usize::try_from(value).map_err(|_| OverlayError::InvalidValue {
            field,
            reason: format!("must not be negative, got {}", value),
        })
    }

    fn align(&self, field: &'static str) -> Result<Align, OverlayError> {
        match self.get(field)? {
            FieldValue::Align(v) => Ok(*v),
            _ => Err(Self::mismatch(field, "an alignment")),
        }
    }

    fn anchor(&self, field: &'static str) -> Result<Anchor, OverlayError> {
        match self.get(field)? {
            FieldValue::Anchor(v) => Ok(*v),
            _ => Err(Self::mismatch(field, "an anchor")),
        }
    }

    fn color(&self, field: &'static str) -> Result<Color, OverlayError> {
        match self.get(field)? {
            FieldValue::Color(v) => Ok(*v),
            _ => Err(Self::mismatch(field, "a color")),
        }
    }

    fn text(&self, field: &'static str) -> Result<String, OverlayError> {
        match self.get(field)? {
            FieldValue::Raw(raw) => Ok(raw.to_string()),
            _ => Err(Self::mismatch(field, "text")),
        }
    }

    /// Raw float; accepts `"50%"` as 0.5.
    fn float(&self, field: &'static str) -> Result<f64, OverlayError> {
        let raw = match self.get(field)? {
            FieldValue::Raw(raw) => raw,
            _ => return Err(Self::mismatch(field, "a number")),
        };
        let value = match raw {
            RawValue::Int(v) => *v as f64,
            RawValue::Float(v) => *v,
            RawValue::Text(text) => {
                let text = text.trim();
                let parsed = match text.strip_suffix('%') {
                    Some(percent) => percent.trim().parse::<f64>().map(|p| p / 100.0),
                    None => text.parse::<f64>(),
                };
                parsed.map_err(|_| OverlayError::InvalidValue {
                    field,
                    reason: format!("expected a number, got '{}'", text),
                })?
            }
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::mismatch(field, "a finite number"))
        }
    }

    /// Start and duration, with the duration checked to be at least one frame.
    fn timing(&self) -> Result<(usize, usize), OverlayError> {
        let dur = self.number("dur")?;
        if dur < 1 {
            return Err(OverlayError::NonPositiveDuration(dur));
        }
        Ok((self.frame("start")?, dur as usize))
    }
}

impl OverlaySpec {
    /// Parse every field against its declared kind and build the overlay.
    pub fn resolve(&self, vars: &TimelineVars) -> Result<Visual, OverlayError> {
        let table = self.kind.fields();

        if let Some(unknown) = self
            .fields
            .keys()
            .find(|name| !table.iter().any(|spec| spec.name == name.as_str()))
        {
            return Err(OverlayError::UnknownField {
                kind: self.kind,
                field: unknown.clone(),
            });
        }

        let mut values = HashMap::with_capacity(table.len());
        for spec in table {
            let value = match (self.fields.get(spec.name), spec.default) {
                (Some(raw), _) => parse_field(spec, raw, vars)?,
                (None, Some(default)) => parse_field(spec, &RawValue::from(default), vars)?,
                (None, None) => {
                    return Err(OverlayError::MissingField {
                        kind: self.kind,
                        field: spec.name,
                    })
                }
            };
            values.insert(spec.name, value);
        }
        let r = Resolved { values };
        let (start, dur) = r.timing()?;

        Ok(match self.kind {
            OverlayKind::Text => Visual::Text(TextObj {
                start,
                dur,
                content: r.text("content")?,
                x: r.number("x")?,
                y: r.number("y")?,
                size: r.number("size")?,
                font: r.text("font")?,
                align: r.align("align")?,
                fill: r.color("fill")?,
                stroke: r.number("stroke")?,
                strokecolor: r.color("strokecolor")?,
                anchor: r.anchor("anchor")?,
                rotate: r.float("rotate")?,
                opacity: r.float("opacity")?,
            }),
            OverlayKind::Image => Visual::Image(ImageObj {
                start,
                dur,
                src: r.text("src")?,
                x: r.number("x")?,
                y: r.number("y")?,
                anchor: r.anchor("anchor")?,
                opacity: r.float("opacity")?,
                rotate: r.float("rotate")?,
                stroke: r.number("stroke")?,
                strokecolor: r.color("strokecolor")?,
            }),
            OverlayKind::Rectangle | OverlayKind::Ellipse => {
                let shape = ShapeObj {
                    start,
                    dur,
                    x: r.number("x")?,
                    y: r.number("y")?,
                    width: r.number("width")?,
                    height: r.number("height")?,
                    anchor: r.anchor("anchor")?,
                    rotate: r.float("rotate")?,
                    fill: r.color("fill")?,
                    stroke: r.number("stroke")?,
                    strokecolor: r.color("strokecolor")?,
                };
                if self.kind == OverlayKind::Rectangle {
                    Visual::Rectangle(shape)
                } else {
                    Visual::Ellipse(shape)
                }
            }
        })
    }
}
