//! Recut Timeline - Timeline data model
//!
//! Turns per-frame speed schedules into a clip-based timeline and back:
//! - Speeds and chunks (runs of constant speed)
//! - Clips, `clipify` and its inverse `unclipify`
//! - Visual and audio layers
//! - Overlay objects resolved from configuration
//! - The timeline aggregate and its builder

pub mod builder;
pub mod chunk;
pub mod clip;
pub mod error;
pub mod layers;
pub mod objects;
pub mod overlay;
pub mod params;
pub mod timeline;

pub use builder::{make_timeline, SpeedAnalyzer, DEFAULT_SAMPLE_RATE};
pub use chunk::{chunkify, chunks_len, Chunk, Speed, DROP_SENTINEL};
pub use clip::{clipify, unclipify, Clip};
pub use error::TimelineError;
pub use layers::{make_av, make_layers, AudioLayer, AudioSpace, VisualLayer, VisualSpace};
pub use objects::{Align, Anchor, AudioObj, ImageObj, ShapeObj, TextObj, Visual};
pub use overlay::{OverlayError, OverlayKind, OverlaySpec, RawValue, TimelineVars};
pub use params::EditParams;
pub use timeline::Timeline;
