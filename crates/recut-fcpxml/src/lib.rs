//! Recut FCPXML - Final Cut Pro XML export
//!
//! Writes a clip list as an FCPXML 1.9 document: one format and one asset
//! in `resources`, then a single project whose spine holds one `asset-clip`
//! per clip. Sped-up or slowed-down clips carry a time map.

pub mod error;
pub mod timemap;
pub mod writer;

pub use error::{FcpxmlError, Result};
pub use timemap::{Interpolation, TimeMap, TimePoint};
pub use writer::{
    export_timeline, timeline_to_string, write_fcpxml, ExportSettings, FCPXML_VERSION,
};
