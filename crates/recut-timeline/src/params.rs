//! User editing parameters.

use recut_core::{RecutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::overlay::OverlaySpec;

/// Parameters for one editing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditParams {
    /// Output frame rate; probed from the first input when unset
    pub frame_rate: Option<f64>,
    /// Output sample rate; probed from the first input when unset
    pub sample_rate: Option<u32>,
    /// Background colour
    pub background: String,
    /// Overlays in declaration order, later ones render on top
    pub overlays: Vec<OverlaySpec>,
    /// Settings handed to the speed analyzer untouched
    pub analysis: BTreeMap<String, serde_json::Value>,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            frame_rate: None,
            sample_rate: None,
            background: "#000".to_string(),
            overlays: Vec::new(),
            analysis: BTreeMap::new(),
        }
    }
}

impl EditParams {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data)
            .map_err(|e| RecutError::Config(format!("Invalid edit parameters: {}", e)))
    }

    /// Load parameters from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}
