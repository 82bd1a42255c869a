//! Job files.

use anyhow::{Context, Result};
use recut_timeline::EditParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "recut_timeline=debug,warn").
    /// `RUST_LOG` takes precedence.
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// One editing run: inputs and their speed lists in, FCPXML out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Media files, in output order
    pub inputs: Vec<PathBuf>,
    /// JSON speed list per input
    pub speed_lists: Vec<PathBuf>,
    /// Where the FCPXML document goes
    pub output: PathBuf,
    #[serde(default)]
    pub params: EditParams,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JobConfig {
    /// Load a job file. Relative paths inside it are resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        let mut job: Self = serde_json::from_slice(&data)
            .with_context(|| format!("Invalid job file {}", path.display()))?;

        if let Some(base) = path.parent() {
            job.resolve_paths(base);
        }
        job.validate()?;
        Ok(job)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.inputs.iter_mut().for_each(resolve);
        self.speed_lists.iter_mut().for_each(resolve);
        resolve(&mut self.output);
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.inputs.is_empty(), "Job has no inputs");
        anyhow::ensure!(
            self.inputs.len() == self.speed_lists.len(),
            "Job has {} inputs but {} speed lists",
            self.inputs.len(),
            self.speed_lists.len()
        );
        Ok(())
    }
}
