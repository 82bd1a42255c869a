//! Recut - turns per-frame speed lists into a Final Cut Pro timeline.
//!
//! Usage: `recut <job.json>`

mod analysis;
mod config;
mod logging;

use anyhow::{Context, Result};
use recut_media::{FfprobeProber, MediaProber};
use std::path::PathBuf;
use tracing::info;

use crate::analysis::SpeedListFiles;
use crate::config::JobConfig;

fn main() -> Result<()> {
    let job_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: recut <job.json>")?;
    let job = JobConfig::load(&job_path)?;

    logging::init_logging(&job.logging);
    info!("Recut starting with job {}", job_path.display());

    let prober = FfprobeProber;
    let inputs = job
        .inputs
        .iter()
        .map(|path| {
            prober
                .probe(path)
                .with_context(|| format!("Failed to probe {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut analyzer = SpeedListFiles::new(job.speed_lists.clone());
    let timeline = match recut_timeline::make_timeline(inputs, &job.params, &mut analyzer) {
        Ok(timeline) => timeline,
        Err(err) if err.is_user_error() => {
            anyhow::bail!("Check {}: {}", job_path.display(), err)
        }
        Err(err) => return Err(err).context("Failed to build timeline"),
    };

    recut_fcpxml::export_timeline(&timeline, &job.output)
        .with_context(|| format!("Failed to export {}", job.output.display()))?;

    info!("Done: {}", job.output.display());
    Ok(())
}
