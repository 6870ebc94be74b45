use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DesubError, Result};
use crate::pipeline::FramePipeline;
use crate::staging::{self, ArtifactKind, StagedArtifact};

/// Fans frame processing out across blocking workers.
///
/// Every worker constructs its own detector up front and pulls frame
/// indices from a shared cursor until the work list is drained, so an
/// expensive backend warms up once per worker rather than once per frame.
/// A frame that fails is logged and skipped; the pool reports how many
/// frames actually produced output.
pub struct FrameWorkerPool {
    config: Config,
}

impl FrameWorkerPool {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Number of workers for this run: half the cores, at least one
    pub fn worker_count(&self) -> usize {
        if self.config.pipeline.parallel {
            (num_cpus::get() / 2).max(1)
        } else {
            1
        }
    }

    /// Process every raw frame in the staging directory, returning how many
    /// frames produced a processed artifact and how many were skipped.
    pub async fn process_all(&self) -> Result<(usize, usize)> {
        let frames_dir = Path::new(&self.config.pipeline.frames_dir);
        let work = staging::list_artifacts(frames_dir, ArtifactKind::Raw)?;
        if work.is_empty() {
            return Err(DesubError::Pipeline(format!(
                "No raw frames found to process in {}",
                frames_dir.display()
            )));
        }

        let workers = self.worker_count();
        info!(
            "Processing {} frames with {} worker(s)",
            work.len(),
            workers
        );

        let progress = ProgressBar::new(work.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{wide_bar} {pos}/{len} frames ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let work = Arc::new(work);
        let cursor = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let work = Arc::clone(&work);
            let cursor = Arc::clone(&cursor);
            let config = self.config.clone();
            let progress = progress.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                worker_loop(&config, &work, &cursor, &progress)
            }));
        }

        let mut processed = 0;
        let mut failed = 0;
        for handle in handles {
            let (worker_processed, worker_failed) = handle
                .await
                .map_err(|e| DesubError::Pipeline(format!("Worker task failed: {}", e)))?;
            processed += worker_processed;
            failed += worker_failed;
        }

        progress.finish_and_clear();
        info!(
            "Processed {}/{} frames ({} skipped)",
            processed,
            work.len(),
            failed
        );
        Ok((processed, failed))
    }
}

fn worker_loop(
    config: &Config,
    work: &[StagedArtifact],
    cursor: &AtomicUsize,
    progress: &ProgressBar,
) -> (usize, usize) {
    let pipeline = FramePipeline::new(config);
    let mut processed = 0;
    let mut failed = 0;

    loop {
        let index = cursor.fetch_add(1, Ordering::SeqCst);
        if index >= work.len() {
            break;
        }

        let raw = &work[index];
        match pipeline.process(raw) {
            Ok(_) => processed += 1,
            Err(e) => {
                failed += 1;
                warn!("Skipping frame {}: {}", raw.path.display(), e);
            }
        }
        progress.inc(1);
    }

    (processed, failed)
}
