use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::BatchConfig;
use crate::error::{ProbeError, Result};
use crate::parser::CodecTypeSet;
use crate::probe::MediaProbe;

/// What batch mode reports for one file
#[derive(Debug, Clone, Serialize)]
pub struct ProbeSummary {
    pub codec_types: CodecTypeSet,
    pub duration_seconds: f64,
}

#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    /// Path relative to the batch input directory
    pub display_path: String,
    pub outcome: Result<ProbeSummary>,
}

/// Probes every media file below a directory, several at a time
pub struct BatchProber {
    prober: Arc<dyn MediaProbe>,
    config: BatchConfig,
}

impl BatchProber {
    pub fn new(prober: Arc<dyn MediaProbe>, config: BatchConfig) -> Self {
        Self { prober, config }
    }

    /// Find media files below `input_dir`, sorted by path
    pub fn discover<P: AsRef<Path>>(&self, input_dir: P) -> Result<Vec<PathBuf>> {
        discover_media_files(input_dir.as_ref(), &self.config.extensions)
    }

    /// Probe all media files below `input_dir`.
    ///
    /// A failing file is reported in its entry and does not stop the batch.
    pub async fn probe_directory<P: AsRef<Path>>(&self, input_dir: P, show_progress: bool) -> Result<Vec<BatchEntry>> {
        let input_dir = input_dir.as_ref();

        // The walk is synchronous, keep it off the runtime threads
        let walk_dir = input_dir.to_path_buf();
        let extensions = self.config.extensions.clone();
        let files = tokio::task::spawn_blocking(move || discover_media_files(&walk_dir, &extensions))
            .await
            .map_err(|e| ProbeError::Task(format!("directory walk did not complete: {}", e)))??;
        info!(
            "Found {} media files to probe (max {} at once)",
            files.len(),
            self.config.max_concurrent
        );

        let pb = if show_progress {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent.max(1)));
        let mut tasks = JoinSet::new();

        for path in files {
            let semaphore = Arc::clone(&semaphore);
            let prober = Arc::clone(&self.prober);
            tasks.spawn(async move {
                // Held until the probe finishes
                let _permit = semaphore.acquire_owned().await;
                // A panicking probe still yields an entry for its file
                let probe_path = path.clone();
                let handle = tokio::spawn(async move { summarize(prober.as_ref(), &probe_path).await });
                let outcome = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => Err(ProbeError::Task(e.to_string())),
                };
                (path, outcome)
            });
        }

        let mut entries = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((path, outcome)) => {
                    let display_path = pathdiff::diff_paths(&path, input_dir)
                        .unwrap_or_else(|| path.clone())
                        .display()
                        .to_string();
                    match &outcome {
                        Ok(_) => debug!("Probed {}", display_path),
                        Err(e) => warn!("Failed to probe {}: {}", display_path, e),
                    }
                    pb.set_message(display_path.clone());
                    pb.inc(1);
                    entries.push(BatchEntry { path, display_path, outcome });
                }
                Err(e) => warn!("Probe task did not complete: {}", e),
            }
        }

        pb.finish_with_message("done");
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

fn has_media_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

fn discover_media_files(input_dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(ProbeError::Config(format!(
            "Input path is not a directory: {}",
            input_dir.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_media_extension(p, extensions))
        .collect();
    files.sort();

    Ok(files)
}

async fn summarize(prober: &dyn MediaProbe, path: &Path) -> Result<ProbeSummary> {
    let codec_types = prober.codec_types(path.into()).await?;
    let duration_seconds = prober.duration_seconds(path.into()).await?;
    Ok(ProbeSummary { codec_types, duration_seconds })
}
