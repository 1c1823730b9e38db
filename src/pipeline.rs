//! Batch processing: many files in, one merged key set out
//!
//! Each file is fetched, parsed and reduced to metadata entries on its own.
//! A failure in one file is logged, recorded in the [`BatchSummary`] and the
//! batch moves on.
//!
//! With more than one job the file list is split into contiguous chunks, each
//! worker thread builds a private [`BatchSummary`], and the calling thread
//! merges them in chunk order once all workers have finished.

use crate::aggregate::KeyAggregator;
use crate::classify::ClassificationResult;
use crate::document::DocumentProcessor;
use crate::error::{BatchError, BatchErrorKind};
use crate::output::CoreReport;
use crate::source::{CollectedFiles, MetadataSource};
use crate::types::{MetadataEntry, ProcessConfig};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Worker threads (values below 1 are treated as 1)
    pub jobs: usize,

    pub process: ProcessConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            jobs: 1,
            process: ProcessConfig::default(),
        }
    }
}

/// Everything a batch produced
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Distinct raw keys over all processed documents
    pub keys: KeyAggregator,

    /// Unique core entries over all processed documents
    pub report: CoreReport,

    /// Documents that produced entries
    pub processed: usize,

    /// Files that were skipped, in input order
    pub errors: Vec<BatchError>,
}

impl BatchSummary {
    pub fn classification(&self) -> ClassificationResult {
        self.keys.classify()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    fn record(&mut self, entries: &[MetadataEntry]) {
        self.keys.add_entries(entries);
        self.report.add_entries(entries);
        self.processed += 1;
    }

    fn merge(&mut self, other: BatchSummary) {
        self.keys.merge(other.keys);
        self.report.merge(other.report);
        self.processed += other.processed;
        self.errors.extend(other.errors);
    }
}

pub struct Pipeline<S> {
    source: S,
    processor: DocumentProcessor,
    jobs: usize,
}

impl<S: MetadataSource> Pipeline<S> {
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Pipeline {
            source,
            processor: DocumentProcessor::new(config.process),
            jobs: config.jobs.max(1),
        }
    }

    /// Fetch and process a single file
    pub fn process_file(&self, path: &Path) -> Result<Vec<MetadataEntry>, BatchError> {
        let fail = |kind: BatchErrorKind| BatchError {
            path: path.to_path_buf(),
            kind,
        };

        let text = self.source.fetch(path).map_err(|e| fail(e.into()))?;
        let entries = self.processor.process(&text).map_err(|e| fail(e.into()))?;
        debug!(path = %path.display(), entries = entries.len(), "extracted metadata");
        Ok(entries)
    }

    pub fn run(&self, files: &[PathBuf]) -> BatchSummary {
        let jobs = self.jobs.min(files.len()).max(1);
        info!(files = files.len(), jobs, "processing batch");

        let summary = if jobs == 1 {
            self.run_worker(files)
        } else {
            let chunk_size = files.len().div_ceil(jobs);
            thread::scope(|scope| {
                let workers: Vec<_> = files
                    .chunks(chunk_size)
                    .map(|chunk| scope.spawn(move || self.run_worker(chunk)))
                    .collect();

                let mut summary = BatchSummary::default();
                for worker in workers {
                    match worker.join() {
                        Ok(part) => summary.merge(part),
                        Err(panic) => std::panic::resume_unwind(panic),
                    }
                }
                summary
            })
        };

        info!(
            processed = summary.processed,
            failed = summary.failed(),
            keys = summary.keys.len(),
            "batch complete"
        );
        summary
    }

    /// Run over a walked input tree
    ///
    /// Entries the walk could not read are recorded after the per-file errors.
    pub fn run_collected(&self, collected: CollectedFiles) -> BatchSummary {
        let mut summary = self.run(&collected.files);
        for error in collected.skipped {
            let path = error.path().map(Path::to_path_buf).unwrap_or_default();
            summary.errors.push(BatchError {
                path,
                kind: error.into(),
            });
        }
        summary
    }

    fn run_worker(&self, files: &[PathBuf]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for path in files {
            match self.process_file(path) {
                Ok(entries) => summary.record(&entries),
                Err(e) => {
                    warn!(error = %e, "skipping file");
                    summary.errors.push(e);
                }
            }
        }
        summary
    }
}
