//! Pipeline run configuration.

use std::path::PathBuf;
use std::thread;

use crate::normalize::HeaderNormalizer;

/// Default worker count: half the host's parallel execution units,
/// minimum 1. The extraction capability does internal work of its own per
/// invocation; saturating every core with workers measurably hurts
/// throughput on real reports.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(1)
        .max(1)
}

/// Configuration for one pipeline run.
///
/// `workers` bounds both the number of segments the document is split into
/// and the size of the worker pool; a short document may yield fewer
/// segments than workers, in which case the extra slots go unused.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The source PDF.
    pub source: PathBuf,
    /// Directory for intermediate segment artifacts. Must not exist yet;
    /// it is created at the start of the run and removed at the end.
    pub workspace_dir: PathBuf,
    /// Segment and worker-pool count, at least 1.
    pub workers: usize,
    /// Header normalization policy applied during the final merge.
    pub normalizer: HeaderNormalizer,
}

impl PipelineConfig {
    /// Configuration with default worker count and header policy.
    pub fn new(source: impl Into<PathBuf>, workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            workspace_dir: workspace_dir.into(),
            workers: default_worker_count(),
            normalizer: HeaderNormalizer::default(),
        }
    }

    /// Override the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Override the header normalization policy.
    pub fn with_normalizer(mut self, normalizer: HeaderNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_worker_count_is_at_least_one() {
        assert!(default_worker_count() >= 1);
    }

    #[test]
    fn builder_overrides() {
        let config = PipelineConfig::new("report.pdf", "split").with_workers(3);
        assert_eq!(config.workers, 3);
        assert_eq!(config.source, PathBuf::from("report.pdf"));
        assert_eq!(config.workspace_dir, PathBuf::from("split"));
    }
}
