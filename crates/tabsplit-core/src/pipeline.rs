//! The split/extract/merge pipeline entry point.

use tracing::info;

use crate::config::PipelineConfig;
use crate::dispatch::{dispatch, WorkerSpawner};
use crate::error::{PipelineError, Result};
use crate::merge::merge;
use crate::partition::partition;
use crate::table::Table;
use crate::workspace::SplitWorkspace;

/// Run the whole pipeline: partition the source into segments, extract
/// every segment in parallel worker processes, merge the results in
/// segment order, and remove the workspace.
///
/// Configuration and split problems fail before any worker is dispatched.
/// The workspace is removed on every path; on the success path a removal
/// failure is reported rather than swallowed, so a later run's
/// already-exists check is never tripped by leftovers.
pub fn run(config: &PipelineConfig, spawner: &dyn WorkerSpawner) -> Result<Table> {
    if config.workers == 0 {
        return Err(PipelineError::Configuration(
            "worker count must be at least 1".to_string(),
        ));
    }
    if !config.source.is_file() {
        return Err(PipelineError::Split {
            path: config.source.clone(),
            reason: "no such file".to_string(),
        });
    }

    let workspace = SplitWorkspace::create(&config.workspace_dir)?;

    // errors from here on drop the workspace guard, which removes the tree
    let artifacts = partition(&config.source, config.workers, workspace.root())?;
    let segment_tables = dispatch(&artifacts, config.workers, spawner)?;
    let merged = merge(&segment_tables, &config.normalizer)?;

    workspace.cleanup()?;
    info!(
        "merged {} segment(s) into {} row(s) x {} column(s)",
        segment_tables.len(),
        merged.row_count(),
        merged.columns.len()
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct NeverSpawner;

    impl WorkerSpawner for NeverSpawner {
        fn command(&self, _artifact: &crate::partition::SegmentArtifact) -> std::process::Command {
            unreachable!("spawner must not be used before partitioning succeeds")
        }
    }

    #[test]
    fn zero_workers_fails_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new("missing.pdf", dir.path().join("split")).with_workers(0);
        let err = run(&config, &NeverSpawner).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert!(!dir.path().join("split").exists());
    }

    #[test]
    fn missing_source_fails_before_workspace_creation() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(
            dir.path().join("missing.pdf"),
            dir.path().join("split"),
        )
        .with_workers(2);
        let err = run(&config, &NeverSpawner).unwrap_err();
        assert!(matches!(err, PipelineError::Split { .. }));
        assert!(!dir.path().join("split").exists());
    }

    #[test]
    fn existing_workspace_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.pdf");
        std::fs::write(&source, b"not really a pdf").unwrap();
        let ws: PathBuf = dir.path().join("split");
        std::fs::create_dir(&ws).unwrap();
        let config = PipelineConfig::new(&source, &ws).with_workers(2);
        let err = run(&config, &NeverSpawner).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
        // the pre-existing directory is the caller's, leave it alone
        assert!(ws.exists());
    }

    #[test]
    fn unparseable_source_cleans_up_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.pdf");
        std::fs::write(&source, b"not really a pdf").unwrap();
        let ws = dir.path().join("split");
        let config = PipelineConfig::new(&source, &ws).with_workers(2);
        let err = run(&config, &NeverSpawner).unwrap_err();
        assert!(matches!(err, PipelineError::Split { .. }));
        assert!(!ws.exists(), "workspace must be removed on failure paths");
    }
}
