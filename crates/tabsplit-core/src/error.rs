//! Error types for the split/extract/merge pipeline.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a pipeline run.
///
/// `Configuration` and `Split` are raised before any worker is dispatched.
/// `Extraction` is raised only after every segment has been attempted, and
/// carries one entry per failed segment (batch semantics, no partial merge).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid run configuration, e.g. a workspace directory that already
    /// exists or a worker count of zero.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The source document could not be opened or partitioned.
    #[error("failed to split {}: {reason}", .path.display())]
    Split { path: PathBuf, reason: String },

    /// One or more segments failed to extract. The run is all-or-nothing:
    /// no merged table is produced when any segment failed.
    #[error("extraction failed for {} of {total} segment(s)", .failures.len())]
    Extraction {
        failures: Vec<SegmentFailure>,
        total: usize,
    },

    /// Per-segment tables could not be combined into one.
    #[error("merge error: {0}")]
    Merge(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker result could not be serialized or parsed.
    #[error("result serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single segment's extraction failure, reported by submission index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFailure {
    /// Submission index of the failed segment.
    pub index: usize,
    /// Human-readable reason, typically the worker's stderr.
    pub message: String,
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}: {}", self.index, self.message)
    }
}

/// Type alias for [`Result<T, PipelineError>`].
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        let err = PipelineError::Configuration("workers must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: workers must be at least 1"
        );
    }

    #[test]
    fn split_error_display_includes_path() {
        let err = PipelineError::Split {
            path: PathBuf::from("report.pdf"),
            reason: "document has no pages".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("report.pdf"));
        assert!(display.contains("no pages"));
    }

    #[test]
    fn extraction_error_counts_failures() {
        let err = PipelineError::Extraction {
            failures: vec![
                SegmentFailure {
                    index: 1,
                    message: "boom".to_string(),
                },
                SegmentFailure {
                    index: 3,
                    message: "bust".to_string(),
                },
            ],
            total: 4,
        };
        assert_eq!(err.to_string(), "extraction failed for 2 of 4 segment(s)");
    }

    #[test]
    fn segment_failure_display() {
        let failure = SegmentFailure {
            index: 7,
            message: "worker exited with status 3".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "segment 7: worker exited with status 3"
        );
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PipelineError = io.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
