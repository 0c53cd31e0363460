//! tabsplit-core: parallel PDF table extraction pipeline.
//!
//! A multi-page report is partitioned into contiguous page-range segments,
//! each segment is written out as an independent PDF artifact, a fixed pool
//! of isolated worker processes extracts the tables of one segment each,
//! and the per-segment results are merged back into a single table whose
//! row order matches the original document's page order.
//!
//! The crate provides:
//! - page-range planning and PDF splitting ([`partition`])
//! - a scoped workspace for intermediate artifacts ([`workspace`])
//! - the extraction capability boundary and a text-layout heuristic
//!   implementation ([`extract`])
//! - process-pool dispatch with submission-order results ([`dispatch`])
//! - column-unioning merge with pluggable header normalization
//!   ([`merge`], [`normalize`])
//! - the end-to-end pipeline entry point ([`pipeline::run`])

pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod partition;
pub mod pipeline;
pub mod table;
pub mod workspace;

pub use config::{default_worker_count, PipelineConfig};
pub use dispatch::{dispatch, WorkerSpawner};
pub use error::{PipelineError, Result, SegmentFailure};
pub use extract::{extract_segment, ExtractError, ExtractorConfig, TableExtractor, TextLayoutExtractor};
pub use merge::{concat_tables, merge, MergeError};
pub use normalize::{HeaderNormalizer, HeaderRule};
pub use partition::{partition, plan_segments, PageRange, SegmentArtifact};
pub use pipeline::run;
pub use table::Table;
pub use workspace::SplitWorkspace;
