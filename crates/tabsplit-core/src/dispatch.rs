//! Scatter-gather dispatch of segment artifacts to worker processes.
//!
//! Workers are OS processes, not threads: the extraction capability is
//! assumed non-reentrant, so each segment gets a private process with its
//! own capability instance. The only communication is the artifact path on
//! the worker's command line in, and a JSON table on its stdout out.
//!
//! At most `worker_count` children run at once. Each child is shepherded by
//! a thread that waits for it and reports `(submission_index, outcome)` over
//! a channel; results land in a slot vector indexed by submission index, so
//! the returned sequence is always in submission order no matter which
//! worker finishes first.
//!
//! Failure policy is batch, not fail-fast: a failed segment does not abort
//! the ones still in flight. Every segment is attempted, then the run fails
//! with one entry per failed segment if there were any.

use std::process::{Command, Output, Stdio};
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info};

use crate::error::{PipelineError, Result, SegmentFailure};
use crate::partition::SegmentArtifact;
use crate::table::Table;

/// Builds the command line that processes one artifact.
///
/// The command must print the segment's table as JSON on stdout and exit
/// non-zero (with a reason on stderr) on failure.
pub trait WorkerSpawner {
    fn command(&self, artifact: &SegmentArtifact) -> Command;
}

/// Run every artifact through a pool of at most `worker_count` worker
/// processes and return the per-segment tables in submission order.
pub fn dispatch(
    artifacts: &[SegmentArtifact],
    worker_count: usize,
    spawner: &dyn WorkerSpawner,
) -> Result<Vec<Table>> {
    if worker_count == 0 {
        return Err(PipelineError::Configuration(
            "worker count must be at least 1".to_string(),
        ));
    }
    if artifacts.is_empty() {
        return Ok(Vec::new());
    }

    info!(
        "dispatching {} segment(s) across {} worker(s)",
        artifacts.len(),
        worker_count
    );

    let (tx, rx) = mpsc::channel::<(usize, std::io::Result<Output>)>();
    let mut results: Vec<Option<Table>> = artifacts.iter().map(|_| None).collect();
    let mut failures: Vec<SegmentFailure> = Vec::new();
    let mut next = 0usize;
    let mut in_flight = 0usize;

    while next < artifacts.len() || in_flight > 0 {
        // keep the pool full
        while in_flight < worker_count && next < artifacts.len() {
            let index = next;
            next += 1;

            let mut command = spawner.command(&artifacts[index]);
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            match command.spawn() {
                Ok(child) => {
                    debug!("segment {index}: worker started");
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let outcome = child.wait_with_output();
                        // receiver outliving the send is guaranteed by the
                        // in_flight accounting below
                        let _ = tx.send((index, outcome));
                    });
                    in_flight += 1;
                }
                Err(e) => failures.push(SegmentFailure {
                    index,
                    message: format!("failed to spawn worker: {e}"),
                }),
            }
        }

        if in_flight > 0 {
            let Ok((index, outcome)) = rx.recv() else {
                break;
            };
            in_flight -= 1;
            match parse_outcome(outcome) {
                Ok(table) => {
                    debug!("segment {index}: {} row(s)", table.row_count());
                    results[index] = Some(table);
                }
                Err(message) => {
                    debug!("segment {index}: failed: {message}");
                    failures.push(SegmentFailure { index, message });
                }
            }
        }
    }

    let mut tables = Vec::with_capacity(results.len());
    for (index, slot) in results.into_iter().enumerate() {
        if let Some(table) = slot {
            tables.push(table);
        } else if !failures.iter().any(|f| f.index == index) {
            failures.push(SegmentFailure {
                index,
                message: "worker produced no result".to_string(),
            });
        }
    }
    if !failures.is_empty() {
        failures.sort_by_key(|f| f.index);
        return Err(PipelineError::Extraction {
            failures,
            total: artifacts.len(),
        });
    }
    Ok(tables)
}

fn parse_outcome(outcome: std::io::Result<Output>) -> std::result::Result<Table, String> {
    let output = outcome.map_err(|e| format!("worker I/O failure: {e}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr.trim();
        return Err(if reason.is_empty() {
            format!("worker exited with {}", output.status)
        } else {
            format!("worker exited with {}: {reason}", output.status)
        });
    }
    serde_json::from_slice(&output.stdout).map_err(|e| format!("unparseable worker output: {e}"))
}
