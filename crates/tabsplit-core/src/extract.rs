//! Per-segment table extraction.
//!
//! [`TableExtractor`] is the boundary to the table-recognition capability:
//! given one segment artifact it returns the tables found, in page order
//! then in-page discovery order. The pipeline preserves whatever the
//! capability returns; it does not verify that the capability found the
//! "right" tables, and a table spanning a segment boundary will come back
//! split. Those are properties of the capability, not of this pipeline.
//!
//! [`TextLayoutExtractor`] is the built-in capability: a heuristic over the
//! page text layer that treats runs of aligned, multi-column lines as
//! tables. It needs no ML models and handles the fixed-width report layouts
//! this tool targets; anything fancier belongs behind the same trait.

use std::path::{Path, PathBuf};

use lopdf::Document;
use thiserror::Error;
use tracing::debug;

use crate::merge::{concat_tables, MergeError};
use crate::normalize::HeaderNormalizer;
use crate::table::Table;

/// Errors scoped to one segment's extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The artifact could not be opened as a PDF.
    #[error("failed to open artifact {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// A page's text layer could not be read.
    #[error("failed to read text of page {page}: {source}")]
    Page {
        page: u32,
        #[source]
        source: lopdf::Error,
    },

    /// The segment's tables could not be concatenated into one result.
    #[error("inconsistent tables within segment: {0}")]
    Tables(#[from] MergeError),
}

/// The table-recognition capability for one artifact.
///
/// Implementations are invoked inside an isolated worker process, one
/// instance per process; they may hold non-reentrant state.
pub trait TableExtractor {
    /// Return every table found in the artifact, multiple per page where
    /// present, in page order then in-page discovery order.
    fn extract(&self, artifact: &Path) -> Result<Vec<Table>, ExtractError>;
}

/// Tuning knobs for [`TextLayoutExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Minimum cells per line for the line to count as a table row.
    pub min_columns: usize,
    /// Minimum lines (header included) for a run to count as a table.
    pub min_rows: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_columns: 2,
            min_rows: 2,
        }
    }
}

/// Heuristic text-layout table extractor.
///
/// Reads each page's text through lopdf and scans it line by line. A line
/// whose cells are separated by two or more spaces (or tabs) is a candidate
/// row; consecutive candidate rows of equal width form a table, with the
/// first row as the header. A width change closes the current table and
/// opens a new one.
#[derive(Debug, Clone, Default)]
pub struct TextLayoutExtractor {
    config: ExtractorConfig,
}

impl TextLayoutExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl TableExtractor for TextLayoutExtractor {
    fn extract(&self, artifact: &Path) -> Result<Vec<Table>, ExtractError> {
        let doc = Document::load(artifact).map_err(|source| ExtractError::Load {
            path: artifact.to_path_buf(),
            source,
        })?;

        let mut tables = Vec::new();
        // BTreeMap keys iterate in ascending page order
        for (page, _) in doc.get_pages() {
            let text = doc
                .extract_text(&[page])
                .map_err(|source| ExtractError::Page { page, source })?;
            let found = detect_tables(&text, &self.config);
            debug!(
                "page {page} of {}: {} table(s)",
                artifact.display(),
                found.len()
            );
            tables.extend(found);
        }
        Ok(tables)
    }
}

/// Extract one artifact and concatenate its tables into the segment result.
///
/// Concatenation uses the identity header policy: within one segment the
/// headers come from a single extraction pass and already agree; cosmetic
/// normalization is the merger's job.
pub fn extract_segment(
    extractor: &dyn TableExtractor,
    artifact: &Path,
) -> Result<Table, ExtractError> {
    let tables = extractor.extract(artifact)?;
    Ok(concat_tables(&tables, &HeaderNormalizer::identity())?)
}

/// Scan page text for runs of aligned multi-column lines.
pub fn detect_tables(text: &str, config: &ExtractorConfig) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Option<Table> = None;

    for line in text.lines() {
        let cells = split_cells(line.trim_end());
        if cells.len() >= config.min_columns {
            let same_width = current
                .as_ref()
                .is_some_and(|t| t.columns.len() == cells.len());
            if same_width {
                if let Some(table) = current.as_mut() {
                    table.rows.push(cells.into_iter().map(Some).collect());
                }
            } else {
                close_run(&mut current, &mut tables, config);
                current = Some(Table::with_columns(cells));
            }
        } else {
            close_run(&mut current, &mut tables, config);
        }
    }
    close_run(&mut current, &mut tables, config);
    tables
}

fn close_run(current: &mut Option<Table>, tables: &mut Vec<Table>, config: &ExtractorConfig) {
    if let Some(table) = current.take() {
        // header plus data rows
        if table.rows.len() + 1 >= config.min_rows {
            tables.push(table);
        }
    }
}

/// Split a line into cells on tabs or runs of two or more spaces. Single
/// spaces stay inside a cell.
fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut spaces = 0usize;

    for ch in line.chars() {
        match ch {
            ' ' => spaces += 1,
            '\t' => {
                if !current.is_empty() {
                    cells.push(std::mem::take(&mut current));
                }
                spaces = 0;
            }
            _ => {
                if spaces >= 2 {
                    if !current.is_empty() {
                        cells.push(std::mem::take(&mut current));
                    }
                } else if spaces == 1 && !current.is_empty() {
                    current.push(' ');
                }
                spaces = 0;
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        cells.push(current);
    }
    cells
}
