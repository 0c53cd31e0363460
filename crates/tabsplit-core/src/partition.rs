//! Document partitioning: divide an N-page PDF into contiguous page-range
//! segments of near-equal size, one artifact file per segment.
//!
//! Segments partition `[0, P)` exactly: no page is dropped or duplicated.
//! When the page count is smaller than the requested segment count, the
//! trailing segments would be empty; they are skipped, never materialized,
//! so no worker slot is wasted on them.

use std::path::{Path, PathBuf};

use lopdf::Document;
use tracing::debug;

use crate::error::{PipelineError, Result};

/// A contiguous half-open page range `[begin, end)`, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub begin: usize,
    pub end: usize,
}

impl PageRange {
    /// Number of pages in the range.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// True when the range covers no pages.
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }
}

/// One split PDF on disk, with its submission index and page range.
///
/// The index is carried explicitly through the pipeline; the zero-padded
/// file name is only a debugging aid, ordering never depends on how a
/// directory listing sorts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentArtifact {
    /// Zero-based submission index.
    pub index: usize,
    /// Location of the segment PDF under the workspace.
    pub path: PathBuf,
    /// Pages of the source document this artifact contains.
    pub pages: PageRange,
}

/// Plan the page ranges for `segment_count` segments over `page_count`
/// pages. Empty trailing segments are omitted.
pub fn plan_segments(page_count: usize, segment_count: usize) -> Vec<PageRange> {
    if page_count == 0 || segment_count == 0 {
        return Vec::new();
    }
    let per_segment = page_count.div_ceil(segment_count);
    let mut ranges = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let begin = i * per_segment;
        if begin >= page_count {
            break;
        }
        let end = (begin + per_segment).min(page_count);
        ranges.push(PageRange { begin, end });
    }
    ranges
}

/// Digits needed to zero-pad indices `0..segment_count` so that string
/// sort order equals numeric order. Minimum 1.
pub fn index_width(segment_count: usize) -> usize {
    segment_count.saturating_sub(1).to_string().len()
}

/// File name for segment `index`, zero-padded to `width` digits.
pub fn segment_file_name(index: usize, width: usize) -> String {
    format!("{index:0width$}.pdf")
}

/// Split `source` into at most `segment_count` artifacts under `out_dir`.
///
/// The source is parsed once; each artifact is produced by cloning the
/// parsed document and deleting the pages outside its range, which
/// preserves page content and order exactly.
pub fn partition(
    source: &Path,
    segment_count: usize,
    out_dir: &Path,
) -> Result<Vec<SegmentArtifact>> {
    let split_err = |reason: String| PipelineError::Split {
        path: source.to_path_buf(),
        reason,
    };

    let doc = Document::load(source).map_err(|e| split_err(e.to_string()))?;
    // keys are 1-based page numbers in document order
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let page_count = page_numbers.len();
    if page_count == 0 {
        return Err(split_err("document has no pages".to_string()));
    }

    let ranges = plan_segments(page_count, segment_count);
    let width = index_width(segment_count);
    debug!(
        "splitting {page_count} pages into {} segment(s) under {}",
        ranges.len(),
        out_dir.display()
    );

    let mut artifacts = Vec::with_capacity(ranges.len());
    for (index, pages) in ranges.into_iter().enumerate() {
        let mut segment = doc.clone();
        let delete: Vec<u32> = page_numbers
            .iter()
            .enumerate()
            .filter(|(pos, _)| *pos < pages.begin || *pos >= pages.end)
            .map(|(_, number)| *number)
            .collect();
        segment.delete_pages(&delete);

        let path = out_dir.join(segment_file_name(index, width));
        segment
            .save(&path)
            .map_err(|e| split_err(format!("failed to save segment {index}: {e}")))?;
        debug!(
            "wrote segment {index} (pages {}..{}) to {}",
            pages.begin,
            pages.end,
            path.display()
        );
        artifacts.push(SegmentArtifact { index, path, pages });
    }
    Ok(artifacts)
}
