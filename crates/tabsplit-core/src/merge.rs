//! Combine ordered tables into one, unioning columns by normalized name.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::error::{PipelineError, Result};
use crate::normalize::HeaderNormalizer;
use crate::table::Table;

/// Shape problems that cannot be tolerated by the missing-column fill.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// A row's cell count does not match its table's column count.
    #[error("table {table}, row {row}: expected {expected} cell(s), found {found}")]
    RowShape {
        table: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Two columns of one table collapse to the same name after
    /// normalization; unioning by name would silently drop one of them.
    #[error("table {table}: duplicate column '{name}' after normalization")]
    DuplicateColumn { table: usize, name: String },
}

/// Concatenate `tables` in order into a single [`Table`].
///
/// Column names are normalized with `normalizer`, then unioned in
/// first-seen order. Rows keep their source order; a row from a table that
/// lacks some merged column gets `None` there. Empty tables contribute
/// nothing.
pub fn concat_tables(
    tables: &[Table],
    normalizer: &HeaderNormalizer,
) -> std::result::Result<Table, MergeError> {
    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();

    for (table_index, table) in tables.iter().enumerate() {
        if table.is_empty() {
            continue;
        }

        // map this table's columns onto merged column positions
        let mut mapping = Vec::with_capacity(table.columns.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(table.columns.len());
        for name in &table.columns {
            let normalized = normalizer.normalize(name);
            if !seen.insert(normalized.clone()) {
                return Err(MergeError::DuplicateColumn {
                    table: table_index,
                    name: normalized,
                });
            }
            let position = *positions.entry(normalized.clone()).or_insert_with(|| {
                columns.push(normalized);
                columns.len() - 1
            });
            mapping.push(position);
        }

        for (row_index, row) in table.rows.iter().enumerate() {
            if row.len() != table.columns.len() {
                return Err(MergeError::RowShape {
                    table: table_index,
                    row: row_index,
                    expected: table.columns.len(),
                    found: row.len(),
                });
            }
            let mut merged_row = vec![None; columns.len()];
            for (cell, &position) in row.iter().zip(&mapping) {
                merged_row[position] = cell.clone();
            }
            rows.push(merged_row);
        }
    }

    // earlier rows may predate later-discovered columns
    for row in &mut rows {
        row.resize(columns.len(), None);
    }

    Ok(Table { columns, rows })
}

/// Merge per-segment tables, in segment order, into the final result.
pub fn merge(segment_tables: &[Table], normalizer: &HeaderNormalizer) -> Result<Table> {
    concat_tables(segment_tables, normalizer).map_err(|e| PipelineError::Merge(e.to_string()))
}
