//! Tabular data model shared by workers and the controller.

use serde::{Deserialize, Serialize};

/// An ordered table of rows over named columns.
///
/// Cells are `Option<String>`; `None` is the explicit missing-value marker
/// used when a segment lacks a column that other segments have. Every row
/// has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in discovery order.
    pub columns: Vec<String>,
    /// Data rows, in source order.
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Create an empty table with the given column names.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// True when the table has no columns and no rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table() {
        let table = Table::default();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn with_columns_is_not_empty() {
        let table = Table::with_columns(vec!["a".to_string()]);
        assert!(!table.is_empty());
    }

    #[test]
    fn json_round_trip_preserves_missing_cells() {
        let table = Table {
            columns: vec!["Contract".to_string(), "Settle".to_string()],
            rows: vec![
                vec![Some("CLZ6".to_string()), None],
                vec![Some("NGF7".to_string()), Some("3.41".to_string())],
            ],
        };
        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
        // missing cells travel as explicit nulls, not dropped entries
        assert!(json.contains("null"));
    }
}
