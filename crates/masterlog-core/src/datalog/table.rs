//! Columnar log tables
//!
//! A [`LogTable`] is an ordered set of equally long named columns. Row
//! position is the implicit time axis (one row per logged sample).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Typed storage for one column. `None` marks a missing sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Raw or converted engineering values
    Numeric(Vec<Option<f64>>),
    /// Nullable integers (rounded derived values)
    Integer(Vec<Option<i64>>),
    /// Preformatted values (lambda strings, signed percentages)
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn head(&self, n: usize) -> Self {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(v[..n].to_vec()),
            ColumnData::Integer(v) => ColumnData::Integer(v[..n].to_vec()),
            ColumnData::Text(v) => ColumnData::Text(v[..n].to_vec()),
        }
    }
}

/// Read a formatted cell back as a number (`"+5.00%"` → `5.0`)
fn parse_text_cell(text: &str) -> Option<f64> {
    let trimmed = text.trim().trim_end_matches('%');
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Column name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed values
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Numeric view of a cell; text cells are parsed, missing or
    /// unparseable cells are `None`
    pub fn value_at(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten(),
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|i| i as f64),
            ColumnData::Text(v) => v
                .get(row)
                .and_then(|cell| cell.as_deref())
                .and_then(parse_text_cell),
        }
    }

    /// Numeric view of the whole column
    pub fn values(&self) -> Vec<Option<f64>> {
        (0..self.len()).map(|row| self.value_at(row)).collect()
    }

    /// Display view of a cell, as a user should read it
    pub fn display_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).copied().flatten().map(|x| x.to_string()),
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(|i| i.to_string()),
            ColumnData::Text(v) => v.get(row).cloned().flatten(),
        }
    }

    /// Whether a cell holds a value
    pub fn is_present(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => matches!(v.get(row), Some(Some(_))),
            ColumnData::Integer(v) => matches!(v.get(row), Some(Some(_))),
            ColumnData::Text(v) => matches!(v.get(row), Some(Some(_))),
        }
    }
}

/// Ordered collection of named columns with a shared row count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogTable {
    columns: Vec<Column>,
    row_count: usize,
}

impl LogTable {
    /// Create an empty table with a fixed row count
    pub fn new(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    /// Build a table from columns. Returns `None` if the columns differ in
    /// length or repeat a name.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut names = BTreeSet::new();
        for column in &columns {
            if column.len() != row_count || !names.insert(column.name()) {
                return None;
            }
        }
        Some(Self { columns, row_count })
    }

    /// Number of rows (samples)
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by exact name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check whether a column exists
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric slice of a numeric column
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name).map(Column::data) {
            Some(ColumnData::Numeric(v)) => Some(v),
            _ => None,
        }
    }

    /// Append a column, or replace the existing one of the same name in
    /// place. Length must match the table's row count.
    pub(crate) fn put_column(&mut self, name: &str, data: ColumnData) {
        debug_assert_eq!(data.len(), self.row_count);
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column::new(name, data)),
        }
    }

    /// Copy of this table without the named columns (exact, case-sensitive)
    pub fn without_columns(&self, ignored: &BTreeSet<String>) -> LogTable {
        LogTable {
            columns: self
                .columns
                .iter()
                .filter(|c| !ignored.contains(&c.name))
                .cloned()
                .collect(),
            row_count: self.row_count,
        }
    }

    /// First `n` rows (clamped to the row count)
    pub fn head(&self, n: usize) -> LogTable {
        let n = n.min(self.row_count);
        LogTable {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.head(n)))
                .collect(),
            row_count: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogTable {
        LogTable::from_columns(vec![
            Column::new("RPM", ColumnData::Numeric(vec![Some(900.0), None, Some(3000.0)])),
            Column::new("VE", ColumnData::Integer(vec![Some(55), Some(60), None])),
            Column::new(
                "Corr",
                ColumnData::Text(vec![Some("+5.00%".into()), None, Some("".into())]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_numeric_and_display_views() {
        let table = sample();
        let corr = table.column("Corr").unwrap();
        assert_eq!(corr.value_at(0), Some(5.0));
        assert_eq!(corr.value_at(2), None);
        assert_eq!(corr.display_at(0).as_deref(), Some("+5.00%"));

        let ve = table.column("VE").unwrap();
        assert_eq!(ve.value_at(1), Some(60.0));
        assert_eq!(ve.display_at(1).as_deref(), Some("60"));

        let rpm = table.column("RPM").unwrap();
        assert_eq!(rpm.display_at(0).as_deref(), Some("900"));
        assert!(!rpm.is_present(1));
    }

    #[test]
    fn test_from_columns_rejects_ragged_and_duplicates() {
        assert!(LogTable::from_columns(vec![
            Column::new("A", ColumnData::Numeric(vec![Some(1.0)])),
            Column::new("B", ColumnData::Numeric(vec![])),
        ])
        .is_none());
        assert!(LogTable::from_columns(vec![
            Column::new("A", ColumnData::Numeric(vec![Some(1.0)])),
            Column::new("A", ColumnData::Numeric(vec![Some(2.0)])),
        ])
        .is_none());
    }

    #[test]
    fn test_head_and_projection() {
        let table = sample();
        let head = table.head(10);
        assert_eq!(head.row_count(), 3);
        let head = table.head(1);
        assert_eq!(head.row_count(), 1);
        assert_eq!(head.column("RPM").unwrap().len(), 1);

        let ignored: BTreeSet<String> = ["VE".to_string()].into_iter().collect();
        let projected = table.without_columns(&ignored);
        assert_eq!(projected.column_names(), vec!["RPM", "Corr"]);
        assert_eq!(projected.row_count(), table.row_count());
    }
}
