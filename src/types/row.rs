//! Row type for procedure results.

use std::sync::Arc;

use super::value::SqlValue;

/// Ordered column names of one result set, shared by all of its rows.
#[derive(Debug, Clone, Default)]
pub struct Columns {
    names: Vec<String>,
}

impl Columns {
    /// Create column info from names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Column names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Find a column index by name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// A row of procedure results.
///
/// Read-only and forward-only at the cursor level; the materializer addresses
/// columns by case-insensitive name and never fails on a missing column.
#[derive(Debug, Clone)]
pub struct Row {
    values: Vec<SqlValue>,
    columns: Arc<Columns>,
}

impl Row {
    /// Create a new row with values and shared column info.
    pub fn new(columns: Arc<Columns>, values: Vec<SqlValue>) -> Self {
        Self { values, columns }
    }

    /// Get a value by column index (0-based).
    pub fn get(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Get a value by column name (case-insensitive).
    ///
    /// Returns `None` when the row has no such column; a present column with
    /// a NULL value returns `Some(&SqlValue::Null)`.
    pub fn get_by_name(&self, name: &str) -> Option<&SqlValue> {
        self.columns.find(name).and_then(|idx| self.values.get(idx))
    }

    /// Check whether the row exposes a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.find(name).is_some()
    }

    /// Column info shared across the result set.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values, in column order.
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Iterate over values.
    pub fn iter(&self) -> impl Iterator<Item = &SqlValue> {
        self.values.iter()
    }
}

impl IntoIterator for Row {
    type Item = SqlValue;
    type IntoIter = std::vec::IntoIter<SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a SqlValue;
    type IntoIter = std::slice::Iter<'a, SqlValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
