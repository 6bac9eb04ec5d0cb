use serde_json::Value;
use std::collections::HashSet;

/// Column-ordered rows of string cells, the in-memory shape of every stored
/// CSV table.
///
/// Rows always have exactly one cell per column. Missing values are empty
/// strings, which is also how they are rendered on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table from columns and rows; short rows are padded and long
    /// rows truncated to the column count.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = &'a str> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Appends a row given as (column, value) pairs, adding unseen columns
    /// at the end.
    pub fn push_record(&mut self, record: Vec<(String, String)>) {
        let mut row = vec![String::new(); self.columns.len()];
        for (column, value) in record {
            match self.column_index(&column) {
                Some(idx) => row[idx] = value,
                None => {
                    self.add_column(column);
                    row.push(value);
                }
            }
        }
        self.push_row(row);
    }

    fn add_column(&mut self, name: String) {
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    /// Sets `name` to `value` on every row, adding the column if needed.
    pub fn set_column(&mut self, name: &str, value: &str) {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.add_column(name.to_string());
                self.columns.len() - 1
            }
        };
        for row in &mut self.rows {
            row[idx] = value.to_string();
        }
    }

    /// Appends `other` below this table. Columns are unioned in first-seen
    /// order; cells of columns a side lacks are left empty.
    pub fn append(&mut self, other: Table) {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }

        let mapping: Vec<usize> = other
            .columns
            .into_iter()
            .map(|column| match self.column_index(&column) {
                Some(idx) => idx,
                None => {
                    self.add_column(column);
                    self.columns.len() - 1
                }
            })
            .collect();

        let width = self.columns.len();
        self.rows.reserve(other.rows.len());
        for row in other.rows {
            let mut aligned = vec![String::new(); width];
            for (cell, &idx) in row.into_iter().zip(&mapping) {
                aligned[idx] = cell;
            }
            self.rows.push(aligned);
        }
    }

    /// Concatenates tables top to bottom.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        tables.into_iter().fold(Table::default(), |mut acc, table| {
            acc.append(table);
            acc
        })
    }

    /// Removes exact duplicate rows, keeping the first occurrence.
    pub fn dedup_rows(&mut self) {
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows.retain(|row| seen.insert(row.clone()));
    }
}

/// Renders a JSON value as a CSV cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
