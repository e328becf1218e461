//! Rectangular, string-labelled tables produced by projection.

use serde::{Deserialize, Serialize};

use super::schema::{AttachmentSpec, DETAIL_LINK_LABEL};

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Raw API field the column was projected from.
    pub key: String,
    /// Human label.
    pub label: String,
    /// Retained for row lookups but not meant to be shown.
    #[serde(default)]
    pub hidden: bool,
}

impl Column {
    /// Creates a visible column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            hidden: false,
        }
    }

    /// Creates a hidden column.
    pub fn hidden(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(key, label)
        }
    }
}

/// Rows of text cells aligned to a fixed column list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty cells, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Returns the columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the rows in order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the column labels in order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Returns the columns that are not hidden.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Returns the position of the column projected from `key`.
    #[must_use]
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Returns the position of the column labelled `label`.
    #[must_use]
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    /// Returns a cell by row index and raw field name.
    #[must_use]
    pub fn cell(&self, row: usize, key: &str) -> Option<&str> {
        let col = self.column_index(key)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An attachment offered for a display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// 1-based attachment index.
    pub index: usize,
    /// Label such as `첨부파일 3`.
    pub label: String,
    /// Download URL.
    pub url: String,
}

/// The on-screen table, with lookups over its hidden link columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayTable {
    table: Table,
    #[serde(skip)]
    attachments: AttachmentSpec,
}

impl DisplayTable {
    pub(crate) const fn new(table: Table, attachments: AttachmentSpec) -> Self {
        Self { table, attachments }
    }

    /// Returns the underlying table.
    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Consumes the display table, returning the underlying table.
    #[must_use]
    pub fn into_table(self) -> Table {
        self.table
    }

    /// Returns the columns meant to be shown.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.table.visible_columns()
    }

    /// Returns the detail link of a row if it is an http(s) URL.
    #[must_use]
    pub fn detail_link(&self, row: usize) -> Option<&str> {
        let col = self.table.label_index(DETAIL_LINK_LABEL)?;
        let link = self.table.rows().get(row)?.get(col)?.trim();
        link.starts_with("http").then_some(link)
    }

    /// Lists the non-blank attachment URLs of a row in index order.
    #[must_use]
    pub fn attachments(&self, row: usize) -> Vec<Attachment> {
        let Some(cells) = self.table.rows().get(row) else {
            return Vec::new();
        };

        self.attachments
            .fields()
            .filter_map(|(index, field)| {
                let col = self.table.column_index(&field)?;
                let url = cells.get(col)?.trim();
                if url.is_empty() || url.eq_ignore_ascii_case("nan") {
                    return None;
                }
                Some(Attachment {
                    index,
                    label: format!("{} {index}", self.attachments.label),
                    url: url.to_string(),
                })
            })
            .collect()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
