//! Output schema: which columns are written, in what order, under what title.

use serde::{Deserialize, Serialize};

/// One output column: `source` is the record key, `title` the header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub source: String,
    pub title: String,
}

impl Column {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
        }
    }

    /// A column written under its own key.
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source: name.clone(),
            title: name,
        }
    }
}

/// Ordered list of output columns, declared independently of the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSchema {
    columns: Vec<Column>,
}

impl OutputSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.title.as_str())
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.source.as_str())
    }
}

/// The blog post export layout.
impl Default for OutputSchema {
    fn default() -> Self {
        Self::new(
            ["id", "Title", "Content", "Kategorien", "Image Featured", "Date"]
                .into_iter()
                .map(Column::same)
                .collect(),
        )
    }
}
