use serde::{Deserialize, Serialize};

/// Which header a layout index came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Row,
    Column,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Row => "row",
            Role::Column => "column",
        }
    }
}

/// Row labels followed by column labels. Layout index `i` always refers to `labels[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelIndex {
    labels: Vec<String>,
    row_count: usize,
}

impl LabelIndex {
    pub fn new(row_labels: Vec<String>, column_labels: Vec<String>) -> Self {
        let row_count = row_labels.len();
        let mut labels = row_labels;
        labels.extend(column_labels);
        Self { labels, row_count }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.labels.len() - self.row_count
    }

    pub fn row_labels(&self) -> &[String] {
        &self.labels[..self.row_count]
    }

    pub fn column_labels(&self) -> &[String] {
        &self.labels[self.row_count..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// Panics when `index` is outside `0..len()`: such an index can only come from a layout that
    /// was not computed from this label set.
    pub fn label_for(&self, index: usize) -> &str {
        &self.labels[index]
    }

    /// Panics when `index` is outside `0..len()`.
    pub fn role_for(&self, index: usize) -> Role {
        assert!(
            index < self.labels.len(),
            "layout index {index} out of range for {} labels",
            self.labels.len()
        );
        if index < self.row_count {
            Role::Row
        } else {
            Role::Column
        }
    }
}
