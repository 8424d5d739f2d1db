//! Flow table parsing and the rows×columns → symmetric adjacency expansion.

use crate::labels::LabelIndex;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One cell of the raw input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Text used when the cell is a header (row or column label).
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// Numeric weight of a data cell. `None` means the cell holds text that is not a number.
    pub fn weight(&self) -> Option<f64> {
        match self {
            Cell::Empty => Some(0.0),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    return Some(0.0);
                }
                // `f64::from_str` accepts "inf"/"NaN"; those are not weights.
                t.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// The raw input: row 0 holds the column labels (its first cell is ignored), column 0 of every
/// later row holds the row label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowTable {
    rows: Vec<Vec<Cell>>,
}

impl FlowTable {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Moves `[row][col]` to `[col][row]`, headers included. Missing cells of ragged input become
    /// [`Cell::Empty`], so the result is always rectangular.
    pub fn transpose(&self) -> Self {
        let width = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = (0..width)
            .map(|c| {
                self.rows
                    .iter()
                    .map(|row| row.get(c).cloned().unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    fn check_shape(&self) -> Result<()> {
        let Some(header) = self.rows.first() else {
            return Err(Error::MalformedInput {
                message: "missing header row".to_string(),
            });
        };
        let width = header.len();
        if width < 2 {
            return Err(Error::MalformedInput {
                message: "header row has no column labels".to_string(),
            });
        }
        if self.rows.len() < 2 {
            return Err(Error::MalformedInput {
                message: "no data rows below the header".to_string(),
            });
        }
        for (i, row) in self.rows.iter().enumerate().skip(1) {
            if row.len() != width {
                return Err(Error::MalformedInput {
                    message: format!(
                        "row {i} has {} cells, expected {width} like the header row",
                        row.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The numeric n×m submatrix, header stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMatrix {
    rows: usize,
    columns: usize,
    values: Vec<Vec<f64>>,
}

impl FlowMatrix {
    pub fn new(values: Vec<Vec<f64>>) -> Result<Self> {
        let rows = values.len();
        let columns = values.first().map(Vec::len).unwrap_or(0);
        if let Some(i) = values.iter().position(|r| r.len() != columns) {
            return Err(Error::MalformedInput {
                message: format!(
                    "flow row {i} has {} values, expected {columns}",
                    values[i].len()
                ),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row][column]
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }

    /// Places the matrix in the top-right block and its transpose in the bottom-left block of an
    /// (n+m)×(n+m) zero matrix.
    pub fn expand(&self) -> ExpandedMatrix {
        let n = self.rows;
        let size = n + self.columns;
        let mut values = vec![vec![0.0; size]; size];
        for (i, row) in values.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if i < n && j >= n {
                    *cell = self.values[i][j - n];
                } else if i >= n && j < n {
                    *cell = self.values[j][i - n];
                }
            }
        }
        ExpandedMatrix { values }
    }
}

/// Symmetric, zero-diagonal adjacency matrix over rows ++ columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedMatrix {
    values: Vec<Vec<f64>>,
}

impl ExpandedMatrix {
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            self.values[i][i] == 0.0 && (0..i).all(|j| self.values[i][j] == self.values[j][i])
        })
    }
}

/// Everything the layout stage needs from one input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedMatrix {
    pub labels: LabelIndex,
    pub flow: FlowMatrix,
    pub expanded: ExpandedMatrix,
}

impl PreparedMatrix {
    pub fn row_count(&self) -> usize {
        self.labels.row_count()
    }
}

/// Splits a flow table into labels and weights and builds the expanded matrix.
///
/// With `flip` the table is transposed first; labels are still ordered rows first, so after a flip
/// the former columns become the rows.
pub fn prepare(table: &FlowTable, flip: bool) -> Result<PreparedMatrix> {
    table.check_shape()?;
    let transposed;
    let data = if flip {
        transposed = table.transpose();
        &transposed
    } else {
        table
    };
    let rows = data.rows();

    let column_labels: Vec<String> = rows[0].iter().skip(1).map(Cell::label).collect();
    let row_labels: Vec<String> = rows.iter().skip(1).map(|r| r[0].label()).collect();

    let mut values = Vec::with_capacity(row_labels.len());
    for (r, row) in rows.iter().enumerate().skip(1) {
        let mut out = Vec::with_capacity(column_labels.len());
        for (c, cell) in row.iter().enumerate().skip(1) {
            let (at_row, at_column) = if flip { (c, r) } else { (r, c) };
            let Some(value) = cell.weight() else {
                return Err(Error::NonNumericCell {
                    row: at_row,
                    column: at_column,
                    value: cell.label(),
                });
            };
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight {
                    row: at_row,
                    column: at_column,
                    value,
                });
            }
            out.push(value);
        }
        values.push(out);
    }

    let flow = FlowMatrix::new(values)?;
    let expanded = flow.expand();
    let labels = LabelIndex::new(row_labels, column_labels);
    tracing::debug!(
        rows = flow.row_count(),
        columns = flow.column_count(),
        flip,
        "prepared flow matrix"
    );

    Ok(PreparedMatrix {
        labels,
        flow,
        expanded,
    })
}
