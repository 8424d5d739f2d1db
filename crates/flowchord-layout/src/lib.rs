#![forbid(unsafe_code)]

//! Headless circular chord layout.
//!
//! Given a square matrix of non-negative pairwise weights, assigns every row a contiguous angular
//! span ("group") proportional to its row sum, splits each group into per-column "subgroups", and
//! pairs subgroup `i-j` with subgroup `j-i` into a chord. Angles are in radians, clockwise from
//! 12 o'clock, and together with the padding cover exactly `2π`.

pub mod error;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn compare(self, a: f64, b: f64) -> Ordering {
        let o = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            SortOrder::Ascending => o,
            SortOrder::Descending => o.reverse(),
        }
    }
}

/// Layout options. `None` sorts keep the input order, which is what callers wanting a stable,
/// caller-defined visual order should use.
#[derive(Debug, Clone, Default)]
pub struct ChordOptions {
    /// Angular gap inserted after every group.
    pub padding: f64,
    /// Orders groups around the ring by their row sum.
    pub sort_groups: Option<SortOrder>,
    /// Orders subgroups inside a group by cell value.
    pub sort_subgroups: Option<SortOrder>,
    /// Orders the emitted chords by the mean value of their two ends (affects z-order only).
    pub sort_chords: Option<SortOrder>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Subgroup {
    pub index: usize,
    pub subindex: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chord {
    pub source: Subgroup,
    pub target: Subgroup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChordLayout {
    /// One group per matrix row, indexed by row (not by position on the ring).
    pub groups: Vec<Group>,
    /// Row-major `n × n`: `subgroups[i * n + j]` is group `i`'s slice for column `j`, zero-width
    /// when the cell is 0.
    pub subgroups: Vec<Subgroup>,
    pub chords: Vec<Chord>,
}

fn validate(matrix: &[Vec<f64>], options: &ChordOptions) -> Result<()> {
    let n = matrix.len();
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != n {
            return Err(Error::NotSquare {
                row,
                len: values.len(),
                expected: n,
            });
        }
        for (column, &value) in values.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight { row, column, value });
            }
        }
    }
    let padding = options.padding;
    if !padding.is_finite() || padding < 0.0 || padding * (n as f64) > TAU {
        return Err(Error::InvalidPadding { padding, groups: n });
    }
    Ok(())
}

pub fn layout(matrix: &[Vec<f64>], options: &ChordOptions) -> Result<ChordLayout> {
    validate(matrix, options)?;

    let n = matrix.len();
    let group_sums: Vec<f64> = matrix.iter().map(|row| row.iter().sum()).collect();
    let total: f64 = group_sums.iter().sum();

    let mut group_index: Vec<usize> = (0..n).collect();
    if let Some(order) = options.sort_groups {
        group_index.sort_by(|&a, &b| order.compare(group_sums[a], group_sums[b]));
    }

    let subgroup_index: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            let mut idx: Vec<usize> = (0..n).collect();
            if let Some(order) = options.sort_subgroups {
                idx.sort_by(|&a, &b| order.compare(matrix[i][a], matrix[i][b]));
            }
            idx
        })
        .collect();

    // An all-zero matrix has nothing to distribute; every group collapses onto its padding slot.
    let scale = if total > 0.0 {
        (TAU - options.padding * n as f64) / total
    } else {
        0.0
    };

    let mut groups = vec![Group::default(); n];
    let mut subgroups = vec![Subgroup::default(); n * n];
    let mut x = 0.0;
    for &di in &group_index {
        let x0 = x;
        for &dj in &subgroup_index[di] {
            let value = matrix[di][dj];
            let a0 = x;
            x += value * scale;
            subgroups[di * n + dj] = Subgroup {
                index: di,
                subindex: dj,
                start_angle: a0,
                end_angle: x,
                value,
            };
        }
        groups[di] = Group {
            index: di,
            start_angle: x0,
            end_angle: x,
            value: group_sums[di],
        };
        x += options.padding;
    }

    let mut chords = Vec::new();
    for i in 0..n {
        for j in i..n {
            let source = subgroups[i * n + j];
            let target = subgroups[j * n + i];
            if source.value == 0.0 && target.value == 0.0 {
                continue;
            }
            chords.push(if source.value < target.value {
                Chord {
                    source: target,
                    target: source,
                }
            } else {
                Chord { source, target }
            });
        }
    }

    if let Some(order) = options.sort_chords {
        chords.sort_by(|a, b| {
            order.compare(
                (a.source.value + a.target.value) / 2.0,
                (b.source.value + b.target.value) / 2.0,
            )
        });
    }

    Ok(ChordLayout {
        groups,
        subgroups,
        chords,
    })
}
