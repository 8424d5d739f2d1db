#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("matrix entry [{row}][{column}] is not a finite non-negative weight: {value}")]
    InvalidWeight { row: usize, column: usize, value: f64 },
    #[error("padding {padding} leaves no room for {groups} groups")]
    InvalidPadding { padding: f64, groups: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
