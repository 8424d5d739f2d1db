pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed flow matrix: {message}")]
    MalformedInput { message: String },

    /// Coordinates are those of the input table, header row and column included.
    #[error("Cell [{row}][{column}] is not numeric: {value:?}")]
    NonNumericCell {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Cell [{row}][{column}] is not a finite non-negative weight: {value}")]
    InvalidWeight { row: usize, column: usize, value: f64 },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Flow matrix JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
