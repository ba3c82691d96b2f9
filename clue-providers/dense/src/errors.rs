//! Error type for dense matrix ingestion.

use arrow_schema::{ArrowError, DataType};
use clue_core::ClueError;
use thiserror::Error;

/// Failures raised while loading or converting a dense coordinate matrix.
#[derive(Debug, Error)]
pub enum DenseMatrixProviderError {
    /// The requested column does not exist.
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound {
        /// Requested column name.
        column: String,
    },
    /// The column is not a `FixedSizeList`.
    #[error("column `{column}` must be a FixedSizeList<Float32, _> but found {actual:?}")]
    InvalidColumnType {
        /// Column name.
        column: String,
        /// Type found in the schema.
        actual: DataType,
    },
    /// The list elements are not `Float32`.
    #[error("FixedSizeList child type must be Float32 but found {actual:?}")]
    InvalidListValueType {
        /// Element type found in the schema.
        actual: DataType,
    },
    /// The column or one of its elements is declared nullable.
    #[error("column `{column}` must not be nullable (nullable child: {nullable_child})")]
    NullableField {
        /// Column name.
        column: String,
        /// Whether the list elements, rather than the rows, are nullable.
        nullable_child: bool,
    },
    /// The list width is negative or zero.
    #[error("invalid FixedSizeList dimension {actual}")]
    InvalidDimension {
        /// Declared width.
        actual: i32,
    },
    /// A row is null.
    #[error("row {row} is null")]
    NullRow {
        /// Zero-based row index.
        row: usize,
    },
    /// A coordinate is null.
    #[error("row {row} contains null value at position {value_index}")]
    NullValue {
        /// Zero-based row index.
        row: usize,
        /// Position of the null inside the row.
        value_index: usize,
    },
    /// A row has a different width from the rest of the matrix.
    #[error("row {row} has length {actual} but expected {expected}")]
    InvalidRowLength {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        actual: usize,
    },
    /// `rows * dimension` overflows `usize`.
    #[error("matrix with {rows} rows and dimension {dimension} exceeds capacity limits")]
    CapacityOverflow {
        /// Number of rows.
        rows: usize,
        /// Row width.
        dimension: usize,
    },
    /// Record batches disagree on the list width.
    #[error("inconsistent dimensions across batches: expected {expected}, got {actual}")]
    InconsistentBatchDimension {
        /// Width of the first batch.
        expected: usize,
        /// Width of the offending batch.
        actual: usize,
    },
    /// A text field is not a valid `f32`.
    #[error("line {line}, field {field}: `{value}` is not a number")]
    InvalidNumber {
        /// One-based line number.
        line: usize,
        /// One-based field position.
        field: usize,
        /// The rejected text.
        value: String,
    },
    /// The input contained no rows.
    #[error("`{name}` contains no rows")]
    Empty {
        /// Dataset name.
        name: String,
    },
    /// The matrix cannot be viewed as points of the requested dimension.
    #[error("cannot build points from `{name}`: {source}")]
    Points {
        /// Dataset name.
        name: String,
        /// Validation failure reported by the point set.
        #[source]
        source: ClueError,
    },
    /// Arrow decoding failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Parquet decoding failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
