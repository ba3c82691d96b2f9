//! Dense matrix provider implementation and ingestion entry points.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use arrow_array::{Array, FixedSizeListArray, RecordBatchReader};
use clue_core::{ClueError, PointSet};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;

use crate::errors::DenseMatrixProviderError;
use crate::ingest::{append_fixed_size_list_values, validate_fixed_size_list_field};
use crate::text::parse_delimited;

/// Dense matrix provider backed by a contiguous row-major buffer.
///
/// # Examples
/// ```
/// use clue_providers_dense::DenseMatrixProvider;
///
/// let provider = DenseMatrixProvider::try_from_text_reader("demo", "0,0\n1.5,2\n".as_bytes())?;
/// assert_eq!((provider.len(), provider.dimension()), (2, 2));
/// let points = provider.to_point_set::<2>()?;
/// assert_eq!(points.coords(1), Some(&[1.5, 2.0]));
/// # Ok::<(), clue_providers_dense::DenseMatrixProviderError>(())
/// ```
#[derive(Debug)]
pub struct DenseMatrixProvider {
    name: String,
    rows: usize,
    dimension: usize,
    values: Vec<f32>,
}

impl DenseMatrixProvider {
    fn try_from_parts(
        name: impl Into<String>,
        rows: usize,
        dimension: usize,
        values: Vec<f32>,
    ) -> Result<Self, DenseMatrixProviderError> {
        let name = name.into();
        if rows == 0 {
            return Err(DenseMatrixProviderError::Empty { name });
        }
        debug_assert_eq!(values.len(), rows.saturating_mul(dimension));
        Ok(Self {
            name,
            rows,
            dimension,
            values,
        })
    }

    /// Returns the dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Always `false`; empty inputs are rejected at load time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the dimensionality of each row.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the underlying row-major matrix.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.values
    }

    /// Returns row `index`, or `None` when it is out of range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.values.get(start..end)
    }

    /// Loads data from an Arrow [`FixedSizeListArray`].
    ///
    /// # Errors
    /// Returns an error when the list is not `Float32`, contains nulls, or
    /// holds no rows.
    pub fn try_from_fixed_size_list(
        name: impl Into<String>,
        array: &FixedSizeListArray,
    ) -> Result<Self, DenseMatrixProviderError> {
        let mut values = Vec::new();
        let dimension = append_fixed_size_list_values(array, None, 0, &mut values)?;
        Self::try_from_parts(name, array.len(), dimension, values)
    }

    /// Loads data from a Parquet column containing `FixedSizeList<Float32, D>` rows.
    ///
    /// # Errors
    /// Returns an error when the file cannot be opened or the column fails
    /// validation.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
    ) -> Result<Self, DenseMatrixProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, column)
    }

    /// Loads data from a Parquet reader.
    ///
    /// # Errors
    /// Returns [`DenseMatrixProviderError::ColumnNotFound`] for a missing
    /// column, a validation error for a column of the wrong shape, and
    /// [`DenseMatrixProviderError::Empty`] when no rows are present.
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
    ) -> Result<Self, DenseMatrixProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let column_index =
            schema
                .index_of(column)
                .map_err(|_| DenseMatrixProviderError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
        let dimension = validate_fixed_size_list_field(schema.field(column_index), column)?;
        let mut values = Vec::new();
        let mut rows = 0_usize;
        for batch in reader {
            let batch = batch?;
            let column_array = batch.column(column_index);
            let list = column_array
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .ok_or_else(|| DenseMatrixProviderError::InvalidColumnType {
                    column: column.to_owned(),
                    actual: column_array.data_type().clone(),
                })?;
            append_fixed_size_list_values(list, Some(dimension), rows, &mut values)?;
            rows += list.len();
        }
        Self::try_from_parts(name, rows, dimension, values)
    }

    /// Loads comma-separated coordinates from a text file.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, a field is not a
    /// number, rows disagree on their width, or no rows are present.
    pub fn try_from_text_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, DenseMatrixProviderError> {
        let file = File::open(path)?;
        Self::try_from_text_reader(name, BufReader::new(file))
    }

    /// Loads comma-separated coordinates from any buffered reader.
    ///
    /// # Errors
    /// See [`Self::try_from_text_path`].
    pub fn try_from_text_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, DenseMatrixProviderError> {
        let parsed = parse_delimited(reader)?;
        Self::try_from_parts(name, parsed.rows, parsed.dimension, parsed.values)
    }

    /// Copies the matrix into a [`PointSet`] of dimension `D`.
    ///
    /// # Errors
    /// Returns [`DenseMatrixProviderError::Points`] when the row width differs
    /// from `D` or the coordinates fail point-set validation.
    pub fn to_point_set<const D: usize>(&self) -> Result<PointSet<D>, DenseMatrixProviderError> {
        let wrap = |source| DenseMatrixProviderError::Points {
            name: self.name.clone(),
            source,
        };
        if self.dimension != D {
            return Err(wrap(ClueError::DimensionMismatch {
                expected: D,
                actual: self.dimension,
            }));
        }
        PointSet::try_from_flat(&self.values).map_err(wrap)
    }
}
