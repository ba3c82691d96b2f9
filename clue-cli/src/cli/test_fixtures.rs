//! Input files for CLI tests.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;
use tempfile::TempDir;

/// Two tight pairs far apart and one isolated point, as `[x, y]` rows.
pub(super) const TWO_PAIRS: [[f32; 2]; 5] =
    [[0.0, 0.0], [0.5, 0.0], [10.0, 10.0], [10.0, 10.5], [40.0, -40.0]];

/// Writes `rows` to `dir/name` as a `coords: FixedSizeList<Float32, 2>` column.
pub(super) fn create_parquet_file(
    dir: &TempDir,
    name: &str,
    rows: &[[f32; 2]],
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join(name);
    let item_field = Arc::new(Field::new("item", DataType::Float32, false));
    let schema = Arc::new(Schema::new(vec![Field::new(
        "coords",
        DataType::FixedSizeList(item_field.clone(), 2),
        false,
    )]));
    let values = Float32Array::from_iter_values(rows.iter().flatten().copied());
    let list = FixedSizeListArray::new(item_field, 2, Arc::new(values) as ArrayRef, None);
    let batch = RecordBatch::try_new(schema.clone(), vec![Arc::new(list) as ArrayRef])?;
    let file = File::create(&path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(path)
}

/// Renders `rows` as comma-separated text with a comment header.
pub(super) fn as_text<const D: usize>(rows: &[[f32; D]]) -> String {
    let mut text = String::from("# generated\n");
    for row in rows {
        let fields: Vec<String> = row.iter().map(f32::to_string).collect();
        text.push_str(&fields.join(","));
        text.push('\n');
    }
    text
}
