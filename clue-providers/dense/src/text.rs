//! Delimited text ingestion: one point per line, comma-separated
//! coordinates. Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use crate::errors::DenseMatrixProviderError;

/// Parsed rows as a flat buffer plus the row count and width.
pub(crate) struct ParsedText {
    pub(crate) rows: usize,
    pub(crate) dimension: usize,
    pub(crate) values: Vec<f32>,
}

pub(crate) fn parse_delimited<R: BufRead>(
    reader: R,
) -> Result<ParsedText, DenseMatrixProviderError> {
    let mut values = Vec::new();
    let mut rows = 0_usize;
    let mut dimension: Option<usize> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let before = values.len();
        for (field, raw) in trimmed.split(',').enumerate() {
            let raw = raw.trim();
            let value = raw
                .parse::<f32>()
                .map_err(|_| DenseMatrixProviderError::InvalidNumber {
                    line: index + 1,
                    field: field + 1,
                    value: raw.to_owned(),
                })?;
            values.push(value);
        }
        let width = values.len() - before;
        match dimension {
            Some(expected) if expected != width => {
                return Err(DenseMatrixProviderError::InvalidRowLength {
                    row: rows,
                    expected,
                    actual: width,
                });
            }
            Some(_) => {}
            None => dimension = Some(width),
        }
        rows += 1;
    }

    Ok(ParsedText {
        rows,
        dimension: dimension.unwrap_or(0),
        values,
    })
}
