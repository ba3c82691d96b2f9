//! Dense point providers: row-major `f32` coordinates loaded from Parquet or
//! delimited text.

mod errors;
mod ingest;
mod provider;
mod text;

pub use errors::DenseMatrixProviderError;
pub use provider::DenseMatrixProvider;

#[cfg(test)]
mod tests;
