pub(crate) use super::{DenseMatrixProvider, DenseMatrixProviderError};

mod errors;
mod ingest;
mod support;
