use super::DenseMatrixProviderError;
use arrow_schema::ArrowError;
use clue_core::ClueError;
use parquet::errors::ParquetError;
use rstest::rstest;
use std::error::Error as _;
use std::io;

#[rstest]
#[case::arrow(
    DenseMatrixProviderError::from(ArrowError::ComputeError("boom".into())),
    true,
    false,
    false
)]
#[case::parquet(
    DenseMatrixProviderError::from(ParquetError::General("boom".into())),
    false,
    true,
    false
)]
#[case::io(
    DenseMatrixProviderError::from(io::Error::other("boom")),
    false,
    false,
    true
)]
fn dense_matrix_provider_error_conversions(
    #[case] err: DenseMatrixProviderError,
    #[case] is_arrow: bool,
    #[case] is_parquet: bool,
    #[case] is_io: bool,
) {
    assert_eq!(matches!(err, DenseMatrixProviderError::Arrow(_)), is_arrow);
    assert_eq!(
        matches!(err, DenseMatrixProviderError::Parquet(_)),
        is_parquet
    );
    assert_eq!(matches!(err, DenseMatrixProviderError::Io(_)), is_io);
}

#[test]
fn points_error_exposes_core_source() {
    let err = DenseMatrixProviderError::Points {
        name: "demo".into(),
        source: ClueError::EmptyPointSet,
    };
    assert!(err.to_string().starts_with("cannot build points from `demo`"));
    let source = err
        .source()
        .and_then(|source| source.downcast_ref::<ClueError>())
        .expect("core error source");
    assert_eq!(source, &ClueError::EmptyPointSet);
}

#[test]
fn invalid_number_names_position() {
    let err = DenseMatrixProviderError::InvalidNumber {
        line: 3,
        field: 2,
        value: "x".into(),
    };
    assert_eq!(err.to_string(), "line 3, field 2: `x` is not a number");
}
