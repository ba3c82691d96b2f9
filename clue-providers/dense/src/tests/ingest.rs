use super::{DenseMatrixProviderError, support::*};
use crate::ingest::{
    append_fixed_size_list_values, copy_list_values, validate_fixed_size_list_field,
};
use arrow_schema::{DataType, Field};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[case::negative(-1)]
#[case::zero(0)]
fn validate_field_rejects_non_positive_dimension(#[case] width: i32) {
    let child = Arc::new(Field::new("item", DataType::Float32, false));
    let field = Field::new("coords", DataType::FixedSizeList(child, width), false);
    let err = validate_fixed_size_list_field(&field, "coords")
        .expect_err("non-positive dimension must be rejected");
    assert!(matches!(
        err,
        DenseMatrixProviderError::InvalidDimension { actual } if actual == width
    ));
}

#[test]
fn validate_field_rejects_non_float_children() {
    let child = Arc::new(Field::new("item", DataType::Float64, false));
    let field = Field::new("coords", DataType::FixedSizeList(child, 2), false);
    let err = validate_fixed_size_list_field(&field, "coords")
        .expect_err("f64 children must be rejected");
    assert!(matches!(
        err,
        DenseMatrixProviderError::InvalidListValueType {
            actual: DataType::Float64
        }
    ));
}

#[test]
fn validate_field_accepts_float_lists() {
    let field = coordinate_field(4, false, false);
    assert_eq!(
        validate_fixed_size_list_field(&field, "coords").expect("valid field"),
        4
    );
}

#[test]
fn append_rejects_batches_of_another_width() {
    let array = build_list_array(&[vec![4.0, 5.0]], 2, false);
    let mut values = Vec::new();
    let err = append_fixed_size_list_values(&array, Some(3), 7, &mut values)
        .expect_err("dimension mismatch must fail");
    assert!(matches!(
        err,
        DenseMatrixProviderError::InconsistentBatchDimension {
            expected: 3,
            actual: 2
        }
    ));
    assert!(values.is_empty());
}

#[test]
fn append_extends_existing_values() {
    let array = build_array(&[[1.0, 2.0], [3.0, 4.0]]);
    let mut values = vec![0.0, 0.5];
    let width = append_fixed_size_list_values(&array, Some(2), 1, &mut values)
        .expect("matching width");
    assert_eq!(width, 2);
    assert_eq!(values, vec![0.0, 0.5, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn copy_list_values_rejects_incorrect_length() {
    let rows = vec![vec![1.0, 2.0]];
    let array = build_list_array(&rows, 2, false);
    let mut values = Vec::new();
    let err = copy_list_values(&array, 3, 0, &mut values)
        .expect_err("incorrect lengths must be rejected");
    assert!(matches!(
        err,
        DenseMatrixProviderError::InvalidRowLength {
            row: 0,
            expected: 3,
            actual: 2
        }
    ));
}
