use crate::analysis::coordinate::{dms_to_decimal, to_decimal_degrees, GeoCoordinate};
use crate::exif::errors::MetaError;
use crate::exif::value::{Rational, TagValue};

fn rationals(values: &[(i64, i64)]) -> Vec<TagValue> {
    values.iter().map(|&(n, d)| TagValue::Rational(Rational::new(n, d))).collect()
}

#[test]
fn test_dms_to_decimal() {
    assert_eq!(dms_to_decimal(10.0, 0.0, 0.0), 10.0);
    assert!((dms_to_decimal(40.0, 26.0, 46.0) - 40.446111).abs() < 1e-6);
    assert!((dms_to_decimal(0.0, 30.0, 36.0) - 0.51).abs() < 1e-12);
}

#[test]
fn test_mixed_component_types() {
    let components = vec![
        TagValue::Integer(12),
        TagValue::Rational(Rational::new(30, 1)),
        TagValue::Float(36.0),
    ];
    assert!((to_decimal_degrees(&components).unwrap() - 12.51).abs() < 1e-12);
}

#[test]
fn test_rational_seconds() {
    let value = to_decimal_degrees(&rationals(&[(151, 1), (12, 1), (360, 10)])).unwrap();
    assert!((value - 151.21).abs() < 1e-9);
}

#[test]
fn test_too_few_components() {
    let result = to_decimal_degrees(&rationals(&[(1, 1), (2, 1)]));
    assert!(matches!(result, Err(MetaError::FormatError(_))));
}

#[test]
fn test_non_numeric_components() {
    let text = vec![TagValue::Text("10".to_string()), TagValue::Integer(0), TagValue::Integer(0)];
    assert!(matches!(to_decimal_degrees(&text), Err(MetaError::FormatError(_))));

    let zero_denominator = rationals(&[(10, 1), (5, 0), (0, 1)]);
    assert!(matches!(to_decimal_degrees(&zero_denominator), Err(MetaError::FormatError(_))));
}

#[test]
fn test_negative_component() {
    let negative = vec![TagValue::Integer(-10), TagValue::Integer(0), TagValue::Integer(0)];
    assert!(matches!(to_decimal_degrees(&negative), Err(MetaError::FormatError(_))));
}

#[test]
fn test_coordinate_range_and_display() {
    let point = GeoCoordinate::new(-33.865, 151.21);
    assert!(point.is_in_range());
    assert_eq!(point.to_string(), "-33.865,151.21");
    assert!(!GeoCoordinate::new(91.0, 0.0).is_in_range());
}
