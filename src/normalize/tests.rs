//! Tests for the normalization module

use super::*;
use crate::table::{cell_to_json, records_to_batch};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn name(first: Option<&str>, last: Option<&str>) -> NameFields {
    NameFields {
        first: first.map(String::from),
        last: last.map(String::from),
    }
}

fn location(
    street: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    postcode: Option<&str>,
    country: Option<&str>,
) -> LocationFields {
    LocationFields {
        street: street.map(String::from),
        city: city.map(String::from),
        state: state.map(String::from),
        postcode: postcode.map(String::from),
        country: country.map(String::from),
    }
}

// ============================================================================
// Name Extraction Tests
// ============================================================================

#[test]
fn test_first_name_present() {
    assert_eq!(first_name(&name(Some("Jo"), Some("Li"))), "Jo");
}

#[test]
fn test_first_name_absent() {
    assert_eq!(first_name(&name(None, Some("Li"))), "");
}

#[test]
fn test_last_name_present() {
    assert_eq!(last_name(&name(Some("Jo"), Some("Li"))), "Li");
}

#[test]
fn test_last_name_absent() {
    assert_eq!(last_name(&name(Some("Jo"), None)), "");
}

#[test]
fn test_name_extraction_on_empty_mapping() {
    let empty = NameFields::default();
    assert_eq!(first_name(&empty), "");
    assert_eq!(last_name(&empty), "");
}

// ============================================================================
// Location Formatting Tests
// ============================================================================

#[test]
fn test_format_location_all_present() {
    let loc = location(Some("1 Rd"), Some("X"), Some("Y"), Some("000"), Some("Z"));
    assert_eq!(format_location(&loc).unwrap(), "1 Rd, X, Y, 000, Z");
}

#[test]
fn test_format_location_street_defaults_to_empty() {
    let loc = location(None, Some("city"), Some("state"), Some("postcode"), Some("country"));
    assert_eq!(
        format_location(&loc).unwrap(),
        ", city, state, postcode, country"
    );
}

#[test_case(location(Some("s"), None, Some("st"), Some("pc"), Some("c")), "city")]
#[test_case(location(Some("s"), Some("ci"), None, Some("pc"), Some("c")), "state")]
#[test_case(location(Some("s"), Some("ci"), Some("st"), None, Some("c")), "postcode")]
#[test_case(location(Some("s"), Some("ci"), Some("st"), Some("pc"), None), "country")]
fn test_format_location_missing_required_field(loc: LocationFields, expected: &str) {
    let err = format_location(&loc).unwrap_err();
    assert!(matches!(err, crate::error::Error::MissingField { ref field } if field == expected));
}

// ============================================================================
// Phone Normalization Tests
// ============================================================================

#[test_case("", ""; "empty input")]
#[test_case("+1 (555) 123-4567", "15551234567"; "formatted us number")]
#[test_case("(12) 34-56", "123456"; "parenthesized")]
#[test_case("011-962-7516", "0119627516"; "dashed")]
#[test_case("no digits at all", ""; "letters only")]
#[test_case("12345", "12345"; "already digits")]
fn test_digits_only(input: &str, expected: &str) {
    assert_eq!(digits_only(input), expected);
}

#[test]
fn test_digits_only_preserves_order() {
    assert_eq!(digits_only("9a8b7c"), "987");
}

// ============================================================================
// Batch Normalization Tests
// ============================================================================

fn sample_record() -> serde_json::Value {
    json!({
        "dob": "1993-07-20",
        "email": "jo.li@example.com",
        "gender": "female",
        "location": {
            "street": "1 Rd",
            "city": "X",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "name": {"first": "Jo", "last": "Li"},
        "phone": "(12) 34-56",
        "registered": "2016-03-01"
    })
}

#[test]
fn test_normalize_batch_end_to_end() {
    let batch = records_to_batch(&[sample_record()]).unwrap();
    let normalized = normalize_batch(&batch).unwrap();

    assert!(normalized.column_by_name("name").is_none());

    let row: Vec<(String, serde_json::Value)> = normalized
        .schema()
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            (
                f.name().clone(),
                cell_to_json(normalized.column(i).as_ref(), 0).unwrap(),
            )
        })
        .collect();
    let row: serde_json::Map<String, serde_json::Value> = row.into_iter().collect();

    assert_eq!(row["firstName"], json!("Jo"));
    assert_eq!(row["lastName"], json!("Li"));
    assert_eq!(row["location"], json!("1 Rd, X, Y, 000, Z"));
    assert_eq!(row["phone"], json!("123456"));
    // Passthrough fields untouched
    assert_eq!(row["email"], json!("jo.li@example.com"));
    assert_eq!(row["gender"], json!("female"));
    assert_eq!(row["dob"], json!("1993-07-20"));
    assert_eq!(row["registered"], json!("2016-03-01"));
}

#[test]
fn test_normalize_batch_column_layout() {
    let batch = records_to_batch(&[sample_record()]).unwrap();
    let normalized = normalize_batch(&batch).unwrap();

    let schema = normalized.schema();
    let names: Vec<&str> = schema
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();

    // Passthrough order preserved, name dropped, derived columns appended
    assert_eq!(
        names,
        vec![
            "dob",
            "email",
            "gender",
            "location",
            "phone",
            "registered",
            "firstName",
            "lastName"
        ]
    );
}

#[test]
fn test_normalize_batch_is_idempotent_projection() {
    let records = vec![sample_record(), sample_record()];
    let batch = records_to_batch(&records).unwrap();

    let once = normalize_batch(&batch).unwrap();
    let twice = normalize_batch(&batch).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_normalize_batch_missing_name_key_yields_empty_strings() {
    let record = json!({
        "name": {"last": "Li"},
        "location": {
            "street": "1 Rd",
            "city": "X",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "phone": "123"
    });

    let batch = records_to_batch(&[record]).unwrap();
    let normalized = normalize_batch(&batch).unwrap();

    let first = normalized.column_by_name("firstName").unwrap();
    assert_eq!(cell_to_json(first.as_ref(), 0).unwrap(), json!(""));
    let last = normalized.column_by_name("lastName").unwrap();
    assert_eq!(cell_to_json(last.as_ref(), 0).unwrap(), json!("Li"));
}

#[test]
fn test_normalize_batch_missing_city_fails() {
    let record = json!({
        "name": {"first": "Jo", "last": "Li"},
        "location": {
            "street": "1 Rd",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "phone": "123"
    });

    let batch = records_to_batch(&[record]).unwrap();
    let err = normalize_batch(&batch).unwrap_err();
    assert!(matches!(err, crate::error::Error::MissingField { ref field } if field == "city"));
}

#[test]
fn test_normalize_batch_numeric_postcode() {
    let record = json!({
        "name": {"first": "Jo", "last": "Li"},
        "location": {
            "street": "1 Rd",
            "city": "X",
            "state": "Y",
            "postcode": 90210,
            "country": "Z"
        },
        "phone": "123"
    });

    let batch = records_to_batch(&[record]).unwrap();
    let normalized = normalize_batch(&batch).unwrap();

    let loc = normalized.column_by_name("location").unwrap();
    assert_eq!(
        cell_to_json(loc.as_ref(), 0).unwrap(),
        json!("1 Rd, X, Y, 90210, Z")
    );
}

#[test]
fn test_normalize_batch_null_phone_becomes_empty() {
    let record = json!({
        "name": {"first": "Jo", "last": "Li"},
        "location": {
            "street": "1 Rd",
            "city": "X",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "phone": null
    });
    let with_phone = json!({
        "name": {"first": "Amy", "last": "Wu"},
        "location": {
            "street": "2 Rd",
            "city": "X",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "phone": "(555) 12"
    });

    let batch = records_to_batch(&[record, with_phone]).unwrap();
    let normalized = normalize_batch(&batch).unwrap();

    let phone = normalized.column_by_name("phone").unwrap();
    assert_eq!(cell_to_json(phone.as_ref(), 0).unwrap(), json!(""));
    assert_eq!(cell_to_json(phone.as_ref(), 1).unwrap(), json!("55512"));
}

#[test]
fn test_normalize_batch_requires_name_column() {
    let record = json!({
        "location": {
            "street": "1 Rd",
            "city": "X",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "phone": "123"
    });

    let batch = records_to_batch(&[record]).unwrap();
    let err = normalize_batch(&batch).unwrap_err();
    assert!(matches!(err, crate::error::Error::Normalize { .. }));
    assert!(err.to_string().contains("name"));
}

#[test]
fn test_normalize_batch_requires_struct_name_column() {
    let record = json!({
        "name": "Jo Li",
        "location": {
            "street": "1 Rd",
            "city": "X",
            "state": "Y",
            "postcode": "000",
            "country": "Z"
        },
        "phone": "123"
    });

    let batch = records_to_batch(&[record]).unwrap();
    let err = normalize_batch(&batch).unwrap_err();
    assert!(matches!(err, crate::error::Error::Normalize { .. }));
}
