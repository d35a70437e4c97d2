//! Tabular materializer
//!
//! Turns a flat list of JSON records into an Arrow `RecordBatch` with an
//! inferred schema. Strings shaped `YYYY-MM-DD` infer as `Date32` (the
//! warehouse layout carries DATE columns); mixed int/float promotes to
//! Float64; otherwise conflicting types degrade to Utf8.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, NullArray, StringArray,
    StructArray,
};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

/// Days from 1 CE to the unix epoch (1970-01-01)
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Infer an Arrow schema from a set of JSON records.
///
/// Fields are ordered by first appearance across the record list and are all
/// nullable; a field missing from some records simply yields null slots.
pub fn infer_schema(records: &[JsonValue]) -> Result<Schema> {
    let mut order: Vec<String> = Vec::new();
    let mut field_types: HashMap<String, DataType> = HashMap::new();

    for record in records {
        if let JsonValue::Object(obj) = record {
            for (key, value) in obj {
                let inferred = infer_type(value);
                match field_types.get_mut(key) {
                    Some(existing) => *existing = merge_types(existing, &inferred),
                    None => {
                        order.push(key.clone());
                        field_types.insert(key.clone(), inferred);
                    }
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let dtype = field_types.remove(&name).unwrap_or(DataType::Null);
            Field::new(name, dtype, true)
        })
        .collect();

    Ok(Schema::new(fields))
}

/// Materialize JSON records into a `RecordBatch` with an inferred schema
pub fn records_to_batch(records: &[JsonValue]) -> Result<RecordBatch> {
    let schema = infer_schema(records)?;

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema)));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&JsonValue>> = records
            .iter()
            .map(|record| match record {
                JsonValue::Object(obj) => obj.get(field.name()),
                _ => None,
            })
            .collect();

        columns.push(build_column(&values, field.data_type())?);
    }

    RecordBatch::try_new(Arc::new(schema), columns).map_err(Error::from)
}

/// Render the first `rows` rows of a batch as an aligned table
pub fn batch_preview(batch: &RecordBatch, rows: usize) -> Result<String> {
    let slice = batch.slice(0, rows.min(batch.num_rows()));
    let rendered = arrow::util::pretty::pretty_format_batches(&[slice])?;
    Ok(rendered.to_string())
}

/// Infer an Arrow DataType from one JSON value
fn infer_type(value: &JsonValue) -> DataType {
    match value {
        JsonValue::Null => DataType::Null,
        JsonValue::Bool(_) => DataType::Boolean,
        JsonValue::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        JsonValue::String(s) => {
            if DATE_SHAPE.is_match(s) {
                DataType::Date32
            } else {
                DataType::Utf8
            }
        }
        // Arrays degrade to their JSON text; the record shape here is flat
        // objects with nested structs, not list-valued fields.
        JsonValue::Array(_) => DataType::Utf8,
        JsonValue::Object(obj) => {
            let fields: Vec<Field> = obj
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

/// Merge two inferred types into one compatible column type
fn merge_types(left: &DataType, right: &DataType) -> DataType {
    match (left, right) {
        (a, b) if a == b => a.clone(),

        // Null merges with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        // Mixed numbers promote to Float64
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        // Structs merge field-wise (union of child fields)
        (DataType::Struct(a), DataType::Struct(b)) => merge_struct_types(a, b),

        // A column with both date-shaped and free-form strings is a string
        // column; any other conflict also degrades to Utf8.
        _ => DataType::Utf8,
    }
}

fn merge_struct_types(left: &Fields, right: &Fields) -> DataType {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, DataType> = HashMap::new();

    for field in left.iter().chain(right.iter()) {
        match merged.get_mut(field.name()) {
            Some(existing) => *existing = merge_types(existing, field.data_type()),
            None => {
                order.push(field.name().clone());
                merged.insert(field.name().clone(), field.data_type().clone());
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let dtype = merged.remove(&name).unwrap_or(DataType::Null);
            Field::new(name, dtype, true)
        })
        .collect();

    DataType::Struct(Fields::from(fields))
}

/// Build one Arrow column from per-record JSON values
fn build_column(values: &[Option<&JsonValue>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(JsonValue::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(JsonValue::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values
                .iter()
                .map(|v| v.and_then(|v| v.as_f64().or_else(|| v.as_i64().map(|i| i as f64))))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Date32 => {
            let arr: Date32Array = values
                .iter()
                .map(|v| v.and_then(JsonValue::as_str).and_then(parse_date_days))
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.map(|v| match v {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Struct(fields) => build_struct_column(values, fields),

        other => Err(Error::normalize(format!(
            "unsupported column type {other:?}"
        ))),
    }
}

/// Build a struct column from JSON objects
fn build_struct_column(values: &[Option<&JsonValue>], fields: &Fields) -> Result<ArrayRef> {
    let mut children: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&JsonValue>> = values
            .iter()
            .map(|v| {
                v.and_then(|v| match v {
                    JsonValue::Object(obj) => obj.get(field.name()),
                    _ => None,
                })
            })
            .collect();

        children.push(build_column(&child_values, field.data_type())?);
    }

    Ok(Arc::new(StructArray::new(fields.clone(), children, None)))
}

/// Days since the unix epoch for a `YYYY-MM-DD` string, None if unparseable
fn parse_date_days(s: &str) -> Option<i32> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
}

/// Convert a single array element back to JSON.
///
/// The sink uses this to render struct cells as JSON text; previews and tests
/// use it to read batches back.
pub fn cell_to_json(array: &dyn arrow::array::Array, row: usize) -> Result<JsonValue> {
    use arrow::array::Array;

    if array.is_null(row) {
        return Ok(JsonValue::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(JsonValue::Null),

        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(array, "BooleanArray")?;
            Ok(JsonValue::Bool(arr.value(row)))
        }

        DataType::Int64 => {
            let arr = downcast::<Int64Array>(array, "Int64Array")?;
            Ok(JsonValue::Number(arr.value(row).into()))
        }

        DataType::Float64 => {
            let arr = downcast::<Float64Array>(array, "Float64Array")?;
            Ok(serde_json::Number::from_f64(arr.value(row)).map_or(JsonValue::Null, JsonValue::Number))
        }

        DataType::Date32 => {
            let arr = downcast::<Date32Array>(array, "Date32Array")?;
            let days = arr.value(row);
            let rendered = NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| days.to_string());
            Ok(JsonValue::String(rendered))
        }

        DataType::Utf8 => {
            let arr = downcast::<StringArray>(array, "StringArray")?;
            Ok(JsonValue::String(arr.value(row).to_string()))
        }

        DataType::Struct(_) => {
            let arr = downcast::<StructArray>(array, "StructArray")?;
            let mut obj = serde_json::Map::new();
            for (i, field) in arr.fields().iter().enumerate() {
                let value = cell_to_json(arr.column(i).as_ref(), row)?;
                obj.insert(field.name().clone(), value);
            }
            Ok(JsonValue::Object(obj))
        }

        other => Err(Error::normalize(format!(
            "unsupported cell type {other:?}"
        ))),
    }
}

fn downcast<'a, T: 'static>(
    array: &'a dyn arrow::array::Array,
    name: &str,
) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::normalize(format!("Failed to downcast to {name}")))
}
