//! Column-wise normalization over a materialized batch
//!
//! Hosts the scalar operations from the parent module against the `name`
//! and `location` struct columns and the `phone` string column, producing a
//! new batch with `name` dropped, `location` and `phone` replaced in place
//! and `firstName`/`lastName` appended.

use super::{digits_only, first_name, format_location, last_name, LocationFields, NameFields};
use crate::error::{Error, Result};
use crate::table::cell_to_json;
use crate::types::JsonValue;
use arrow::array::{Array, ArrayRef, StringArray, StructArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Apply the four normalization operations across a batch.
///
/// An absent `name`, `location` or `phone` column fails the batch; so does a
/// row whose location is missing any of city/state/postcode/country. The
/// passthrough columns are carried over untouched, in their original order.
pub fn normalize_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let names = struct_column(batch, "name")?;
    let locations = struct_column(batch, "location")?;
    let phones = string_column(batch, "phone")?;

    let rows = batch.num_rows();
    let mut first_out: Vec<String> = Vec::with_capacity(rows);
    let mut last_out: Vec<String> = Vec::with_capacity(rows);
    let mut location_out: Vec<String> = Vec::with_capacity(rows);
    let mut phone_out: Vec<String> = Vec::with_capacity(rows);

    for row in 0..rows {
        let name = NameFields {
            first: struct_field_string(names, "first", row)?,
            last: struct_field_string(names, "last", row)?,
        };
        first_out.push(first_name(&name));
        last_out.push(last_name(&name));

        let location = LocationFields {
            street: struct_field_string(locations, "street", row)?,
            city: struct_field_string(locations, "city", row)?,
            state: struct_field_string(locations, "state", row)?,
            postcode: struct_field_string(locations, "postcode", row)?,
            country: struct_field_string(locations, "country", row)?,
        };
        location_out.push(format_location(&location)?);

        let raw_phone = if phones.is_null(row) {
            ""
        } else {
            phones.value(row)
        };
        phone_out.push(digits_only(raw_phone));
    }

    let location_array: ArrayRef = Arc::new(StringArray::from(location_out));
    let phone_array: ArrayRef = Arc::new(StringArray::from(phone_out));

    let mut fields: Vec<Field> = Vec::new();
    let mut columns: Vec<ArrayRef> = Vec::new();

    for (idx, field) in batch.schema().fields().iter().enumerate() {
        match field.name().as_str() {
            "name" => {}
            "location" => {
                fields.push(Field::new("location", DataType::Utf8, true));
                columns.push(location_array.clone());
            }
            "phone" => {
                fields.push(Field::new("phone", DataType::Utf8, true));
                columns.push(phone_array.clone());
            }
            _ => {
                fields.push(field.as_ref().clone());
                columns.push(batch.column(idx).clone());
            }
        }
    }

    fields.push(Field::new("firstName", DataType::Utf8, true));
    columns.push(Arc::new(StringArray::from(first_out)));
    fields.push(Field::new("lastName", DataType::Utf8, true));
    columns.push(Arc::new(StringArray::from(last_out)));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Error::from)
}

fn struct_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StructArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::normalize(format!("column '{name}' is absent")))?;

    column
        .as_any()
        .downcast_ref::<StructArray>()
        .ok_or_else(|| {
            Error::normalize(format!(
                "column '{name}' is not a struct (got {:?})",
                column.data_type()
            ))
        })
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::normalize(format!("column '{name}' is absent")))?;

    column
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| {
            Error::normalize(format!(
                "column '{name}' is not a string column (got {:?})",
                column.data_type()
            ))
        })
}

/// Read one child field of a struct column as a string, `None` when the slot
/// or the child value is null or the child field does not exist.
///
/// Non-string children (numeric postcodes are common) render through their
/// JSON form.
fn struct_field_string(array: &StructArray, field: &str, row: usize) -> Result<Option<String>> {
    if array.is_null(row) {
        return Ok(None);
    }

    let Some(child) = array.column_by_name(field) else {
        return Ok(None);
    };

    if child.is_null(row) {
        return Ok(None);
    }

    if let Some(strings) = child.as_any().downcast_ref::<StringArray>() {
        return Ok(Some(strings.value(row).to_string()));
    }

    let rendered = match cell_to_json(child.as_ref(), row)? {
        JsonValue::String(s) => s,
        other => other.to_string(),
    };
    Ok(Some(rendered))
}
