//! Bulk overwrite of the target table from a RecordBatch

use super::Warehouse;
use crate::error::{Error, Result};
use crate::table::cell_to_json;
use crate::types::JsonValue;
use arrow::array::{Array, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use duckdb::params_from_iter;
use duckdb::types::Value as SqlValue;

impl Warehouse {
    /// Replace the target table's contents with the batch, in one operation.
    ///
    /// The table is re-created from the batch's own schema before the rows
    /// are appended, so the batch's column names (firstName/lastName) win
    /// over any previously provisioned layout (first_name/last_name). All
    /// rows land inside a single transaction.
    pub fn overwrite_table(&self, schema: &str, table: &str, batch: &RecordBatch) -> Result<usize> {
        let columns: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|field| format!("\"{}\" {}", field.name(), sql_type(field.data_type())))
            .collect();

        let create_sql = format!(
            "CREATE OR REPLACE TABLE {schema}.{table} ({});",
            columns.join(", ")
        );
        self.conn()
            .execute_batch(&create_sql)
            .map_err(|e| Error::warehouse(format!("Failed to replace table '{table}': {e}")))?;

        self.conn()
            .execute_batch("BEGIN TRANSACTION;")
            .map_err(|e| Error::warehouse(format!("Failed to begin transaction: {e}")))?;

        match self.append_rows(schema, table, batch) {
            Ok(rows) => {
                self.conn()
                    .execute_batch("COMMIT;")
                    .map_err(|e| Error::warehouse(format!("Failed to commit load: {e}")))?;
                Ok(rows)
            }
            Err(e) => {
                let _ = self.conn().execute_batch("ROLLBACK;");
                Err(e)
            }
        }
    }

    fn append_rows(&self, schema: &str, table: &str, batch: &RecordBatch) -> Result<usize> {
        let placeholders = vec!["?"; batch.num_columns()].join(", ");
        let insert_sql = format!("INSERT INTO {schema}.{table} VALUES ({placeholders});");

        let mut stmt = self
            .conn()
            .prepare(&insert_sql)
            .map_err(|e| Error::warehouse(format!("Failed to prepare insert: {e}")))?;

        for row in 0..batch.num_rows() {
            let params: Vec<SqlValue> = batch
                .columns()
                .iter()
                .map(|column| sql_value(column.as_ref(), row))
                .collect::<Result<_>>()?;

            stmt.execute(params_from_iter(params))
                .map_err(|e| Error::warehouse(format!("Failed to insert row {row}: {e}")))?;
        }

        Ok(batch.num_rows())
    }
}

/// SQL column type for an Arrow data type
fn sql_type(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Boolean => "BOOLEAN",
        DataType::Int64 => "BIGINT",
        DataType::Float64 => "DOUBLE",
        DataType::Date32 => "DATE",
        // Struct cells land as JSON text; everything else is a string anyway
        _ => "VARCHAR",
    }
}

/// SQL parameter value for one array element
fn sql_value(array: &dyn Array, row: usize) -> Result<SqlValue> {
    if array.is_null(row) {
        return Ok(SqlValue::Null);
    }

    match array.data_type() {
        DataType::Boolean => {
            let arr = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| Error::warehouse("Failed to downcast to BooleanArray"))?;
            Ok(SqlValue::Boolean(arr.value(row)))
        }

        DataType::Int64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| Error::warehouse("Failed to downcast to Int64Array"))?;
            Ok(SqlValue::BigInt(arr.value(row)))
        }

        DataType::Float64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| Error::warehouse("Failed to downcast to Float64Array"))?;
            Ok(SqlValue::Double(arr.value(row)))
        }

        DataType::Date32 => {
            let arr = array
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| Error::warehouse("Failed to downcast to Date32Array"))?;
            Ok(SqlValue::Date32(arr.value(row)))
        }

        DataType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| Error::warehouse("Failed to downcast to StringArray"))?;
            Ok(SqlValue::Text(arr.value(row).to_string()))
        }

        // Struct (and anything else) goes in as its JSON text
        _ => {
            let rendered = match cell_to_json(array, row)? {
                JsonValue::String(s) => s,
                other => other.to_string(),
            };
            Ok(SqlValue::Text(rendered))
        }
    }
}
