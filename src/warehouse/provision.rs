//! Idempotent schema and table provisioning

use super::Warehouse;
use crate::error::{Error, Result};

impl Warehouse {
    /// Ensure the target schema and table exist.
    ///
    /// Both statements are create-if-absent, so provisioning an already
    /// provisioned warehouse is a no-op.
    pub fn provision(&self, schema: &str, table: &str) -> Result<()> {
        let schema_sql = format!("CREATE SCHEMA IF NOT EXISTS {schema};");
        self.conn()
            .execute_batch(&schema_sql)
            .map_err(|e| Error::warehouse(format!("Failed to create schema '{schema}': {e}")))?;

        let table_sql = format!(
            "CREATE TABLE IF NOT EXISTS {schema}.{table} (
                dob DATE,
                email VARCHAR PRIMARY KEY,
                gender VARCHAR,
                location VARCHAR,
                phone VARCHAR,
                registered DATE,
                first_name VARCHAR,
                last_name VARCHAR
            );"
        );
        self.conn().execute_batch(&table_sql).map_err(|e| {
            Error::warehouse(format!(
                "Failed to create table '{table}' in schema '{schema}': {e}"
            ))
        })?;

        Ok(())
    }
}
