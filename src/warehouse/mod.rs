//! Warehouse access via DuckDB
//!
//! One connection per run: opened at pipeline start, dropped at the end.

mod provision;
mod writer;

use crate::error::{Error, Result};
use duckdb::Connection;

/// Warehouse connection wrapper
pub struct Warehouse {
    /// DuckDB connection
    conn: Connection,
    /// Database file (for logging)
    path: String,
}

impl Warehouse {
    /// Open (or create) the warehouse database file.
    ///
    /// `:memory:` opens an in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(|e| Error::warehouse(format!("Failed to open warehouse {path}: {e}")))?;

        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Test the warehouse connection
    pub fn check(&self) -> Result<()> {
        self.conn
            .execute("SELECT 1", [])
            .map_err(|e| Error::warehouse(format!("Connection check failed: {e}")))?;
        Ok(())
    }

    /// Database file backing this connection
    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let warehouse = Warehouse::open(":memory:").unwrap();
        assert!(warehouse.check().is_ok());
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wh.duckdb");
        let warehouse = Warehouse::open(path.to_str().unwrap()).unwrap();
        assert!(warehouse.check().is_ok());
        assert!(path.exists());
    }
}
