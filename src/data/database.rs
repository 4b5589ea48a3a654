//! Read-only access to benchmark databases.
//!
//! A [`Database`] is opened per query batch and the connection is released
//! when it goes out of scope, on every exit path. Queries are never retried:
//! the data is static, so a failed query indicates a structural problem.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, Params, Row};
use tracing::debug;

use crate::data::schema::SchemaVersion;
use crate::error::{Error, Result};

/// A read-only handle to one benchmark database file.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open `path` read-only. Fails with [`Error::SourceNotFound`] before
    /// any connection is attempted when the file does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "opened benchmark database");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detect which schema revision this database uses from its column list.
    pub fn schema_version(&self) -> Result<SchemaVersion> {
        let columns =
            self.query_column::<String, _>("SELECT name FROM pragma_table_info('FrameTimes')", [])?;
        SchemaVersion::from_columns(&columns)
    }

    /// Run a query returning the first column of every row.
    pub fn query_column<T, P>(&self, sql: &str, params: P) -> Result<Vec<T>>
    where
        T: rusqlite::types::FromSql,
        P: Params,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map(params, |row| row.get::<_, T>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(values)
    }

    /// Run a query returning exactly one scalar, e.g. a `COUNT(*)`.
    pub fn query_scalar<T, P>(&self, sql: &str, params: P) -> Result<T>
    where
        T: rusqlite::types::FromSql,
        P: Params,
    {
        Ok(self.conn.query_row(sql, params, |row| row.get(0))?)
    }

    /// Run a query whose rows are mapped through `f`.
    pub fn query_rows<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}
