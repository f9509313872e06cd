//! SQLite connection provider over rusqlite

use crate::connection::{HistoryConnection, HistoryRow, HistoryTransaction};
use crate::errors::{from_rusqlite, DriverResult};
use rusqlite::types::{Value, ValueRef};
use rusqlite::{Connection, Row, ToSql, Transaction};
use strata_core::dialect::{DatabaseKind, ParamStyle, ParamValue};
use strata_core::model::NewHistoryRow;

/// SQLite-backed [`HistoryConnection`]
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Borrow the underlying connection (for inspection in tests and tools)
    pub fn inner(&self) -> &Connection {
        &self.conn
    }
}

fn to_sql_value(value: ParamValue) -> Value {
    match value {
        ParamValue::Int(i) => Value::Integer(i),
        ParamValue::Text(s) => Value::Text(s),
    }
}

// Column readers degrade type mismatches to None instead of failing the row

fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn int_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn bool_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<bool>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i != 0),
        ValueRef::Text(bytes) => match bytes {
            b"1" | b"true" | b"TRUE" | b"t" => Some(true),
            b"0" | b"false" | b"FALSE" | b"f" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn history_row(row: &Row<'_>) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        installed_rank: int_column(row, 0)?,
        version: text_column(row, 1)?,
        description: text_column(row, 2)?,
        script_type: text_column(row, 3)?,
        script_name: text_column(row, 4)?,
        checksum: text_column(row, 5)?,
        installed_by: text_column(row, 6)?,
        installed_on: text_column(row, 7)?,
        execution_time: int_column(row, 8)?,
        success: bool_column(row, 9)?,
    })
}

impl HistoryConnection for SqliteConnection {
    fn kind(&self) -> DatabaseKind {
        DatabaseKind::Sqlite
    }

    fn execute(&mut self, sql: &str) -> DriverResult<()> {
        self.conn.execute_batch(sql).map_err(from_rusqlite)
    }

    fn query_history(&mut self, sql: &str) -> DriverResult<Vec<HistoryRow>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], history_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    fn transaction(&mut self) -> DriverResult<Box<dyn HistoryTransaction + '_>> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        Ok(Box::new(SqliteTransaction { tx }))
    }
}

struct SqliteTransaction<'conn> {
    tx: Transaction<'conn>,
}

impl HistoryTransaction for SqliteTransaction<'_> {
    fn execute_batch(&mut self, sql: &str) -> DriverResult<()> {
        self.tx.execute_batch(sql).map_err(from_rusqlite)
    }

    fn insert_history(
        &mut self,
        sql: &str,
        row: &NewHistoryRow,
        style: ParamStyle,
    ) -> DriverResult<usize> {
        match style {
            ParamStyle::Named => {
                let named: Vec<(String, Value)> = row
                    .named_params()
                    .into_iter()
                    .map(|(name, value)| (name, to_sql_value(value)))
                    .collect();
                let params: Vec<(&str, &dyn ToSql)> = named
                    .iter()
                    .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
                    .collect();
                self.tx.execute(sql, params.as_slice()).map_err(from_rusqlite)
            }
            ParamStyle::Ordinal | ParamStyle::Positional => {
                let values: Vec<Value> = row
                    .positional_params()
                    .into_iter()
                    .map(to_sql_value)
                    .collect();
                self.tx
                    .execute(sql, rusqlite::params_from_iter(values.iter()))
                    .map_err(from_rusqlite)
            }
        }
    }

    fn commit(self: Box<Self>) -> DriverResult<()> {
        self.tx.commit().map_err(from_rusqlite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn sample_row() -> NewHistoryRow {
        NewHistoryRow {
            installed_rank: 1,
            version: "1".to_string(),
            description: "init".to_string(),
            script_type: "sql".to_string(),
            script_name: "V1__init.sql".to_string(),
            checksum: "abc".to_string(),
            execution_time_ms: 4,
        }
    }

    #[test]
    fn test_uncommitted_transaction_rolls_back() {
        let mut conn = open_in_memory().unwrap();
        {
            let mut tx = conn.transaction().unwrap();
            tx.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
            // dropped without commit
        }
        let rows: i64 = conn
            .inner()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 't'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_named_binding() {
        let mut conn = open_in_memory().unwrap();
        conn.execute("CREATE TABLE h (r INTEGER, v TEXT, d TEXT, ty TEXT, s TEXT, c TEXT, e INTEGER)")
            .unwrap();
        let mut tx = conn.transaction().unwrap();
        let inserted = tx
            .insert_history(
                "INSERT INTO h VALUES (@installed_rank, @version, @description, @type, @script, @checksum, @execution_time)",
                &sample_row(),
                ParamStyle::Named,
            )
            .unwrap();
        tx.commit().unwrap();
        assert_eq!(inserted, 1);

        let script: String = conn
            .inner()
            .query_row("SELECT s FROM h", [], |r| r.get(0))
            .unwrap();
        assert_eq!(script, "V1__init.sql");
    }

    #[test]
    fn test_null_columns_read_as_none() {
        let mut conn = open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE h (a, b, c, d, e, f, g, h, i, j); \
             INSERT INTO h VALUES (NULL, '1', NULL, NULL, NULL, NULL, NULL, NULL, NULL, NULL)",
        )
        .unwrap();

        let rows = conn.query_history("SELECT * FROM h").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].installed_rank, None);
        assert_eq!(rows[0].version.as_deref(), Some("1"));
        assert_eq!(rows[0].success, None);
    }
}
