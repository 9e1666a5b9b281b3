//! Database connection and query execution.

use serde::de::DeserializeOwned;

use crate::{DbError, QueryResult, Row, Value};

/// SQLite database handle.
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct Db {
    #[cfg(target_arch = "wasm32")]
    conn: std::rc::Rc<spin_sdk::sqlite::Connection>,
    #[cfg(not(target_arch = "wasm32"))]
    conn: std::sync::Arc<std::sync::Mutex<rusqlite::Connection>>,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").finish_non_exhaustive()
    }
}

#[cfg(target_arch = "wasm32")]
mod spin_backend {
    use spin_sdk::sqlite;

    use super::*;

    fn to_spin(value: &Value) -> sqlite::Value {
        match value {
            Value::Null => sqlite::Value::Null,
            Value::Integer(i) => sqlite::Value::Integer(*i),
            Value::Real(f) => sqlite::Value::Real(*f),
            Value::Text(s) => sqlite::Value::Text(s.clone()),
            Value::Blob(b) => sqlite::Value::Blob(b.clone()),
        }
    }

    fn from_spin(value: &sqlite::Value) -> Value {
        match value {
            sqlite::Value::Null => Value::Null,
            sqlite::Value::Integer(i) => Value::Integer(*i),
            sqlite::Value::Real(f) => Value::Real(*f),
            sqlite::Value::Text(s) => Value::Text(s.clone()),
            sqlite::Value::Blob(b) => Value::Blob(b.clone()),
        }
    }

    impl Db {
        /// Open the component's default SQLite database.
        pub fn open_default() -> Result<Self, DbError> {
            let conn = sqlite::Connection::open_default()
                .map_err(|e| DbError::OpenError(e.to_string()))?;
            Ok(Self {
                conn: std::rc::Rc::new(conn),
            })
        }

        /// Open a SQLite database by its Spin label.
        pub fn open(label: &str) -> Result<Self, DbError> {
            let conn =
                sqlite::Connection::open(label).map_err(|e| DbError::OpenError(e.to_string()))?;
            Ok(Self {
                conn: std::rc::Rc::new(conn),
            })
        }

        /// Run a statement and collect its rows.
        pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
            let params: Vec<sqlite::Value> = params.iter().map(to_spin).collect();
            let result = self
                .conn
                .execute(sql, params.as_slice())
                .map_err(|e| DbError::QueryError(e.to_string()))?;

            let columns = result.columns.clone();
            let rows = result
                .rows
                .iter()
                .map(|row| Row::new(columns.clone(), row.values.iter().map(from_spin).collect()))
                .collect();
            Ok(QueryResult::new(columns, rows))
        }

        /// Run a statement that returns no rows.
        pub fn execute(&self, sql: &str, params: &[Value]) -> Result<(), DbError> {
            self.query(sql, params).map(|_| ())
        }

        /// Run several `;`-separated statements without parameters.
        ///
        /// Statements are split naively, so string literals must not
        /// contain semicolons.
        pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
            sql.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .try_for_each(|statement| self.execute(statement, &[]))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_backend {
    use std::sync::{Arc, Mutex, MutexGuard};

    use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
    use rusqlite::{params_from_iter, Connection};

    use super::*;

    impl ToSql for Value {
        fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
            Ok(ToSqlOutput::Borrowed(match self {
                Value::Null => ValueRef::Null,
                Value::Integer(i) => ValueRef::Integer(*i),
                Value::Real(f) => ValueRef::Real(*f),
                Value::Text(s) => ValueRef::Text(s.as_bytes()),
                Value::Blob(b) => ValueRef::Blob(b),
            }))
        }
    }

    fn from_ref(value: ValueRef<'_>) -> Value {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }

    impl Db {
        fn wrap(conn: Connection) -> Self {
            Self {
                conn: Arc::new(Mutex::new(conn)),
            }
        }

        /// Open (or create) a SQLite file.
        pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, DbError> {
            let path = path.as_ref();
            let conn = Connection::open(path)
                .map_err(|e| DbError::OpenError(format!("{}: {}", path.display(), e)))?;
            Ok(Self::wrap(conn))
        }

        /// Open a private in-memory database.
        pub fn open_in_memory() -> Result<Self, DbError> {
            let conn =
                Connection::open_in_memory().map_err(|e| DbError::OpenError(e.to_string()))?;
            Ok(Self::wrap(conn))
        }

        fn lock(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
            self.conn
                .lock()
                .map_err(|_| DbError::QueryError("connection lock poisoned".to_string()))
        }

        /// Run a statement and collect its rows.
        pub fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
            let conn = self.lock()?;
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let mut rows = stmt.query(params_from_iter(params.iter()))?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let values = (0..columns.len())
                    .map(|i| row.get_ref(i).map(from_ref))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push(Row::new(columns.clone(), values));
            }

            Ok(QueryResult::new(columns, out))
        }

        /// Run a statement that returns no rows.
        pub fn execute(&self, sql: &str, params: &[Value]) -> Result<(), DbError> {
            self.lock()?
                .execute(sql, params_from_iter(params.iter()))?;
            Ok(())
        }

        /// Run several `;`-separated statements without parameters.
        pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
            self.lock()?.execute_batch(sql)?;
            Ok(())
        }
    }
}

impl Db {
    /// Run a query and deserialize every row.
    pub fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError> {
        self.query(sql, params)?.deserialize_all()
    }

    /// Run a query that must return at least one row.
    pub fn query_one<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<T, DbError> {
        self.query_optional(sql, params)?.ok_or(DbError::NotFound)
    }

    /// Run a query and deserialize its first row, if any.
    pub fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        self.query(sql, params)?.deserialize_first()
    }

    /// Run several queries in order, stopping at the first failure.
    pub fn batch(&self, statements: &[(&str, &[Value])]) -> Result<Vec<QueryResult>, DbError> {
        statements
            .iter()
            .map(|(sql, params)| self.query(sql, params))
            .collect()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::params;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Shipper {
        id: i64,
        company_name: String,
        phone: Option<String>,
    }

    fn db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE Shipper (Id INTEGER PRIMARY KEY, CompanyName TEXT NOT NULL, Phone TEXT);
             INSERT INTO Shipper VALUES (1, 'Speedy Express', '(503) 555-9831');
             INSERT INTO Shipper VALUES (2, 'United Package', NULL);",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_query_as_with_limit_offset() {
        let db = db();
        let shippers: Vec<Shipper> = db
            .query_as(
                "SELECT Id, CompanyName, Phone FROM Shipper ORDER BY Id LIMIT ?1 OFFSET ?2",
                params![20, 0],
            )
            .unwrap();
        assert_eq!(shippers.len(), 2);
        assert_eq!(shippers[1].phone, None);
    }

    #[test]
    fn test_query_optional_and_one() {
        let db = db();
        let sql = "SELECT Id, CompanyName, Phone FROM Shipper WHERE Id = ?1";
        let found: Option<Shipper> = db.query_optional(sql, params![1]).unwrap();
        assert_eq!(found.unwrap().company_name, "Speedy Express");

        let missing: Option<Shipper> = db.query_optional(sql, params![99]).unwrap();
        assert!(missing.is_none());
        assert!(matches!(
            db.query_one::<Shipper>(sql, params![99]),
            Err(DbError::NotFound)
        ));
    }

    #[test]
    fn test_execute_and_raw_query() {
        let db = db();
        db.execute(
            "INSERT INTO Shipper (Id, CompanyName) VALUES (?1, ?2)",
            params![3, "Federal Shipping"],
        )
        .unwrap();
        let result = db.query("SELECT COUNT(*) AS n FROM Shipper", params![]).unwrap();
        assert_eq!(result.columns, vec!["n"]);
        assert_eq!(result.first().and_then(|r| r.get("n")).and_then(Value::as_integer), Some(3));
    }

    #[test]
    fn test_batch_runs_in_order() {
        let db = db();
        let by_id: &[Value] = params![2];
        let results = db
            .batch(&[
                ("SELECT CompanyName FROM Shipper WHERE Id = ?1", by_id),
                ("SELECT COUNT(*) AS n FROM Shipper", params![]),
            ])
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].first().and_then(|r| r.get("CompanyName")).and_then(Value::as_text),
            Some("United Package")
        );
    }

    #[test]
    fn test_bad_sql_is_query_error() {
        let db = db();
        let err = db.query("SELECT * FROM Nope", params![]).unwrap_err();
        assert!(matches!(err, DbError::QueryError(_)));
    }

    #[test]
    fn test_clones_share_connection() {
        let db = db();
        let other = db.clone();
        other.execute("DELETE FROM Shipper", params![]).unwrap();
        assert!(db.query("SELECT Id FROM Shipper", params![]).unwrap().is_empty());
    }
}
