//! Database values, rows and results.

use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;

use crate::DbError;

/// A SQLite value, used both as a parameter and as a column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// The value as an integer; reals truncate.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form used for row deserialization.
    ///
    /// Non-finite reals become null. Blobs become a string: as-is when they
    /// hold UTF-8, base64 otherwise.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Integer(i) => Json::from(*i),
            Value::Real(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Text(s) => Json::String(s.clone()),
            Value::Blob(b) => match std::str::from_utf8(b) {
                Ok(s) => Json::String(s.to_string()),
                Err(_) => Json::String(base64::engine::general_purpose::STANDARD.encode(b)),
            },
        }
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Integer(i64::from(v))
            }
        })*
    };
}

integer_value!(i32, u32, i64, bool);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A row from a query result.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Deserialize the row into `T`, keyed by column name.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DbError> {
        let map: serde_json::Map<String, Json> = self
            .columns
            .iter()
            .zip(&self.values)
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();

        serde_json::from_value(Json::Object(map))
            .map_err(|e| DbError::DeserializeError(e.to_string()))
    }
}

/// Query result containing rows.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Deserialize all rows.
    pub fn deserialize_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, DbError> {
        self.rows.iter().map(Row::deserialize).collect()
    }

    /// Deserialize the first row, if any.
    pub fn deserialize_first<T: DeserializeOwned>(&self) -> Result<Option<T>, DbError> {
        self.first().map(Row::deserialize).transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Shipper {
        id: i64,
        company_name: String,
        phone: Option<String>,
    }

    fn row(values: Vec<Value>) -> Row {
        Row::new(
            vec!["Id".into(), "CompanyName".into(), "Phone".into()],
            values,
        )
    }

    #[test]
    fn test_row_deserializes_by_column_name() {
        let r = row(vec![
            Value::Integer(1),
            Value::from("Speedy Express"),
            Value::Null,
        ]);
        let shipper: Shipper = r.deserialize().unwrap();
        assert_eq!(
            shipper,
            Shipper {
                id: 1,
                company_name: "Speedy Express".into(),
                phone: None
            }
        );
        assert_eq!(r.get("CompanyName").and_then(Value::as_text), Some("Speedy Express"));
        assert!(r.get("Missing").is_none());
    }

    #[test]
    fn test_type_mismatch_is_deserialize_error() {
        let r = row(vec![Value::from("one"), Value::from("x"), Value::Null]);
        let err = r.deserialize::<Shipper>().unwrap_err();
        assert!(matches!(err, DbError::DeserializeError(_)));
    }

    #[test]
    fn test_blob_to_json() {
        assert_eq!(Value::Blob(b"abc".to_vec()).to_json(), Json::from("abc"));
        assert_eq!(Value::Blob(vec![0xff, 0x00]).to_json(), Json::from("/wA="));
        assert_eq!(Value::Real(f64::NAN).to_json(), Json::Null);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(true), Value::Integer(1));
        assert_eq!(Value::Real(2.9).as_integer(), Some(2));
    }
}
