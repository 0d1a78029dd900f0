//! Row and value representation
//!
//! This module provides the engine's value representation as seen by the
//! client, and the row container used by result sets.

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::constants::SqlType;
use crate::types::{Blob, Clob, IntervalDaySecond, IntervalYearMonth, NClob, OffsetTime};

/// A value as held by the engine.
///
/// Parameter buffers and result rows store values in this form; the typed
/// getters on statements and result sets coerce them to the requested Rust
/// type.
///
/// # Example
///
/// ```rust
/// use quarry_client::Value;
///
/// fn describe(value: &Value) -> String {
///     match value {
///         Value::Null => "NULL".to_string(),
///         Value::Integer(i) => format!("integer {}", i),
///         Value::String(s) => format!("string {}", s),
///         other => format!("{}", other),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// NULL value
    #[default]
    Null,
    /// BOOLEAN
    Boolean(bool),
    /// Any exact integral type (TINYINT through BIGINT)
    Integer(i64),
    /// REAL, FLOAT, DOUBLE
    Double(f64),
    /// NUMERIC, DECIMAL
    Decimal(Decimal),
    /// Character string types
    String(String),
    /// Binary string types
    Bytes(Bytes),
    /// DATE
    Date(NaiveDate),
    /// TIME
    Time(NaiveTime),
    /// TIME WITH TIME ZONE
    TimeTz(OffsetTime),
    /// TIMESTAMP
    Timestamp(NaiveDateTime),
    /// TIMESTAMP WITH TIME ZONE
    TimestampTz(DateTime<FixedOffset>),
    /// Year-month interval
    IntervalYearMonth(IntervalYearMonth),
    /// Day-time interval
    IntervalDaySecond(IntervalDaySecond),
    /// CLOB, NCLOB
    Clob(Clob),
    /// BLOB
    Blob(Blob),
    /// ARRAY
    Array(Vec<Value>),
    /// OTHER: engine-serialised object
    Other(Bytes),
}

impl Value {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL type this value naturally belongs to
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Null => SqlType::Null,
            Value::Boolean(_) => SqlType::Boolean,
            Value::Integer(_) => SqlType::BigInt,
            Value::Double(_) => SqlType::Double,
            Value::Decimal(_) => SqlType::Decimal,
            Value::String(_) => SqlType::VarChar,
            Value::Bytes(_) => SqlType::VarBinary,
            Value::Date(_) => SqlType::Date,
            Value::Time(_) => SqlType::Time,
            Value::TimeTz(_) => SqlType::TimeWithTimeZone,
            Value::Timestamp(_) => SqlType::Timestamp,
            Value::TimestampTz(_) => SqlType::TimestampWithTimeZone,
            Value::IntervalYearMonth(_) => SqlType::IntervalYearToMonth,
            Value::IntervalDaySecond(_) => SqlType::IntervalDayToSecond,
            Value::Clob(_) => SqlType::Clob,
            Value::Blob(_) => SqlType::Blob,
            Value::Array(_) => SqlType::Array,
            Value::Other(_) => SqlType::Other,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(v))
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<OffsetTime> for Value {
    fn from(v: OffsetTime) -> Self {
        Value::TimeTz(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::TimestampTz(v)
    }
}

impl From<IntervalYearMonth> for Value {
    fn from(v: IntervalYearMonth) -> Self {
        Value::IntervalYearMonth(v)
    }
}

impl From<IntervalDaySecond> for Value {
    fn from(v: IntervalDaySecond) -> Self {
        Value::IntervalDaySecond(v)
    }
}

impl From<Clob> for Value {
    fn from(v: Clob) -> Self {
        Value::Clob(v)
    }
}

impl From<NClob> for Value {
    fn from(v: NClob) -> Self {
        Value::Clob(v.into())
    }
}

impl From<Blob> for Value {
    fn from(v: Blob) -> Self {
        Value::Blob(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// Renders the value the way the engine casts it to a character string.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(true) => write!(f, "TRUE"),
            Value::Boolean(false) => write!(f, "FALSE"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{}", d),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) | Value::Other(b) => write!(f, "{}", hex::encode(b)),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Value::TimeTz(t) => write!(f, "{}", t),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::TimestampTz(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f%:z")),
            Value::IntervalYearMonth(iv) => write!(f, "{}", iv),
            Value::IntervalDaySecond(iv) => write!(f, "{}", iv),
            Value::Clob(c) => match c.as_str() {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "<freed CLOB>"),
            },
            Value::Blob(b) => match b.as_bytes() {
                Ok(bytes) => write!(f, "{}", hex::encode(bytes)),
                Err(_) => write!(f, "<freed BLOB>"),
            },
            Value::Array(items) => {
                write!(f, "ARRAY[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// A row of data from a query result.
///
/// Values are addressed by 0-based position; result sets translate the
/// 1-based client ordinals before reaching into a row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a new row with values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get the number of columns in this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get all values as a slice
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sql_types() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.sql_type(), SqlType::Null);
        assert_eq!(Value::from(7i16).sql_type(), SqlType::BigInt);
        assert_eq!(Value::from("PUBLIC").sql_type(), SqlType::VarChar);
        assert_eq!(Value::Clob(Clob::new("c")).sql_type(), SqlType::Clob);
        assert_eq!(
            Value::IntervalYearMonth(IntervalYearMonth::from_months(14)).sql_type(),
            SqlType::IntervalYearToMonth
        );
        assert!(!Value::Integer(0).is_null());
    }

    #[test]
    fn test_value_display_scalars() {
        assert_eq!(Value::from("ORDERS").to_string(), "ORDERS");
        assert_eq!(Value::Integer(-42).to_string(), "-42");
        assert_eq!(
            Value::IntervalDaySecond(IntervalDaySecond::from_seconds(90)).to_string(),
            "0 00:01:30"
        );
    }

    #[test]
    fn test_value_boolean_display() {
        assert_eq!(Value::Boolean(true).to_string(), "TRUE");
        assert_eq!(Value::Boolean(false).to_string(), "FALSE");
    }

    #[test]
    fn test_value_display_temporal() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(Value::Date(date).to_string(), "2024-02-29");

        let ts = date.and_hms_milli_opt(13, 5, 9, 250).unwrap();
        assert_eq!(Value::Timestamp(ts).to_string(), "2024-02-29 13:05:09.250");
        assert_eq!(
            Value::Time(NaiveTime::from_hms_opt(8, 0, 0).unwrap()).to_string(),
            "08:00:00"
        );
    }

    #[test]
    fn test_value_display_binary_and_array() {
        assert_eq!(Value::from(vec![0xCAu8, 0xFE]).to_string(), "cafe");
        let arr = Value::Array(vec![Value::Integer(1), Value::Null, Value::from("x")]);
        assert_eq!(arr.to_string(), "ARRAY[1,NULL,x]");
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(Some(5i32)), Value::Integer(5));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(NClob::new("n")), Value::Clob(Clob::new("n")));
    }

    #[test]
    fn test_catalog_row_positions() {
        let row = Row::from(vec![Value::from("PUBLIC"), Value::from("ORDERS"), Value::Null]);

        assert_eq!(row.len(), 3);
        assert!(!row.is_empty());
        assert_eq!(row.get(1), Some(&Value::from("ORDERS")));
        assert_eq!(row.get(2), Some(&Value::Null));
        assert_eq!(row.get(3), None);
        assert_eq!(row.values().len(), 3);
        assert!(Row::default().is_empty());
    }
}
