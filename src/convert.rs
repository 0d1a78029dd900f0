//! Value coercion between engine values and client-requested types
//!
//! Every typed getter and setter funnels through [`convert`], an explicit
//! match over the stored value and the requested [`TargetType`]. Combinations
//! without a rule fail with [`Error::DataConversion`]; numeric narrowing is
//! range checked and truncates toward zero.
//!
//! Values without zone information are interpreted in the session time zone
//! passed as `zone`.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::constants::SqlType;
use crate::error::{Error, Result};
use crate::row::Value;
use crate::types::{Blob, Clob, IntervalDaySecond, IntervalYearMonth, NClob, OffsetTime};

/// Client-side type a value can be requested as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TargetType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    String,
    Bytes,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    IntervalYearMonth,
    IntervalDaySecond,
    Clob,
    Blob,
    Array,
    /// The engine's own representation, unconverted
    Object,
}

impl TargetType {
    /// Target for a declared SQL type
    pub fn for_sql_type(sql_type: SqlType) -> Result<Self> {
        let target = match sql_type {
            SqlType::Bit | SqlType::Boolean => TargetType::Boolean,
            SqlType::TinyInt => TargetType::TinyInt,
            SqlType::SmallInt => TargetType::SmallInt,
            SqlType::Integer => TargetType::Integer,
            SqlType::BigInt => TargetType::BigInt,
            SqlType::Real => TargetType::Real,
            SqlType::Float | SqlType::Double => TargetType::Double,
            SqlType::Numeric | SqlType::Decimal => TargetType::Decimal,
            t if t.is_character() => TargetType::String,
            t if t.is_binary() => TargetType::Bytes,
            SqlType::Date => TargetType::Date,
            SqlType::Time => TargetType::Time,
            SqlType::TimeWithTimeZone => TargetType::TimeTz,
            SqlType::Timestamp => TargetType::Timestamp,
            SqlType::TimestampWithTimeZone => TargetType::TimestampTz,
            t if t.is_year_month_interval() => TargetType::IntervalYearMonth,
            t if t.is_day_time_interval() => TargetType::IntervalDaySecond,
            SqlType::Clob | SqlType::NClob => TargetType::Clob,
            SqlType::Blob => TargetType::Blob,
            SqlType::Array => TargetType::Array,
            SqlType::Null
            | SqlType::Other
            | SqlType::JavaObject
            | SqlType::Distinct
            | SqlType::Struct => TargetType::Object,
            other => return Err(Error::not_supported(other.name())),
        };
        Ok(target)
    }

    /// SQL type a converted value carries
    pub fn sql_type(&self) -> SqlType {
        match self {
            TargetType::Boolean => SqlType::Boolean,
            TargetType::TinyInt => SqlType::TinyInt,
            TargetType::SmallInt => SqlType::SmallInt,
            TargetType::Integer => SqlType::Integer,
            TargetType::BigInt => SqlType::BigInt,
            TargetType::Real => SqlType::Real,
            TargetType::Double => SqlType::Double,
            TargetType::Decimal => SqlType::Decimal,
            TargetType::String => SqlType::VarChar,
            TargetType::Bytes => SqlType::VarBinary,
            TargetType::Date => SqlType::Date,
            TargetType::Time => SqlType::Time,
            TargetType::TimeTz => SqlType::TimeWithTimeZone,
            TargetType::Timestamp => SqlType::Timestamp,
            TargetType::TimestampTz => SqlType::TimestampWithTimeZone,
            TargetType::IntervalYearMonth => SqlType::IntervalYearToMonth,
            TargetType::IntervalDaySecond => SqlType::IntervalDayToSecond,
            TargetType::Clob => SqlType::Clob,
            TargetType::Blob => SqlType::Blob,
            TargetType::Array => SqlType::Array,
            TargetType::Object => SqlType::Other,
        }
    }

    fn integral_bounds(&self) -> Option<(i64, i64)> {
        match self {
            TargetType::TinyInt => Some((i8::MIN as i64, i8::MAX as i64)),
            TargetType::SmallInt => Some((i16::MIN as i64, i16::MAX as i64)),
            TargetType::Integer => Some((i32::MIN as i64, i32::MAX as i64)),
            TargetType::BigInt => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Object => write!(f, "OBJECT"),
            other => write!(f, "{}", other.sql_type().name()),
        }
    }
}

/// Date used when a time of day must become a timestamp
pub fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Convert `value` (stored under SQL type `source`) to `target`.
///
/// The `Value` variant decides the conversion; `source` only refines it
/// where one variant carries several SQL types (a BIT reads as `1`/`0`
/// text rather than `TRUE`/`FALSE`) and names the type in errors.
///
/// NULL converts to NULL for every target.
pub fn convert(value: &Value, source: SqlType, target: TargetType, zone: FixedOffset) -> Result<Value> {
    let fail = || Error::conversion(source, target, value);
    let out_of_range = || Error::NumericOutOfRange {
        target: target.sql_type(),
        value: value.to_string(),
    };
    let bad_format = || Error::InvalidFormat {
        target: target.sql_type(),
        value: value.to_string(),
    };

    let converted = match (target, value) {
        (_, Value::Null) => Value::Null,
        (TargetType::Object, v) => v.clone(),

        // Character strings: every value has a canonical text form
        (TargetType::String, Value::Clob(c)) => Value::String(c.as_str()?.to_string()),
        (TargetType::String, Value::Blob(_) | Value::Array(_)) => return Err(fail()),
        (TargetType::String, Value::Boolean(b)) if source == SqlType::Bit => {
            Value::String(if *b { "1" } else { "0" }.to_string())
        }
        (TargetType::String, v) => Value::String(v.to_string()),

        (TargetType::Boolean, Value::Boolean(b)) => Value::Boolean(*b),
        (TargetType::Boolean, Value::Integer(i)) => Value::Boolean(*i != 0),
        (TargetType::Boolean, Value::Double(d)) => Value::Boolean(*d != 0.0),
        (TargetType::Boolean, Value::Decimal(d)) => Value::Boolean(!d.is_zero()),
        (TargetType::Boolean, Value::String(s)) => match s.trim().to_uppercase().as_str() {
            "TRUE" => Value::Boolean(true),
            "FALSE" => Value::Boolean(false),
            _ => return Err(fail()),
        },

        (TargetType::TinyInt | TargetType::SmallInt | TargetType::Integer | TargetType::BigInt, v) => {
            let n = match v {
                Value::Integer(i) => *i,
                Value::Boolean(b) => *b as i64,
                Value::Double(d) => {
                    let t = d.trunc();
                    if !t.is_finite() || t < i64::MIN as f64 || t >= i64::MAX as f64 {
                        return Err(out_of_range());
                    }
                    t as i64
                }
                Value::Decimal(d) => d.trunc().to_i64().ok_or_else(out_of_range)?,
                Value::String(s) => parse_decimal(s)
                    .ok_or_else(fail)?
                    .trunc()
                    .to_i64()
                    .ok_or_else(out_of_range)?,
                _ => return Err(fail()),
            };
            let (min, max) = target.integral_bounds().ok_or_else(fail)?;
            if n < min || n > max {
                return Err(out_of_range());
            }
            Value::Integer(n)
        }

        (TargetType::Real | TargetType::Double, v) => {
            let d = match v {
                Value::Integer(i) => *i as f64,
                Value::Boolean(b) => *b as i64 as f64,
                Value::Double(d) => *d,
                Value::Decimal(d) => d.to_f64().ok_or_else(out_of_range)?,
                Value::String(s) => s.trim().parse::<f64>().map_err(|_| fail())?,
                _ => return Err(fail()),
            };
            if target == TargetType::Real {
                if d.is_finite() && d.abs() > f32::MAX as f64 {
                    return Err(out_of_range());
                }
                Value::Double(d as f32 as f64)
            } else {
                Value::Double(d)
            }
        }

        (TargetType::Decimal, v) => Value::Decimal(match v {
            Value::Integer(i) => Decimal::from(*i),
            Value::Boolean(b) => Decimal::from(*b as i64),
            Value::Double(d) => Decimal::try_from(*d).map_err(|_| out_of_range())?,
            Value::Decimal(d) => *d,
            Value::String(s) => parse_decimal(s).ok_or_else(fail)?,
            _ => return Err(fail()),
        }),

        (TargetType::Bytes, Value::Bytes(b) | Value::Other(b)) => Value::Bytes(b.clone()),
        (TargetType::Bytes, Value::Blob(b)) => Value::Bytes(Bytes::copy_from_slice(b.as_bytes()?)),
        (TargetType::Bytes, Value::String(s)) => {
            Value::Bytes(Bytes::from(hex::decode(s.trim()).map_err(|_| fail())?))
        }

        (TargetType::Date, Value::Date(d)) => Value::Date(*d),
        (TargetType::Date, Value::Timestamp(ts)) => Value::Date(ts.date()),
        (TargetType::Date, Value::TimestampTz(ts)) => Value::Date(ts.with_timezone(&zone).date_naive()),
        (TargetType::Date, Value::String(s)) => Value::Date(parse_date(s).ok_or_else(bad_format)?),

        (TargetType::Time, Value::Time(t)) => Value::Time(*t),
        (TargetType::Time, Value::Timestamp(ts)) => Value::Time(ts.time()),
        (TargetType::Time, Value::TimeTz(t)) => Value::Time(t.with_offset(zone).time()),
        (TargetType::Time, Value::TimestampTz(ts)) => Value::Time(ts.with_timezone(&zone).time()),
        (TargetType::Time, Value::String(s)) => Value::Time(parse_time(s).ok_or_else(bad_format)?),

        (TargetType::TimeTz, Value::TimeTz(t)) => Value::TimeTz(*t),
        (TargetType::TimeTz, Value::Time(t)) => Value::TimeTz(OffsetTime::new(*t, zone)),
        (TargetType::TimeTz, Value::Timestamp(ts)) => Value::TimeTz(OffsetTime::new(ts.time(), zone)),
        (TargetType::TimeTz, Value::TimestampTz(ts)) => {
            Value::TimeTz(OffsetTime::new(ts.time(), *ts.offset()))
        }
        (TargetType::TimeTz, Value::String(s)) => {
            Value::TimeTz(s.trim().parse::<OffsetTime>().map_err(|_| bad_format())?)
        }

        (TargetType::Timestamp, Value::Timestamp(ts)) => Value::Timestamp(*ts),
        (TargetType::Timestamp, Value::Date(d)) => Value::Timestamp(d.and_time(NaiveTime::MIN)),
        (TargetType::Timestamp, Value::Time(t)) => Value::Timestamp(epoch_date().and_time(*t)),
        (TargetType::Timestamp, Value::TimeTz(t)) => {
            Value::Timestamp(epoch_date().and_time(t.with_offset(zone).time()))
        }
        (TargetType::Timestamp, Value::TimestampTz(ts)) => {
            Value::Timestamp(ts.with_timezone(&zone).naive_local())
        }
        (TargetType::Timestamp, Value::String(s)) => {
            Value::Timestamp(parse_timestamp(s).ok_or_else(bad_format)?)
        }

        (TargetType::TimestampTz, Value::TimestampTz(ts)) => Value::TimestampTz(*ts),
        (TargetType::TimestampTz, Value::Timestamp(ts)) => {
            Value::TimestampTz(in_zone(ts, zone).ok_or_else(fail)?)
        }
        (TargetType::TimestampTz, Value::Date(d)) => {
            Value::TimestampTz(in_zone(&d.and_time(NaiveTime::MIN), zone).ok_or_else(fail)?)
        }
        (TargetType::TimestampTz, Value::String(s)) => {
            let s = s.trim();
            let ts = match DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
                Ok(ts) => ts,
                Err(_) => parse_timestamp(s)
                    .and_then(|ts| in_zone(&ts, zone))
                    .ok_or_else(bad_format)?,
            };
            Value::TimestampTz(ts)
        }

        (TargetType::IntervalYearMonth, Value::IntervalYearMonth(iv)) => Value::IntervalYearMonth(*iv),
        (TargetType::IntervalYearMonth, Value::String(s)) => Value::IntervalYearMonth(s.parse()?),
        (TargetType::IntervalDaySecond, Value::IntervalDaySecond(iv)) => Value::IntervalDaySecond(*iv),
        (TargetType::IntervalDaySecond, Value::String(s)) => Value::IntervalDaySecond(s.parse()?),

        (TargetType::Clob, Value::Clob(c)) => Value::Clob(c.clone()),
        (TargetType::Clob, Value::String(s)) => Value::Clob(Clob::new(s.as_str())),
        (TargetType::Blob, Value::Blob(b)) => Value::Blob(b.clone()),
        (TargetType::Blob, Value::Bytes(b)) => Value::Blob(Blob::new(b.to_vec())),
        (TargetType::Array, Value::Array(items)) => Value::Array(items.clone()),

        _ => return Err(fail()),
    };
    Ok(converted)
}

/// Coerce a client-supplied value to a parameter's declared type
pub fn coerce_for_parameter(value: Value, declared: SqlType, zone: FixedOffset) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match TargetType::for_sql_type(declared)? {
        TargetType::Object => Ok(value),
        target => convert(&value, value.sql_type(), target, zone),
    }
}

/// Convert a stored value to a Rust type; `None` for SQL NULL
pub fn extract<T: FromValue>(value: &Value, source: SqlType, zone: FixedOffset) -> Result<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    T::from_value(convert(value, source, T::TARGET, zone)?).map(Some)
}

/// Round a decimal to `scale` fractional digits, half away from zero
pub fn rescale(mut value: Decimal, scale: u32) -> Decimal {
    value.rescale(scale);
    value
}

/// Whether values of SQL type `from` can be converted to `to`
pub fn is_convertible(from: SqlType, to: SqlType) -> bool {
    if from.is_unsupported() || to.is_unsupported() {
        return false;
    }
    if from == to || from == SqlType::Null {
        return true;
    }

    let numeric_like = |t: SqlType| t.is_numeric() || matches!(t, SqlType::Bit | SqlType::Boolean);

    match (from, to) {
        (f, t) if numeric_like(f) && (numeric_like(t) || t.is_character()) => true,
        (f, t) if f.is_character() => {
            numeric_like(t)
                || t.is_character()
                || t.is_binary()
                || t.is_datetime()
                || t.is_interval()
                || matches!(t, SqlType::Clob | SqlType::NClob)
        }
        (f, t) if t.is_character() => !matches!(f, SqlType::Blob | SqlType::Array),
        (f, t) if f.is_binary() || f == SqlType::Blob => t.is_binary() || t == SqlType::Blob,
        (SqlType::Clob | SqlType::NClob, SqlType::Clob | SqlType::NClob) => true,
        (SqlType::Date, SqlType::Timestamp | SqlType::TimestampWithTimeZone) => true,
        (SqlType::Time, SqlType::Timestamp | SqlType::TimeWithTimeZone) => true,
        (SqlType::TimeWithTimeZone, SqlType::Time | SqlType::Timestamp) => true,
        (SqlType::Timestamp | SqlType::TimestampWithTimeZone, t) => t.is_datetime(),
        (f, t) if f.is_year_month_interval() => t.is_year_month_interval(),
        (f, t) if f.is_day_time_interval() => t.is_day_time_interval(),
        _ => false,
    }
}

fn in_zone(ts: &NaiveDateTime, zone: FixedOffset) -> Option<DateTime<FixedOffset>> {
    zone.from_local_datetime(ts).single()
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S%.f").ok()
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// A Rust type that a stored value can be read as.
///
/// The value is first converted to [`TARGET`](Self::TARGET); `from_value`
/// then unwraps the converted, non-NULL value.
pub trait FromValue: Sized {
    /// Conversion target for this type
    const TARGET: TargetType;

    /// Unwrap a value already converted to [`TARGET`](Self::TARGET)
    fn from_value(value: Value) -> Result<Self>;
}

fn unexpected(value: Value, target: TargetType) -> Error {
    Error::Internal(format!("{:?} is not a converted {} value", value.sql_type(), target))
}

macro_rules! from_value {
    ($ty:ty, $target:ident, $pat:pat => $out:expr) => {
        impl FromValue for $ty {
            const TARGET: TargetType = TargetType::$target;

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    $pat => Ok($out),
                    other => Err(unexpected(other, TargetType::$target)),
                }
            }
        }
    };
}

from_value!(bool, Boolean, Value::Boolean(b) => b);
from_value!(i8, TinyInt, Value::Integer(i) => i as i8);
from_value!(i16, SmallInt, Value::Integer(i) => i as i16);
from_value!(i32, Integer, Value::Integer(i) => i as i32);
from_value!(i64, BigInt, Value::Integer(i) => i);
from_value!(f32, Real, Value::Double(d) => d as f32);
from_value!(f64, Double, Value::Double(d) => d);
from_value!(Decimal, Decimal, Value::Decimal(d) => d);
from_value!(String, String, Value::String(s) => s);
from_value!(Vec<u8>, Bytes, Value::Bytes(b) => b.to_vec());
from_value!(Bytes, Bytes, Value::Bytes(b) => b);
from_value!(NaiveDate, Date, Value::Date(d) => d);
from_value!(NaiveTime, Time, Value::Time(t) => t);
from_value!(OffsetTime, TimeTz, Value::TimeTz(t) => t);
from_value!(NaiveDateTime, Timestamp, Value::Timestamp(ts) => ts);
from_value!(DateTime<FixedOffset>, TimestampTz, Value::TimestampTz(ts) => ts);
from_value!(IntervalYearMonth, IntervalYearMonth, Value::IntervalYearMonth(iv) => iv);
from_value!(IntervalDaySecond, IntervalDaySecond, Value::IntervalDaySecond(iv) => iv);
from_value!(Clob, Clob, Value::Clob(c) => c);
from_value!(NClob, Clob, Value::Clob(c) => NClob::from(c));
from_value!(Blob, Blob, Value::Blob(b) => b);
from_value!(Vec<Value>, Array, Value::Array(items) => items);

impl FromValue for Value {
    const TARGET: TargetType = TargetType::Object;

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn conv(value: Value, target: TargetType) -> Result<Value> {
        let source = value.sql_type();
        convert(&value, source, target, utc())
    }

    #[test]
    fn test_integer_reads_as_every_numeric_type() {
        let v = Value::Integer(42);
        assert_eq!(extract::<i32>(&v, SqlType::Integer, utc()).unwrap(), Some(42));
        assert_eq!(extract::<i64>(&v, SqlType::Integer, utc()).unwrap(), Some(42));
        assert_eq!(extract::<i8>(&v, SqlType::Integer, utc()).unwrap(), Some(42));
        assert_eq!(extract::<f64>(&v, SqlType::Integer, utc()).unwrap(), Some(42.0));
        assert_eq!(
            extract::<Decimal>(&v, SqlType::Integer, utc()).unwrap(),
            Some(Decimal::from(42))
        );
        assert_eq!(
            extract::<String>(&v, SqlType::Integer, utc()).unwrap(),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_null_converts_to_none() {
        assert_eq!(extract::<i32>(&Value::Null, SqlType::Integer, utc()).unwrap(), None);
        assert_eq!(conv(Value::Null, TargetType::Date).unwrap(), Value::Null);
    }

    #[test]
    fn test_integral_range_checks() {
        assert!(matches!(
            conv(Value::Integer(300), TargetType::TinyInt),
            Err(Error::NumericOutOfRange { target: SqlType::TinyInt, .. })
        ));
        assert!(conv(Value::Integer(i64::from(i32::MAX) + 1), TargetType::Integer).is_err());
        assert_eq!(
            conv(Value::Double(-7.9), TargetType::Integer).unwrap(),
            Value::Integer(-7)
        );
        assert_eq!(
            conv(Value::Decimal(Decimal::new(12345, 2)), TargetType::SmallInt).unwrap(),
            Value::Integer(123)
        );
        assert!(conv(Value::Double(f64::NAN), TargetType::BigInt).is_err());
    }

    #[test]
    fn test_string_to_numbers() {
        assert_eq!(conv(Value::from(" 17 "), TargetType::Integer).unwrap(), Value::Integer(17));
        assert_eq!(
            conv(Value::from("1.5e2"), TargetType::Decimal).unwrap(),
            Value::Decimal(Decimal::from(150))
        );
        assert!(matches!(
            conv(Value::from("abc"), TargetType::Integer),
            Err(Error::DataConversion { from: SqlType::VarChar, .. })
        ));
    }

    #[test]
    fn test_boolean_rules() {
        assert_eq!(conv(Value::Boolean(true), TargetType::String).unwrap(), Value::from("TRUE"));
        assert_eq!(conv(Value::Boolean(true), TargetType::Integer).unwrap(), Value::Integer(1));
        assert_eq!(conv(Value::Integer(0), TargetType::Boolean).unwrap(), Value::Boolean(false));
        assert_eq!(conv(Value::from("false"), TargetType::Boolean).unwrap(), Value::Boolean(false));
        assert!(conv(Value::from("maybe"), TargetType::Boolean).is_err());
    }

    #[test]
    fn test_bit_source_reads_as_digit() {
        let bit = convert(&Value::Boolean(true), SqlType::Bit, TargetType::String, utc()).unwrap();
        assert_eq!(bit, Value::from("1"));
        let bit = convert(&Value::Boolean(false), SqlType::Bit, TargetType::String, utc()).unwrap();
        assert_eq!(bit, Value::from("0"));
        let boolean = convert(&Value::Boolean(false), SqlType::Boolean, TargetType::String, utc()).unwrap();
        assert_eq!(boolean, Value::from("FALSE"));
    }

    #[test]
    fn test_bytes_and_hex() {
        let bytes = Value::from(vec![0x0Au8, 0xFF]);
        assert_eq!(conv(bytes.clone(), TargetType::String).unwrap(), Value::from("0aff"));
        assert_eq!(conv(Value::from("0aff"), TargetType::Bytes).unwrap(), bytes);
        assert!(conv(bytes, TargetType::Integer).is_err());
    }

    #[test]
    fn test_temporal_conversions() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let time = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        let ts = date.and_time(time);

        assert_eq!(conv(Value::Timestamp(ts), TargetType::Date).unwrap(), Value::Date(date));
        assert_eq!(conv(Value::Timestamp(ts), TargetType::Time).unwrap(), Value::Time(time));
        assert_eq!(
            conv(Value::Date(date), TargetType::Timestamp).unwrap(),
            Value::Timestamp(date.and_time(NaiveTime::MIN))
        );
        assert_eq!(
            conv(Value::Time(time), TargetType::Timestamp).unwrap(),
            Value::Timestamp(epoch_date().and_time(time))
        );
        assert_eq!(
            conv(Value::from("2024-03-01 12:30:00"), TargetType::Timestamp).unwrap(),
            Value::Timestamp(ts)
        );
        assert!(matches!(
            conv(Value::from("yesterday"), TargetType::Date),
            Err(Error::InvalidFormat { .. })
        ));
        assert!(conv(Value::Date(date), TargetType::Time).is_err());
    }

    #[test]
    fn test_zone_applied_to_zoned_values() {
        let plus2 = FixedOffset::east_opt(2 * 3600).unwrap();
        let utc_ts = utc()
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(23, 0, 0)
                    .unwrap(),
            )
            .unwrap();
        let v = Value::TimestampTz(utc_ts);

        let local = convert(&v, SqlType::TimestampWithTimeZone, TargetType::Timestamp, plus2).unwrap();
        assert_eq!(
            local,
            Value::Timestamp(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(1, 0, 0).unwrap())
        );
        let date = convert(&v, SqlType::TimestampWithTimeZone, TargetType::Date, plus2).unwrap();
        assert_eq!(date, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
    }

    #[test]
    fn test_intervals() {
        assert_eq!(
            conv(Value::from("1-2"), TargetType::IntervalYearMonth).unwrap(),
            Value::IntervalYearMonth(IntervalYearMonth::new(1, 2).unwrap())
        );
        assert_eq!(
            conv(Value::IntervalDaySecond(IntervalDaySecond::from_seconds(90)), TargetType::String)
                .unwrap(),
            Value::from("0 00:01:30")
        );
        assert!(conv(Value::IntervalYearMonth(IntervalYearMonth::new(1, 0).unwrap()), TargetType::IntervalDaySecond).is_err());
        assert!(matches!(
            conv(Value::from("900000000000000000-0"), TargetType::IntervalYearMonth),
            Err(Error::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_lobs() {
        assert_eq!(
            conv(Value::Clob(Clob::new("text")), TargetType::String).unwrap(),
            Value::from("text")
        );
        assert_eq!(
            extract::<NClob>(&Value::from("n"), SqlType::VarChar, utc()).unwrap(),
            Some(NClob::new("n"))
        );
        assert!(conv(Value::Blob(Blob::new(vec![1u8])), TargetType::String).is_err());
    }

    #[test]
    fn test_coerce_for_parameter() {
        assert_eq!(
            coerce_for_parameter(Value::from("5"), SqlType::Integer, utc()).unwrap(),
            Value::Integer(5)
        );
        assert_eq!(
            coerce_for_parameter(Value::Integer(5), SqlType::Other, utc()).unwrap(),
            Value::Integer(5)
        );
        assert!(matches!(
            coerce_for_parameter(Value::Integer(5), SqlType::RowId, utc()),
            Err(Error::FeatureNotSupported(_))
        ));
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(Decimal::new(12345, 3), 2).to_string(), "12.35");
        assert_eq!(rescale(Decimal::from(5), 2).to_string(), "5.00");
    }

    #[test]
    fn test_is_convertible() {
        assert!(is_convertible(SqlType::Integer, SqlType::VarChar));
        assert!(is_convertible(SqlType::VarChar, SqlType::Date));
        assert!(is_convertible(SqlType::Timestamp, SqlType::Date));
        assert!(is_convertible(SqlType::Binary, SqlType::Blob));
        assert!(!is_convertible(SqlType::Date, SqlType::Time));
        assert!(!is_convertible(SqlType::Blob, SqlType::Integer));
        assert!(!is_convertible(SqlType::Integer, SqlType::RowId));
        assert!(!is_convertible(SqlType::IntervalYear, SqlType::IntervalDay));
    }
}
