//! Engine and client API constants
//!
//! This module contains the type codes, parameter modes, error codes and
//! fixed limits shared by the statement, result set and metadata layers.

// =============================================================================
// SQL Types
// =============================================================================

/// SQL data type codes as exchanged with the engine.
///
/// The standard codes match the portable client API numbering; the interval
/// codes are the engine's own extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SqlType {
    /// BIT
    Bit = -7,
    /// TINYINT
    TinyInt = -6,
    /// SMALLINT
    SmallInt = 5,
    /// INTEGER
    Integer = 4,
    /// BIGINT
    BigInt = -5,
    /// FLOAT
    Float = 6,
    /// REAL
    Real = 7,
    /// DOUBLE
    Double = 8,
    /// NUMERIC
    Numeric = 2,
    /// DECIMAL
    Decimal = 3,
    /// CHAR
    Char = 1,
    /// VARCHAR
    VarChar = 12,
    /// LONGVARCHAR
    LongVarChar = -1,
    /// DATE
    Date = 91,
    /// TIME
    Time = 92,
    /// TIMESTAMP
    Timestamp = 93,
    /// BINARY
    Binary = -2,
    /// VARBINARY
    VarBinary = -3,
    /// LONGVARBINARY
    LongVarBinary = -4,
    /// NULL
    Null = 0,
    /// OTHER
    Other = 1111,
    /// JAVA_OBJECT (opaque serialized object)
    JavaObject = 2000,
    /// DISTINCT
    Distinct = 2001,
    /// STRUCT
    Struct = 2002,
    /// ARRAY
    Array = 2003,
    /// BLOB
    Blob = 2004,
    /// CLOB
    Clob = 2005,
    /// REF
    Ref = 2006,
    /// DATALINK
    DataLink = 70,
    /// BOOLEAN
    Boolean = 16,
    /// ROWID
    RowId = -8,
    /// NCHAR
    NChar = -15,
    /// NVARCHAR
    NVarChar = -9,
    /// LONGNVARCHAR
    LongNVarChar = -16,
    /// NCLOB
    NClob = 2011,
    /// SQLXML
    SqlXml = 2009,
    /// REF_CURSOR
    RefCursor = 2012,
    /// TIME WITH TIME ZONE
    TimeWithTimeZone = 2013,
    /// TIMESTAMP WITH TIME ZONE
    TimestampWithTimeZone = 2014,
    /// INTERVAL YEAR
    IntervalYear = 101,
    /// INTERVAL MONTH
    IntervalMonth = 102,
    /// INTERVAL DAY
    IntervalDay = 103,
    /// INTERVAL HOUR
    IntervalHour = 104,
    /// INTERVAL MINUTE
    IntervalMinute = 105,
    /// INTERVAL SECOND
    IntervalSecond = 106,
    /// INTERVAL YEAR TO MONTH
    IntervalYearToMonth = 107,
    /// INTERVAL DAY TO HOUR
    IntervalDayToHour = 108,
    /// INTERVAL DAY TO MINUTE
    IntervalDayToMinute = 109,
    /// INTERVAL DAY TO SECOND
    IntervalDayToSecond = 110,
    /// INTERVAL HOUR TO MINUTE
    IntervalHourToMinute = 111,
    /// INTERVAL HOUR TO SECOND
    IntervalHourToSecond = 112,
    /// INTERVAL MINUTE TO SECOND
    IntervalMinuteToSecond = 113,
}

impl SqlType {
    /// Every type code known to the client, in code order of the client API.
    pub const ALL: [SqlType; 52] = [
        SqlType::Bit,
        SqlType::TinyInt,
        SqlType::SmallInt,
        SqlType::Integer,
        SqlType::BigInt,
        SqlType::Float,
        SqlType::Real,
        SqlType::Double,
        SqlType::Numeric,
        SqlType::Decimal,
        SqlType::Char,
        SqlType::VarChar,
        SqlType::LongVarChar,
        SqlType::Date,
        SqlType::Time,
        SqlType::Timestamp,
        SqlType::Binary,
        SqlType::VarBinary,
        SqlType::LongVarBinary,
        SqlType::Null,
        SqlType::Other,
        SqlType::JavaObject,
        SqlType::Distinct,
        SqlType::Struct,
        SqlType::Array,
        SqlType::Blob,
        SqlType::Clob,
        SqlType::Ref,
        SqlType::DataLink,
        SqlType::Boolean,
        SqlType::RowId,
        SqlType::NChar,
        SqlType::NVarChar,
        SqlType::LongNVarChar,
        SqlType::NClob,
        SqlType::SqlXml,
        SqlType::RefCursor,
        SqlType::TimeWithTimeZone,
        SqlType::TimestampWithTimeZone,
        SqlType::IntervalYear,
        SqlType::IntervalMonth,
        SqlType::IntervalDay,
        SqlType::IntervalHour,
        SqlType::IntervalMinute,
        SqlType::IntervalSecond,
        SqlType::IntervalYearToMonth,
        SqlType::IntervalDayToHour,
        SqlType::IntervalDayToMinute,
        SqlType::IntervalDayToSecond,
        SqlType::IntervalHourToMinute,
        SqlType::IntervalHourToSecond,
        SqlType::IntervalMinuteToSecond,
    ];

    /// Get the numeric type code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Look up a type by its numeric code
    pub fn from_code(code: i32) -> Option<Self> {
        SqlType::ALL.iter().copied().find(|t| t.code() == code)
    }

    /// SQL name of the type, as used in messages and metadata
    pub fn name(&self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::TinyInt => "TINYINT",
            SqlType::SmallInt => "SMALLINT",
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Float => "FLOAT",
            SqlType::Real => "REAL",
            SqlType::Double => "DOUBLE",
            SqlType::Numeric => "NUMERIC",
            SqlType::Decimal => "DECIMAL",
            SqlType::Char => "CHARACTER",
            SqlType::VarChar => "VARCHAR",
            SqlType::LongVarChar => "LONGVARCHAR",
            SqlType::Date => "DATE",
            SqlType::Time => "TIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Binary => "BINARY",
            SqlType::VarBinary => "VARBINARY",
            SqlType::LongVarBinary => "LONGVARBINARY",
            SqlType::Null => "NULL",
            SqlType::Other => "OTHER",
            SqlType::JavaObject => "JAVA_OBJECT",
            SqlType::Distinct => "DISTINCT",
            SqlType::Struct => "STRUCT",
            SqlType::Array => "ARRAY",
            SqlType::Blob => "BLOB",
            SqlType::Clob => "CLOB",
            SqlType::Ref => "REF",
            SqlType::DataLink => "DATALINK",
            SqlType::Boolean => "BOOLEAN",
            SqlType::RowId => "ROWID",
            SqlType::NChar => "NCHAR",
            SqlType::NVarChar => "NVARCHAR",
            SqlType::LongNVarChar => "LONGNVARCHAR",
            SqlType::NClob => "NCLOB",
            SqlType::SqlXml => "SQLXML",
            SqlType::RefCursor => "REF_CURSOR",
            SqlType::TimeWithTimeZone => "TIME WITH TIME ZONE",
            SqlType::TimestampWithTimeZone => "TIMESTAMP WITH TIME ZONE",
            SqlType::IntervalYear => "INTERVAL YEAR",
            SqlType::IntervalMonth => "INTERVAL MONTH",
            SqlType::IntervalDay => "INTERVAL DAY",
            SqlType::IntervalHour => "INTERVAL HOUR",
            SqlType::IntervalMinute => "INTERVAL MINUTE",
            SqlType::IntervalSecond => "INTERVAL SECOND",
            SqlType::IntervalYearToMonth => "INTERVAL YEAR TO MONTH",
            SqlType::IntervalDayToHour => "INTERVAL DAY TO HOUR",
            SqlType::IntervalDayToMinute => "INTERVAL DAY TO MINUTE",
            SqlType::IntervalDayToSecond => "INTERVAL DAY TO SECOND",
            SqlType::IntervalHourToMinute => "INTERVAL HOUR TO MINUTE",
            SqlType::IntervalHourToSecond => "INTERVAL HOUR TO SECOND",
            SqlType::IntervalMinuteToSecond => "INTERVAL MINUTE TO SECOND",
        }
    }

    /// Exact integral types
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            SqlType::TinyInt | SqlType::SmallInt | SqlType::Integer | SqlType::BigInt
        )
    }

    /// All numeric types, exact and approximate
    pub fn is_numeric(&self) -> bool {
        self.is_integral()
            || matches!(
                self,
                SqlType::Float
                    | SqlType::Real
                    | SqlType::Double
                    | SqlType::Numeric
                    | SqlType::Decimal
            )
    }

    /// Character string types (including national character types)
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::VarChar
                | SqlType::LongVarChar
                | SqlType::NChar
                | SqlType::NVarChar
                | SqlType::LongNVarChar
        )
    }

    /// Binary string types
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            SqlType::Binary | SqlType::VarBinary | SqlType::LongVarBinary
        )
    }

    /// Date, time and timestamp types
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            SqlType::Date
                | SqlType::Time
                | SqlType::Timestamp
                | SqlType::TimeWithTimeZone
                | SqlType::TimestampWithTimeZone
        )
    }

    /// Year-month interval types
    pub fn is_year_month_interval(&self) -> bool {
        matches!(
            self,
            SqlType::IntervalYear | SqlType::IntervalMonth | SqlType::IntervalYearToMonth
        )
    }

    /// Day-time interval types
    pub fn is_day_time_interval(&self) -> bool {
        matches!(
            self,
            SqlType::IntervalDay
                | SqlType::IntervalHour
                | SqlType::IntervalMinute
                | SqlType::IntervalSecond
                | SqlType::IntervalDayToHour
                | SqlType::IntervalDayToMinute
                | SqlType::IntervalDayToSecond
                | SqlType::IntervalHourToMinute
                | SqlType::IntervalHourToSecond
                | SqlType::IntervalMinuteToSecond
        )
    }

    /// Any interval type
    pub fn is_interval(&self) -> bool {
        self.is_year_month_interval() || self.is_day_time_interval()
    }

    /// Large object types
    pub fn is_lob(&self) -> bool {
        matches!(self, SqlType::Blob | SqlType::Clob | SqlType::NClob)
    }

    /// Types the engine deliberately does not support at the client boundary
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            SqlType::Ref | SqlType::DataLink | SqlType::RowId | SqlType::SqlXml
        )
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for SqlType {
    type Error = crate::error::Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        SqlType::from_code(value).ok_or_else(|| {
            crate::error::Error::InvalidArgument(format!("unknown SQL type code: {}", value))
        })
    }
}

// =============================================================================
// Parameter Modes
// =============================================================================

/// Parameter mode, fixed by the engine when a statement is prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ParameterMode {
    /// Mode could not be determined (plain `?` markers in DML/queries)
    Unknown = 0,
    /// Input only parameter (client writes, engine reads) - default
    #[default]
    In = 1,
    /// Input/Output parameter (bidirectional)
    InOut = 2,
    /// Output only parameter (engine writes, client reads)
    Out = 4,
}

impl ParameterMode {
    /// Check if this mode accepts a client value (IN, IN OUT or unknown)
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            ParameterMode::In | ParameterMode::InOut | ParameterMode::Unknown
        )
    }

    /// Check if the engine may return a value in this slot (OUT, IN OUT or unknown)
    pub fn is_output(&self) -> bool {
        matches!(
            self,
            ParameterMode::Out | ParameterMode::InOut | ParameterMode::Unknown
        )
    }

    /// Create from the engine's mode code
    pub fn from_code(value: u8) -> Option<Self> {
        match value {
            0 => Some(ParameterMode::Unknown),
            1 => Some(ParameterMode::In),
            2 => Some(ParameterMode::InOut),
            4 => Some(ParameterMode::Out),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ParameterMode {
    type Error = crate::error::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ParameterMode::from_code(value).ok_or_else(|| {
            crate::error::Error::Protocol(format!("invalid parameter mode: {}", value))
        })
    }
}

/// Parameter nullability, as reported in parameter metadata
#[allow(missing_docs)]
pub mod parameter_nullable {
    pub const NO_NULLS: i32 = 0;
    pub const NULLABLE: i32 = 1;
    pub const NULLABLE_UNKNOWN: i32 = 2;
}

// =============================================================================
// Result Sets
// =============================================================================

/// Scrolling behaviour of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ResultSetType {
    /// Cursor may only move forward
    #[default]
    ForwardOnly = 1003,
    /// Scrollable, not sensitive to changes by others
    ScrollInsensitive = 1004,
    /// Scrollable and sensitive to changes by others (not supported)
    ScrollSensitive = 1005,
}

/// Update capability of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum Concurrency {
    /// Read only
    #[default]
    ReadOnly = 1007,
    /// Updatable (not supported by this client)
    Updatable = 1008,
}

/// Cursor holdability over commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum Holdability {
    /// Cursors stay open after commit
    #[default]
    HoldCursorsOverCommit = 1,
    /// Cursors are closed at commit
    CloseCursorsAtCommit = 2,
}

// =============================================================================
// Transactions
// =============================================================================

/// Transaction isolation levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum IsolationLevel {
    /// No transactions
    None = 0,
    /// READ UNCOMMITTED
    ReadUncommitted = 1,
    /// READ COMMITTED
    ReadCommitted = 2,
    /// REPEATABLE READ
    RepeatableRead = 4,
    /// SERIALIZABLE
    Serializable = 8,
}

// =============================================================================
// Metadata Constants
// =============================================================================

/// Maximum length of any identifier (schema, table, column, ...)
pub const MAX_IDENTIFIER_LENGTH: i32 = 128;

/// Name of the engine product reported by the metadata layer
pub const PRODUCT_NAME: &str = "Quarry Database Engine";

/// Name of this client reported by the metadata layer
pub const DRIVER_NAME: &str = "Quarry Database Engine Client";

/// Version of the standard client API the metadata layer conforms to
pub const API_MAJOR_VERSION: i32 = 4;
/// Minor version of the standard client API
pub const API_MINOR_VERSION: i32 = 3;

/// Row identifier lifetime reported by the metadata layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIdLifetime {
    /// ROWID is not supported
    Unsupported,
    /// Valid for the lifetime of the containing transaction
    ValidTransaction,
    /// Valid for the lifetime of the containing session
    ValidSession,
    /// Valid forever
    ValidForever,
}

/// Format of the SQLSTATE values returned in errors
#[allow(missing_docs)]
pub mod sql_state_type {
    pub const X_OPEN: i32 = 1;
    pub const SQL: i32 = 2;
}

/// Scope codes used by `best_row_identifier`
#[allow(missing_docs)]
pub mod best_row {
    pub const TEMPORARY: i32 = 0;
    pub const TRANSACTION: i32 = 1;
    pub const SESSION: i32 = 2;
}

// =============================================================================
// Error Codes
// =============================================================================

/// Engine-specific error codes carried by every client error
#[allow(missing_docs)]
pub mod error_code {
    pub const GENERAL_ERROR: i32 = 458;
    pub const COLUMN_NOT_FOUND: i32 = 421;
    pub const PARAMETER_NOT_SET: i32 = 422;
    pub const INVALID_ARGUMENT: i32 = 423;
    pub const NULL_ARGUMENT: i32 = 424;
    pub const OUT_OF_RANGE_ARGUMENT: i32 = 426;
    pub const INVALID_CONNECTION_STRING: i32 = 1302;
    pub const CONNECTION_CLOSED: i32 = 1303;
    pub const STATEMENT_CLOSED: i32 = 1251;
    pub const RESULT_SET_CLOSED: i32 = 1252;
    pub const NO_CURRENT_ROW: i32 = 1253;
    pub const NO_RESULT_SET: i32 = 1255;
    pub const NOT_SUPPORTED: i32 = 1500;
    pub const CONVERSION_ERROR: i32 = 3438;
    pub const NUMERIC_OUT_OF_RANGE: i32 = 3401;
    pub const INVALID_DATETIME_FORMAT: i32 = 3407;
    pub const PROTOCOL_ERROR: i32 = 1352;
}

/// SQLSTATE values carried by every client error
#[allow(missing_docs)]
pub mod sql_state {
    pub const GENERAL_ERROR: &str = "HY000";
    pub const INVALID_DESCRIPTOR_INDEX: &str = "07009";
    pub const COLUMN_NOT_FOUND: &str = "42S22";
    pub const PARAMETER_NOT_SET: &str = "07001";
    pub const INVALID_ARGUMENT: &str = "HY024";
    pub const NULL_ARGUMENT: &str = "HY009";
    pub const CONNECTION_FAILURE: &str = "08001";
    pub const CONNECTION_CLOSED: &str = "08003";
    pub const INVALID_CURSOR_STATE: &str = "24000";
    pub const FUNCTION_SEQUENCE: &str = "HY010";
    pub const NO_RESULT_SET: &str = "07503";
    pub const NOT_SUPPORTED: &str = "0A000";
    pub const INVALID_CAST: &str = "22018";
    pub const NUMERIC_OUT_OF_RANGE: &str = "22003";
    pub const INVALID_DATETIME_FORMAT: &str = "22007";
    pub const PROTOCOL_VIOLATION: &str = "08P01";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type_code_lookup() {
        assert_eq!(SqlType::from_code(4), Some(SqlType::Integer));
        assert_eq!(SqlType::from_code(-5), Some(SqlType::BigInt));
        assert_eq!(SqlType::from_code(2014), Some(SqlType::TimestampWithTimeZone));
        assert_eq!(SqlType::from_code(110), Some(SqlType::IntervalDayToSecond));
        assert_eq!(SqlType::from_code(9999), None);
    }

    #[test]
    fn test_sql_type_try_from() {
        assert_eq!(SqlType::try_from(12).unwrap(), SqlType::VarChar);
        assert!(SqlType::try_from(-100).is_err());
    }

    #[test]
    fn test_sql_type_classification() {
        assert!(SqlType::Integer.is_integral());
        assert!(SqlType::Decimal.is_numeric());
        assert!(!SqlType::Decimal.is_integral());
        assert!(SqlType::NVarChar.is_character());
        assert!(SqlType::VarBinary.is_binary());
        assert!(SqlType::TimestampWithTimeZone.is_datetime());
        assert!(SqlType::IntervalYearToMonth.is_year_month_interval());
        assert!(SqlType::IntervalHourToSecond.is_day_time_interval());
        assert!(SqlType::NClob.is_lob());
        assert!(SqlType::SqlXml.is_unsupported());
    }

    #[test]
    fn test_sql_type_display() {
        assert_eq!(SqlType::Integer.to_string(), "INTEGER");
        assert_eq!(
            SqlType::TimestampWithTimeZone.to_string(),
            "TIMESTAMP WITH TIME ZONE"
        );
    }

    #[test]
    fn test_parameter_mode() {
        assert!(ParameterMode::In.is_input());
        assert!(!ParameterMode::In.is_output());
        assert!(ParameterMode::Out.is_output());
        assert!(!ParameterMode::Out.is_input());
        assert!(ParameterMode::InOut.is_input() && ParameterMode::InOut.is_output());
        assert!(ParameterMode::Unknown.is_input() && ParameterMode::Unknown.is_output());
        assert_eq!(ParameterMode::try_from(4).unwrap(), ParameterMode::Out);
        assert!(ParameterMode::try_from(3).is_err());
    }
}
