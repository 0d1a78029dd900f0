//! Error types for the Quarry client
//!
//! Every failure surfaces immediately to the caller as an [`Error`]; each
//! variant maps to an engine error code and a SQLSTATE so that callers written
//! against the standard client API can classify it.

use thiserror::Error;

use crate::constants::{error_code, sql_state, SqlType};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Quarry client
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum Error {
    // =========================================================================
    // Argument Errors
    // =========================================================================
    /// Parameter ordinal outside `1..=count`
    #[error("parameter index out of range: {index} (statement has {count} parameters)")]
    InvalidParameterIndex { index: usize, count: usize },

    /// No parameter with this name, exact or upper-cased
    #[error("parameter not found: {0}")]
    ParameterNotFound(String),

    /// Column ordinal outside `1..=count`
    #[error("column index out of range: {index} (result has {count} columns)")]
    InvalidColumnIndex { index: usize, count: usize },

    /// No column with this label
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// An IN or IN OUT parameter was not bound before execution
    #[error("parameter not set: {0}")]
    ParameterNotSet(usize),

    /// Invalid argument value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required argument was missing
    #[error("null argument: {0}")]
    NullArgument(&'static str),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Connection URL or property could not be parsed
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),

    // =========================================================================
    // State Errors
    // =========================================================================
    /// Statement is closed
    #[error("statement is closed")]
    StatementClosed,

    /// Result set is closed
    #[error("result set is closed")]
    ResultSetClosed,

    /// Connection is closed
    #[error("connection is closed")]
    ConnectionClosed,

    /// Cursor is not positioned on a row
    #[error("invalid cursor state: {0}")]
    NoCurrentRow(&'static str),

    // =========================================================================
    // Conversion Errors
    // =========================================================================
    /// Value of one SQL type cannot be read as the requested type
    #[error("incompatible data type in conversion: from SQL type {from} to {to}, value: {value}")]
    DataConversion {
        from: SqlType,
        to: String,
        value: String,
    },

    /// Numeric value does not fit the requested type
    #[error("numeric value out of range for {target}: {value}")]
    NumericOutOfRange { target: SqlType, value: String },

    /// String does not hold a valid literal of the requested type
    #[error("invalid {target} format: {value}")]
    InvalidFormat { target: SqlType, value: String },

    // =========================================================================
    // Feature Errors
    // =========================================================================
    /// Feature not supported by the engine
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),

    // =========================================================================
    // Result Errors
    // =========================================================================
    /// A query-style execution produced no result set
    #[error("statement does not generate a result set")]
    NoResultSet,

    /// An update-style execution produced a result set
    #[error("statement generates a result set")]
    UnexpectedResultSet,

    // =========================================================================
    // Engine Errors
    // =========================================================================
    /// Error reported by the engine itself
    #[error("{sql_state} ({code}): {message}")]
    Engine {
        code: i32,
        sql_state: String,
        message: String,
    },

    /// Engine response that violates the client contract
    #[error("protocol error: {0}")]
    Protocol(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (should not happen)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new engine error
    pub fn engine(code: i32, sql_state: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Engine {
            code,
            sql_state: sql_state.into(),
            message: message.into(),
        }
    }

    /// Create a conversion error, rendering the offending value for diagnostics
    pub fn conversion(from: SqlType, to: impl std::fmt::Display, value: impl std::fmt::Display) -> Self {
        Error::DataConversion {
            from,
            to: to.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a not-supported error for a named feature
    pub fn not_supported(feature: impl Into<String>) -> Self {
        Error::FeatureNotSupported(feature.into())
    }

    /// Engine-specific error code
    pub fn error_code(&self) -> i32 {
        match self {
            Error::InvalidParameterIndex { .. } | Error::InvalidColumnIndex { .. } => {
                error_code::OUT_OF_RANGE_ARGUMENT
            }
            Error::ParameterNotFound(_) | Error::ColumnNotFound(_) => error_code::COLUMN_NOT_FOUND,
            Error::ParameterNotSet(_) => error_code::PARAMETER_NOT_SET,
            Error::InvalidArgument(_) => error_code::INVALID_ARGUMENT,
            Error::NullArgument(_) => error_code::NULL_ARGUMENT,
            Error::InvalidConnectionString(_) => error_code::INVALID_CONNECTION_STRING,
            Error::StatementClosed => error_code::STATEMENT_CLOSED,
            Error::ResultSetClosed => error_code::RESULT_SET_CLOSED,
            Error::ConnectionClosed => error_code::CONNECTION_CLOSED,
            Error::NoCurrentRow(_) => error_code::NO_CURRENT_ROW,
            Error::DataConversion { .. } => error_code::CONVERSION_ERROR,
            Error::NumericOutOfRange { .. } => error_code::NUMERIC_OUT_OF_RANGE,
            Error::InvalidFormat { .. } => error_code::INVALID_DATETIME_FORMAT,
            Error::FeatureNotSupported(_) => error_code::NOT_SUPPORTED,
            Error::NoResultSet | Error::UnexpectedResultSet => error_code::NO_RESULT_SET,
            Error::Engine { code, .. } => *code,
            Error::Protocol(_) => error_code::PROTOCOL_ERROR,
            Error::Internal(_) => error_code::GENERAL_ERROR,
        }
    }

    /// SQLSTATE for this error
    pub fn sql_state(&self) -> &str {
        match self {
            Error::InvalidParameterIndex { .. } | Error::InvalidColumnIndex { .. } => {
                sql_state::INVALID_DESCRIPTOR_INDEX
            }
            Error::ParameterNotFound(_) | Error::ColumnNotFound(_) => sql_state::COLUMN_NOT_FOUND,
            Error::ParameterNotSet(_) => sql_state::PARAMETER_NOT_SET,
            Error::InvalidArgument(_) => sql_state::INVALID_ARGUMENT,
            Error::NullArgument(_) => sql_state::NULL_ARGUMENT,
            Error::InvalidConnectionString(_) => sql_state::CONNECTION_FAILURE,
            Error::StatementClosed | Error::ResultSetClosed => sql_state::FUNCTION_SEQUENCE,
            Error::ConnectionClosed => sql_state::CONNECTION_CLOSED,
            Error::NoCurrentRow(_) => sql_state::INVALID_CURSOR_STATE,
            Error::DataConversion { .. } => sql_state::INVALID_CAST,
            Error::NumericOutOfRange { .. } => sql_state::NUMERIC_OUT_OF_RANGE,
            Error::InvalidFormat { .. } => sql_state::INVALID_DATETIME_FORMAT,
            Error::FeatureNotSupported(_) => sql_state::NOT_SUPPORTED,
            Error::NoResultSet | Error::UnexpectedResultSet => sql_state::NO_RESULT_SET,
            Error::Engine { sql_state, .. } => sql_state,
            Error::Protocol(_) => sql_state::PROTOCOL_VIOLATION,
            Error::Internal(_) => sql_state::GENERAL_ERROR,
        }
    }

    /// Check if this is an argument error (bad index, name or value)
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameterIndex { .. }
                | Error::ParameterNotFound(_)
                | Error::InvalidColumnIndex { .. }
                | Error::ColumnNotFound(_)
                | Error::ParameterNotSet(_)
                | Error::InvalidArgument(_)
                | Error::NullArgument(_)
        )
    }

    /// Check if this error was caused by using a closed object
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Error::StatementClosed
                | Error::ResultSetClosed
                | Error::ConnectionClosed
                | Error::NoCurrentRow(_)
        )
    }

    /// Check if this is a data conversion error
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            Error::DataConversion { .. }
                | Error::NumericOutOfRange { .. }
                | Error::InvalidFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = Error::engine(5501, "42501", "user lacks privilege or object not found: T1");
        assert_eq!(
            err.to_string(),
            "42501 (5501): user lacks privilege or object not found: T1"
        );
        assert_eq!(err.error_code(), 5501);
        assert_eq!(err.sql_state(), "42501");
    }

    #[test]
    fn test_conversion_error_display() {
        let err = Error::conversion(SqlType::VarChar, SqlType::Integer, "abc");
        assert_eq!(
            err.to_string(),
            "incompatible data type in conversion: from SQL type VARCHAR to INTEGER, value: abc"
        );
        assert!(err.is_conversion_error());
        assert_eq!(err.sql_state(), "22018");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::InvalidParameterIndex { index: 0, count: 2 }.is_argument_error());
        assert!(Error::ParameterNotFound("X".into()).is_argument_error());
        assert!(Error::StatementClosed.is_state_error());
        assert!(!Error::StatementClosed.is_argument_error());
        assert!(!Error::NoResultSet.is_conversion_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidParameterIndex { index: 9, count: 2 }.error_code(),
            error_code::OUT_OF_RANGE_ARGUMENT
        );
        assert_eq!(Error::not_supported("SQLXML").error_code(), error_code::NOT_SUPPORTED);
        assert_eq!(Error::not_supported("SQLXML").sql_state(), "0A000");
        assert_eq!(Error::NoResultSet.error_code(), error_code::NO_RESULT_SET);
    }
}
