#![warn(missing_docs)]

//! # quarry-client
//!
//! Client access layer for the Quarry embedded relational engine.
//!
//! The engine parses, plans and runs SQL; this crate adapts it to a typed
//! client API: prepared and callable statements, scrollable read-only
//! result sets, catalog metadata and large objects. The engine is reached
//! through the [`Session`] trait and receives nothing but SQL text and
//! bound parameter values.
//!
//! ## Features
//!
//! - **Named and ordinal parameters** - callable statement parameters by
//!   position or by name, case-insensitively
//! - **Typed getters** - every value readable as any compatible Rust type,
//!   with SQL NULL reported through `was_null()`
//! - **Catalog metadata** - capability flags and `INFORMATION_SCHEMA`
//!   enumerations
//! - **Escape processing** - `{call ...}`, `{d ...}`, `{fn ...}` and friends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use quarry_client::{Config, Connection, Session, SqlType};
//!
//! # async fn example(session: Arc<dyn Session>) -> quarry_client::Result<()> {
//! let config: Config = "quarry:mem:test".parse()?;
//! let conn = Connection::new(session, config);
//!
//! // Call a procedure with one IN and one OUT parameter
//! let mut call = conn.prepare_call("{call NEW_CUSTOMER(?, ?)}").await?;
//! call.set_string("name", "Alice")?;
//! call.register_out_parameter("id", SqlType::Integer)?;
//! call.execute().await?;
//! println!("new id: {}", call.get_int("id")?);
//!
//! // Look up tables
//! let meta = conn.metadata()?;
//! let mut tables = meta.get_tables(None, Some("PUBLIC"), None, Some(&["TABLE"])).await?;
//! while tables.next()? {
//!     println!("{:?}", tables.get_string("TABLE_NAME")?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Data Types
//!
//! | SQL Type | Rust Type |
//! |----------|-----------|
//! | BOOLEAN | `bool` |
//! | TINYINT, SMALLINT, INTEGER, BIGINT | `i8`, `i16`, `i32`, `i64` |
//! | REAL, DOUBLE | `f32`, `f64` |
//! | DECIMAL, NUMERIC | `rust_decimal::Decimal` |
//! | CHAR, VARCHAR | `String` |
//! | BINARY, VARBINARY | `Vec<u8>` |
//! | DATE, TIME, TIMESTAMP | `chrono::NaiveDate`, `NaiveTime`, `NaiveDateTime` |
//! | TIME WITH TIME ZONE | [`OffsetTime`] |
//! | TIMESTAMP WITH TIME ZONE | `chrono::DateTime<FixedOffset>` |
//! | INTERVAL | [`IntervalYearMonth`], [`IntervalDaySecond`] |
//! | CLOB, NCLOB, BLOB | [`Clob`], [`NClob`], [`Blob`] |
//! | ARRAY | `Vec<Value>` |

pub mod callable;
pub mod config;
pub mod connection;
pub mod constants;
pub mod convert;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod params;
pub mod prepared;
pub mod result_set;
pub mod row;
pub mod session;
pub mod statement;
pub mod types;

// Re-export commonly used types
pub use callable::CallableStatement;
pub use config::{Config, Protocol};
pub use connection::Connection;
pub use constants::{Concurrency, Holdability, IsolationLevel, ParameterMode, ResultSetType, SqlType};
pub use convert::{FromValue, TargetType};
pub use error::{Error, Result};
pub use metadata::{CatalogQuery, DatabaseMetaData, NullOrdering};
pub use params::{ParameterIndex, ParameterNameIndex};
pub use prepared::PreparedStatement;
pub use result_set::{ColumnIndex, ResultSet};
pub use row::{Row, Value};
pub use session::{
    ExecuteRequest, PreparedDescriptor, Response, ResultChain, ResultItem, RowSet, Session, StatementId,
};
pub use statement::{ColumnInfo, ParameterDescriptor, Statement, StatementType};
pub use types::{Blob, Clob, IntervalDaySecond, IntervalYearMonth, NClob, OffsetTime};
