//! Prepared statements
//!
//! A [`PreparedStatement`] is SQL that the engine has already parsed. Its
//! parameters are bound by 1-based ordinal, coerced to the type the engine
//! declared for them, and sent with each execution.
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_client::{Connection, Result};
//!
//! # async fn example(conn: Connection) -> Result<()> {
//! let mut stmt = conn
//!     .prepare_statement("UPDATE ACCOUNT SET BALANCE = ? WHERE ID = ?")
//!     .await?;
//! stmt.set_double(1, 150.0)?;
//! stmt.set_int(2, 7)?;
//! let updated = stmt.execute_update().await?;
//! assert!(updated <= 1);
//! stmt.close().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::Decimal;

use crate::connection::ConnectionInner;
use crate::constants::{Concurrency, ParameterMode, ResultSetType, SqlType};
use crate::convert;
use crate::error::{Error, Result};
use crate::params::ParameterState;
use crate::result_set::ResultSet;
use crate::row::Value;
use crate::session::{ExecuteRequest, ResultChain, ResultItem, StatementId};
use crate::statement::{ColumnInfo, ParameterDescriptor, Statement, StatementType};
use crate::types::{Blob, Clob, NClob};

/// A statement prepared by the engine, with ordinal parameter binding
#[derive(Debug)]
pub struct PreparedStatement {
    conn: Arc<ConnectionInner>,
    statement: Statement,
    statement_id: StatementId,
    statement_type: StatementType,
    columns: Vec<ColumnInfo>,
    params: ParameterState,
    /// Results not yet reached by `more_results`
    pending: ResultChain,
    /// Result the statement is positioned on
    current: Option<ResultItem>,
    max_rows: u64,
    fetch_size: u32,
    query_timeout: Option<Duration>,
    result_set_type: ResultSetType,
    zone: FixedOffset,
}

impl PreparedStatement {
    pub(crate) async fn prepare(conn: Arc<ConnectionInner>, sql: &str) -> Result<Self> {
        conn.check_open()?;
        let statement = Statement::new(sql);
        let descriptor = conn.session.prepare(statement.native_sql()).await?;

        if descriptor.parameters.len() != statement.parameter_count() {
            tracing::warn!(
                sql = statement.native_sql(),
                markers = statement.parameter_count(),
                described = descriptor.parameters.len(),
                "Parameter marker count differs from engine description"
            );
        }
        tracing::debug!(
            sql = statement.native_sql(),
            statement_id = descriptor.statement_id,
            parameters = descriptor.parameters.len(),
            "Prepared statement"
        );

        let statement_type = match descriptor.statement_type {
            StatementType::Other => statement.statement_type(),
            described => described,
        };
        let zone = conn.config.time_zone;
        let fetch_size = conn.config.fetch_size;

        Ok(Self {
            conn,
            statement,
            statement_id: descriptor.statement_id,
            statement_type,
            columns: descriptor.columns,
            params: ParameterState::new(Arc::from(descriptor.parameters)),
            pending: ResultChain::new(),
            current: None,
            max_rows: 0,
            fetch_size,
            query_timeout: None,
            result_set_type: ResultSetType::ForwardOnly,
            zone,
        })
    }

    // =========================================================================
    // Description
    // =========================================================================

    /// SQL text as written by the caller
    pub fn sql(&self) -> &str {
        self.statement.sql()
    }

    /// SQL text after escape processing
    pub fn native_sql(&self) -> &str {
        self.statement.native_sql()
    }

    /// Engine-assigned statement id
    pub fn statement_id(&self) -> StatementId {
        self.statement_id
    }

    /// Statement kind
    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    /// Number of parameters the engine described
    pub fn parameter_count(&self) -> usize {
        self.params.count()
    }

    /// Parameter descriptors in ordinal order
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        self.params.descriptors()
    }

    /// Result columns, empty for statements that do not return rows
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub(crate) fn params(&self) -> &ParameterState {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut ParameterState {
        &mut self.params
    }

    pub(crate) fn zone(&self) -> FixedOffset {
        self.zone
    }

    // =========================================================================
    // Execution options
    // =========================================================================

    /// Limit the number of rows any result set may hold; 0 means no limit
    pub fn set_max_rows(&mut self, max_rows: u64) -> Result<()> {
        self.params.check_open()?;
        self.max_rows = max_rows;
        Ok(())
    }

    /// Current row limit
    pub fn max_rows(&self) -> u64 {
        self.max_rows
    }

    /// Hint how many rows the engine should hand over at a time
    pub fn set_fetch_size(&mut self, fetch_size: u32) -> Result<()> {
        self.params.check_open()?;
        self.fetch_size = fetch_size;
        Ok(())
    }

    /// Current fetch size hint
    pub fn fetch_size(&self) -> u32 {
        self.fetch_size
    }

    /// Limit how long one execution may run
    pub fn set_query_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.params.check_open()?;
        self.query_timeout = timeout;
        Ok(())
    }

    /// Current execution time limit
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout
    }

    /// Choose the type of result sets produced by this statement.
    ///
    /// Result sets are always read-only; a request for an updatable one is
    /// logged and downgraded.
    pub fn set_result_set_type(&mut self, result_set_type: ResultSetType, concurrency: Concurrency) -> Result<()> {
        self.params.check_open()?;
        if concurrency == Concurrency::Updatable {
            tracing::warn!(sql = self.native_sql(), "Updatable result sets are not supported, using read-only");
        }
        self.result_set_type = match result_set_type {
            ResultSetType::ScrollSensitive => ResultSetType::ScrollInsensitive,
            other => other,
        };
        Ok(())
    }

    /// Type of result sets produced by this statement
    pub fn result_set_type(&self) -> ResultSetType {
        self.result_set_type
    }

    // =========================================================================
    // Parameter binding
    // =========================================================================

    /// Coerce `value` to the declared type of parameter `ordinal` and store it
    fn bind(&mut self, ordinal: usize, value: Value) -> Result<()> {
        self.params.check_open()?;
        let slot = self.params.slot(ordinal)?;
        let desc = self.params.descriptor(slot);
        let (mode, declared) = (desc.mode, desc.sql_type);
        if mode == ParameterMode::Out {
            return Err(Error::InvalidArgument(format!(
                "parameter {} is an OUT parameter and cannot be set",
                ordinal
            )));
        }

        let value = convert::coerce_for_parameter(value, declared, self.zone)?;
        tracing::trace!(ordinal = ordinal, sql_type = %declared, null = value.is_null(), "Binding parameter");
        self.params.set_value(slot, value);
        Ok(())
    }

    /// Set a parameter to SQL NULL
    pub fn set_null(&mut self, ordinal: usize, sql_type: SqlType) -> Result<()> {
        tracing::trace!(ordinal = ordinal, sql_type = %sql_type, "Setting NULL");
        self.bind(ordinal, Value::Null)
    }

    /// Set a boolean parameter
    pub fn set_boolean(&mut self, ordinal: usize, value: bool) -> Result<()> {
        self.bind(ordinal, Value::Boolean(value))
    }

    /// Set a TINYINT parameter
    pub fn set_byte(&mut self, ordinal: usize, value: i8) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a SMALLINT parameter
    pub fn set_short(&mut self, ordinal: usize, value: i16) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set an INTEGER parameter
    pub fn set_int(&mut self, ordinal: usize, value: i32) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a BIGINT parameter
    pub fn set_long(&mut self, ordinal: usize, value: i64) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a REAL parameter
    pub fn set_float(&mut self, ordinal: usize, value: f32) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a DOUBLE parameter
    pub fn set_double(&mut self, ordinal: usize, value: f64) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a DECIMAL parameter
    pub fn set_big_decimal(&mut self, ordinal: usize, value: Decimal) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a character parameter
    pub fn set_string(&mut self, ordinal: usize, value: impl Into<String>) -> Result<()> {
        self.bind(ordinal, Value::String(value.into()))
    }

    /// Set a national character parameter
    pub fn set_nstring(&mut self, ordinal: usize, value: impl Into<String>) -> Result<()> {
        self.set_string(ordinal, value)
    }

    /// Set a binary parameter
    pub fn set_bytes(&mut self, ordinal: usize, value: &[u8]) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a DATE parameter
    pub fn set_date(&mut self, ordinal: usize, value: NaiveDate) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a TIME parameter
    pub fn set_time(&mut self, ordinal: usize, value: NaiveTime) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a TIMESTAMP parameter
    pub fn set_timestamp(&mut self, ordinal: usize, value: NaiveDateTime) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a TIMESTAMP parameter given as a local time in `zone`
    pub fn set_timestamp_in(&mut self, ordinal: usize, value: NaiveDateTime, zone: FixedOffset) -> Result<()> {
        let zoned = zone
            .from_local_datetime(&value)
            .single()
            .ok_or_else(|| Error::InvalidArgument(format!("{} is not a valid time in {}", value, zone)))?;
        self.bind(ordinal, zoned.into())
    }

    /// Set a CLOB parameter
    pub fn set_clob(&mut self, ordinal: usize, value: Clob) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set an NCLOB parameter
    pub fn set_nclob(&mut self, ordinal: usize, value: NClob) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a BLOB parameter
    pub fn set_blob(&mut self, ordinal: usize, value: Blob) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set an ARRAY parameter
    pub fn set_array(&mut self, ordinal: usize, value: Vec<Value>) -> Result<()> {
        self.bind(ordinal, Value::Array(value))
    }

    /// Set a parameter from any value; it is coerced to the declared type
    pub fn set_object(&mut self, ordinal: usize, value: impl Into<Value>) -> Result<()> {
        self.bind(ordinal, value.into())
    }

    /// Set a parameter after converting the value to `sql_type`
    pub fn set_object_with_type(&mut self, ordinal: usize, value: impl Into<Value>, sql_type: SqlType) -> Result<()> {
        self.params.check_open()?;
        let value = convert::coerce_for_parameter(value.into(), sql_type, self.zone)?;
        self.bind(ordinal, value)
    }

    /// DATALINK parameters are not supported
    pub fn set_url(&mut self, _ordinal: usize, _value: &str) -> Result<()> {
        self.params.check_open()?;
        Err(Error::not_supported("DATALINK"))
    }

    /// ROWID parameters are not supported
    pub fn set_row_id(&mut self, _ordinal: usize, _value: &[u8]) -> Result<()> {
        self.params.check_open()?;
        Err(Error::not_supported("ROWID"))
    }

    /// SQLXML parameters are not supported
    pub fn set_sqlxml(&mut self, _ordinal: usize, _value: &str) -> Result<()> {
        self.params.check_open()?;
        Err(Error::not_supported("SQLXML"))
    }

    /// REF parameters are not supported
    pub fn set_ref(&mut self, _ordinal: usize, _value: Value) -> Result<()> {
        self.params.check_open()?;
        Err(Error::not_supported("REF"))
    }

    /// Forget all bound parameter values
    pub fn clear_parameters(&mut self) -> Result<()> {
        self.params.check_open()?;
        self.params.clear();
        Ok(())
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Send the bound parameters to the engine and position on the first result
    async fn run(&mut self) -> Result<()> {
        self.params.check_open()?;
        self.conn.check_open()?;
        if let Some(ordinal) = self.params.first_unset_input() {
            return Err(Error::ParameterNotSet(ordinal));
        }

        self.pending = ResultChain::new();
        self.current = None;

        let request = ExecuteRequest::prepared(
            self.statement_id,
            self.statement.native_sql(),
            self.params.bound_values(),
        )
        .with_max_rows(self.max_rows)
        .with_fetch_size(self.fetch_size)
        .with_query_timeout(self.query_timeout)
        .with_result_set_type(self.result_set_type, Concurrency::ReadOnly);

        tracing::debug!(
            sql = self.statement.native_sql(),
            statement_id = self.statement_id,
            "Executing prepared statement"
        );
        let response = self.conn.session.execute(request).await?;
        self.params.apply_out_values(response.out_values)?;

        self.pending = response.results;
        self.current = self.pending.pop();
        Ok(())
    }

    fn to_result_set(&self, rows: crate::session::RowSet) -> ResultSet {
        ResultSet::new(rows, self.zone).with_type(self.result_set_type)
    }

    /// Execute, returning `true` if the first result is a result set
    pub async fn execute(&mut self) -> Result<bool> {
        self.run().await?;
        Ok(self.current.as_ref().is_some_and(ResultItem::is_rows))
    }

    /// Execute a statement whose first result is a result set
    pub async fn execute_query(&mut self) -> Result<ResultSet> {
        self.run().await?;
        match self.current.take() {
            Some(ResultItem::Rows(rows)) => Ok(self.to_result_set(rows)),
            other => {
                self.current = other;
                Err(Error::NoResultSet)
            }
        }
    }

    /// Execute a statement that does not return rows, returning the update count
    pub async fn execute_update(&mut self) -> Result<u64> {
        self.run().await?;
        match &self.current {
            Some(ResultItem::Rows(_)) => Err(Error::UnexpectedResultSet),
            Some(ResultItem::UpdateCount(count)) => Ok(*count),
            None => Ok(0),
        }
    }

    /// Advance through the results of the last execution to the first result
    /// set, skipping update counts
    pub(crate) async fn execute_until_rows(&mut self) -> Result<ResultSet> {
        self.run().await?;
        loop {
            match self.current.take() {
                Some(ResultItem::Rows(rows)) => return Ok(self.to_result_set(rows)),
                Some(ResultItem::UpdateCount(_)) => self.current = self.pending.pop(),
                None => return Err(Error::NoResultSet),
            }
        }
    }

    /// Take the current result if it is a result set
    pub fn result_set(&mut self) -> Result<Option<ResultSet>> {
        self.params.check_open()?;
        match self.current.take() {
            Some(ResultItem::Rows(rows)) => Ok(Some(self.to_result_set(rows))),
            other => {
                self.current = other;
                Ok(None)
            }
        }
    }

    /// Current result if it is an update count
    pub fn update_count(&self) -> Result<Option<u64>> {
        self.params.check_open()?;
        match self.current {
            Some(ResultItem::UpdateCount(count)) => Ok(Some(count)),
            _ => Ok(None),
        }
    }

    /// Move to the next result, returning `true` if it is a result set
    pub fn more_results(&mut self) -> Result<bool> {
        self.params.check_open()?;
        self.current = self.pending.pop();
        Ok(self.current.as_ref().is_some_and(ResultItem::is_rows))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Ask the engine to stop the running execution
    pub async fn cancel(&self) -> Result<()> {
        self.params.check_open()?;
        self.conn.check_open()?;
        tracing::debug!(statement_id = self.statement_id, "Cancelling statement");
        self.conn.session.cancel_statement(self.statement_id).await
    }

    /// Release the statement.
    ///
    /// Clears the parameter state and asks the engine to drop its prepared
    /// form. Closing twice is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.params.is_closed() {
            return Ok(());
        }
        self.params.close();
        self.pending = ResultChain::new();
        self.current = None;
        tracing::debug!(statement_id = self.statement_id, "Closing statement");

        if self.conn.is_closed() {
            return Ok(());
        }
        self.conn.session.close_statement(self.statement_id).await
    }

    /// Check if [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.params.is_closed()
    }
}
