//! Callable statements
//!
//! A [`CallableStatement`] runs a stored procedure or function. It binds
//! input parameters like a [`PreparedStatement`] and reads output
//! parameters back after execution. Every parameter can be addressed by
//! 1-based ordinal or by name; names are resolved to their ordinal and then
//! take the same path.
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_client::{Connection, Result, SqlType};
//!
//! # async fn example(conn: Connection) -> Result<()> {
//! let mut call = conn.prepare_call("{call ACCOUNT_BALANCE(?, ?)}").await?;
//! call.set_int("account_id", 7)?;
//! call.register_out_parameter(2, SqlType::Decimal)?;
//! call.execute().await?;
//! let balance = call.get_big_decimal("balance")?;
//! if call.was_null()? {
//!     println!("no balance");
//! } else {
//!     println!("balance: {:?}", balance);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::connection::ConnectionInner;
use crate::constants::{Concurrency, ResultSetType, SqlType};
use crate::convert::{self, FromValue, TargetType};
use crate::error::{Error, Result};
use crate::params::ParameterIndex;
use crate::prepared::PreparedStatement;
use crate::result_set::ResultSet;
use crate::row::Value;
use crate::session::StatementId;
use crate::statement::ParameterDescriptor;
use crate::types::{Blob, Clob, NClob, OffsetTime};

/// A stored procedure or function call with named and ordinal parameters
#[derive(Debug)]
pub struct CallableStatement {
    inner: PreparedStatement,
}

impl CallableStatement {
    pub(crate) async fn prepare(conn: Arc<ConnectionInner>, sql: &str) -> Result<Self> {
        Ok(Self {
            inner: PreparedStatement::prepare(conn, sql).await?,
        })
    }

    /// The underlying prepared statement
    pub fn as_prepared(&self) -> &PreparedStatement {
        &self.inner
    }

    /// SQL text after escape processing
    pub fn native_sql(&self) -> &str {
        self.inner.native_sql()
    }

    /// Engine-assigned statement id
    pub fn statement_id(&self) -> StatementId {
        self.inner.statement_id()
    }

    /// Number of parameters
    pub fn parameter_count(&self) -> usize {
        self.inner.parameter_count()
    }

    /// Parameter descriptors in ordinal order
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        self.inner.parameters()
    }

    /// Resolve a parameter to its 1-based ordinal
    fn ordinal(&self, index: impl ParameterIndex) -> Result<usize> {
        let params = self.inner.params();
        params.check_open()?;
        Ok(index.resolve(params)? + 1)
    }

    /// Resolve a parameter that the engine reports as able to carry output
    fn output_slot(&self, index: impl ParameterIndex) -> Result<usize> {
        let params = self.inner.params();
        params.check_open()?;
        let slot = index.resolve(params)?;
        let mode = params.descriptor(slot).mode;
        if !mode.is_output() {
            return Err(Error::InvalidArgument(format!(
                "parameter {} is not an OUT or IN OUT parameter",
                slot + 1
            )));
        }
        Ok(slot)
    }

    // =========================================================================
    // OUT parameter registration
    // =========================================================================

    /// Declare an output parameter.
    ///
    /// The engine already knows every parameter's type and mode, so this
    /// only validates that the parameter can carry output.
    pub fn register_out_parameter(&mut self, index: impl ParameterIndex, sql_type: SqlType) -> Result<()> {
        let slot = self.output_slot(index)?;
        tracing::trace!(ordinal = slot + 1, sql_type = %sql_type, "Registered OUT parameter");
        Ok(())
    }

    /// Declare a DECIMAL or NUMERIC output parameter with a scale
    pub fn register_out_parameter_with_scale(
        &mut self,
        index: impl ParameterIndex,
        sql_type: SqlType,
        scale: u32,
    ) -> Result<()> {
        let slot = self.output_slot(index)?;
        tracing::trace!(ordinal = slot + 1, sql_type = %sql_type, scale = scale, "Registered OUT parameter");
        Ok(())
    }

    /// Declare a user-defined or REF output parameter
    pub fn register_out_parameter_with_type_name(
        &mut self,
        index: impl ParameterIndex,
        sql_type: SqlType,
        type_name: &str,
    ) -> Result<()> {
        let slot = self.output_slot(index)?;
        tracing::trace!(ordinal = slot + 1, sql_type = %sql_type, type_name = type_name, "Registered OUT parameter");
        Ok(())
    }

    // =========================================================================
    // Output getters
    // =========================================================================

    /// Fetch the raw value of an output parameter, recording NULL
    fn raw(&mut self, index: impl ParameterIndex) -> Result<(Value, SqlType)> {
        let slot = self.output_slot(index)?;
        let params = self.inner.params_mut();
        let value = params.value(slot).clone();
        params.record_null(&value);
        Ok((value, params.descriptor(slot).sql_type))
    }

    fn get<T: FromValue>(&mut self, index: impl ParameterIndex, zone: FixedOffset) -> Result<Option<T>> {
        let (value, source) = self.raw(index)?;
        convert::extract(&value, source, zone)
    }

    /// Whether the last output value read was SQL NULL
    pub fn was_null(&self) -> Result<bool> {
        let params = self.inner.params();
        params.check_open()?;
        Ok(params.was_null())
    }

    /// Read as a string
    pub fn get_string(&mut self, index: impl ParameterIndex) -> Result<Option<String>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a national character string
    pub fn get_nstring(&mut self, index: impl ParameterIndex) -> Result<Option<String>> {
        self.get_string(index)
    }

    /// Read as a boolean; NULL reads as `false`
    pub fn get_boolean(&mut self, index: impl ParameterIndex) -> Result<bool> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as a TINYINT; NULL reads as 0
    pub fn get_byte(&mut self, index: impl ParameterIndex) -> Result<i8> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as a SMALLINT; NULL reads as 0
    pub fn get_short(&mut self, index: impl ParameterIndex) -> Result<i16> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as an INTEGER; NULL reads as 0
    pub fn get_int(&mut self, index: impl ParameterIndex) -> Result<i32> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as a BIGINT; NULL reads as 0
    pub fn get_long(&mut self, index: impl ParameterIndex) -> Result<i64> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as a REAL; NULL reads as 0.0
    pub fn get_float(&mut self, index: impl ParameterIndex) -> Result<f32> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as a DOUBLE; NULL reads as 0.0
    pub fn get_double(&mut self, index: impl ParameterIndex) -> Result<f64> {
        Ok(self.get(index, self.inner.zone())?.unwrap_or_default())
    }

    /// Read as a decimal
    pub fn get_big_decimal(&mut self, index: impl ParameterIndex) -> Result<Option<Decimal>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a decimal rounded to `scale` fractional digits
    pub fn get_big_decimal_with_scale(&mut self, index: impl ParameterIndex, scale: u32) -> Result<Option<Decimal>> {
        Ok(self.get_big_decimal(index)?.map(|d| convert::rescale(d, scale)))
    }

    /// Read as bytes
    pub fn get_bytes(&mut self, index: impl ParameterIndex) -> Result<Option<Vec<u8>>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a date
    pub fn get_date(&mut self, index: impl ParameterIndex) -> Result<Option<NaiveDate>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a time of day
    pub fn get_time(&mut self, index: impl ParameterIndex) -> Result<Option<NaiveTime>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a timestamp
    pub fn get_timestamp(&mut self, index: impl ParameterIndex) -> Result<Option<NaiveDateTime>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a date, taking zoned values into `zone`
    pub fn get_date_in(&mut self, index: impl ParameterIndex, zone: FixedOffset) -> Result<Option<NaiveDate>> {
        self.get(index, zone)
    }

    /// Read as a time of day in `zone`
    pub fn get_time_in(&mut self, index: impl ParameterIndex, zone: FixedOffset) -> Result<Option<OffsetTime>> {
        Ok(self.get::<OffsetTime>(index, zone)?.map(|t| t.with_offset(zone)))
    }

    /// Read as a timestamp in `zone`; unzoned values are taken as local to `zone`
    pub fn get_timestamp_in(
        &mut self,
        index: impl ParameterIndex,
        zone: FixedOffset,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        Ok(self
            .get::<DateTime<FixedOffset>>(index, zone)?
            .map(|ts| ts.with_timezone(&zone)))
    }

    /// Read as a CLOB
    pub fn get_clob(&mut self, index: impl ParameterIndex) -> Result<Option<Clob>> {
        self.get(index, self.inner.zone())
    }

    /// Read as an NCLOB
    pub fn get_nclob(&mut self, index: impl ParameterIndex) -> Result<Option<NClob>> {
        self.get(index, self.inner.zone())
    }

    /// Read as a BLOB
    pub fn get_blob(&mut self, index: impl ParameterIndex) -> Result<Option<Blob>> {
        self.get(index, self.inner.zone())
    }

    /// Read as an array
    pub fn get_array(&mut self, index: impl ParameterIndex) -> Result<Option<Vec<Value>>> {
        self.get(index, self.inner.zone())
    }

    /// Read in the engine's own representation
    pub fn get_object(&mut self, index: impl ParameterIndex) -> Result<Value> {
        Ok(self.raw(index)?.0)
    }

    /// Read converted to `target`
    pub fn get_object_with(&mut self, index: impl ParameterIndex, target: TargetType) -> Result<Value> {
        let (value, source) = self.raw(index)?;
        convert::convert(&value, source, target, self.inner.zone())
    }

    /// Read as any type implementing [`FromValue`]
    pub fn get_object_as<T: FromValue>(&mut self, index: impl ParameterIndex) -> Result<Option<T>> {
        self.get(index, self.inner.zone())
    }

    /// Custom type maps are not supported
    pub fn get_object_with_type_map(
        &mut self,
        index: impl ParameterIndex,
        _type_map: &HashMap<String, String>,
    ) -> Result<Value> {
        self.output_slot(index)?;
        Err(Error::not_supported("custom type map"))
    }

    /// REF values are not supported
    pub fn get_ref(&mut self, index: impl ParameterIndex) -> Result<Value> {
        self.output_slot(index)?;
        Err(Error::not_supported("REF"))
    }

    /// DATALINK values are not supported
    pub fn get_url(&mut self, index: impl ParameterIndex) -> Result<String> {
        self.output_slot(index)?;
        Err(Error::not_supported("DATALINK"))
    }

    /// ROWID values are not supported
    pub fn get_row_id(&mut self, index: impl ParameterIndex) -> Result<Vec<u8>> {
        self.output_slot(index)?;
        Err(Error::not_supported("ROWID"))
    }

    /// SQLXML values are not supported
    pub fn get_sqlxml(&mut self, index: impl ParameterIndex) -> Result<String> {
        self.output_slot(index)?;
        Err(Error::not_supported("SQLXML"))
    }

    // =========================================================================
    // Input setters
    // =========================================================================

    /// Set a parameter to SQL NULL
    pub fn set_null(&mut self, index: impl ParameterIndex, sql_type: SqlType) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_null(ordinal, sql_type)
    }

    /// Set a boolean parameter
    pub fn set_boolean(&mut self, index: impl ParameterIndex, value: bool) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_boolean(ordinal, value)
    }

    /// Set a TINYINT parameter
    pub fn set_byte(&mut self, index: impl ParameterIndex, value: i8) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_byte(ordinal, value)
    }

    /// Set a SMALLINT parameter
    pub fn set_short(&mut self, index: impl ParameterIndex, value: i16) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_short(ordinal, value)
    }

    /// Set an INTEGER parameter
    pub fn set_int(&mut self, index: impl ParameterIndex, value: i32) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_int(ordinal, value)
    }

    /// Set a BIGINT parameter
    pub fn set_long(&mut self, index: impl ParameterIndex, value: i64) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_long(ordinal, value)
    }

    /// Set a REAL parameter
    pub fn set_float(&mut self, index: impl ParameterIndex, value: f32) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_float(ordinal, value)
    }

    /// Set a DOUBLE parameter
    pub fn set_double(&mut self, index: impl ParameterIndex, value: f64) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_double(ordinal, value)
    }

    /// Set a DECIMAL parameter
    pub fn set_big_decimal(&mut self, index: impl ParameterIndex, value: Decimal) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_big_decimal(ordinal, value)
    }

    /// Set a character parameter
    pub fn set_string(&mut self, index: impl ParameterIndex, value: impl Into<String>) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_string(ordinal, value)
    }

    /// Set a national character parameter
    pub fn set_nstring(&mut self, index: impl ParameterIndex, value: impl Into<String>) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_nstring(ordinal, value)
    }

    /// Set a binary parameter
    pub fn set_bytes(&mut self, index: impl ParameterIndex, value: &[u8]) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_bytes(ordinal, value)
    }

    /// Set a DATE parameter
    pub fn set_date(&mut self, index: impl ParameterIndex, value: NaiveDate) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_date(ordinal, value)
    }

    /// Set a TIME parameter
    pub fn set_time(&mut self, index: impl ParameterIndex, value: NaiveTime) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_time(ordinal, value)
    }

    /// Set a TIMESTAMP parameter
    pub fn set_timestamp(&mut self, index: impl ParameterIndex, value: NaiveDateTime) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_timestamp(ordinal, value)
    }

    /// Set a TIMESTAMP parameter given as a local time in `zone`
    pub fn set_timestamp_in(
        &mut self,
        index: impl ParameterIndex,
        value: NaiveDateTime,
        zone: FixedOffset,
    ) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_timestamp_in(ordinal, value, zone)
    }

    /// Set a CLOB parameter
    pub fn set_clob(&mut self, index: impl ParameterIndex, value: Clob) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_clob(ordinal, value)
    }

    /// Set an NCLOB parameter
    pub fn set_nclob(&mut self, index: impl ParameterIndex, value: NClob) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_nclob(ordinal, value)
    }

    /// Set a BLOB parameter
    pub fn set_blob(&mut self, index: impl ParameterIndex, value: Blob) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_blob(ordinal, value)
    }

    /// Set an ARRAY parameter
    pub fn set_array(&mut self, index: impl ParameterIndex, value: Vec<Value>) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_array(ordinal, value)
    }

    /// Set a parameter from any value; it is coerced to the declared type
    pub fn set_object(&mut self, index: impl ParameterIndex, value: impl Into<Value>) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_object(ordinal, value)
    }

    /// Set a parameter after converting the value to `sql_type`
    pub fn set_object_with_type(
        &mut self,
        index: impl ParameterIndex,
        value: impl Into<Value>,
        sql_type: SqlType,
    ) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_object_with_type(ordinal, value, sql_type)
    }

    /// DATALINK parameters are not supported
    pub fn set_url(&mut self, index: impl ParameterIndex, value: &str) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_url(ordinal, value)
    }

    /// ROWID parameters are not supported
    pub fn set_row_id(&mut self, index: impl ParameterIndex, value: &[u8]) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_row_id(ordinal, value)
    }

    /// SQLXML parameters are not supported
    pub fn set_sqlxml(&mut self, index: impl ParameterIndex, value: &str) -> Result<()> {
        let ordinal = self.ordinal(index)?;
        self.inner.set_sqlxml(ordinal, value)
    }

    /// Forget all bound parameter values
    pub fn clear_parameters(&mut self) -> Result<()> {
        self.inner.clear_parameters()
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Limit the number of rows any result set may hold; 0 means no limit
    pub fn set_max_rows(&mut self, max_rows: u64) -> Result<()> {
        self.inner.set_max_rows(max_rows)
    }

    /// Hint how many rows the engine should hand over at a time
    pub fn set_fetch_size(&mut self, fetch_size: u32) -> Result<()> {
        self.inner.set_fetch_size(fetch_size)
    }

    /// Limit how long one execution may run
    pub fn set_query_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_query_timeout(timeout)
    }

    /// Choose the type of result sets produced by this call
    pub fn set_result_set_type(&mut self, result_set_type: ResultSetType, concurrency: Concurrency) -> Result<()> {
        self.inner.set_result_set_type(result_set_type, concurrency)
    }

    /// Execute the call, returning `true` if the first result is a result set
    pub async fn execute(&mut self) -> Result<bool> {
        self.inner.execute().await
    }

    /// Execute the call and return its first result set.
    ///
    /// Update counts produced before the first result set are skipped. A
    /// function call written as `{?= call f(...)}` returns its value this way.
    pub async fn execute_query(&mut self) -> Result<ResultSet> {
        self.inner.execute_until_rows().await
    }

    /// Execute a call that does not return rows, returning the update count
    pub async fn execute_update(&mut self) -> Result<u64> {
        self.inner.execute_update().await
    }

    /// Take the current result if it is a result set
    pub fn result_set(&mut self) -> Result<Option<ResultSet>> {
        self.inner.result_set()
    }

    /// Current result if it is an update count
    pub fn update_count(&self) -> Result<Option<u64>> {
        self.inner.update_count()
    }

    /// Move to the next result, returning `true` if it is a result set
    pub fn more_results(&mut self) -> Result<bool> {
        self.inner.more_results()
    }

    /// Ask the engine to stop the running call
    pub async fn cancel(&self) -> Result<()> {
        self.inner.cancel().await
    }

    /// Release the statement; closing twice is a no-op
    pub async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }

    /// Check if [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
