//! Result sets
//!
//! A [`ResultSet`] holds the materialised rows of one result together with
//! its column metadata. Forward-only and scroll-insensitive navigation are
//! supported; result sets are always read-only.
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry_client::{Connection, Result};
//!
//! # async fn example(conn: Connection) -> Result<()> {
//! let mut rs = conn.query("SELECT ID, NAME FROM CUSTOMER ORDER BY ID").await?;
//! while rs.next()? {
//!     let id = rs.get_int(1)?;
//!     let name = rs.get_string("name")?;
//!     println!("{}: {:?}", id, name);
//! }
//! rs.close();
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::constants::{Concurrency, ResultSetType, SqlType};
use crate::convert::{self, FromValue, TargetType};
use crate::error::{Error, Result};
use crate::row::{Row, Value};
use crate::session::RowSet;
use crate::statement::ColumnInfo;
use crate::types::{Blob, Clob, NClob, OffsetTime};

/// Addresses a result column by 1-based index or by label
pub trait ColumnIndex {
    /// Resolve to a 0-based column position
    fn resolve(&self, rs: &ResultSet) -> Result<usize>;
}

impl ColumnIndex for usize {
    fn resolve(&self, rs: &ResultSet) -> Result<usize> {
        let count = rs.columns.len();
        if *self == 0 || *self > count {
            return Err(Error::InvalidColumnIndex { index: *self, count });
        }
        Ok(*self - 1)
    }
}

impl ColumnIndex for &str {
    fn resolve(&self, rs: &ResultSet) -> Result<usize> {
        rs.find_column(self)?.resolve(rs)
    }
}

impl ColumnIndex for String {
    fn resolve(&self, rs: &ResultSet) -> Result<usize> {
        self.as_str().resolve(rs)
    }
}

impl ColumnIndex for &String {
    fn resolve(&self, rs: &ResultSet) -> Result<usize> {
        self.as_str().resolve(rs)
    }
}

/// Materialised, read-only result set
#[derive(Debug, Clone)]
pub struct ResultSet {
    columns: Vec<ColumnInfo>,
    rows: Vec<Row>,
    /// Cursor position: 0 is before the first row, `rows.len() + 1` after the last
    position: usize,
    result_set_type: ResultSetType,
    close_on_completion: bool,
    zone: FixedOffset,
    was_null: bool,
    closed: bool,
}

impl ResultSet {
    /// Create a forward-only result set over `rows`
    pub fn new(rows: RowSet, zone: FixedOffset) -> Self {
        Self {
            columns: rows.columns,
            rows: rows.rows,
            position: 0,
            result_set_type: ResultSetType::ForwardOnly,
            close_on_completion: false,
            zone,
            was_null: false,
            closed: false,
        }
    }

    /// Set the result set type; sensitive scrolling is served as insensitive
    pub fn with_type(mut self, result_set_type: ResultSetType) -> Self {
        self.result_set_type = match result_set_type {
            ResultSetType::ScrollSensitive => ResultSetType::ScrollInsensitive,
            other => other,
        };
        self
    }

    /// Mark the result set so that closing it also ends the statement that
    /// produced it
    pub fn with_close_on_completion(mut self) -> Self {
        self.close_on_completion = true;
        self
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::ResultSetClosed);
        }
        Ok(())
    }

    fn check_scrollable(&self) -> Result<()> {
        self.check_open()?;
        if self.result_set_type == ResultSetType::ForwardOnly {
            return Err(Error::InvalidArgument(
                "result set is forward only".to_string(),
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Column metadata
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 1-based index of the column with this label, compared case-insensitively
    pub fn find_column(&self, label: &str) -> Result<usize> {
        self.check_open()?;
        self.columns
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(label))
            .map(|i| i + 1)
            .ok_or_else(|| Error::ColumnNotFound(label.to_string()))
    }

    /// Result set type
    pub fn result_set_type(&self) -> ResultSetType {
        self.result_set_type
    }

    /// Always read-only
    pub fn concurrency(&self) -> Concurrency {
        Concurrency::ReadOnly
    }

    /// Whether closing this result set ends its producing statement
    pub fn is_close_on_completion(&self) -> bool {
        self.close_on_completion
    }

    /// Number of rows held
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn after_last_position(&self) -> usize {
        self.rows.len() + 1
    }

    fn on_row(&self) -> bool {
        self.position >= 1 && self.position <= self.rows.len()
    }

    /// Advance to the next row; false once past the last row
    pub fn next(&mut self) -> Result<bool> {
        self.check_open()?;
        if self.position < self.after_last_position() {
            self.position += 1;
        }
        Ok(self.on_row())
    }

    /// Move back to the previous row
    pub fn previous(&mut self) -> Result<bool> {
        self.check_scrollable()?;
        if self.position > 0 {
            self.position -= 1;
        }
        Ok(self.on_row())
    }

    /// Move to the first row
    pub fn first(&mut self) -> Result<bool> {
        self.absolute(1)
    }

    /// Move to the last row
    pub fn last(&mut self) -> Result<bool> {
        self.absolute(-1)
    }

    /// Move before the first row
    pub fn before_first(&mut self) -> Result<()> {
        self.check_scrollable()?;
        self.position = 0;
        Ok(())
    }

    /// Move after the last row
    pub fn after_last(&mut self) -> Result<()> {
        self.check_scrollable()?;
        self.position = self.after_last_position();
        Ok(())
    }

    /// Move to an absolute row; negative values count back from the end
    pub fn absolute(&mut self, row: i64) -> Result<bool> {
        self.check_scrollable()?;
        let count = self.rows.len() as i64;
        let target = if row < 0 { count + 1 + row } else { row };
        self.position = target.clamp(0, count + 1) as usize;
        Ok(self.on_row())
    }

    /// Move `rows` rows forward (or backward when negative)
    pub fn relative(&mut self, rows: i64) -> Result<bool> {
        self.check_scrollable()?;
        let count = self.rows.len() as i64;
        self.position = (self.position as i64 + rows).clamp(0, count + 1) as usize;
        Ok(self.on_row())
    }

    /// Current 1-based row number, 0 when not on a row
    pub fn row(&self) -> Result<usize> {
        self.check_open()?;
        Ok(if self.on_row() { self.position } else { 0 })
    }

    /// Check if positioned before the first row of a non-empty result
    pub fn is_before_first(&self) -> Result<bool> {
        self.check_open()?;
        Ok(!self.rows.is_empty() && self.position == 0)
    }

    /// Check if positioned after the last row of a non-empty result
    pub fn is_after_last(&self) -> Result<bool> {
        self.check_open()?;
        Ok(!self.rows.is_empty() && self.position == self.after_last_position())
    }

    /// Check if on the first row
    pub fn is_first(&self) -> Result<bool> {
        self.check_open()?;
        Ok(self.on_row() && self.position == 1)
    }

    /// Check if on the last row
    pub fn is_last(&self) -> Result<bool> {
        self.check_open()?;
        Ok(self.on_row() && self.position == self.rows.len())
    }

    // =========================================================================
    // Value access
    // =========================================================================

    fn current_row(&self) -> Result<&Row> {
        self.check_open()?;
        if !self.on_row() {
            return Err(Error::NoCurrentRow("not positioned on a row"));
        }
        Ok(&self.rows[self.position - 1])
    }

    /// Fetch the raw value and its column type, recording NULL
    fn raw(&mut self, index: impl ColumnIndex) -> Result<(Value, SqlType)> {
        self.check_open()?;
        let col = index.resolve(self)?;
        let value = self
            .current_row()?
            .get(col)
            .cloned()
            .ok_or_else(|| Error::Protocol(format!("row has no value for column {}", col + 1)))?;
        self.was_null = value.is_null();
        Ok((value, self.columns[col].sql_type))
    }

    fn get<T: FromValue>(&mut self, index: impl ColumnIndex, zone: FixedOffset) -> Result<Option<T>> {
        let (value, source) = self.raw(index)?;
        convert::extract(&value, source, zone)
    }

    /// Whether the last value read was SQL NULL
    pub fn was_null(&self) -> Result<bool> {
        self.check_open()?;
        Ok(self.was_null)
    }

    /// Read as a string
    pub fn get_string(&mut self, index: impl ColumnIndex) -> Result<Option<String>> {
        self.get(index, self.zone)
    }

    /// Read as a national character string
    pub fn get_nstring(&mut self, index: impl ColumnIndex) -> Result<Option<String>> {
        self.get_string(index)
    }

    /// Read as a boolean; NULL reads as false
    pub fn get_boolean(&mut self, index: impl ColumnIndex) -> Result<bool> {
        Ok(self.get(index, self.zone)?.unwrap_or(false))
    }

    /// Read as an i8; NULL reads as 0
    pub fn get_byte(&mut self, index: impl ColumnIndex) -> Result<i8> {
        Ok(self.get(index, self.zone)?.unwrap_or(0))
    }

    /// Read as an i16; NULL reads as 0
    pub fn get_short(&mut self, index: impl ColumnIndex) -> Result<i16> {
        Ok(self.get(index, self.zone)?.unwrap_or(0))
    }

    /// Read as an i32; NULL reads as 0
    pub fn get_int(&mut self, index: impl ColumnIndex) -> Result<i32> {
        Ok(self.get(index, self.zone)?.unwrap_or(0))
    }

    /// Read as an i64; NULL reads as 0
    pub fn get_long(&mut self, index: impl ColumnIndex) -> Result<i64> {
        Ok(self.get(index, self.zone)?.unwrap_or(0))
    }

    /// Read as an f32; NULL reads as 0.0
    pub fn get_float(&mut self, index: impl ColumnIndex) -> Result<f32> {
        Ok(self.get(index, self.zone)?.unwrap_or(0.0))
    }

    /// Read as an f64; NULL reads as 0.0
    pub fn get_double(&mut self, index: impl ColumnIndex) -> Result<f64> {
        Ok(self.get(index, self.zone)?.unwrap_or(0.0))
    }

    /// Read as a decimal
    pub fn get_big_decimal(&mut self, index: impl ColumnIndex) -> Result<Option<Decimal>> {
        self.get(index, self.zone)
    }

    /// Read as a decimal rounded to `scale` fractional digits
    pub fn get_big_decimal_with_scale(&mut self, index: impl ColumnIndex, scale: u32) -> Result<Option<Decimal>> {
        Ok(self.get_big_decimal(index)?.map(|d| convert::rescale(d, scale)))
    }

    /// Read as bytes
    pub fn get_bytes(&mut self, index: impl ColumnIndex) -> Result<Option<Vec<u8>>> {
        self.get(index, self.zone)
    }

    /// Read as a date
    pub fn get_date(&mut self, index: impl ColumnIndex) -> Result<Option<NaiveDate>> {
        self.get(index, self.zone)
    }

    /// Read as a time of day
    pub fn get_time(&mut self, index: impl ColumnIndex) -> Result<Option<NaiveTime>> {
        self.get(index, self.zone)
    }

    /// Read as a timestamp
    pub fn get_timestamp(&mut self, index: impl ColumnIndex) -> Result<Option<NaiveDateTime>> {
        self.get(index, self.zone)
    }

    /// Read as a date, taking zoned values into `zone`
    pub fn get_date_in(&mut self, index: impl ColumnIndex, zone: FixedOffset) -> Result<Option<NaiveDate>> {
        self.get(index, zone)
    }

    /// Read as a time of day in `zone`
    pub fn get_time_in(&mut self, index: impl ColumnIndex, zone: FixedOffset) -> Result<Option<OffsetTime>> {
        Ok(self.get::<OffsetTime>(index, zone)?.map(|t| t.with_offset(zone)))
    }

    /// Read as a timestamp in `zone`; unzoned values are taken as local to `zone`
    pub fn get_timestamp_in(
        &mut self,
        index: impl ColumnIndex,
        zone: FixedOffset,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        Ok(self
            .get::<DateTime<FixedOffset>>(index, zone)?
            .map(|ts| ts.with_timezone(&zone)))
    }

    /// Read as a CLOB
    pub fn get_clob(&mut self, index: impl ColumnIndex) -> Result<Option<Clob>> {
        self.get(index, self.zone)
    }

    /// Read as an NCLOB
    pub fn get_nclob(&mut self, index: impl ColumnIndex) -> Result<Option<NClob>> {
        self.get(index, self.zone)
    }

    /// Read as a BLOB
    pub fn get_blob(&mut self, index: impl ColumnIndex) -> Result<Option<Blob>> {
        self.get(index, self.zone)
    }

    /// Read as an array
    pub fn get_array(&mut self, index: impl ColumnIndex) -> Result<Option<Vec<Value>>> {
        self.get(index, self.zone)
    }

    /// Read in the engine's own representation
    pub fn get_object(&mut self, index: impl ColumnIndex) -> Result<Value> {
        Ok(self.raw(index)?.0)
    }

    /// Read converted to `target`
    pub fn get_object_with(&mut self, index: impl ColumnIndex, target: TargetType) -> Result<Value> {
        let (value, source) = self.raw(index)?;
        convert::convert(&value, source, target, self.zone)
    }

    /// Read as any type implementing [`FromValue`]
    pub fn get_object_as<T: FromValue>(&mut self, index: impl ColumnIndex) -> Result<Option<T>> {
        self.get(index, self.zone)
    }

    /// REF values are not supported
    pub fn get_ref(&mut self, _index: impl ColumnIndex) -> Result<Value> {
        self.check_open()?;
        Err(Error::not_supported("REF"))
    }

    /// DATALINK values are not supported
    pub fn get_url(&mut self, _index: impl ColumnIndex) -> Result<String> {
        self.check_open()?;
        Err(Error::not_supported("DATALINK"))
    }

    /// ROWID values are not supported
    pub fn get_row_id(&mut self, _index: impl ColumnIndex) -> Result<Vec<u8>> {
        self.check_open()?;
        Err(Error::not_supported("ROWID"))
    }

    /// SQLXML values are not supported
    pub fn get_sqlxml(&mut self, _index: impl ColumnIndex) -> Result<String> {
        self.check_open()?;
        Err(Error::not_supported("SQLXML"))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release the rows
    pub fn close(&mut self) {
        self.rows.clear();
        self.position = 0;
        self.closed = true;
    }

    /// Check if [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consume the result set, returning the remaining rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
