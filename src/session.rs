//! Engine session boundary
//!
//! The engine (parser, planner, storage, transactions) lives behind the
//! [`Session`] trait. The client layer only sends SQL text and bound
//! parameter values, and receives descriptors, chained results and the
//! post-execution parameter values.
//!
//! A single execution may produce several results, e.g. a procedure that
//! returns dynamic result sets and update counts. They arrive in order as a
//! [`ResultChain`].

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::constants::{Concurrency, ResultSetType};
use crate::error::Result;
use crate::row::{Row, Value};
use crate::statement::{ColumnInfo, ParameterDescriptor, StatementType};

/// Engine-assigned identifier of a prepared statement
pub type StatementId = u64;

/// Everything the engine determines when preparing a statement
#[derive(Debug, Clone)]
pub struct PreparedDescriptor {
    /// Identifier for later execution and release
    pub statement_id: StatementId,
    /// Statement kind
    pub statement_type: StatementType,
    /// Parameter descriptors, in ordinal order
    pub parameters: Vec<ParameterDescriptor>,
    /// Result columns, empty when the statement produces no rows
    pub columns: Vec<ColumnInfo>,
}

impl PreparedDescriptor {
    /// Create a descriptor
    pub fn new(statement_id: StatementId, statement_type: StatementType) -> Self {
        Self {
            statement_id,
            statement_type,
            parameters: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Set the parameter descriptors
    pub fn with_parameters(mut self, parameters: Vec<ParameterDescriptor>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the result columns
    pub fn with_columns(mut self, columns: Vec<ColumnInfo>) -> Self {
        self.columns = columns;
        self
    }
}

/// One execution sent to the engine
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    /// Prepared statement to run; `None` for direct execution of `sql`
    pub statement_id: Option<StatementId>,
    /// Native SQL text
    pub sql: String,
    /// One value per parameter; OUT slots are NULL
    pub parameters: Vec<Value>,
    /// Row limit, 0 for none
    pub max_rows: u64,
    /// Fetch size hint, 0 for the engine default
    pub fetch_size: u32,
    /// Execution time limit
    pub query_timeout: Option<Duration>,
    /// Requested result set type
    pub result_set_type: ResultSetType,
    /// Requested concurrency
    pub concurrency: Concurrency,
}

impl ExecuteRequest {
    /// Direct execution of SQL text without parameters
    pub fn direct(sql: impl Into<String>) -> Self {
        Self {
            statement_id: None,
            sql: sql.into(),
            parameters: Vec::new(),
            max_rows: 0,
            fetch_size: 0,
            query_timeout: None,
            result_set_type: ResultSetType::ForwardOnly,
            concurrency: Concurrency::ReadOnly,
        }
    }

    /// Execution of a prepared statement
    pub fn prepared(statement_id: StatementId, sql: impl Into<String>, parameters: Vec<Value>) -> Self {
        Self {
            statement_id: Some(statement_id),
            parameters,
            ..Self::direct(sql)
        }
    }

    /// Set the row limit
    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Set the fetch size hint
    pub fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = fetch_size;
        self
    }

    /// Set the execution time limit
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set result set type and concurrency
    pub fn with_result_set_type(mut self, result_set_type: ResultSetType, concurrency: Concurrency) -> Self {
        self.result_set_type = result_set_type;
        self.concurrency = concurrency;
        self
    }
}

/// Rows and column metadata of one result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column metadata
    pub columns: Vec<ColumnInfo>,
    /// Rows
    pub rows: Vec<Row>,
}

impl RowSet {
    /// Create a new row set
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create an empty row set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if this row set has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

impl IntoIterator for RowSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// One result of an execution
#[derive(Debug, Clone, PartialEq)]
pub enum ResultItem {
    /// A result set
    Rows(RowSet),
    /// Number of rows affected
    UpdateCount(u64),
}

impl ResultItem {
    /// Check if this result is a result set
    pub fn is_rows(&self) -> bool {
        matches!(self, ResultItem::Rows(_))
    }
}

/// Ordered results of one execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultChain {
    items: VecDeque<ResultItem>,
}

impl ResultChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result
    pub fn push(&mut self, item: ResultItem) {
        self.items.push_back(item);
    }

    /// Append a result set
    pub fn push_rows(&mut self, rows: RowSet) {
        self.push(ResultItem::Rows(rows));
    }

    /// Append an update count
    pub fn push_update_count(&mut self, count: u64) {
        self.push(ResultItem::UpdateCount(count));
    }

    /// Take the next result
    pub fn pop(&mut self) -> Option<ResultItem> {
        self.items.pop_front()
    }

    /// Peek at the next result
    pub fn peek(&self) -> Option<&ResultItem> {
        self.items.front()
    }

    /// Get the number of results left
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if no results are left
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an iterator over the remaining results
    pub fn iter(&self) -> impl Iterator<Item = &ResultItem> {
        self.items.iter()
    }
}

impl From<Vec<ResultItem>> for ResultChain {
    fn from(items: Vec<ResultItem>) -> Self {
        Self { items: items.into() }
    }
}

impl IntoIterator for ResultChain {
    type Item = ResultItem;
    type IntoIter = std::collections::vec_deque::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Engine response to an execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Results in the order the engine produced them
    pub results: ResultChain,
    /// Parameter values after execution, one per parameter; empty when the
    /// statement has no output parameters
    pub out_values: Vec<Value>,
}

impl Response {
    /// Response carrying a single result set
    pub fn rows(rows: RowSet) -> Self {
        Self {
            results: ResultChain::from(vec![ResultItem::Rows(rows)]),
            out_values: Vec::new(),
        }
    }

    /// Response carrying a single update count
    pub fn update_count(count: u64) -> Self {
        Self {
            results: ResultChain::from(vec![ResultItem::UpdateCount(count)]),
            out_values: Vec::new(),
        }
    }

    /// Set the post-execution parameter values
    pub fn with_out_values(mut self, out_values: Vec<Value>) -> Self {
        self.out_values = out_values;
        self
    }
}

/// Connection to the engine.
///
/// Implementations must be thread-safe; the client shares one session
/// between all statements of a connection.
#[async_trait]
pub trait Session: Send + Sync + fmt::Debug {
    // --- Statements ---

    /// Prepare SQL and describe its parameters and result columns
    async fn prepare(&self, sql: &str) -> Result<PreparedDescriptor>;

    /// Execute a prepared statement or direct SQL
    async fn execute(&self, request: ExecuteRequest) -> Result<Response>;

    /// Release a prepared statement
    async fn close_statement(&self, statement_id: StatementId) -> Result<()>;

    /// Cancel a running execution
    async fn cancel_statement(&self, statement_id: StatementId) -> Result<()>;

    // --- Transactions ---

    /// Commit the current transaction
    async fn commit(&self) -> Result<()>;

    /// Roll back the current transaction
    async fn rollback(&self) -> Result<()>;

    /// Switch auto-commit on or off
    async fn set_auto_commit(&self, auto_commit: bool) -> Result<()>;

    // --- Lifecycle ---

    /// End the session
    async fn close(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SqlType;

    #[test]
    fn test_row_set_creation() {
        let columns = vec![
            ColumnInfo::new("ID", SqlType::Integer),
            ColumnInfo::new("NAME", SqlType::VarChar),
        ];
        let rows = vec![Row::new(vec![Value::Integer(1), Value::from("Alice")])];
        let set = RowSet::new(columns, rows);

        assert_eq!(set.column_count(), 2);
        assert_eq!(set.row_count(), 1);
        assert!(!set.is_empty());
        assert!(set.column("name").is_some());
        assert!(set.column("MISSING").is_none());
        assert!(RowSet::empty().is_empty());
    }

    #[test]
    fn test_result_chain_order() {
        let mut chain = ResultChain::new();
        assert!(chain.is_empty());

        chain.push_update_count(3);
        chain.push_rows(RowSet::empty());
        chain.push_update_count(0);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.peek(), Some(&ResultItem::UpdateCount(3)));

        assert_eq!(chain.pop(), Some(ResultItem::UpdateCount(3)));
        assert!(chain.pop().is_some_and(|item| item.is_rows()));
        assert_eq!(chain.pop(), Some(ResultItem::UpdateCount(0)));
        assert_eq!(chain.pop(), None);
    }

    #[test]
    fn test_execute_request_builders() {
        let req = ExecuteRequest::prepared(7, "CALL p(?)", vec![Value::Integer(1)])
            .with_max_rows(10)
            .with_fetch_size(100)
            .with_query_timeout(Some(Duration::from_secs(5)))
            .with_result_set_type(ResultSetType::ScrollInsensitive, Concurrency::ReadOnly);

        assert_eq!(req.statement_id, Some(7));
        assert_eq!(req.parameters.len(), 1);
        assert_eq!(req.max_rows, 10);
        assert_eq!(req.fetch_size, 100);
        assert_eq!(req.query_timeout, Some(Duration::from_secs(5)));
        assert_eq!(req.result_set_type, ResultSetType::ScrollInsensitive);

        let direct = ExecuteRequest::direct("CALL USER()");
        assert_eq!(direct.statement_id, None);
        assert_eq!(direct.result_set_type, ResultSetType::ForwardOnly);
    }

    #[test]
    fn test_response_constructors() {
        let resp = Response::update_count(2).with_out_values(vec![Value::Integer(42)]);
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.out_values, vec![Value::Integer(42)]);
        assert!(Response::rows(RowSet::empty()).results.peek().is_some_and(ResultItem::is_rows));
    }
}
