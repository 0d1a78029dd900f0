//! Scripted engine session shared by the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quarry_client::{
    ColumnInfo, Config, Connection, Error, ExecuteRequest, ParameterDescriptor, PreparedDescriptor,
    Response, Result, Row, RowSet, Session, SqlType, StatementId, StatementType, Value,
};

#[derive(Debug, Default)]
struct State {
    next_id: StatementId,
    descriptors: HashMap<String, PreparedDescriptor>,
    responses: HashMap<String, VecDeque<Response>>,
    prepared: Vec<String>,
    executed: Vec<ExecuteRequest>,
    closed_statements: Vec<StatementId>,
    commits: usize,
    rollbacks: usize,
    auto_commit: Option<bool>,
    closed: bool,
}

/// Session that answers from scripted descriptors and responses.
///
/// SQL without a scripted response gets an empty result set for queries and
/// an update count of 0 otherwise.
#[derive(Debug, Default, Clone)]
pub struct MockSession {
    state: Arc<Mutex<State>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe `sql` with the given parameters when it is prepared
    pub fn describe(&self, sql: &str, statement_type: StatementType, parameters: Vec<ParameterDescriptor>) {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let descriptor = PreparedDescriptor::new(state.next_id, statement_type).with_parameters(parameters);
        state.descriptors.insert(sql.to_string(), descriptor);
    }

    /// Queue a response for the next execution of `sql`
    pub fn respond(&self, sql: &str, response: Response) {
        self.state
            .lock()
            .unwrap()
            .responses
            .entry(sql.to_string())
            .or_default()
            .push_back(response);
    }

    /// Answer `sql` with a single-column, single-row result
    pub fn respond_scalar(&self, sql: &str, column: &str, sql_type: SqlType, value: Value) {
        self.respond(sql, Response::rows(rows(&[(column, sql_type)], vec![vec![value]])));
    }

    /// SQL text of every execution, in order
    pub fn executed_sql(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.iter().map(|r| r.sql.clone()).collect()
    }

    /// Last execution request
    pub fn last_request(&self) -> Option<ExecuteRequest> {
        self.state.lock().unwrap().executed.last().cloned()
    }

    /// SQL text of every prepare call, in order
    pub fn prepared_sql(&self) -> Vec<String> {
        self.state.lock().unwrap().prepared.clone()
    }

    pub fn closed_statements(&self) -> Vec<StatementId> {
        self.state.lock().unwrap().closed_statements.clone()
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }

    pub fn auto_commit(&self) -> Option<bool> {
        self.state.lock().unwrap().auto_commit
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[async_trait]
impl Session for MockSession {
    async fn prepare(&self, sql: &str) -> Result<PreparedDescriptor> {
        let mut state = self.state.lock().unwrap();
        state.prepared.push(sql.to_string());
        if let Some(descriptor) = state.descriptors.get(sql) {
            return Ok(descriptor.clone());
        }
        state.next_id += 1;
        Ok(PreparedDescriptor::new(state.next_id, StatementType::Other))
    }

    async fn execute(&self, request: ExecuteRequest) -> Result<Response> {
        let mut state = self.state.lock().unwrap();
        let sql = request.sql.clone();
        state.executed.push(request);
        if let Some(response) = state.responses.get_mut(&sql).and_then(VecDeque::pop_front) {
            return Ok(response);
        }
        let upper = sql.trim_start().to_ascii_uppercase();
        if upper.starts_with("SELECT") || upper.starts_with("CALL") || upper.starts_with("VALUES") {
            Ok(Response::rows(RowSet::empty()))
        } else {
            Ok(Response::update_count(0))
        }
    }

    async fn close_statement(&self, statement_id: StatementId) -> Result<()> {
        self.state.lock().unwrap().closed_statements.push(statement_id);
        Ok(())
    }

    async fn cancel_statement(&self, _statement_id: StatementId) -> Result<()> {
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.state.lock().unwrap().commits += 1;
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }

    async fn set_auto_commit(&self, auto_commit: bool) -> Result<()> {
        self.state.lock().unwrap().auto_commit = Some(auto_commit);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(Error::ConnectionClosed);
        }
        state.closed = true;
        Ok(())
    }
}

/// Build a row set from `(name, type)` column pairs and raw rows
pub fn rows(columns: &[(&str, SqlType)], data: Vec<Vec<Value>>) -> RowSet {
    RowSet::new(
        columns.iter().map(|(name, ty)| ColumnInfo::new(*name, *ty)).collect(),
        data.into_iter().map(Row::new).collect(),
    )
}

/// Connection over a fresh mock session with logging switched off
pub fn connect(config: &str) -> (Connection, MockSession) {
    let session = MockSession::new();
    let config: Config = config.parse().expect("valid connection string");
    let conn = Connection::new(Arc::new(session.clone()), config.with_log_level("off"));
    (conn, session)
}
