//! Connections
//!
//! A [`Connection`] pairs an engine [`Session`] with its [`Config`]. It is
//! cheap to clone; every clone, statement and metadata handle shares the
//! same session and closed flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::callable::CallableStatement;
use crate::config::Config;
use crate::constants::{Concurrency, ResultSetType};
use crate::error::{Error, Result};
use crate::logging::{self, LogConfig};
use crate::metadata::DatabaseMetaData;
use crate::prepared::PreparedStatement;
use crate::result_set::ResultSet;
use crate::session::{ExecuteRequest, ResultItem, Session};
use crate::statement;

/// State shared by a connection and everything created from it
#[derive(Debug)]
pub(crate) struct ConnectionInner {
    pub(crate) session: Arc<dyn Session>,
    pub(crate) config: Config,
    closed: AtomicBool,
    auto_commit: AtomicBool,
}

impl ConnectionInner {
    pub(crate) fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }

    /// Execute SQL directly and return its first result, which must be rows
    pub(crate) async fn query_direct(&self, sql: &str, result_set_type: ResultSetType) -> Result<ResultSet> {
        self.check_open()?;
        let request = ExecuteRequest::direct(sql)
            .with_fetch_size(self.config.fetch_size)
            .with_result_set_type(result_set_type, Concurrency::ReadOnly);
        let mut response = self.session.execute(request).await?;
        match response.results.pop() {
            Some(ResultItem::Rows(rows)) => {
                Ok(ResultSet::new(rows, self.config.time_zone).with_type(result_set_type))
            }
            _ => Err(Error::NoResultSet),
        }
    }
}

/// A connection to a Quarry database.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use quarry_client::{Config, Connection, Result, Session};
///
/// # async fn example(session: Arc<dyn Session>) -> Result<()> {
/// let config: Config = "quarry:mem:test".parse()?;
/// let conn = Connection::new(session, config);
///
/// conn.execute("CREATE TABLE T (ID INT PRIMARY KEY, NAME VARCHAR(40))").await?;
///
/// let mut insert = conn.prepare_statement("INSERT INTO T VALUES (?, ?)").await?;
/// insert.set_int(1, 1)?;
/// insert.set_string(2, "first")?;
/// insert.execute_update().await?;
///
/// let mut rs = conn.query("SELECT NAME FROM T").await?;
/// while rs.next()? {
///     println!("{:?}", rs.get_string(1)?);
/// }
///
/// conn.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    /// Wrap an engine session.
    ///
    /// The first connection created in a process also installs the logging
    /// subscriber described by the configuration.
    pub fn new(session: Arc<dyn Session>, config: Config) -> Self {
        logging::init_logging(&LogConfig::from(&config));
        tracing::debug!(url = %config.url(), user = %config.username, "Opened connection");
        Self {
            inner: Arc::new(ConnectionInner {
                session,
                config,
                closed: AtomicBool::new(false),
                auto_commit: AtomicBool::new(true),
            }),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Prepare a statement with `?` parameter markers
    pub async fn prepare_statement(&self, sql: &str) -> Result<PreparedStatement> {
        PreparedStatement::prepare(Arc::clone(&self.inner), sql).await
    }

    /// Prepare a procedure or function call, e.g. `{call P(?, ?)}`
    pub async fn prepare_call(&self, sql: &str) -> Result<CallableStatement> {
        CallableStatement::prepare(Arc::clone(&self.inner), sql).await
    }

    /// Run a query without parameters and return its rows
    pub async fn query(&self, sql: &str) -> Result<ResultSet> {
        let native = statement::native_sql(sql);
        tracing::debug!(sql = native.as_str(), "Executing query");
        self.inner.query_direct(&native, ResultSetType::ForwardOnly).await
    }

    /// Run a statement without parameters that does not return rows,
    /// returning its update count
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        self.inner.check_open()?;
        let native = statement::native_sql(sql);
        tracing::debug!(sql = native.as_str(), "Executing statement");
        let mut response = self.inner.session.execute(ExecuteRequest::direct(native)).await?;
        match response.results.pop() {
            Some(ResultItem::Rows(_)) => Err(Error::UnexpectedResultSet),
            Some(ResultItem::UpdateCount(count)) => Ok(count),
            None => Ok(0),
        }
    }

    /// SQL text as the engine would receive it, after escape processing
    pub fn native_sql(&self, sql: &str) -> Result<String> {
        self.inner.check_open()?;
        Ok(statement::native_sql(sql))
    }

    /// Catalog and capability metadata for this connection
    pub fn metadata(&self) -> Result<DatabaseMetaData> {
        self.inner.check_open()?;
        Ok(DatabaseMetaData::new(Arc::clone(&self.inner)))
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Commit the current transaction
    pub async fn commit(&self) -> Result<()> {
        self.inner.check_open()?;
        tracing::debug!("Commit");
        self.inner.session.commit().await
    }

    /// Roll back the current transaction
    pub async fn rollback(&self) -> Result<()> {
        self.inner.check_open()?;
        tracing::debug!("Rollback");
        self.inner.session.rollback().await
    }

    /// Switch auto-commit on or off
    pub async fn set_auto_commit(&self, auto_commit: bool) -> Result<()> {
        self.inner.check_open()?;
        self.inner.session.set_auto_commit(auto_commit).await?;
        self.inner.auto_commit.store(auto_commit, Ordering::Relaxed);
        Ok(())
    }

    /// Whether every statement commits on completion
    pub fn auto_commit(&self) -> bool {
        self.inner.auto_commit.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the connection.
    ///
    /// Statements created from it fail with [`Error::ConnectionClosed`] on
    /// their next execution. Closing twice is a no-op.
    pub async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        tracing::debug!(url = %self.inner.config.url(), "Closing connection");
        self.inner.session.close().await
    }

    /// Check if the connection is closed
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Configuration this connection was opened with
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Connection URL
    pub fn url(&self) -> String {
        self.inner.config.url()
    }

    /// User name
    pub fn username(&self) -> &str {
        &self.inner.config.username
    }
}
