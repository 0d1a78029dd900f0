//! Database metadata
//!
//! [`DatabaseMetaData`] answers three kinds of questions:
//!
//! - fixed capabilities of the engine and client (plain methods returning
//!   constants, see `capabilities.rs`)
//! - live facts such as the engine version or the current user (async
//!   methods issuing a one-row query)
//! - catalog enumerations (async methods returning a [`ResultSet`] over an
//!   `INFORMATION_SCHEMA` view, see `catalog.rs`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use quarry_client::{Connection, Result};
//!
//! # async fn example(conn: Connection) -> Result<()> {
//! let meta = conn.metadata()?;
//! println!("{} {}", meta.database_product_name(), meta.database_product_version().await?);
//!
//! let mut tables = meta.get_tables(None, Some("PUBLIC"), Some("ORD%"), None).await?;
//! while tables.next()? {
//!     println!("{:?}", tables.get_string("TABLE_NAME")?);
//! }
//! # Ok(())
//! # }
//! ```

mod capabilities;
mod catalog;
mod sql;

pub use sql::{quote, CatalogQuery, INFORMATION_SCHEMA};

use std::sync::Arc;

use tracing::debug;

use crate::connection::ConnectionInner;
use crate::constants::ResultSetType;
use crate::error::{Error, Result};
use crate::result_set::ResultSet;
use crate::row::Value;

/// Engine properties that decide NULL ordering and concatenation
const NULL_ORDERING_QUERY: &str = "SELECT PROPERTY_NAME, PROPERTY_VALUE \
     FROM INFORMATION_SCHEMA.SYSTEM_PROPERTIES \
     WHERE PROPERTY_NAME IN ('sql.concat_nulls', 'sql.nulls_first', 'sql.nulls_order')";

const DEFAULT_SCHEMA_QUERY: &str =
    "SELECT SCHEMA_NAME FROM INFORMATION_SCHEMA.SYSTEM_SCHEMAS WHERE IS_DEFAULT=TRUE";

const DEFAULT_CATALOG_QUERY: &str =
    "SELECT CATALOG_NAME FROM INFORMATION_SCHEMA.INFORMATION_SCHEMA_CATALOG_NAME";

/// Snapshot of the engine's NULL-handling properties.
///
/// Fetched fresh for every question that depends on it, since the
/// properties can be changed with SQL at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullOrdering {
    /// `sql.concat_nulls`: concatenating NULL yields NULL
    pub concat_nulls: bool,
    /// `sql.nulls_first`: NULLs sort before other values in ascending order
    pub nulls_first: bool,
    /// `sql.nulls_order`: NULL position is independent of sort direction
    pub nulls_order: bool,
}

impl Default for NullOrdering {
    fn default() -> Self {
        Self {
            concat_nulls: true,
            nulls_first: true,
            nulls_order: true,
        }
    }
}

impl NullOrdering {
    /// Build from `(PROPERTY_NAME, PROPERTY_VALUE)` rows; missing properties
    /// keep their defaults
    fn from_properties<'a>(props: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut ordering = Self::default();
        for (name, value) in props {
            let flag = value.eq_ignore_ascii_case("true");
            match name {
                "sql.concat_nulls" => ordering.concat_nulls = flag,
                "sql.nulls_first" => ordering.nulls_first = flag,
                "sql.nulls_order" => ordering.nulls_order = flag,
                _ => {}
            }
        }
        ordering
    }

    /// NULLs sort as the highest value
    pub fn sorted_high(&self) -> bool {
        !self.nulls_first && !self.nulls_order
    }

    /// NULLs sort as the lowest value
    pub fn sorted_low(&self) -> bool {
        self.nulls_first && !self.nulls_order
    }

    /// NULLs sort first regardless of direction
    pub fn sorted_at_start(&self) -> bool {
        self.nulls_first && self.nulls_order
    }

    /// NULLs sort last regardless of direction
    pub fn sorted_at_end(&self) -> bool {
        !self.nulls_first && self.nulls_order
    }
}

/// Metadata about the database behind a connection
#[derive(Debug, Clone)]
pub struct DatabaseMetaData {
    conn: Arc<ConnectionInner>,
}

impl DatabaseMetaData {
    pub(crate) fn new(conn: Arc<ConnectionInner>) -> Self {
        Self { conn }
    }

    // --- Query helpers ---

    /// Run a catalog query; the result is scrollable and read-only and
    /// flagged to close with its statement
    pub(crate) async fn execute(&self, sql: &str) -> Result<ResultSet> {
        debug!("Executing metadata query: {}", sql);
        Ok(self
            .conn
            .query_direct(sql, ResultSetType::ScrollInsensitive)
            .await?
            .with_close_on_completion())
    }

    /// First column of the first row, or NULL for an empty result
    async fn scalar(&self, sql: &str) -> Result<Value> {
        let mut rs = self.execute(sql).await?;
        let value = if rs.next()? { rs.get_object(1)? } else { Value::Null };
        rs.close();
        Ok(value)
    }

    async fn scalar_string(&self, sql: &str) -> Result<Option<String>> {
        match self.scalar(sql).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Ok(Some(other.to_string())),
        }
    }

    // --- Live facts ---

    /// Engine version string, e.g. `2.7.4`
    pub async fn database_product_version(&self) -> Result<String> {
        Ok(self
            .scalar_string("CALL DATABASE_VERSION()")
            .await?
            .unwrap_or_default())
    }

    /// Major component of the engine version
    pub async fn database_major_version(&self) -> Result<i32> {
        Ok(version_part(&self.database_product_version().await?, 0))
    }

    /// Minor component of the engine version
    pub async fn database_minor_version(&self) -> Result<i32> {
        Ok(version_part(&self.database_product_version().await?, 1))
    }

    /// Name of the session user
    pub async fn user_name(&self) -> Result<String> {
        Ok(self.scalar_string("CALL USER()").await?.unwrap_or_default())
    }

    /// Whether the database is read-only
    pub async fn is_read_only(&self) -> Result<bool> {
        match self.scalar("CALL IS_READONLY_DATABASE()").await? {
            Value::Boolean(b) => Ok(b),
            Value::Null => Ok(false),
            other => Err(Error::Protocol(format!(
                "IS_READONLY_DATABASE returned {}",
                other
            ))),
        }
    }

    /// Default schema of the session
    pub async fn default_schema(&self) -> Result<Option<String>> {
        self.scalar_string(DEFAULT_SCHEMA_QUERY).await
    }

    /// Catalog of the database
    pub async fn default_catalog(&self) -> Result<Option<String>> {
        self.scalar_string(DEFAULT_CATALOG_QUERY).await
    }

    /// Current NULL-handling properties of the engine
    pub async fn null_ordering(&self) -> Result<NullOrdering> {
        let mut rs = self.execute(NULL_ORDERING_QUERY).await?;
        let mut props = Vec::new();
        while rs.next()? {
            let name = rs.get_string(1)?.unwrap_or_default();
            let value = rs.get_string(2)?.unwrap_or_default();
            props.push((name, value));
        }
        rs.close();
        Ok(NullOrdering::from_properties(
            props.iter().map(|(n, v)| (n.as_str(), v.as_str())),
        ))
    }

    /// Whether NULLs sort high
    pub async fn nulls_are_sorted_high(&self) -> Result<bool> {
        Ok(self.null_ordering().await?.sorted_high())
    }

    /// Whether NULLs sort low
    pub async fn nulls_are_sorted_low(&self) -> Result<bool> {
        Ok(self.null_ordering().await?.sorted_low())
    }

    /// Whether NULLs sort at the start regardless of sort order
    pub async fn nulls_are_sorted_at_start(&self) -> Result<bool> {
        Ok(self.null_ordering().await?.sorted_at_start())
    }

    /// Whether NULLs sort at the end regardless of sort order
    pub async fn nulls_are_sorted_at_end(&self) -> Result<bool> {
        Ok(self.null_ordering().await?.sorted_at_end())
    }

    /// Whether concatenating NULL with a non-NULL value yields NULL
    pub async fn null_plus_non_null_is_null(&self) -> Result<bool> {
        Ok(self.null_ordering().await?.concat_nulls)
    }

    // --- Connection facts ---

    /// URL of the connection
    pub fn url(&self) -> String {
        self.conn.config.url()
    }

    /// Whether the connection is closed
    pub fn is_connection_closed(&self) -> bool {
        self.conn.is_closed()
    }

    // --- Argument translation ---

    /// With `default_schema` enabled, an empty schema argument means the
    /// session's default schema
    pub(crate) async fn translate_schema(&self, schema: Option<&str>) -> Result<Option<String>> {
        match schema {
            Some("") if self.conn.config.default_schema => {
                Ok(Some(self.default_schema().await?.unwrap_or_default()))
            }
            other => Ok(other.map(str::to_string)),
        }
    }

    /// With `default_schema` enabled, an empty catalog argument means the
    /// database's catalog
    pub(crate) async fn translate_catalog(&self, catalog: Option<&str>) -> Result<Option<String>> {
        match catalog {
            Some("") if self.conn.config.default_schema => {
                Ok(Some(self.default_catalog().await?.unwrap_or_default()))
            }
            other => Ok(other.map(str::to_string)),
        }
    }
}

/// Numeric component `index` of a dotted version string, 0 when absent
fn version_part(version: &str, index: usize) -> i32 {
    version
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .nth(index)
        .and_then(|part| part.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_ordering_defaults() {
        let ordering = NullOrdering::from_properties(std::iter::empty());
        assert_eq!(ordering, NullOrdering::default());
        assert!(ordering.sorted_at_start());
        assert!(!ordering.sorted_high());
    }

    #[test]
    fn test_null_ordering_derivations() {
        let ordering = NullOrdering::from_properties([
            ("sql.nulls_first", "false"),
            ("sql.nulls_order", "false"),
            ("sql.concat_nulls", "FALSE"),
        ]);
        assert!(ordering.sorted_high());
        assert!(!ordering.sorted_low());
        assert!(!ordering.sorted_at_start());
        assert!(!ordering.sorted_at_end());
        assert!(!ordering.concat_nulls);

        let ordering = NullOrdering::from_properties([("sql.nulls_first", "true"), ("sql.nulls_order", "false")]);
        assert!(ordering.sorted_low());

        let ordering = NullOrdering::from_properties([("sql.nulls_first", "false"), ("sql.nulls_order", "true")]);
        assert!(ordering.sorted_at_end());
    }

    #[test]
    fn test_version_part() {
        assert_eq!(version_part("2.7.4", 0), 2);
        assert_eq!(version_part("2.7.4", 1), 7);
        assert_eq!(version_part("3", 1), 0);
        assert_eq!(version_part("", 0), 0);
    }
}
