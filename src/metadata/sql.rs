//! SQL builder for catalog queries.
//!
//! Every catalog enumeration is a query against one of the engine's
//! `INFORMATION_SCHEMA` views, narrowed by one predicate per argument and
//! given a fixed order:
//!
//! ```rust
//! use quarry_client::metadata::CatalogQuery;
//!
//! let sql = CatalogQuery::from_view("SYSTEM_TABLES")
//!     .eq("TABLE_CAT", Some("PUBLIC"))
//!     .like("TABLE_NAME", Some("ORD%"))
//!     .order_by(&["TABLE_TYPE", "TABLE_SCHEM", "TABLE_NAME"])
//!     .build();
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM INFORMATION_SCHEMA.SYSTEM_TABLES WHERE TRUE \
//!      AND TABLE_CAT = 'PUBLIC' AND TABLE_NAME LIKE 'ORD%' \
//!      ORDER BY TABLE_TYPE, TABLE_SCHEM, TABLE_NAME"
//! );
//! ```
//!
//! Argument rules, shared by every predicate:
//! - `None` adds nothing (no filtering on that column)
//! - `Some("")` matches rows where the column IS NULL
//! - a pattern without `%` or `_` is compared with `=`
//! - `ESCAPE '\'` is added only when the pattern contains `\%` or `\_`

/// Schema holding the catalog views
pub const INFORMATION_SCHEMA: &str = "INFORMATION_SCHEMA";

/// Builds a catalog query
#[derive(Debug, Clone)]
pub struct CatalogQuery {
    sql: String,
}

impl CatalogQuery {
    /// `SELECT * FROM INFORMATION_SCHEMA.<view> WHERE TRUE`
    pub fn from_view(view: &str) -> Self {
        Self::select("*", view)
    }

    /// `SELECT <columns> FROM INFORMATION_SCHEMA.<view> WHERE TRUE`
    pub fn select(columns: &str, view: &str) -> Self {
        Self {
            sql: format!("SELECT {} FROM {}.{} WHERE TRUE", columns, INFORMATION_SCHEMA, view),
        }
    }

    /// Start from arbitrary SQL that already ends in a WHERE clause
    pub fn raw(prefix: impl Into<String>) -> Self {
        Self { sql: prefix.into() }
    }

    /// Exact match on a name
    pub fn eq(self, column: &str, value: Option<&str>) -> Self {
        self.and(column, "=", value)
    }

    /// Pattern match on a name
    pub fn like(self, column: &str, pattern: Option<&str>) -> Self {
        self.and(column, "LIKE", pattern)
    }

    /// Exact match on a numeric column
    pub fn eq_int(mut self, column: &str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.sql.push_str(&format!(" AND {} = {}", column, value));
        }
        self
    }

    /// Exact match on a boolean column
    pub fn eq_bool(mut self, column: &str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.sql.push_str(&format!(" AND {} = {}", column, if value { "TRUE" } else { "FALSE" }));
        }
        self
    }

    /// Membership in a list of string literals; an empty list matches nothing
    pub fn in_strings(mut self, column: &str, values: Option<&[&str]>) -> Self {
        match values {
            None => {}
            Some([]) => self.sql.push_str(" AND FALSE"),
            Some(values) => {
                let list: Vec<String> = values.iter().map(|v| quote(v)).collect();
                self.sql.push_str(&format!(" AND {} IN ({})", column, list.join(",")));
            }
        }
        self
    }

    /// Membership in a list of integers; an empty list matches nothing
    pub fn in_ints(mut self, column: &str, values: Option<&[i32]>) -> Self {
        match values {
            None => {}
            Some([]) => self.sql.push_str(" AND FALSE"),
            Some(values) => {
                let list: Vec<String> = values.iter().map(i32::to_string).collect();
                self.sql.push_str(&format!(" AND {} IN ({})", column, list.join(",")));
            }
        }
        self
    }

    fn and(mut self, column: &str, op: &str, value: Option<&str>) -> Self {
        let Some(value) = value else {
            return self;
        };
        if value.is_empty() {
            self.sql.push_str(&format!(" AND {} IS NULL", column));
            return self;
        }

        let literal = quote(value);
        if op == "LIKE" {
            if !value.contains(['%', '_']) {
                self.sql.push_str(&format!(" AND {} = {}", column, literal));
            } else {
                self.sql.push_str(&format!(" AND {} LIKE {}", column, literal));
                if value.contains("\\_") || value.contains("\\%") {
                    self.sql.push_str(" ESCAPE '\\'");
                }
            }
        } else {
            self.sql.push_str(&format!(" AND {} {} {}", column, op, literal));
        }
        self
    }

    /// Append the ORDER BY clause
    pub fn order_by(mut self, columns: &[&str]) -> Self {
        if !columns.is_empty() {
            self.sql.push_str(&format!(" ORDER BY {}", columns.join(", ")));
        }
        self
    }

    /// Finished SQL text
    pub fn build(self) -> String {
        self.sql
    }
}

/// Render a string as a SQL character literal, doubling embedded quotes
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_query() {
        let sql = CatalogQuery::from_view("SYSTEM_TABLES").build();
        assert_eq!(sql, "SELECT * FROM INFORMATION_SCHEMA.SYSTEM_TABLES WHERE TRUE");
    }

    #[test]
    fn test_none_adds_nothing() {
        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .eq("TABLE_CAT", None)
            .like("TABLE_SCHEM", None)
            .eq_int("NULLABLE", None)
            .eq_bool("NON_UNIQUE", None)
            .in_strings("TABLE_TYPE", None)
            .build();
        assert_eq!(sql, "SELECT * FROM INFORMATION_SCHEMA.SYSTEM_TABLES WHERE TRUE");
    }

    #[test]
    fn test_empty_string_is_null() {
        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .like("TABLE_NAME", Some(""))
            .build();
        assert!(sql.ends_with(" AND TABLE_NAME IS NULL"));

        let sql = CatalogQuery::from_view("SYSTEM_TABLES").eq("TABLE_CAT", Some("")).build();
        assert!(sql.ends_with(" AND TABLE_CAT IS NULL"));
    }

    #[test]
    fn test_pattern_without_wildcard_uses_equality() {
        let sql = CatalogQuery::from_view("SYSTEM_COLUMNS")
            .like("TABLE_NAME", Some("ORDERS"))
            .build();
        assert!(sql.ends_with(" AND TABLE_NAME = 'ORDERS'"));
    }

    #[test]
    fn test_pattern_with_wildcards() {
        let sql = CatalogQuery::from_view("SYSTEM_COLUMNS")
            .like("COLUMN_NAME", Some("ID%"))
            .build();
        assert!(sql.ends_with(" AND COLUMN_NAME LIKE 'ID%'"));

        let sql = CatalogQuery::from_view("SYSTEM_COLUMNS")
            .like("COLUMN_NAME", Some("A_B"))
            .build();
        assert!(sql.ends_with(" AND COLUMN_NAME LIKE 'A_B'"));
    }

    #[test]
    fn test_escaped_wildcard_adds_escape_clause() {
        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .like("TABLE_NAME", Some("MY\\_TABLE"))
            .build();
        assert!(sql.ends_with(" AND TABLE_NAME LIKE 'MY\\_TABLE' ESCAPE '\\'"));

        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .like("TABLE_NAME", Some("100\\%%"))
            .build();
        assert!(sql.ends_with(" ESCAPE '\\'"));
    }

    #[test]
    fn test_quotes_are_doubled() {
        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .eq("TABLE_SCHEM", Some("O'BRIEN"))
            .build();
        assert!(sql.ends_with(" AND TABLE_SCHEM = 'O''BRIEN'"));
        assert_eq!(quote("it's"), "'it''s'");
    }

    #[test]
    fn test_lists() {
        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .in_strings("TABLE_TYPE", Some(&["TABLE", "VIEW"]))
            .build();
        assert!(sql.ends_with(" AND TABLE_TYPE IN ('TABLE','VIEW')"));

        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .in_strings("TABLE_TYPE", Some(&[]))
            .build();
        assert!(sql.ends_with(" AND FALSE"));

        let sql = CatalogQuery::from_view("SYSTEM_BESTROWIDENTIFIER")
            .in_ints("SCOPE", Some(&[1, 2]))
            .build();
        assert!(sql.ends_with(" AND SCOPE IN (1,2)"));
    }

    #[test]
    fn test_scalar_predicates_and_order() {
        let sql = CatalogQuery::from_view("SYSTEM_INDEXINFO")
            .eq("TABLE_NAME", Some("T"))
            .eq_bool("NON_UNIQUE", Some(false))
            .eq_int("NULLABLE", Some(0))
            .order_by(&["NON_UNIQUE", "TYPE", "INDEX_NAME", "ORDINAL_POSITION"])
            .build();
        assert_eq!(
            sql,
            "SELECT * FROM INFORMATION_SCHEMA.SYSTEM_INDEXINFO WHERE TRUE \
             AND TABLE_NAME = 'T' AND NON_UNIQUE = FALSE AND NULLABLE = 0 \
             ORDER BY NON_UNIQUE, TYPE, INDEX_NAME, ORDINAL_POSITION"
        );
    }

    #[test]
    fn test_select_columns() {
        let sql = CatalogQuery::select("TABLE_CATALOG TABLE_CAT, GRANTEE", "TABLE_PRIVILEGES").build();
        assert_eq!(
            sql,
            "SELECT TABLE_CATALOG TABLE_CAT, GRANTEE FROM INFORMATION_SCHEMA.TABLE_PRIVILEGES WHERE TRUE"
        );
    }
}
