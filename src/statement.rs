//! SQL statement text handling
//!
//! This module provides the client-side view of a statement: escape
//! processing that rewrites client escape syntax (`{call ...}`, `{d '...'}`,
//! `{fn ...}` and friends) to the engine's native SQL, statement
//! classification, and the descriptor types the engine returns for
//! parameters and result columns.

use crate::constants::{parameter_nullable, ParameterMode, SqlType};

/// Statement type determined by parsing the SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementType {
    /// Anything not recognised below (SET, COMMIT, ...)
    #[default]
    Other,
    /// SELECT, WITH, VALUES
    Query,
    /// DML: INSERT, UPDATE, DELETE, MERGE
    Dml,
    /// DDL: CREATE, ALTER, DROP, etc.
    Ddl,
    /// Routine invocation: CALL
    Call,
}

/// Metadata for a statement parameter, as determined by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Parameter label; empty for anonymous `?` markers
    pub name: String,
    /// Declared SQL type
    pub sql_type: SqlType,
    /// Direction
    pub mode: ParameterMode,
    /// Precision (numeric digits or character length)
    pub precision: u32,
    /// Scale (for NUMERIC / DECIMAL)
    pub scale: u32,
    /// One of the [`parameter_nullable`] constants
    pub nullable: i32,
    /// Engine type name, e.g. `INTEGER` or `VARCHAR(20)`
    pub type_name: Option<String>,
}

impl ParameterDescriptor {
    /// Create a descriptor with the given name, type and mode
    pub fn new(name: impl Into<String>, sql_type: SqlType, mode: ParameterMode) -> Self {
        Self {
            name: name.into(),
            sql_type,
            mode,
            precision: 0,
            scale: 0,
            nullable: parameter_nullable::NULLABLE_UNKNOWN,
            type_name: None,
        }
    }

    /// Anonymous IN parameter of the given type
    pub fn input(sql_type: SqlType) -> Self {
        Self::new("", sql_type, ParameterMode::In)
    }

    /// Set precision and scale
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Set the engine type name
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: i32) -> Self {
        self.nullable = nullable;
        self
    }

    /// Type name reported to clients; falls back to the standard type name
    pub fn type_name(&self) -> &str {
        self.type_name.as_deref().unwrap_or(self.sql_type.name())
    }
}

/// Metadata for a column in a result set
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Column label
    pub name: String,
    /// SQL data type
    pub sql_type: SqlType,
    /// Precision (numeric digits or character length)
    pub precision: u32,
    /// Scale
    pub scale: u32,
    /// Whether NULL values are allowed
    pub nullable: bool,
    /// Engine type name
    pub type_name: Option<String>,
}

impl ColumnInfo {
    /// Create a new column with minimal info
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            precision: 0,
            scale: 0,
            nullable: true,
            type_name: None,
        }
    }

    /// Check if this column is a LOB type
    pub fn is_lob(&self) -> bool {
        self.sql_type.is_lob()
    }
}

/// A parsed SQL statement
#[derive(Debug, Clone)]
pub struct Statement {
    /// The original SQL text
    sql: String,
    /// SQL with client escapes rewritten
    native_sql: String,
    /// Statement type
    statement_type: StatementType,
    /// Number of `?` markers in the native SQL
    parameter_count: usize,
}

impl Statement {
    /// Create a new statement from SQL text
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let (native_sql, parameter_count) = EscapeScanner::new(&sql).rewrite();
        let statement_type = classify(&native_sql);
        Self {
            sql,
            native_sql,
            statement_type,
            parameter_count,
        }
    }

    /// Get the SQL text as written by the caller
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Get the SQL text as sent to the engine
    pub fn native_sql(&self) -> &str {
        &self.native_sql
    }

    /// Get the statement type
    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    /// Number of parameter markers
    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    /// Check if this is a query
    pub fn is_query(&self) -> bool {
        self.statement_type == StatementType::Query
    }

    /// Check if this is a DML statement
    pub fn is_dml(&self) -> bool {
        self.statement_type == StatementType::Dml
    }

    /// Check if this is a DDL statement
    pub fn is_ddl(&self) -> bool {
        self.statement_type == StatementType::Ddl
    }

    /// Check if this is a routine call
    pub fn is_call(&self) -> bool {
        self.statement_type == StatementType::Call
    }
}

/// Rewrite client escape syntax to native SQL
pub fn native_sql(sql: &str) -> String {
    EscapeScanner::new(sql).rewrite().0
}

fn classify(sql: &str) -> StatementType {
    let first_word = sql
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .next()
        .unwrap_or("")
        .to_uppercase();

    match first_word.as_str() {
        "SELECT" | "WITH" | "VALUES" | "TABLE" => StatementType::Query,
        "INSERT" | "UPDATE" | "DELETE" | "MERGE" | "TRUNCATE" => StatementType::Dml,
        "CREATE" | "ALTER" | "DROP" | "GRANT" | "REVOKE" | "COMMENT" => StatementType::Ddl,
        "CALL" => StatementType::Call,
        _ => StatementType::Other,
    }
}

/// Single pass over the SQL text, aware of string literals, quoted
/// identifiers and comments.
struct EscapeScanner {
    chars: Vec<char>,
    pos: usize,
    out: String,
    markers: usize,
    /// One entry per open `{`; true when the brace was an escape to strip
    braces: Vec<bool>,
}

impl EscapeScanner {
    fn new(sql: &str) -> Self {
        Self {
            chars: sql.chars().collect(),
            pos: 0,
            out: String::with_capacity(sql.len()),
            markers: 0,
            braces: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn rewrite(mut self) -> (String, usize) {
        while let Some(ch) = self.peek(0) {
            match ch {
                '\'' | '"' => self.copy_quoted(ch),
                '-' if self.peek(1) == Some('-') => self.copy_until("\n"),
                '/' if self.peek(1) == Some('*') => self.copy_until("*/"),
                '?' => {
                    self.markers += 1;
                    self.out.push(ch);
                    self.pos += 1;
                }
                '{' => self.open_escape(),
                '}' => {
                    if !self.braces.pop().unwrap_or(false) {
                        self.out.push(ch);
                    }
                    self.pos += 1;
                }
                _ => {
                    self.out.push(ch);
                    self.pos += 1;
                }
            }
        }
        (self.out, self.markers)
    }

    /// Copy a quoted run; a doubled quote inside is an escaped quote
    fn copy_quoted(&mut self, quote: char) {
        self.out.push(quote);
        self.pos += 1;
        while let Some(ch) = self.peek(0) {
            self.out.push(ch);
            self.pos += 1;
            if ch == quote {
                if self.peek(0) == Some(quote) {
                    self.out.push(quote);
                    self.pos += 1;
                } else {
                    return;
                }
            }
        }
    }

    /// Copy a comment through its terminator (or the end of text)
    fn copy_until(&mut self, terminator: &str) {
        let term: Vec<char> = terminator.chars().collect();
        while self.pos < self.chars.len() {
            if self.chars[self.pos..].starts_with(&term) {
                self.out.extend(term.iter());
                self.pos += term.len();
                return;
            }
            self.out.push(self.chars[self.pos]);
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek(0).is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect::<String>().to_lowercase()
    }

    fn open_escape(&mut self) {
        let brace_pos = self.pos;
        self.pos += 1;
        self.skip_whitespace();

        // {?= call f(?)}: the return value comes back as a result set
        if self.peek(0) == Some('?') {
            self.pos += 1;
            self.skip_whitespace();
            if self.peek(0) == Some('=') {
                self.pos += 1;
                self.skip_whitespace();
                if self.read_word() == "call" {
                    self.out.push_str("CALL");
                    self.braces.push(true);
                    return;
                }
            }
            self.reject_escape(brace_pos);
            return;
        }

        let keyword = match self.read_word().as_str() {
            "call" => "CALL",
            "d" => "DATE",
            "t" => "TIME",
            "ts" => "TIMESTAMP",
            "escape" => "ESCAPE",
            "fn" | "oj" => {
                self.skip_whitespace();
                ""
            }
            _ => {
                self.reject_escape(brace_pos);
                return;
            }
        };
        self.out.push_str(keyword);
        self.braces.push(true);
    }

    /// Not an escape: emit the brace verbatim and rescan what follows it
    fn reject_escape(&mut self, brace_pos: usize) {
        self.out.push('{');
        self.pos = brace_pos + 1;
        self.braces.push(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_type_detection() {
        assert_eq!(
            Statement::new("SELECT * FROM t").statement_type(),
            StatementType::Query
        );
        assert_eq!(
            Statement::new("INSERT INTO t VALUES (1)").statement_type(),
            StatementType::Dml
        );
        assert_eq!(
            Statement::new("UPDATE t SET x = 1").statement_type(),
            StatementType::Dml
        );
        assert_eq!(
            Statement::new("CREATE TABLE t (x INTEGER)").statement_type(),
            StatementType::Ddl
        );
        assert_eq!(
            Statement::new("CALL p(?)").statement_type(),
            StatementType::Call
        );
        assert_eq!(
            Statement::new("SET SCHEMA PUBLIC").statement_type(),
            StatementType::Other
        );
        assert!(Statement::new("VALUES (1)").is_query());
        assert!(Statement::new("(SELECT 1 FROM t)").is_query());
    }

    #[test]
    fn test_case_insensitive_keywords() {
        assert!(Statement::new("select * from t").is_query());
        assert!(Statement::new("Select * From t").is_query());
        assert!(Statement::new("INSERT into t values (1)").is_dml());
    }

    #[test]
    fn test_parameter_markers() {
        let stmt = Statement::new("SELECT * FROM t WHERE x = ? AND y = ?");
        assert_eq!(stmt.parameter_count(), 2);
    }

    #[test]
    fn test_markers_in_literals_and_comments_ignored() {
        let stmt = Statement::new(
            "SELECT '?', \"?\" FROM t WHERE x = ? -- and y = ?\n/* ? */ AND z = 'it''s ?'",
        );
        assert_eq!(stmt.parameter_count(), 1);
    }

    #[test]
    fn test_call_escape() {
        let stmt = Statement::new("{call add_one(?, ?)}");
        assert_eq!(stmt.native_sql(), "CALL add_one(?, ?)");
        assert!(stmt.is_call());
        assert_eq!(stmt.parameter_count(), 2);
        assert_eq!(stmt.sql(), "{call add_one(?, ?)}");
    }

    #[test]
    fn test_function_call_escape() {
        let stmt = Statement::new("{ ?= call upper(?) }");
        assert_eq!(stmt.native_sql(), "CALL upper(?) ");
        assert!(stmt.is_call());
        assert_eq!(stmt.parameter_count(), 1);
    }

    #[test]
    fn test_datetime_escapes() {
        assert_eq!(
            native_sql("SELECT * FROM t WHERE d = {d '2024-01-31'}"),
            "SELECT * FROM t WHERE d = DATE '2024-01-31'"
        );
        assert_eq!(native_sql("VALUES {t '10:15:00'}"), "VALUES TIME '10:15:00'");
        assert_eq!(
            native_sql("VALUES {ts '2024-01-31 10:15:00'}"),
            "VALUES TIMESTAMP '2024-01-31 10:15:00'"
        );
    }

    #[test]
    fn test_fn_and_oj_escapes() {
        assert_eq!(
            native_sql("SELECT {fn UCASE(name)} FROM t"),
            "SELECT UCASE(name) FROM t"
        );
        assert_eq!(
            native_sql("SELECT * FROM {oj a LEFT OUTER JOIN b ON a.id = b.id}"),
            "SELECT * FROM a LEFT OUTER JOIN b ON a.id = b.id"
        );
        assert_eq!(
            native_sql("SELECT * FROM {oj a LEFT JOIN b ON {fn LCASE(a.x)} = b.x}"),
            "SELECT * FROM a LEFT JOIN b ON LCASE(a.x) = b.x"
        );
    }

    #[test]
    fn test_like_escape() {
        assert_eq!(
            native_sql("SELECT * FROM t WHERE n LIKE 'a\\_%' {escape '\\'}"),
            "SELECT * FROM t WHERE n LIKE 'a\\_%' ESCAPE '\\'"
        );
    }

    #[test]
    fn test_unknown_braces_kept() {
        assert_eq!(native_sql("SELECT '{d x}' FROM t"), "SELECT '{d x}' FROM t");
        assert_eq!(native_sql("SELECT {x} FROM t"), "SELECT {x} FROM t");
    }

    #[test]
    fn test_parameter_descriptor_builder() {
        let desc = ParameterDescriptor::new("AMOUNT", SqlType::Decimal, ParameterMode::InOut)
            .with_precision(10, 2)
            .with_nullable(parameter_nullable::NO_NULLS);
        assert_eq!(desc.precision, 10);
        assert_eq!(desc.scale, 2);
        assert_eq!(desc.type_name(), "DECIMAL");
        assert_eq!(
            desc.with_type_name("DECIMAL(10,2)").type_name(),
            "DECIMAL(10,2)"
        );
        assert_eq!(ParameterDescriptor::input(SqlType::Integer).mode, ParameterMode::In);
    }
}
