//! Fixed capabilities of the engine and this client.
//!
//! None of these issue a query; the answers do not change over the life of
//! a connection.

use super::DatabaseMetaData;
use crate::constants::{
    sql_state_type, Concurrency, Holdability, IsolationLevel, ResultSetType, RowIdLifetime, SqlType,
    API_MAJOR_VERSION, API_MINOR_VERSION, DRIVER_NAME, MAX_IDENTIFIER_LENGTH, PRODUCT_NAME,
};
use crate::convert;

/// Engine keywords that are not SQL:2003 reserved words
const SQL_KEYWORDS: &str = "ACTION,CACHED,CHECKPOINT,COMPACT,DATABASE,DEFRAG,EXPLAIN,LIMIT,MEMORY,\
     OFFSET,PLAN,SCRIPT,SEQUENCE,SHUTDOWN,TEMP,TEXT";

const NUMERIC_FUNCTIONS: &str = "ABS,ACOS,ASIN,ATAN,ATAN2,CEILING,COS,COT,DEGREES,EXP,FLOOR,LOG,\
     LOG10,MOD,PI,POWER,RADIANS,RAND,ROUND,SIGN,SIN,SQRT,TAN,TRUNCATE";

const STRING_FUNCTIONS: &str = "ASCII,CHAR,CONCAT,DIFFERENCE,HEXTORAW,INSERT,LCASE,LEFT,LENGTH,\
     LOCATE,LTRIM,RAWTOHEX,REPEAT,REPLACE,RIGHT,RTRIM,SOUNDEX,SPACE,SUBSTR,SUBSTRING,UCASE,LOWER,UPPER";

const SYSTEM_FUNCTIONS: &str = "DATABASE,IFNULL,USER";

const TIME_DATE_FUNCTIONS: &str = "CURDATE,CURTIME,DATEDIFF,DAYNAME,DAYOFMONTH,DAYOFWEEK,DAYOFYEAR,\
     HOUR,MINUTE,MONTH,MONTHNAME,NOW,QUARTER,SECOND,SECONDS_SINCE_MIDNIGHT,TIMESTAMPADD,\
     TIMESTAMPDIFF,TO_CHAR,WEEK,YEAR";

#[allow(missing_docs)]
impl DatabaseMetaData {
    // --- Product ---

    /// Name of the engine
    pub fn database_product_name(&self) -> &'static str {
        PRODUCT_NAME
    }

    /// Name of this client
    pub fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    /// Version of this client
    pub fn driver_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Major version of this client
    pub fn driver_major_version(&self) -> i32 {
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)
    }

    /// Minor version of this client
    pub fn driver_minor_version(&self) -> i32 {
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0)
    }

    /// Major version of the client API this layer implements
    pub fn api_major_version(&self) -> i32 {
        API_MAJOR_VERSION
    }

    /// Minor version of the client API this layer implements
    pub fn api_minor_version(&self) -> i32 {
        API_MINOR_VERSION
    }

    /// Convention used for SQLSTATE values in errors
    pub fn sql_state_type(&self) -> i32 {
        sql_state_type::SQL
    }

    // --- General ---

    /// Every procedure listed by `get_procedures` can be called by the user
    pub fn all_procedures_are_callable(&self) -> bool {
        true
    }

    /// Every table listed by `get_tables` can be selected by the user
    pub fn all_tables_are_selectable(&self) -> bool {
        true
    }

    /// Whether the database is stored in local files
    pub fn uses_local_files(&self) -> bool {
        false
    }

    /// Whether each table is stored in its own file
    pub fn uses_local_file_per_table(&self) -> bool {
        false
    }

    /// Whether LOB updates are made on a copy
    pub fn locators_update_copy(&self) -> bool {
        false
    }

    /// ROWID support
    pub fn row_id_lifetime(&self) -> RowIdLifetime {
        RowIdLifetime::Unsupported
    }

    /// Whether `{?= call ...}` can invoke stored functions
    pub fn supports_stored_functions_using_call_syntax(&self) -> bool {
        true
    }

    /// Whether a failed auto-commit closes all open result sets
    pub fn auto_commit_failure_closes_all_result_sets(&self) -> bool {
        false
    }

    // --- Identifiers ---

    /// Unquoted identifiers are case-insensitive
    pub fn supports_mixed_case_identifiers(&self) -> bool {
        false
    }

    /// Unquoted identifiers are stored upper-cased
    pub fn stores_upper_case_identifiers(&self) -> bool {
        true
    }

    /// Unquoted identifiers are not stored lower-cased
    pub fn stores_lower_case_identifiers(&self) -> bool {
        false
    }

    /// Unquoted identifiers are not stored in mixed case
    pub fn stores_mixed_case_identifiers(&self) -> bool {
        false
    }

    /// Quoted identifiers are case-sensitive
    pub fn supports_mixed_case_quoted_identifiers(&self) -> bool {
        true
    }

    /// Quoted identifiers keep their case
    pub fn stores_upper_case_quoted_identifiers(&self) -> bool {
        false
    }

    /// Quoted identifiers keep their case
    pub fn stores_lower_case_quoted_identifiers(&self) -> bool {
        false
    }

    /// Quoted identifiers are compared case-sensitively, so they are not
    /// stored case-insensitively
    pub fn stores_mixed_case_quoted_identifiers(&self) -> bool {
        false
    }

    /// Quote for delimited identifiers
    pub fn identifier_quote_string(&self) -> &'static str {
        "\""
    }

    /// Engine keywords beyond SQL:2003
    pub fn sql_keywords(&self) -> &'static str {
        SQL_KEYWORDS
    }

    /// Numeric functions usable in `{fn ...}` escapes
    pub fn numeric_functions(&self) -> &'static str {
        NUMERIC_FUNCTIONS
    }

    /// String functions usable in `{fn ...}` escapes
    pub fn string_functions(&self) -> &'static str {
        STRING_FUNCTIONS
    }

    /// System functions usable in `{fn ...}` escapes
    pub fn system_functions(&self) -> &'static str {
        SYSTEM_FUNCTIONS
    }

    /// Date and time functions usable in `{fn ...}` escapes
    pub fn time_date_functions(&self) -> &'static str {
        TIME_DATE_FUNCTIONS
    }

    /// Escape for `_` and `%` in catalog name patterns
    pub fn search_string_escape(&self) -> &'static str {
        "\\"
    }

    /// Characters beyond a-z, 0-9 and _ allowed in unquoted names
    pub fn extra_name_characters(&self) -> &'static str {
        ""
    }

    // --- SQL features ---

    pub fn supports_alter_table_with_add_column(&self) -> bool {
        true
    }

    pub fn supports_alter_table_with_drop_column(&self) -> bool {
        true
    }

    pub fn supports_column_aliasing(&self) -> bool {
        true
    }

    /// Whether CONVERT is supported at all
    pub fn supports_convert(&self) -> bool {
        true
    }

    /// Whether CONVERT can turn a `from` value into `to`
    pub fn supports_convert_between(&self, from: SqlType, to: SqlType) -> bool {
        convert::is_convertible(from, to)
    }

    pub fn supports_table_correlation_names(&self) -> bool {
        true
    }

    pub fn supports_different_table_correlation_names(&self) -> bool {
        false
    }

    pub fn supports_expressions_in_order_by(&self) -> bool {
        true
    }

    pub fn supports_order_by_unrelated(&self) -> bool {
        true
    }

    pub fn supports_group_by(&self) -> bool {
        true
    }

    pub fn supports_group_by_unrelated(&self) -> bool {
        true
    }

    pub fn supports_group_by_beyond_select(&self) -> bool {
        true
    }

    pub fn supports_like_escape_clause(&self) -> bool {
        true
    }

    pub fn supports_multiple_result_sets(&self) -> bool {
        true
    }

    pub fn supports_multiple_transactions(&self) -> bool {
        true
    }

    pub fn supports_non_nullable_columns(&self) -> bool {
        true
    }

    pub fn supports_minimum_sql_grammar(&self) -> bool {
        true
    }

    pub fn supports_core_sql_grammar(&self) -> bool {
        true
    }

    pub fn supports_extended_sql_grammar(&self) -> bool {
        true
    }

    pub fn supports_ansi92_entry_level_sql(&self) -> bool {
        true
    }

    pub fn supports_ansi92_intermediate_sql(&self) -> bool {
        true
    }

    pub fn supports_ansi92_full_sql(&self) -> bool {
        true
    }

    pub fn supports_integrity_enhancement_facility(&self) -> bool {
        true
    }

    pub fn supports_outer_joins(&self) -> bool {
        true
    }

    pub fn supports_full_outer_joins(&self) -> bool {
        true
    }

    pub fn supports_limited_outer_joins(&self) -> bool {
        true
    }

    pub fn supports_positioned_delete(&self) -> bool {
        true
    }

    pub fn supports_positioned_update(&self) -> bool {
        true
    }

    pub fn supports_select_for_update(&self) -> bool {
        true
    }

    pub fn supports_stored_procedures(&self) -> bool {
        true
    }

    pub fn supports_subqueries_in_comparisons(&self) -> bool {
        true
    }

    pub fn supports_subqueries_in_exists(&self) -> bool {
        true
    }

    pub fn supports_subqueries_in_ins(&self) -> bool {
        true
    }

    pub fn supports_subqueries_in_quantifieds(&self) -> bool {
        true
    }

    pub fn supports_correlated_subqueries(&self) -> bool {
        true
    }

    pub fn supports_union(&self) -> bool {
        true
    }

    pub fn supports_union_all(&self) -> bool {
        true
    }

    // --- Schemas and catalogs ---

    /// Vendor term for a schema
    pub fn schema_term(&self) -> &'static str {
        "SCHEMA"
    }

    /// Vendor term for a procedure
    pub fn procedure_term(&self) -> &'static str {
        "PROCEDURE"
    }

    /// Vendor term for a catalog
    pub fn catalog_term(&self) -> &'static str {
        "CATALOG"
    }

    /// Whether a catalog name comes first in a qualified name
    pub fn is_catalog_at_start(&self) -> bool {
        true
    }

    /// Separator between catalog and schema
    pub fn catalog_separator(&self) -> &'static str {
        "."
    }

    pub fn supports_schemas_in_data_manipulation(&self) -> bool {
        true
    }

    pub fn supports_schemas_in_procedure_calls(&self) -> bool {
        true
    }

    pub fn supports_schemas_in_table_definitions(&self) -> bool {
        true
    }

    pub fn supports_schemas_in_index_definitions(&self) -> bool {
        true
    }

    pub fn supports_schemas_in_privilege_definitions(&self) -> bool {
        true
    }

    pub fn supports_catalogs_in_data_manipulation(&self) -> bool {
        true
    }

    pub fn supports_catalogs_in_procedure_calls(&self) -> bool {
        true
    }

    pub fn supports_catalogs_in_table_definitions(&self) -> bool {
        true
    }

    pub fn supports_catalogs_in_index_definitions(&self) -> bool {
        true
    }

    pub fn supports_catalogs_in_privilege_definitions(&self) -> bool {
        true
    }

    // --- Limits (0 means no limit or unknown) ---

    pub fn max_binary_literal_length(&self) -> i32 {
        0
    }

    pub fn max_char_literal_length(&self) -> i32 {
        0
    }

    /// Longest column name, in characters
    pub fn max_column_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    pub fn max_columns_in_group_by(&self) -> i32 {
        0
    }

    pub fn max_columns_in_index(&self) -> i32 {
        0
    }

    pub fn max_columns_in_order_by(&self) -> i32 {
        0
    }

    pub fn max_columns_in_select(&self) -> i32 {
        0
    }

    pub fn max_columns_in_table(&self) -> i32 {
        0
    }

    pub fn max_connections(&self) -> i32 {
        0
    }

    pub fn max_cursor_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    pub fn max_index_length(&self) -> i32 {
        0
    }

    pub fn max_schema_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    pub fn max_procedure_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    pub fn max_catalog_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    pub fn max_row_size(&self) -> i32 {
        0
    }

    pub fn does_max_row_size_include_blobs(&self) -> bool {
        true
    }

    pub fn max_statement_length(&self) -> i32 {
        0
    }

    pub fn max_statements(&self) -> i32 {
        0
    }

    pub fn max_table_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    pub fn max_tables_in_select(&self) -> i32 {
        0
    }

    pub fn max_user_name_length(&self) -> i32 {
        MAX_IDENTIFIER_LENGTH
    }

    // --- Transactions ---

    pub fn supports_transactions(&self) -> bool {
        true
    }

    /// Isolation level of new sessions
    pub fn default_transaction_isolation(&self) -> IsolationLevel {
        IsolationLevel::ReadCommitted
    }

    /// Every real isolation level is accepted; READ UNCOMMITTED and
    /// REPEATABLE READ are served by stronger levels
    pub fn supports_transaction_isolation_level(&self, level: IsolationLevel) -> bool {
        level != IsolationLevel::None
    }

    pub fn supports_data_definition_and_data_manipulation_transactions(&self) -> bool {
        false
    }

    pub fn supports_data_manipulation_transactions_only(&self) -> bool {
        true
    }

    pub fn data_definition_causes_transaction_commit(&self) -> bool {
        true
    }

    pub fn data_definition_ignored_in_transactions(&self) -> bool {
        false
    }

    pub fn supports_open_cursors_across_commit(&self) -> bool {
        true
    }

    pub fn supports_open_cursors_across_rollback(&self) -> bool {
        false
    }

    pub fn supports_open_statements_across_commit(&self) -> bool {
        true
    }

    pub fn supports_open_statements_across_rollback(&self) -> bool {
        true
    }

    pub fn supports_savepoints(&self) -> bool {
        false
    }

    // --- Statements and result sets ---

    /// Forward-only and scroll-insensitive result sets are supported
    pub fn supports_result_set_type(&self, result_set_type: ResultSetType) -> bool {
        result_set_type != ResultSetType::ScrollSensitive
    }

    /// Only read-only result sets are supported
    pub fn supports_result_set_concurrency(&self, result_set_type: ResultSetType, concurrency: Concurrency) -> bool {
        self.supports_result_set_type(result_set_type) && concurrency == Concurrency::ReadOnly
    }

    pub fn supports_result_set_holdability(&self, _holdability: Holdability) -> bool {
        true
    }

    /// Default holdability of result sets
    pub fn result_set_holdability(&self) -> Holdability {
        Holdability::HoldCursorsOverCommit
    }

    /// Result sets are read-only, so no changes are ever visible or detected
    pub fn own_updates_are_visible(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn own_deletes_are_visible(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn own_inserts_are_visible(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn others_updates_are_visible(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn others_deletes_are_visible(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn others_inserts_are_visible(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn updates_are_detected(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn deletes_are_detected(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn inserts_are_detected(&self, _result_set_type: ResultSetType) -> bool {
        false
    }

    pub fn supports_batch_updates(&self) -> bool {
        false
    }

    pub fn supports_named_parameters(&self) -> bool {
        true
    }

    pub fn supports_multiple_open_results(&self) -> bool {
        true
    }

    pub fn supports_get_generated_keys(&self) -> bool {
        false
    }

    pub fn generated_key_always_returned(&self) -> bool {
        false
    }

    pub fn supports_statement_pooling(&self) -> bool {
        false
    }

    pub fn supports_ref_cursors(&self) -> bool {
        false
    }
}
