//! Catalog enumerations.
//!
//! Each method builds one query against an `INFORMATION_SCHEMA` view and
//! returns its rows. Name arguments follow the rules of [`CatalogQuery`]:
//! `None` does not filter, `Some("")` matches objects without that name
//! component, and pattern arguments accept `%` and `_` wildcards.

use super::sql::CatalogQuery;
use super::DatabaseMetaData;
use crate::constants::best_row;
use crate::error::{Error, Result};
use crate::result_set::ResultSet;

impl DatabaseMetaData {
    /// Tables visible to the user.
    ///
    /// `types` restricts the TABLE_TYPE column, e.g. `["TABLE", "VIEW"]`.
    /// Ordered by TABLE_TYPE, TABLE_SCHEM and TABLE_NAME.
    pub async fn get_tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        types: Option<&[&str]>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_TABLES")
            .eq("TABLE_CAT", catalog.as_deref())
            .like("TABLE_SCHEM", schema.as_deref())
            .like("TABLE_NAME", table_name_pattern)
            .in_strings("TABLE_TYPE", types)
            .order_by(&["TABLE_TYPE", "TABLE_SCHEM", "TABLE_NAME"])
            .build();
        self.execute(&sql).await
    }

    /// Table columns, ordered by table and ordinal position
    pub async fn get_columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_COLUMNS")
            .eq("TABLE_CAT", catalog.as_deref())
            .like("TABLE_SCHEM", schema.as_deref())
            .like("TABLE_NAME", table_name_pattern)
            .like("COLUMN_NAME", column_name_pattern)
            .order_by(&["TABLE_CAT", "TABLE_SCHEM", "TABLE_NAME", "ORDINAL_POSITION"])
            .build();
        self.execute(&sql).await
    }

    /// All schemas
    pub async fn get_schemas(&self) -> Result<ResultSet> {
        self.get_schemas_in(None, None).await
    }

    /// Schemas of a catalog matching a pattern
    pub async fn get_schemas_in(&self, catalog: Option<&str>, schema_pattern: Option<&str>) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_SCHEMAS")
            .eq("TABLE_CATALOG", catalog.as_deref())
            .like("TABLE_SCHEM", schema.as_deref())
            .order_by(&["TABLE_CATALOG", "TABLE_SCHEM"])
            .build();
        self.execute(&sql).await
    }

    /// Catalog names
    pub async fn get_catalogs(&self) -> Result<ResultSet> {
        self.execute("SELECT CATALOG_NAME AS TABLE_CAT FROM INFORMATION_SCHEMA.INFORMATION_SCHEMA_CATALOG_NAME")
            .await
    }

    /// Table types the engine knows
    pub async fn get_table_types(&self) -> Result<ResultSet> {
        self.execute("SELECT TABLE_TYPE FROM INFORMATION_SCHEMA.SYSTEM_TABLETYPES")
            .await
    }

    /// Column-level grants
    pub async fn get_column_privileges(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::select(
            "TABLE_CATALOG TABLE_CAT, TABLE_SCHEMA TABLE_SCHEM, TABLE_NAME, COLUMN_NAME, \
             GRANTOR, GRANTEE, PRIVILEGE_TYPE PRIVILEGE, IS_GRANTABLE",
            "COLUMN_PRIVILEGES",
        )
        .eq("TABLE_CATALOG", catalog.as_deref())
        .eq("TABLE_SCHEMA", schema.as_deref())
        .eq("TABLE_NAME", table)
        .like("COLUMN_NAME", column_name_pattern)
        .order_by(&["COLUMN_NAME", "PRIVILEGE"])
        .build();
        self.execute(&sql).await
    }

    /// Table-level grants
    pub async fn get_table_privileges(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::select(
            "TABLE_CATALOG TABLE_CAT, TABLE_SCHEMA TABLE_SCHEM, TABLE_NAME, \
             GRANTOR, GRANTEE, PRIVILEGE_TYPE PRIVILEGE, IS_GRANTABLE",
            "TABLE_PRIVILEGES",
        )
        .eq("TABLE_CATALOG", catalog.as_deref())
        .like("TABLE_SCHEMA", schema.as_deref())
        .like("TABLE_NAME", table_name_pattern)
        .order_by(&["TABLE_SCHEM", "TABLE_NAME", "PRIVILEGE"])
        .build();
        self.execute(&sql).await
    }

    /// Columns that best identify a row.
    ///
    /// `scope` is one of the [`best_row`] codes; identifiers valid for at
    /// least that long are returned. With `nullable` false, nullable columns
    /// are left out.
    pub async fn get_best_row_identifier(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        scope: i32,
        nullable: bool,
    ) -> Result<ResultSet> {
        let scopes: &[i32] = match scope {
            best_row::TEMPORARY => &[best_row::TEMPORARY, best_row::TRANSACTION, best_row::SESSION],
            best_row::TRANSACTION => &[best_row::TRANSACTION, best_row::SESSION],
            best_row::SESSION => &[best_row::SESSION],
            other => {
                return Err(Error::InvalidArgument(format!("invalid best row scope: {}", other)));
            }
        };
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::select(
            "SCOPE, COLUMN_NAME, DATA_TYPE, TYPE_NAME, COLUMN_SIZE, BUFFER_LENGTH, \
             DECIMAL_DIGITS, PSEUDO_COLUMN",
            "SYSTEM_BESTROWIDENTIFIER",
        )
        .eq("TABLE_CAT", catalog.as_deref())
        .eq("TABLE_SCHEM", schema.as_deref())
        .eq("TABLE_NAME", Some(table))
        .in_ints("SCOPE", Some(scopes))
        .eq_int("NULLABLE", if nullable { None } else { Some(0) })
        .order_by(&["SCOPE"])
        .build();
        self.execute(&sql).await
    }

    /// Columns updated automatically when a row changes
    pub async fn get_version_columns(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::from_view("SYSTEM_VERSIONCOLUMNS")
            .eq("TABLE_CAT", catalog.as_deref())
            .eq("TABLE_SCHEM", schema.as_deref())
            .eq("TABLE_NAME", Some(table))
            .build();
        self.execute(&sql).await
    }

    /// Primary key columns of a table, ordered by COLUMN_NAME
    pub async fn get_primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::from_view("SYSTEM_PRIMARYKEYS")
            .eq("TABLE_CAT", catalog.as_deref())
            .eq("TABLE_SCHEM", schema.as_deref())
            .eq("TABLE_NAME", Some(table))
            .order_by(&["COLUMN_NAME"])
            .build();
        self.execute(&sql).await
    }

    /// Primary keys referenced by a table's foreign keys
    pub async fn get_imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::from_view("SYSTEM_CROSSREFERENCE")
            .eq("FKTABLE_CAT", catalog.as_deref())
            .eq("FKTABLE_SCHEM", schema.as_deref())
            .eq("FKTABLE_NAME", Some(table))
            .order_by(&["PKTABLE_CAT", "PKTABLE_SCHEM", "PKTABLE_NAME", "KEY_SEQ"])
            .build();
        self.execute(&sql).await
    }

    /// Foreign keys referencing a table's primary key
    pub async fn get_exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::from_view("SYSTEM_CROSSREFERENCE")
            .eq("PKTABLE_CAT", catalog.as_deref())
            .eq("PKTABLE_SCHEM", schema.as_deref())
            .eq("PKTABLE_NAME", Some(table))
            .order_by(&["FKTABLE_CAT", "FKTABLE_SCHEM", "FKTABLE_NAME", "KEY_SEQ"])
            .build();
        self.execute(&sql).await
    }

    /// Foreign keys of `foreign_table` that reference `parent_table`
    pub async fn get_cross_reference(
        &self,
        parent_catalog: Option<&str>,
        parent_schema: Option<&str>,
        parent_table: &str,
        foreign_catalog: Option<&str>,
        foreign_schema: Option<&str>,
        foreign_table: &str,
    ) -> Result<ResultSet> {
        let parent_catalog = self.translate_catalog(parent_catalog).await?;
        let parent_schema = self.translate_schema(parent_schema).await?;
        let foreign_catalog = self.translate_catalog(foreign_catalog).await?;
        let foreign_schema = self.translate_schema(foreign_schema).await?;
        let sql = CatalogQuery::from_view("SYSTEM_CROSSREFERENCE")
            .eq("PKTABLE_CAT", parent_catalog.as_deref())
            .eq("PKTABLE_SCHEM", parent_schema.as_deref())
            .eq("PKTABLE_NAME", Some(parent_table))
            .eq("FKTABLE_CAT", foreign_catalog.as_deref())
            .eq("FKTABLE_SCHEM", foreign_schema.as_deref())
            .eq("FKTABLE_NAME", Some(foreign_table))
            .order_by(&["FKTABLE_CAT", "FKTABLE_SCHEM", "FKTABLE_NAME", "KEY_SEQ"])
            .build();
        self.execute(&sql).await
    }

    /// Data types the engine supports, ordered by DATA_TYPE
    pub async fn get_type_info(&self) -> Result<ResultSet> {
        let sql = CatalogQuery::from_view("SYSTEM_TYPEINFO")
            .order_by(&["DATA_TYPE", "TYPE_NAME"])
            .build();
        self.execute(&sql).await
    }

    /// Indexes of a table; with `unique`, only unique indexes.
    ///
    /// Statistics are always exact, so `approximate` has no effect.
    pub async fn get_index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        unique: bool,
        approximate: bool,
    ) -> Result<ResultSet> {
        tracing::trace!(approximate = approximate, "Index statistics are always exact");
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema).await?;
        let sql = CatalogQuery::from_view("SYSTEM_INDEXINFO")
            .eq("TABLE_CAT", catalog.as_deref())
            .eq("TABLE_SCHEM", schema.as_deref())
            .eq("TABLE_NAME", Some(table))
            .eq_bool("NON_UNIQUE", if unique { Some(false) } else { None })
            .order_by(&["NON_UNIQUE", "TYPE", "INDEX_NAME", "ORDINAL_POSITION"])
            .build();
        self.execute(&sql).await
    }

    /// Stored procedures
    pub async fn get_procedures(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        procedure_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_PROCEDURES")
            .eq("PROCEDURE_CAT", catalog.as_deref())
            .like("PROCEDURE_SCHEM", schema.as_deref())
            .like("PROCEDURE_NAME", procedure_name_pattern)
            .order_by(&["PROCEDURE_CAT", "PROCEDURE_SCHEM", "PROCEDURE_NAME", "SPECIFIC_NAME"])
            .build();
        self.execute(&sql).await
    }

    /// Parameters and result columns of stored procedures
    pub async fn get_procedure_columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        procedure_name_pattern: Option<&str>,
        column_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_PROCEDURECOLUMNS")
            .eq("PROCEDURE_CAT", catalog.as_deref())
            .like("PROCEDURE_SCHEM", schema.as_deref())
            .like("PROCEDURE_NAME", procedure_name_pattern)
            .like("COLUMN_NAME", column_name_pattern)
            .order_by(&["PROCEDURE_CAT", "PROCEDURE_SCHEM", "PROCEDURE_NAME", "SPECIFIC_NAME"])
            .build();
        self.execute(&sql).await
    }

    /// Stored functions
    pub async fn get_functions(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        function_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::raw(
            "SELECT ROUTINE_CATALOG AS FUNCTION_CAT, ROUTINE_SCHEMA AS FUNCTION_SCHEM, \
             ROUTINE_NAME AS FUNCTION_NAME, CAST(NULL AS VARCHAR(1)) AS REMARKS, \
             1 AS FUNCTION_TYPE, SPECIFIC_NAME \
             FROM INFORMATION_SCHEMA.ROUTINES WHERE ROUTINE_TYPE = 'FUNCTION'",
        )
        .eq("ROUTINE_CATALOG", catalog.as_deref())
        .like("ROUTINE_SCHEMA", schema.as_deref())
        .like("ROUTINE_NAME", function_name_pattern)
        .order_by(&["FUNCTION_CAT", "FUNCTION_SCHEM", "FUNCTION_NAME", "SPECIFIC_NAME"])
        .build();
        self.execute(&sql).await
    }

    /// User-defined types; `types` restricts DATA_TYPE
    pub async fn get_udts(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        type_name_pattern: Option<&str>,
        types: Option<&[i32]>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_UDTS")
            .eq("TYPE_CAT", catalog.as_deref())
            .like("TYPE_SCHEM", schema.as_deref())
            .like("TYPE_NAME", type_name_pattern)
            .in_ints("DATA_TYPE", types)
            .order_by(&["DATA_TYPE", "TYPE_CAT", "TYPE_SCHEM", "TYPE_NAME"])
            .build();
        self.execute(&sql).await
    }

    /// Attributes of user-defined types
    pub async fn get_attributes(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        type_name_pattern: Option<&str>,
        attribute_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::from_view("SYSTEM_UDTATTRIBUTES")
            .eq("TYPE_CAT", catalog.as_deref())
            .like("TYPE_SCHEM", schema.as_deref())
            .like("TYPE_NAME", type_name_pattern)
            .like("ATTR_NAME", attribute_name_pattern)
            .order_by(&["TYPE_CAT", "TYPE_SCHEM", "TYPE_NAME", "ORDINAL_POSITION"])
            .build();
        self.execute(&sql).await
    }

    /// Type hierarchies; the engine has none, so the result is always empty
    pub async fn get_super_types(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        type_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::raw(
            "SELECT * FROM (VALUES(NULL, NULL, NULL, NULL, NULL, NULL)) \
             AS X(TYPE_CAT, TYPE_SCHEM, TYPE_NAME, SUPERTYPE_CAT, SUPERTYPE_SCHEM, SUPERTYPE_NAME) \
             WHERE FALSE",
        )
        .eq("TYPE_CAT", catalog.as_deref())
        .like("TYPE_SCHEM", schema.as_deref())
        .like("TYPE_NAME", type_name_pattern)
        .build();
        self.execute(&sql).await
    }

    /// Table hierarchies; the engine has none, so the result is always empty
    pub async fn get_super_tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        let catalog = self.translate_catalog(catalog).await?;
        let schema = self.translate_schema(schema_pattern).await?;
        let sql = CatalogQuery::raw(
            "SELECT * FROM (VALUES(NULL, NULL, NULL, NULL)) \
             AS X(TABLE_CAT, TABLE_SCHEM, TABLE_NAME, SUPERTABLE_NAME) \
             WHERE FALSE",
        )
        .eq("TABLE_CAT", catalog.as_deref())
        .like("TABLE_SCHEM", schema.as_deref())
        .like("TABLE_NAME", table_name_pattern)
        .build();
        self.execute(&sql).await
    }

    /// Client properties the engine accepts
    pub async fn get_client_info_properties(&self) -> Result<ResultSet> {
        self.execute("SELECT * FROM INFORMATION_SCHEMA.SYSTEM_CONNECTION_PROPERTIES")
            .await
    }

    /// Pseudo-columns are not supported
    pub async fn get_pseudo_columns(
        &self,
        _catalog: Option<&str>,
        _schema_pattern: Option<&str>,
        _table_name_pattern: Option<&str>,
        _column_name_pattern: Option<&str>,
    ) -> Result<ResultSet> {
        Err(Error::not_supported("pseudo columns"))
    }
}
