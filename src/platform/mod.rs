mod create_flags;
pub mod default;
mod keyword;
#[cfg(feature = "postgres")]
mod postgresql;

use crate::schema::{
    ColumnData, ForeignKeyConstraint, ForeignKeyReferentialAction, Identifier, Index, Table,
    TableOptions,
};
use crate::{Error, Result};
pub use create_flags::CreateFlags;
pub use keyword::{KeywordList, Keywords};
#[cfg(feature = "postgres")]
pub use postgresql::PostgreSQLPlatform;
use std::any::TypeId;
use std::fmt::Debug;

macro_rules! platform_debug {
    ($platform:ident) => {
        impl std::fmt::Debug for $platform {
            fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
            ) -> core::result::Result<(), core::fmt::Error> {
                f.debug_struct(core::any::type_name::<Self>())
                    .finish_non_exhaustive()
            }
        }
    };
}

pub(crate) use platform_debug;

/// Renders the SQL dialect of a database engine.
pub trait DatabasePlatform: Debug + Send + Sync {
    /// As &dyn DatabasePlatform
    fn as_dyn(&self) -> &dyn DatabasePlatform;

    /// Gets the name of the platform.
    fn get_name(&self) -> String;

    /// Returns the SQL snippet that declares a 4 byte integer column.
    fn get_integer_type_declaration_sql(&self, column: &ColumnData) -> Result<String>;

    /// Returns the SQL snippet that declares a 8 byte integer column.
    fn get_bigint_type_declaration_sql(&self, column: &ColumnData) -> Result<String>;

    /// Returns the SQL snippet used to declare a CLOB column type.
    fn get_clob_type_declaration_sql(&self, column: &ColumnData) -> Result<String>;

    /// Returns the SQL to declare a date-time column without time zone.
    fn get_date_time_type_declaration_sql(&self, column: &ColumnData) -> Result<String>;

    /// Returns the SQL snippet used to declare a VARCHAR column type.
    fn get_string_type_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        default::get_string_type_declaration_sql(self, column)
    }

    /// Returns the SQL snippet to declare a GUID/UUID column.
    ///
    /// By default this maps directly to a CHAR(36) and only maps to more
    /// special datatypes when the underlying databases support this datatype.
    fn get_guid_type_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        default::get_guid_type_declaration_sql(self, column)
    }

    #[allow(unused_variables)]
    fn get_varchar_type_declaration_sql_snippet(
        &self,
        length: Option<usize>,
        fixed: bool,
    ) -> Result<String> {
        Err(Error::platform_feature_unsupported(
            "VARCHARs not supported by the current platform.",
        ))
    }

    /// Whether the platform stores UUIDs natively.
    fn has_native_guid_type(&self) -> bool {
        false
    }

    /// Gets the format string, as accepted by chrono, used to store date-time values.
    fn get_date_time_format_string(&self) -> &'static str {
        default::get_date_time_format_string()
    }

    /// Gets the type that is mapped for the given database column type.
    fn get_type_mapping(&self, db_type: &str) -> Result<TypeId>;

    /// Checks if a database type is currently supported by this platform.
    fn has_type_mapping_for(&self, db_type: &str) -> bool {
        self.get_type_mapping(db_type).is_ok()
    }

    /// Gets the character used for identifier quoting.
    fn get_identifier_quote_character(&self) -> char {
        default::get_identifier_quote_character()
    }

    /// Quotes a string so that it can be safely used as a table or column name,
    /// even if it is a reserved word of the platform. This also detects identifier
    /// chains separated by dot and quotes them independently.
    fn quote_identifier(&self, identifier: &str) -> String {
        default::quote_identifier(self, identifier)
    }

    /// Quotes a single identifier (no dot chain separation).
    fn quote_single_identifier(&self, str: &str) -> String {
        default::quote_single_identifier(self, str)
    }

    /// Quotes a literal string.
    fn quote_string_literal(&self, str: &str) -> String {
        default::quote_string_literal(str)
    }

    /// Returns the keyword list instance of this platform.
    fn create_reserved_keywords_list(&self) -> KeywordList;

    /// Maximum length of any given database identifier, like tables or column names.
    fn get_max_identifier_length(&self) -> usize {
        default::get_max_identifier_length()
    }

    /// Returns the SQL statement(s) to create a table with the specified name, columns and constraints
    /// on this platform.
    fn get_create_table_sql(
        &self,
        table: &Table,
        create_flags: Option<CreateFlags>,
    ) -> Result<Vec<String>> {
        default::get_create_table_sql(self, table, create_flags)
    }

    /// Returns the SQL used to create tables. Tables must be sorted so that
    /// referenced tables come first.
    fn get_create_tables_sql(&self, tables: &[Table]) -> Result<Vec<String>> {
        default::get_create_tables_sql(self, tables)
    }

    /// Returns the SQL used to create a table.
    fn _get_create_table_sql(
        &self,
        name: &Identifier,
        columns: &[ColumnData],
        options: &TableOptions,
    ) -> Result<Vec<String>> {
        default::_get_create_table_sql(self, name, columns, options)
    }

    /// Returns the SQL snippet to drop an existing table.
    fn get_drop_table_sql(&self, table_name: &Identifier) -> Result<String> {
        default::get_drop_table_sql(self, table_name)
    }

    /// Returns the SQL used to drop tables, in the given order.
    fn get_drop_tables_sql(&self, tables: &[Table]) -> Result<Vec<String>> {
        default::get_drop_tables_sql(self, tables)
    }

    /// Returns the SQL to create an index on a table on this platform.
    fn get_create_index_sql(&self, index: &Index, table: &Identifier) -> Result<String> {
        default::get_create_index_sql(self, index, table)
    }

    /// Returns the SQL to create a new foreign key.
    fn get_create_foreign_key_sql(
        &self,
        foreign_key: &ForeignKeyConstraint,
        table: &Identifier,
    ) -> Result<String> {
        default::get_create_foreign_key_sql(self, foreign_key, table)
    }

    /// Gets declaration of a number of columns in bulk.
    fn get_column_declaration_list_sql(&self, columns: &[ColumnData]) -> Result<String> {
        default::get_column_declaration_list_sql(self, columns)
    }

    /// Obtains DBMS specific SQL code portion needed to declare a generic type
    /// column to be used in statements like CREATE TABLE.
    fn get_column_declaration_sql(&self, name: &str, column: &ColumnData) -> Result<String> {
        default::get_column_declaration_sql(self, name, column)
    }

    /// Obtains DBMS specific SQL code portion needed to set a default value
    /// declaration to be used in statements like CREATE TABLE.
    fn get_default_value_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        default::get_default_value_declaration_sql(self, column)
    }

    /// Obtains DBMS specific SQL code portion needed to set the FOREIGN KEY constraint
    /// of a column declaration to be used in statements like CREATE TABLE.
    fn get_foreign_key_declaration_sql(&self, foreign_key: &ForeignKeyConstraint) -> Result<String> {
        default::get_foreign_key_declaration_sql(self, foreign_key)
    }

    /// Returns the FOREIGN KEY query section dealing with non-standard options
    /// as MATCH, INITIALLY DEFERRED, ON UPDATE, ...
    fn get_advanced_foreign_key_options_sql(
        &self,
        foreign_key: &ForeignKeyConstraint,
    ) -> Result<String> {
        default::get_advanced_foreign_key_options_sql(self, foreign_key)
    }

    /// Returns the given referential action in uppercase if valid, otherwise throws an exception.
    fn get_foreign_key_referential_action_sql(
        &self,
        action: &ForeignKeyReferentialAction,
    ) -> Result<String> {
        default::get_foreign_key_referential_action_sql(action)
    }

    /// Obtains DBMS specific SQL code portion needed to set the FOREIGN KEY constraint
    /// of a column declaration to be used in statements like CREATE TABLE.
    fn get_foreign_key_base_declaration_sql(
        &self,
        foreign_key: &ForeignKeyConstraint,
    ) -> Result<String> {
        default::get_foreign_key_base_declaration_sql(self, foreign_key)
    }

    /// Returns the SQL listing the user tables.
    fn get_list_tables_sql(&self) -> Result<String> {
        Err(Error::platform_feature_unsupported("list tables"))
    }

    /// Returns the SQL listing the columns of a table.
    #[allow(unused_variables)]
    fn get_list_table_columns_sql(&self, table: &str) -> Result<String> {
        Err(Error::platform_feature_unsupported("list table columns"))
    }

    /// Returns the SQL listing the (non primary) indexes of a table.
    #[allow(unused_variables)]
    fn get_list_table_indexes_sql(&self, table: &str) -> Result<String> {
        Err(Error::platform_feature_unsupported("list table indexes"))
    }

    /// Returns the SQL listing the foreign keys of a table.
    #[allow(unused_variables)]
    fn get_list_table_foreign_keys_sql(&self, table: &str) -> Result<String> {
        Err(Error::platform_feature_unsupported("list table foreign keys"))
    }

    /// Returns the SQL to create a new savepoint.
    fn create_save_point(&self, savepoint: &str) -> String {
        default::create_save_point(savepoint)
    }

    /// Returns the SQL to release a savepoint.
    fn release_save_point(&self, savepoint: &str) -> String {
        default::release_save_point(savepoint)
    }

    /// Returns the SQL to rollback a savepoint.
    fn rollback_save_point(&self, savepoint: &str) -> String {
        default::rollback_save_point(savepoint)
    }
}
