use crate::platform::{CreateFlags, DatabasePlatform, KeywordList, default, platform_debug};
use crate::r#type::{BigintType, DateTimeType, IntegerType, StringType, TextType};
use crate::schema::{Asset, ColumnData, ForeignKeyConstraint, Identifier, Table, TableOptions};
use crate::{Error, Result};
use dashmap::DashMap;
use std::any::TypeId;

platform_debug!(SQLitePlatform);
pub struct SQLitePlatform {
    type_mappings: DashMap<String, TypeId>,
}

impl SQLitePlatform {
    pub fn new() -> Self {
        let type_mappings = DashMap::new();
        for (db_type, type_id) in [
            ("bigint", TypeId::of::<BigintType>()),
            ("char", TypeId::of::<StringType>()),
            ("clob", TypeId::of::<TextType>()),
            ("datetime", TypeId::of::<DateTimeType>()),
            ("int", TypeId::of::<IntegerType>()),
            ("integer", TypeId::of::<IntegerType>()),
            ("text", TypeId::of::<TextType>()),
            ("timestamp", TypeId::of::<DateTimeType>()),
            ("varchar", TypeId::of::<StringType>()),
        ] {
            type_mappings.insert(db_type.to_string(), type_id);
        }

        Self { type_mappings }
    }

    fn get_common_integer_type_declaration_sql(column: &ColumnData) -> &'static str {
        // sqlite autoincrement is only possible for the primary key
        if column.autoincrement.unwrap_or(false) {
            " PRIMARY KEY AUTOINCREMENT"
        } else {
            ""
        }
    }
}

impl Default for SQLitePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabasePlatform for SQLitePlatform {
    fn as_dyn(&self) -> &dyn DatabasePlatform {
        self
    }

    fn get_name(&self) -> String {
        "sqlite".to_string()
    }

    fn get_integer_type_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        Ok(format!(
            "INTEGER{}",
            Self::get_common_integer_type_declaration_sql(column)
        ))
    }

    fn get_bigint_type_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        // SQLite autoincrement is implicit for INTEGER PKs, but not for BIGINT columns
        if column.autoincrement.unwrap_or(false) {
            self.get_integer_type_declaration_sql(column)
        } else {
            Ok("BIGINT".to_string())
        }
    }

    fn get_clob_type_declaration_sql(&self, _: &ColumnData) -> Result<String> {
        Ok("CLOB".to_string())
    }

    fn get_date_time_type_declaration_sql(&self, _: &ColumnData) -> Result<String> {
        Ok("DATETIME".to_string())
    }

    fn get_varchar_type_declaration_sql_snippet(
        &self,
        length: Option<usize>,
        fixed: bool,
    ) -> Result<String> {
        if fixed {
            Ok(format!("CHAR({})", length.unwrap_or(255)))
        } else {
            let length = length.unwrap_or(0);
            if length > 0 {
                Ok(format!("VARCHAR({})", length))
            } else {
                Ok("TEXT".to_string())
            }
        }
    }

    fn get_type_mapping(&self, db_type: &str) -> Result<TypeId> {
        let db_type = db_type.trim().to_lowercase();
        self.type_mappings
            .get(&db_type)
            .map(|r| *r.value())
            .ok_or_else(|| {
                Error::platform_feature_unsupported(format!(
                    r#"Unknown database type "{}" requested, {} may not support it."#,
                    db_type,
                    self.get_name()
                ))
            })
    }

    fn create_reserved_keywords_list(&self) -> KeywordList {
        KeywordList::sqlite_keywords()
    }

    fn get_create_table_sql(
        &self,
        table: &Table,
        create_flags: Option<CreateFlags>,
    ) -> Result<Vec<String>> {
        let create_flags =
            create_flags.unwrap_or(CreateFlags::CREATE_INDEXES | CreateFlags::CREATE_FOREIGN_KEYS);
        default::get_create_table_sql(self, table, Some(create_flags))
    }

    fn get_create_tables_sql(&self, tables: &[Table]) -> Result<Vec<String>> {
        let mut sql = vec![];
        for table in tables {
            let mut table_sql = self.get_create_table_sql(table, None)?;
            sql.append(&mut table_sql);
        }

        Ok(sql)
    }

    /// Foreign keys are declared inline: SQLite cannot add constraints to an existing table.
    fn _get_create_table_sql(
        &self,
        name: &Identifier,
        columns: &[ColumnData],
        options: &TableOptions,
    ) -> Result<Vec<String>> {
        let mut query_fields = self.get_column_declaration_list_sql(columns)?;

        let autoincrement_key = columns.iter().any(|c| {
            c.primary && c.autoincrement.unwrap_or(false)
        });
        if !autoincrement_key {
            query_fields += &default::get_primary_key_declaration_sql(options);
        }

        for foreign_key in &options.foreign_keys {
            query_fields += ", ";
            query_fields += &self.get_foreign_key_declaration_sql(foreign_key)?;
        }

        let mut query = vec![format!(
            "CREATE TABLE {} ({})",
            name.get_quoted_name(self),
            query_fields
        )];

        for index in &options.indexes {
            query.push(self.get_create_index_sql(index, name)?);
        }

        Ok(query)
    }

    fn get_create_foreign_key_sql(
        &self,
        _: &ForeignKeyConstraint,
        _: &Identifier,
    ) -> Result<String> {
        Err(Error::platform_feature_unsupported(
            "Foreign keys cannot be added to an existing SQLite table",
        ))
    }

    fn get_advanced_foreign_key_options_sql(
        &self,
        foreign_key: &ForeignKeyConstraint,
    ) -> Result<String> {
        let mut query = default::get_advanced_foreign_key_options_sql(self, foreign_key)?;
        query += &default::get_deferrable_foreign_key_options_sql(foreign_key);

        Ok(query)
    }

    fn get_list_tables_sql(&self) -> Result<String> {
        Ok("SELECT name FROM sqlite_master \
            WHERE type = 'table' \
            AND name NOT LIKE 'sqlite_%' \
            ORDER BY name"
            .to_string())
    }

    fn get_list_table_columns_sql(&self, table: &str) -> Result<String> {
        Ok(format!(
            "PRAGMA table_info({})",
            self.quote_string_literal(table)
        ))
    }

    fn get_list_table_indexes_sql(&self, table: &str) -> Result<String> {
        Ok(format!(
            "SELECT il.name AS name, il.\"unique\" AS is_unique, ii.name AS column_name \
            FROM pragma_index_list({}) AS il, pragma_index_info(il.name) AS ii \
            WHERE il.origin = 'c' \
            ORDER BY il.name, ii.seqno",
            self.quote_string_literal(table)
        ))
    }

    fn get_list_table_foreign_keys_sql(&self, table: &str) -> Result<String> {
        Ok(format!(
            "PRAGMA foreign_key_list({})",
            self.quote_string_literal(table)
        ))
    }
}
