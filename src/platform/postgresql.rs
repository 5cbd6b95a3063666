use super::{DatabasePlatform, KeywordList, default, platform_debug};
use crate::r#type::{BigintType, DateTimeType, GuidType, IntegerType, StringType, TextType};
use crate::schema::{ColumnData, ForeignKeyConstraint};
use crate::{Error, Result, Value};
use dashmap::DashMap;
use std::any::TypeId;

platform_debug!(PostgreSQLPlatform);

/// Renders PostgreSQL DDL. No PostgreSQL driver is bundled: this platform only
/// produces statements, for offline rendering of migrations.
pub struct PostgreSQLPlatform {
    type_mappings: DashMap<String, TypeId>,
}

impl PostgreSQLPlatform {
    pub fn new() -> Self {
        let type_mappings = DashMap::new();
        for (db_type, type_id) in [
            ("bigint", TypeId::of::<BigintType>()),
            ("bigserial", TypeId::of::<BigintType>()),
            ("bpchar", TypeId::of::<StringType>()),
            ("char", TypeId::of::<StringType>()),
            ("int", TypeId::of::<IntegerType>()),
            ("int4", TypeId::of::<IntegerType>()),
            ("int8", TypeId::of::<BigintType>()),
            ("integer", TypeId::of::<IntegerType>()),
            ("serial", TypeId::of::<IntegerType>()),
            ("text", TypeId::of::<TextType>()),
            ("timestamp", TypeId::of::<DateTimeType>()),
            ("uuid", TypeId::of::<GuidType>()),
            ("varchar", TypeId::of::<StringType>()),
        ] {
            type_mappings.insert(db_type.to_string(), type_id);
        }

        Self { type_mappings }
    }
}

impl Default for PostgreSQLPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabasePlatform for PostgreSQLPlatform {
    fn as_dyn(&self) -> &dyn DatabasePlatform {
        self
    }

    fn get_name(&self) -> String {
        "postgresql".to_string()
    }

    fn get_integer_type_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        if column.autoincrement.unwrap_or(false) {
            Ok("SERIAL".to_string())
        } else {
            Ok("INT".to_string())
        }
    }

    fn get_bigint_type_declaration_sql(&self, column: &ColumnData) -> Result<String> {
        if column.autoincrement.unwrap_or(false) {
            Ok("BIGSERIAL".to_string())
        } else {
            Ok("BIGINT".to_string())
        }
    }

    fn get_clob_type_declaration_sql(&self, _: &ColumnData) -> Result<String> {
        Ok("TEXT".to_string())
    }

    fn get_date_time_type_declaration_sql(&self, _: &ColumnData) -> Result<String> {
        Ok("TIMESTAMP(0) WITHOUT TIME ZONE".to_string())
    }

    fn get_guid_type_declaration_sql(&self, _: &ColumnData) -> Result<String> {
        Ok("UUID".to_string())
    }

    fn get_varchar_type_declaration_sql_snippet(
        &self,
        length: Option<usize>,
        fixed: bool,
    ) -> Result<String> {
        let length = length.unwrap_or(255);

        Ok(if fixed {
            format!("CHAR({})", length)
        } else {
            format!("VARCHAR({})", length)
        })
    }

    fn has_native_guid_type(&self) -> bool {
        true
    }

    fn get_type_mapping(&self, db_type: &str) -> Result<TypeId> {
        let db_type = db_type.to_lowercase();
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
        KeywordList::postgres_keywords()
    }

    fn get_advanced_foreign_key_options_sql(
        &self,
        foreign_key: &ForeignKeyConstraint,
    ) -> Result<String> {
        let mut query = "".to_string();
        if let Some(Value::String(m)) = foreign_key.get_option("match") {
            query += " MATCH ";
            query += m;
        }

        query += &default::get_advanced_foreign_key_options_sql(self, foreign_key)?;
        query += &default::get_deferrable_foreign_key_options_sql(foreign_key);

        Ok(query)
    }
}
