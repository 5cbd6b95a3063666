use crate::r#type::{GuidType, IntegerType, BigintType};
use crate::schema::{
    Column, Comparator, ForeignKeyConstraint, ForeignKeyReferentialAction, GenericComparator,
    Index, SchemaManager, string_from_value,
};
use crate::{Connection, Result, Row, Value};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::any::TypeId;

lazy_static! {
    static ref DECLARED_TYPE_REGEX: Regex =
        Regex::new(r"^([A-Za-z ]+?)\s*(?:\((\d+)(?:\s*,\s*(\d+))?\))?$").unwrap();
}

pub struct SQLiteSchemaManager<'a> {
    connection: &'a Connection,
}

impl<'a> SQLiteSchemaManager<'a> {
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

fn int_from_value(value: Result<&Value>) -> Result<i64> {
    let value = value?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .unwrap_or_default())
}

/// Converts the default expression reported by `PRAGMA table_info`.
fn parse_default_value(default: &Value, r#type: TypeId) -> Value {
    let Some(default) = default.as_str() else {
        return default.clone();
    };

    if default.eq_ignore_ascii_case("NULL") {
        return Value::NULL;
    }

    if let Some(literal) = default
        .strip_prefix('\'')
        .and_then(|d| d.strip_suffix('\''))
    {
        return Value::String(literal.replace("''", "'"));
    }

    if r#type == TypeId::of::<IntegerType>() || r#type == TypeId::of::<BigintType>() {
        if let Ok(value) = default.parse::<i64>() {
            return Value::Int(value);
        }
    }

    Value::String(default.to_string())
}

impl<'a> SchemaManager for SQLiteSchemaManager<'a> {
    fn get_connection(&self) -> &'a Connection {
        self.connection
    }

    fn as_dyn(&self) -> &dyn SchemaManager {
        self
    }

    fn get_portable_table_column_definition(&self, table_column: &Row) -> Result<Column> {
        let platform = self.get_platform()?;
        let name = string_from_value(table_column.get("name"))?;
        let declared_type = string_from_value(table_column.get("type"))?;

        let (db_type, length) = match DECLARED_TYPE_REGEX.captures(declared_type.trim()) {
            Some(captures) => (
                captures
                    .get(1)
                    .map(|m| m.as_str().to_lowercase())
                    .unwrap_or_default(),
                captures.get(2).and_then(|m| m.as_str().parse::<usize>().ok()),
            ),
            None => (declared_type.to_lowercase(), None),
        };

        let fixed = db_type == "char";
        let r#type = if fixed && length == Some(36) {
            TypeId::of::<GuidType>()
        } else if platform.has_type_mapping_for(&db_type) {
            platform.get_type_mapping(&db_type)?
        } else {
            debug!(target: "schemaline::schema", r#"unknown column type "{}" for column "{}", reading it as text"#, declared_type, name);
            platform.get_type_mapping("text")?
        };

        let mut column = Column::new(&name, r#type)?
            .set_notnull(int_from_value(table_column.get("notnull"))? != 0)
            .set_default(parse_default_value(table_column.get("dflt_value")?, r#type));

        if r#type != TypeId::of::<GuidType>() {
            if let Some(length) = length {
                column = column.set_length(length);
            }
            if fixed {
                column = column.set_fixed(true);
            }
        }

        Ok(column)
    }

    fn get_portable_table_primary_key(&self, table_columns: &[Row]) -> Result<Vec<String>> {
        let mut primary = vec![];
        for row in table_columns {
            let position = int_from_value(row.get("pk"))?;
            if position > 0 {
                primary.push((position, string_from_value(row.get("name"))?));
            }
        }

        primary.sort_by_key(|(position, _)| *position);
        Ok(primary.into_iter().map(|(_, name)| name).collect())
    }

    fn get_portable_table_indexes_list(&self, table_indexes: Vec<Row>) -> Result<Vec<Index>> {
        let mut grouped: Vec<(String, bool, Vec<String>)> = vec![];
        for row in table_indexes {
            let name = string_from_value(row.get("name"))?;
            let column = string_from_value(row.get("column_name"))?;

            match grouped.iter_mut().find(|(n, _, _)| n == &name) {
                Some((_, _, columns)) => columns.push(column),
                None => {
                    let unique = int_from_value(row.get("is_unique"))? != 0;
                    grouped.push((name, unique, vec![column]));
                }
            }
        }

        Ok(grouped
            .into_iter()
            .map(|(name, unique, columns)| Index::new(name.as_str(), &columns, unique, false))
            .collect())
    }

    fn get_portable_table_foreign_keys_list(
        &self,
        table_foreign_keys: Vec<Row>,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        let mut rows = vec![];
        for row in table_foreign_keys {
            rows.push((int_from_value(row.get("id"))?, int_from_value(row.get("seq"))?, row));
        }
        rows.sort_by_key(|(id, seq, _)| (*id, *seq));

        let mut list = vec![];
        let mut current: Option<(i64, Vec<String>, Vec<String>, Row)> = None;
        for (id, _, row) in rows {
            let local = string_from_value(row.get("from"))?;
            let foreign = string_from_value(row.get("to"))?;

            match &mut current {
                Some((current_id, locals, foreigns, _)) if *current_id == id => {
                    locals.push(local);
                    foreigns.push(foreign);
                }
                _ => {
                    if let Some(group) = current.take() {
                        list.push(Self::build_foreign_key(group)?);
                    }
                    current = Some((id, vec![local], vec![foreign], row));
                }
            }
        }

        if let Some(group) = current {
            list.push(Self::build_foreign_key(group)?);
        }

        Ok(list)
    }

    fn create_comparator(&self) -> Box<dyn Comparator + Send + '_> {
        Box::new(GenericComparator::new())
    }
}

impl SQLiteSchemaManager<'_> {
    fn build_foreign_key(
        (_, local_columns, foreign_columns, row): (i64, Vec<String>, Vec<String>, Row),
    ) -> Result<ForeignKeyConstraint> {
        let referential_action = |column: &str| -> Result<Option<ForeignKeyReferentialAction>> {
            let action = string_from_value(row.get(column))?;
            Ok(ForeignKeyReferentialAction::from_sql(&action)
                .filter(|a| *a != ForeignKeyReferentialAction::NoAction))
        };

        Ok(ForeignKeyConstraint::new(
            &local_columns,
            &foreign_columns,
            string_from_value(row.get("table"))?.as_str(),
            referential_action("on_update")?,
            referential_action("on_delete")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::r#type::{GUID, GuidType, INTEGER, IntegerType, STRING, StringType, TEXT, TextType};
    use crate::schema::{Asset, Column, ForeignKeyConstraint, ForeignKeyReferentialAction, Table};
    use crate::tests::{FunctionalTestsHelper, create_connection};
    use crate::{Configuration, Value, params};
    use std::any::TypeId;

    fn owner_table() -> Table {
        let mut table = Table::new("owner");
        table.add_column(Column::new("id", GUID).unwrap());
        table.set_primary_key(&["id"], None).unwrap();
        table
    }

    fn pet_table() -> Table {
        let mut table = Table::new("pet");
        table.add_columns([
            Column::new("name", STRING).unwrap().set_length(40).set_notnull(true),
            Column::new("notes", TEXT).unwrap(),
            Column::new("legs", INTEGER).unwrap().set_default(4_i64).set_notnull(true),
            Column::new("id", GUID).unwrap(),
            Column::new("owner_id", GUID).unwrap().set_notnull(true),
        ]);
        table.set_primary_key(&["id"], None).unwrap();
        table.add_index(&["owner_id", "name"], Some("idx_pet_owner_name"), true).unwrap();
        table
            .add_foreign_key(ForeignKeyConstraint::new(
                &["owner_id"],
                &["id"],
                "owner",
                None,
                Some(ForeignKeyReferentialAction::Cascade),
            ))
            .unwrap();
        table
    }

    #[tokio::test]
    async fn introspects_created_tables() {
        let connection = create_connection().await.unwrap();
        let schema_manager = connection.create_schema_manager().unwrap();
        schema_manager.create_table(&owner_table()).await.unwrap();
        schema_manager.create_table(&pet_table()).await.unwrap();

        assert_eq!(
            schema_manager.list_table_names().await.unwrap(),
            vec!["owner".to_string(), "pet".to_string()]
        );

        let table = schema_manager.introspect_table("pet").await.unwrap();
        let columns = table.get_columns();
        assert_eq!(
            columns.iter().map(|c| c.get_name().into_owned()).collect::<Vec<_>>(),
            vec!["name", "notes", "legs", "id", "owner_id"]
        );

        assert_eq!(columns[0].get_type(), TypeId::of::<StringType>());
        assert_eq!(columns[0].get_length(), Some(40));
        assert!(columns[0].is_notnull());
        assert_eq!(columns[1].get_type(), TypeId::of::<TextType>());
        assert!(!columns[1].is_notnull());
        assert_eq!(columns[2].get_type(), TypeId::of::<IntegerType>());
        assert_eq!(columns[2].get_default(), &Value::Int(4));
        assert_eq!(columns[3].get_type(), TypeId::of::<GuidType>());
        assert!(columns[3].is_notnull());

        let primary = table.get_primary_key().unwrap();
        assert_eq!(primary.get_columns(), vec!["id".to_string()]);

        let index = table
            .get_indices()
            .iter()
            .find(|i| i.get_name() == "idx_pet_owner_name")
            .unwrap();
        assert!(index.is_unique());
        assert_eq!(index.get_columns(), vec!["owner_id".to_string(), "name".to_string()]);

        let foreign_keys = table.get_foreign_keys();
        assert_eq!(foreign_keys.len(), 1);
        assert_eq!(foreign_keys[0].get_foreign_table().get_name(), "owner");
        assert_eq!(foreign_keys[0].get_unquoted_local_columns(), vec!["owner_id".to_string()]);
        assert_eq!(foreign_keys[0].get_unquoted_foreign_columns(), vec!["id".to_string()]);
        assert_eq!(foreign_keys[0].on_delete, Some(ForeignKeyReferentialAction::Cascade));
        assert_eq!(foreign_keys[0].on_update, None);
    }

    #[tokio::test]
    async fn introspecting_a_missing_table_fails() {
        let connection = create_connection().await.unwrap();
        let schema_manager = connection.create_schema_manager().unwrap();

        let error = schema_manager.introspect_table("item").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableNotFound);
        assert_eq!(error.to_string(), "no such table: item");
    }

    #[tokio::test]
    async fn drops_tables() {
        let connection = create_connection().await.unwrap();
        let schema_manager = connection.create_schema_manager().unwrap();
        schema_manager.create_table(&owner_table()).await.unwrap();
        assert!(schema_manager.tables_exist(&["owner"]).await.unwrap());

        schema_manager.drop_table(&"owner").await.unwrap();
        assert!(!schema_manager.tables_exist(&["owner"]).await.unwrap());

        let error = schema_manager.drop_table(&"owner").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableNotFound);
    }

    #[tokio::test]
    async fn schema_assets_filter_hides_tables() {
        let configuration = Configuration::new()
            .set_schema_assets_filter(Box::new(|name| name != "pet"));
        let helper = FunctionalTestsHelper::with_configuration(configuration).await;
        let schema_manager = helper.get_schema_manager();
        schema_manager.create_table(&owner_table()).await.unwrap();
        schema_manager.create_table(&pet_table()).await.unwrap();
        helper
            .connection
            .execute_statement("CREATE TABLE schemaline_versions (version TEXT)", params![])
            .await
            .unwrap();

        assert_eq!(
            schema_manager.list_table_names().await.unwrap(),
            vec!["owner".to_string(), "schemaline_versions".to_string()]
        );
        assert!(!schema_manager.introspect_schema().await.unwrap().has_table("pet"));
    }

    #[tokio::test]
    async fn unknown_column_types_are_read_as_text() {
        let connection = create_connection().await.unwrap();
        connection
            .execute_statement("CREATE TABLE odd (shape GEOMETRY)", params![])
            .await
            .unwrap();

        let schema_manager = connection.create_schema_manager().unwrap();
        let columns = schema_manager.list_table_columns("odd").await.unwrap();
        assert_eq!(columns[0].get_type(), TypeId::of::<TextType>());
    }
}
