use crate::schema::{Asset, Schema, SchemaDiff};
use crate::{Error, Result};

/// Compares two schemas and returns the difference from `from_schema` to `to_schema`.
pub trait Comparator {
    fn compare_schemas(&self, from_schema: &Schema, to_schema: &Schema) -> Result<SchemaDiff>;
}

/// Detects tables to create and tables to drop.
///
/// A table present in both schemas must be identical on both sides: altering
/// a table is rejected with an `UnsupportedSchemaChange` error.
#[derive(Default)]
pub struct GenericComparator {}

impl GenericComparator {
    pub fn new() -> Self {
        Self {}
    }
}

impl Comparator for GenericComparator {
    fn compare_schemas(&self, from_schema: &Schema, to_schema: &Schema) -> Result<SchemaDiff> {
        for table in from_schema.get_tables() {
            match to_schema.get_table(table.get_table_name()) {
                Some(to_table) if to_table != table => {
                    return Err(Error::unsupported_schema_change(&table.get_name()));
                }
                _ => (),
            }
        }

        let created_tables = to_schema
            .get_tables()
            .iter()
            .filter(|t| !from_schema.has_table(t.get_table_name()))
            .cloned()
            .collect();

        let dropped_tables = from_schema
            .get_tables()
            .iter()
            .filter(|t| !to_schema.has_table(t.get_table_name()))
            .cloned()
            .collect::<Vec<_>>();

        for table in &dropped_tables {
            log::debug!(target: "schemaline::schema", "table {} is going to be dropped", table.get_name());
        }

        Ok(SchemaDiff::new(created_tables, dropped_tables))
    }
}

#[cfg(test)]
mod tests {
    use super::{Comparator, GenericComparator};
    use crate::error::ErrorKind;
    use crate::r#type::{INTEGER, TEXT};
    use crate::schema::{Asset, Column, Schema, Table};

    fn table(name: &str) -> Table {
        let mut table = Table::new(name);
        table.add_column(Column::new("id", INTEGER).unwrap());
        table
    }

    #[test]
    fn detects_created_and_dropped_tables() {
        let from = Schema::new(vec![table("user"), table("item")]);
        let to = Schema::new(vec![table("user"), table("tag")]);

        let diff = GenericComparator::new().compare_schemas(&from, &to).unwrap();
        let created: Vec<_> = diff.get_created_tables().iter().map(|t| t.get_name().into_owned()).collect();
        let dropped: Vec<_> = diff.get_dropped_tables().iter().map(|t| t.get_name().into_owned()).collect();

        assert_eq!(created, vec!["tag".to_string()]);
        assert_eq!(dropped, vec!["item".to_string()]);
    }

    #[test]
    fn identical_schemas_have_an_empty_diff() {
        let schema = Schema::new(vec![table("user")]);
        let diff = GenericComparator::new()
            .compare_schemas(&schema, &schema.clone())
            .unwrap();

        assert!(diff.is_empty());
    }

    #[test]
    fn altered_tables_are_rejected() {
        let from = Schema::new(vec![table("note")]);
        let mut to = from.clone();
        to.get_table_mut("note")
            .unwrap()
            .add_column(Column::new("extra", TEXT).unwrap());

        let error = GenericComparator::new().compare_schemas(&from, &to).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedSchemaChange);
        assert!(error.to_string().contains(r#""note""#));
    }
}
