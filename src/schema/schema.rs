use crate::schema::{Asset, IntoIdentifier, Table};
use crate::{Error, Result};

/// In-memory description of a set of tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    pub fn get_tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn get_table_names(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(|t| t.get_name().into_owned())
            .collect()
    }

    pub fn get_table<N: IntoIdentifier>(&self, name: N) -> Option<&Table> {
        let name = name.into_identifier().get_name().into_owned();
        self.tables
            .iter()
            .find(|t| t.get_name().eq_ignore_ascii_case(&name))
    }

    pub fn get_table_mut<N: IntoIdentifier>(&mut self, name: N) -> Option<&mut Table> {
        let name = name.into_identifier().get_name().into_owned();
        self.tables
            .iter_mut()
            .find(|t| t.get_name().eq_ignore_ascii_case(&name))
    }

    pub fn has_table<N: IntoIdentifier>(&self, name: N) -> bool {
        self.get_table(name).is_some()
    }

    /// Creates an empty table in this schema and returns it for definition.
    ///
    /// # Errors
    ///
    /// Returns a `TableAlreadyExists` error if a table with the same name is present.
    pub fn create_table<N: IntoIdentifier>(&mut self, name: N) -> Result<&mut Table> {
        let table = Table::new(name);
        let position = self.tables.len();
        self.add_table(table)?;

        Ok(&mut self.tables[position])
    }

    /// Adds a fully defined table.
    ///
    /// # Errors
    ///
    /// Returns a `TableAlreadyExists` error if a table with the same name is present.
    pub fn add_table(&mut self, table: Table) -> Result<()> {
        if self.has_table(table.get_table_name()) {
            return Err(Error::table_already_exists(&table.get_name()));
        }

        self.tables.push(table);
        Ok(())
    }

    /// Removes a table. Dropping a table which is not in the schema does nothing.
    /// Returns whether a table has been removed.
    pub fn drop_table<N: IntoIdentifier>(&mut self, name: N) -> bool {
        let name = name.into_identifier().get_name().into_owned();
        let count = self.tables.len();
        self.tables
            .retain(|t| !t.get_name().eq_ignore_ascii_case(&name));

        count != self.tables.len()
    }

    /// Checks that every foreign key of the given table references a table
    /// and columns present in this schema.
    pub fn validate_foreign_keys_of(&self, table: &Table) -> Result<()> {
        for fk in table.get_foreign_keys() {
            let foreign_table_name = fk.get_unqualified_foreign_table_name();
            let foreign_columns = fk.get_unquoted_foreign_columns();
            let target = if foreign_table_name.eq_ignore_ascii_case(&table.get_name()) {
                Some(table)
            } else {
                self.get_table(foreign_table_name.as_str())
            };

            let valid = target
                .is_some_and(|t| foreign_columns.iter().all(|c| t.has_column(c.as_str())));
            if !valid {
                return Err(Error::foreign_key_target_missing(
                    table.get_table_name(),
                    &foreign_table_name,
                    &foreign_columns,
                ));
            }
        }

        Ok(())
    }

    /// Checks the foreign keys of all the tables in this schema.
    pub fn validate_foreign_keys(&self) -> Result<()> {
        for table in &self.tables {
            self.validate_foreign_keys_of(table)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Schema;
    use crate::error::ErrorKind;
    use crate::r#type::GUID;
    use crate::schema::{Column, ForeignKeyConstraint, ForeignKeyReferentialAction, Table};

    fn item_table() -> Table {
        let mut table = Table::new("item");
        table.add_column(Column::new("id", GUID).unwrap());
        table.add_column(Column::new("owner_id", GUID).unwrap());
        table.set_primary_key(&["id"], None).unwrap();
        table
            .add_foreign_key(ForeignKeyConstraint::new(
                &["owner_id"],
                &["id"],
                "user",
                None,
                Some(ForeignKeyReferentialAction::Cascade),
            ))
            .unwrap();
        table
    }

    #[test]
    fn duplicate_tables_are_rejected() {
        let mut schema = Schema::default();
        schema.add_table(item_table()).unwrap();

        let error = schema.add_table(item_table()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableAlreadyExists);
        assert_eq!(error.to_string(), "table item already exists");

        let error = schema.create_table("ITEM").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableAlreadyExists);
    }

    #[test]
    fn drop_table_is_idempotent() {
        let mut schema = Schema::new(vec![item_table()]);
        assert!(schema.drop_table("item"));
        assert!(!schema.drop_table("item"));
        assert!(schema.get_tables().is_empty());
    }

    #[test]
    fn foreign_keys_need_their_target() {
        let mut schema = Schema::new(vec![item_table()]);
        let error = schema.validate_foreign_keys().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ForeignKeyTargetMissing);

        let user = schema.create_table("user").unwrap();
        user.add_column(Column::new("name", GUID).unwrap());
        let error = schema.validate_foreign_keys().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ForeignKeyTargetMissing);

        let mut schema = Schema::new(vec![item_table()]);
        let user = schema.create_table("user").unwrap();
        user.add_column(Column::new("id", GUID).unwrap());
        schema.validate_foreign_keys().unwrap();
    }
}
