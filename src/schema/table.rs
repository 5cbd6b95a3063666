use crate::schema::asset::{Asset, generate_identifier_name, impl_asset};
use crate::schema::{Column, ForeignKeyConstraint, Identifier, Index, IntoIdentifier};
use crate::{Error, Result};

/// Table parts collected by the platform while generating the `CREATE TABLE` statement.
#[derive(Clone, Debug, Default)]
pub struct TableOptions {
    pub indexes: Vec<Index>,
    pub primary: Option<(Vec<String>, Index)>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    name: Identifier,
    columns: Vec<Column>,
    indices: Vec<Index>,
    foreign_keys: Vec<ForeignKeyConstraint>,
}

impl Table {
    pub fn new<N: IntoIdentifier>(name: N) -> Self {
        Self {
            name: name.into_identifier(),
            columns: vec![],
            indices: vec![],
            foreign_keys: vec![],
        }
    }

    /// Whether the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_table_name(&self) -> &Identifier {
        &self.name
    }

    pub fn get_columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column)
    }

    pub fn add_columns<T: IntoIterator<Item = Column>>(&mut self, columns: T) {
        for column in columns {
            self.add_column(column)
        }
    }

    pub fn has_column<N: IntoIdentifier>(&self, name: N) -> bool {
        self.get_column(name).is_some()
    }

    pub fn get_column<N: IntoIdentifier>(&self, name: N) -> Option<&Column> {
        let name = name.into_identifier().get_name().into_owned();
        self.columns
            .iter()
            .find(|column| column.get_name().eq_ignore_ascii_case(&name))
    }

    /// Sets the primary key. Primary key columns are made not nullable.
    ///
    /// # Errors
    ///
    /// Fails if one of the columns does not exist in this table.
    pub fn set_primary_key<C: AsRef<str>>(
        &mut self,
        columns: &[C],
        index_name: Option<&str>,
    ) -> Result<()> {
        for column_name in columns {
            let column_name = column_name.as_ref();
            let Some(position) = self
                .columns
                .iter()
                .position(|c| c.get_name().eq_ignore_ascii_case(column_name))
            else {
                return Err(Error::column_does_not_exist(column_name, &self.name));
            };

            let column = self.columns.remove(position).set_notnull(true);
            self.columns.insert(position, column);
        }

        self.indices.retain(|i| !i.is_primary());
        self.indices.push(Index::new(
            index_name.unwrap_or("primary"),
            columns,
            true,
            true,
        ));

        Ok(())
    }

    pub fn get_primary_key(&self) -> Option<&Index> {
        self.indices.iter().find(|index| index.is_primary())
    }

    pub fn has_primary_key(&self) -> bool {
        self.get_primary_key().is_some()
    }

    /// Adds a plain (or unique) index over the given columns.
    pub fn add_index<C: AsRef<str>>(
        &mut self,
        columns: &[C],
        index_name: Option<&str>,
        unique: bool,
    ) -> Result<()> {
        self.ensure_columns_exist(columns)?;

        let name = match index_name {
            Some(name) => name.to_string(),
            None => {
                let mut names = vec![self.name.get_name().into_owned()];
                names.extend(columns.iter().map(|c| c.as_ref().to_string()));
                generate_identifier_name(&names, if unique { "uniq" } else { "idx" }, None)
            }
        };

        self.indices.push(Index::new(name.as_str(), columns, unique, false));
        Ok(())
    }

    pub fn get_indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn get_foreign_keys(&self) -> &[ForeignKeyConstraint] {
        &self.foreign_keys
    }

    /// Adds a foreign key constraint. Unnamed constraints receive a generated name.
    ///
    /// # Errors
    ///
    /// Fails if a local column does not exist in this table.
    pub fn add_foreign_key(&mut self, constraint: ForeignKeyConstraint) -> Result<()> {
        let local_columns = constraint.get_unquoted_local_columns();
        self.ensure_columns_exist(local_columns.as_slice())?;

        let constraint = if constraint.is_empty() {
            let mut names = vec![self.name.get_name().into_owned()];
            names.extend(local_columns);
            let name = generate_identifier_name(&names, "fk", None);
            constraint.with_name(&name)
        } else {
            constraint
        };

        self.foreign_keys.push(constraint);
        Ok(())
    }

    /// Adds foreign keys as read from the database, keeping their names as they are.
    pub(crate) fn add_foreign_keys<T: IntoIterator<Item = ForeignKeyConstraint>>(
        &mut self,
        constraints: T,
    ) {
        self.foreign_keys.extend(constraints)
    }

    pub(crate) fn add_indices<T: IntoIterator<Item = Index>>(&mut self, indices: T) {
        self.indices.extend(indices)
    }

    /// Names of the tables referenced by this table's foreign keys.
    pub fn get_referenced_table_names(&self) -> Vec<String> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.get_unqualified_foreign_table_name())
            .collect()
    }

    fn ensure_columns_exist<C: AsRef<str>>(&self, columns: &[C]) -> Result<()> {
        for column_name in columns {
            if !self.has_column(column_name.as_ref()) {
                return Err(Error::column_does_not_exist(
                    column_name.as_ref(),
                    &self.name,
                ));
            }
        }

        Ok(())
    }
}

impl_asset!(Table, name);

#[cfg(test)]
mod tests {
    use super::Table;
    use crate::error::ErrorKind;
    use crate::r#type::{GUID, STRING};
    use crate::schema::{Asset, Column, ForeignKeyConstraint, ForeignKeyReferentialAction};

    fn owned_table() -> Table {
        let mut table = Table::new("item");
        table.add_column(Column::new("title", STRING).unwrap().set_length(255));
        table.add_column(Column::new("id", GUID).unwrap());
        table.add_column(Column::new("owner_id", GUID).unwrap().set_notnull(true));
        table
    }

    #[test]
    fn primary_key_columns_become_not_null() {
        let mut table = owned_table();
        table.set_primary_key(&["id"], None).unwrap();

        let primary = table.get_primary_key().unwrap();
        assert_eq!(primary.get_name(), "primary");
        assert_eq!(primary.get_columns(), vec!["id".to_string()]);
        assert!(table.get_column("id").unwrap().is_notnull());

        let error = table.set_primary_key(&["missing"], None).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ColumnDoesNotExist);
    }

    #[test]
    fn foreign_keys_are_named_when_missing() {
        let mut table = owned_table();
        table
            .add_foreign_key(ForeignKeyConstraint::new(
                &["owner_id"],
                &["id"],
                "user",
                None,
                Some(ForeignKeyReferentialAction::Cascade),
            ))
            .unwrap();

        let fk = &table.get_foreign_keys()[0];
        assert!(fk.get_name().starts_with("FK_"));
        assert_eq!(table.get_referenced_table_names(), vec!["user".to_string()]);

        let error = table
            .add_foreign_key(ForeignKeyConstraint::new(
                &["author_id"],
                &["id"],
                "user",
                None,
                None,
            ))
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ColumnDoesNotExist);
    }

    #[test]
    fn columns_are_looked_up_case_insensitively() {
        let table = owned_table();
        assert!(table.has_column("TITLE"));
        assert!(!table.has_column("description"));
    }
}
