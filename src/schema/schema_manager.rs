use crate::platform::CreateFlags;
use crate::schema::{
    Column, Comparator, ForeignKeyConstraint, Identifier, Index, IntoIdentifier, Schema,
    SchemaDiff, Table,
};
use crate::util::{PlatformBox, ToSqlStatementList};
use crate::{AsyncResult, Connection, Error, Result, Row, Value, params};
use log::debug;

pub(crate) fn string_from_value(value: Result<&Value>) -> Result<String> {
    Ok(match value? {
        Value::NULL => "".to_string(),
        Value::String(s) => s.clone(),
        v => v.to_string(),
    })
}

fn _exec_sql<S: ToSqlStatementList>(connection: &Connection, sql: S) -> AsyncResult<'_, ()> {
    let sql = sql.to_statement_list();
    Box::pin(async move {
        for stmt in sql? {
            debug!(target: "schemaline::schema", "{}", stmt);
            connection.execute_statement(&stmt, params![]).await?;
        }

        Ok(())
    })
}

/// Filters asset names if they are configured to return only a subset of all
/// the found elements.
pub fn filter_asset_names(connection: &Connection, names: Vec<String>) -> Vec<String> {
    let configuration = connection.get_configuration();
    names
        .into_iter()
        .filter(|name| configuration.accepts_asset(name))
        .collect()
}

/// Reads and writes the live schema of a connected database.
pub trait SchemaManager: Sync {
    /// Gets the database connection.
    fn get_connection(&self) -> &Connection;

    /// As &dyn SchemaManager
    fn as_dyn(&self) -> &dyn SchemaManager;

    /// Gets the database platform instance.
    ///
    /// # Errors
    ///
    /// The function returns an error if the connection is not active.
    fn get_platform(&self) -> Result<PlatformBox> {
        self.get_connection().get_platform()
    }

    /// Returns a list of all tables in the current database.
    fn list_table_names(&self) -> AsyncResult<'_, Vec<String>> {
        Box::pin(async move {
            let sql = self.get_platform()?.get_list_tables_sql()?;
            let tables = self.get_connection().fetch_all(sql, params![]).await?;

            Ok(filter_asset_names(
                self.get_connection(),
                self.get_portable_tables_list(tables.into_iter().collect())?,
            ))
        })
    }

    /// Whether all the given tables exist.
    fn tables_exist(&self, names: &[&str]) -> AsyncResult<'_, bool> {
        let names = names.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();

        Box::pin(async move {
            let table_names = self
                .list_table_names()
                .await?
                .iter()
                .map(|s| s.to_lowercase())
                .collect::<Vec<_>>();

            Ok(names.iter().all(|n| table_names.contains(n)))
        })
    }

    /// Lists the columns for a given table.
    fn list_table_columns(&self, table: &str) -> AsyncResult<'_, Vec<Column>> {
        let table = table.to_string();
        Box::pin(async move {
            let rows = self.fetch_table_columns(&table).await?;
            self.get_portable_table_column_list(&rows)
        })
    }

    /// Lists the indexes for a given table, primary key included.
    fn list_table_indexes(&self, table: &str) -> AsyncResult<'_, Vec<Index>> {
        let table = table.to_string();
        Box::pin(async move {
            let columns = self.fetch_table_columns(&table).await?;
            let primary = self.get_portable_table_primary_key(&columns)?;

            let sql = self.get_platform()?.get_list_table_indexes_sql(&table)?;
            let rows = self.get_connection().fetch_all(sql, params![]).await?;

            let mut indexes = vec![];
            if !primary.is_empty() {
                indexes.push(Index::new("primary", primary.as_slice(), true, true));
            }

            indexes.extend(self.get_portable_table_indexes_list(rows.into_iter().collect())?);
            Ok(indexes)
        })
    }

    /// Lists the foreign keys for the given table.
    fn list_table_foreign_keys(&self, table: &str) -> AsyncResult<'_, Vec<ForeignKeyConstraint>> {
        let table = table.to_string();
        Box::pin(async move {
            let sql = self
                .get_platform()?
                .get_list_table_foreign_keys_sql(&table)?;
            let rows = self.get_connection().fetch_all(sql, params![]).await?;

            self.get_portable_table_foreign_keys_list(rows.into_iter().collect())
        })
    }

    /// Reads the structure of an existing table.
    ///
    /// # Errors
    ///
    /// Fails with a `TableNotFound` error if the table does not exist.
    fn introspect_table(&self, name: &str) -> AsyncResult<'_, Table> {
        let name = name.to_string();
        Box::pin(async move {
            if !self.tables_exist(&[name.as_str()]).await? {
                return Err(Error::table_not_found(format!("no such table: {}", name)));
            }

            let columns = self.list_table_columns(&name).await?;
            let indexes = self.list_table_indexes(&name).await?;
            let foreign_keys = self.list_table_foreign_keys(&name).await?;

            let mut table = Table::new(Identifier::new(name, false));
            table.add_columns(columns);
            table.add_indices(indexes);
            table.add_foreign_keys(foreign_keys);

            Ok(table)
        })
    }

    /// Creates a schema instance for the current database.
    fn introspect_schema(&self) -> AsyncResult<'_, Schema> {
        Box::pin(async move {
            let mut tables = vec![];
            for table_name in self.list_table_names().await? {
                tables.push(self.introspect_table(&table_name).await?);
            }

            Ok(Schema::new(tables))
        })
    }

    /// Creates a new table.
    fn create_table<'a>(&'a self, table: &Table) -> AsyncResult<'a, ()> {
        let create_flags = CreateFlags::CREATE_INDEXES | CreateFlags::CREATE_FOREIGN_KEYS;
        let sql = self
            .get_platform()
            .and_then(|platform| platform.get_create_table_sql(table, Some(create_flags)));

        _exec_sql(self.get_connection(), sql)
    }

    /// Drops a table.
    fn drop_table<'a>(&'a self, name: &dyn IntoIdentifier) -> AsyncResult<'a, ()> {
        let name = name.into_identifier();
        let sql = self
            .get_platform()
            .and_then(|platform| platform.get_drop_table_sql(&name));

        _exec_sql(self.get_connection(), sql)
    }

    /// Alters an existing schema.
    fn alter_schema(&self, schema_diff: SchemaDiff) -> AsyncResult<'_, ()> {
        let sql = self
            .get_platform()
            .and_then(|platform| schema_diff.to_sql(platform.as_dyn()));

        _exec_sql(self.get_connection(), sql)
    }

    /// Migrates an existing schema to a new schema.
    fn migrate_schema(&self, to_schema: Schema) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            let comparator = self.create_comparator();
            let from_schema = self.introspect_schema().await?;
            let schema_diff = comparator.compare_schemas(&from_schema, &to_schema)?;

            self.alter_schema(schema_diff).await
        })
    }

    /// Fetches the raw column rows for a given table.
    fn fetch_table_columns(&self, table: &str) -> AsyncResult<'_, Vec<Row>> {
        let table = table.to_string();
        Box::pin(async move {
            let sql = self.get_platform()?.get_list_table_columns_sql(&table)?;
            let rows = self.get_connection().fetch_all(sql, params![]).await?;

            Ok(rows.into_iter().collect())
        })
    }

    fn get_portable_tables_list(&self, tables: Vec<Row>) -> Result<Vec<String>> {
        let mut list = vec![];
        for table in tables {
            list.push(self.get_portable_table_definition(&table)?);
        }

        Ok(list)
    }

    fn get_portable_table_definition(&self, table: &Row) -> Result<String> {
        string_from_value(table.get(0_usize))
    }

    fn get_portable_table_column_list(&self, table_columns: &[Row]) -> Result<Vec<Column>> {
        let mut list = vec![];
        for table_column in table_columns {
            list.push(self.get_portable_table_column_definition(table_column)?);
        }

        Ok(list)
    }

    /// Gets Table Column Definition.
    fn get_portable_table_column_definition(&self, table_column: &Row) -> Result<Column>;

    /// Extracts the primary key column names, in key order, from the column rows.
    #[allow(unused_variables)]
    fn get_portable_table_primary_key(&self, table_columns: &[Row]) -> Result<Vec<String>> {
        Ok(vec![])
    }

    #[allow(unused_variables)]
    fn get_portable_table_indexes_list(&self, table_indexes: Vec<Row>) -> Result<Vec<Index>> {
        Ok(vec![])
    }

    fn get_portable_table_foreign_keys_list(
        &self,
        table_foreign_keys: Vec<Row>,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        let mut list = vec![];
        for value in table_foreign_keys {
            list.push(self.get_portable_table_foreign_key_definition(&value)?);
        }

        Ok(list)
    }

    fn get_portable_table_foreign_key_definition(
        &self,
        foreign_key: &Row,
    ) -> Result<ForeignKeyConstraint> {
        let local_columns = string_from_value(foreign_key.get("local_columns"))?;
        let foreign_columns = string_from_value(foreign_key.get("foreign_columns"))?;
        let foreign_table = string_from_value(foreign_key.get("foreign_table"))?;

        Ok(ForeignKeyConstraint::new(
            &local_columns.split(',').collect::<Vec<_>>(),
            &foreign_columns.split(',').collect::<Vec<_>>(),
            foreign_table.as_str(),
            None,
            None,
        ))
    }

    fn create_comparator(&self) -> Box<dyn Comparator + Send + '_>;
}

