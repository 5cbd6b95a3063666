mod executed_migration;

use crate::migrate::Direction;
use crate::migrate::execution_result::ExecutionResult;
use crate::r#type::{DATETIME, INTEGER, STRING};
use crate::schema::{Column, Table};
use crate::{AsyncResult, Connection, Result, Value, params};
pub use executed_migration::{ExecutedMigration, ExecutedMigrationList};
use std::sync::atomic::{AtomicBool, Ordering};

/// Records which revisions have been applied.
pub trait MetadataStorage {
    fn get_executed_migrations(&self) -> AsyncResult<'_, ExecutedMigrationList>;
    fn complete(&self, execution_result: ExecutionResult) -> AsyncResult<'_, ()>;
}

pub struct TableMetadataStorage<'conn> {
    connection: &'conn Connection,
    is_initialized: AtomicBool,
    table_name: String,
    version_column_name: String,
    checksum_column_name: String,
    executed_at_column_name: String,
    execution_time_column_name: String,
}

impl<'conn> TableMetadataStorage<'conn> {
    pub fn new(connection: &'conn Connection) -> Self {
        Self {
            connection,
            is_initialized: AtomicBool::new(false),
            table_name: connection
                .get_configuration()
                .get_version_table_name()
                .to_string(),
            version_column_name: "version".to_string(),
            checksum_column_name: "checksum".to_string(),
            executed_at_column_name: "executed_at".to_string(),
            execution_time_column_name: "execution_time".to_string(),
        }
    }

    pub fn get_table_name(&self) -> &str {
        &self.table_name
    }

    async fn is_initialized(&self) -> Result<bool> {
        if self.is_initialized.load(Ordering::SeqCst) {
            return Ok(true);
        }

        let schema_manager = self.connection.create_schema_manager()?;
        let exists = schema_manager
            .tables_exist(&[self.table_name.as_str()])
            .await?;
        self.is_initialized.store(exists, Ordering::SeqCst);

        Ok(exists)
    }

    /// Creates the version table if it does not exist yet.
    pub async fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized().await? {
            return Ok(());
        }

        let table = self.get_expected_table()?;
        let schema_manager = self.connection.create_schema_manager()?;
        schema_manager.create_table(&table).await?;
        self.is_initialized.store(true, Ordering::SeqCst);

        Ok(())
    }

    fn get_expected_table(&self) -> Result<Table> {
        let mut table = Table::new(self.table_name.as_str());
        table.add_column(
            Column::new(&self.version_column_name, STRING)?
                .set_length(64)
                .set_notnull(true),
        );
        table.add_column(Column::new(&self.checksum_column_name, STRING)?.set_length(96));
        table.add_column(Column::new(&self.executed_at_column_name, DATETIME)?);
        table.add_column(Column::new(&self.execution_time_column_name, INTEGER)?);
        table.set_primary_key(&[&self.version_column_name], None)?;

        Ok(table)
    }
}

impl MetadataStorage for TableMetadataStorage<'_> {
    fn get_executed_migrations(&self) -> AsyncResult<'_, ExecutedMigrationList> {
        Box::pin(async move {
            if !self.is_initialized().await? {
                return Ok(ExecutedMigrationList::default());
            }

            let platform = self.connection.get_platform()?;
            let sql = format!(
                "SELECT {}, {}, {}, {} FROM {} ORDER BY {}",
                platform.quote_identifier(&self.version_column_name),
                platform.quote_identifier(&self.checksum_column_name),
                platform.quote_identifier(&self.executed_at_column_name),
                platform.quote_identifier(&self.execution_time_column_name),
                platform.quote_identifier(&self.table_name),
                platform.quote_identifier(&self.executed_at_column_name),
            );

            let rows = self.connection.fetch_all(sql, params![]).await?;
            let mut items = vec![];
            for row in &rows {
                let revision = row.get(0_usize)?.to_string();
                let checksum = row
                    .get(1_usize)?
                    .as_str()
                    .and_then(|checksum| hex::decode(checksum).ok());
                let executed_at = match self.connection.convert_value(row.get(2_usize)?, DATETIME)? {
                    Value::DateTime(dt) => Some(dt),
                    _ => None,
                };
                let execution_time = row
                    .get(3_usize)?
                    .as_i64()
                    .and_then(|time| u64::try_from(time).ok());

                items.push(ExecutedMigration {
                    revision,
                    checksum,
                    executed_at,
                    execution_time,
                });
            }

            Ok(ExecutedMigrationList { items })
        })
    }

    fn complete(&self, execution_result: ExecutionResult) -> AsyncResult<'_, ()> {
        Box::pin(async move {
            self.ensure_initialized().await?;

            if execution_result.direction == Direction::Up {
                self.connection
                    .insert(
                        self.table_name.as_str(),
                        vec![
                            (
                                self.version_column_name.as_str(),
                                Value::from(execution_result.revision),
                            ),
                            (
                                self.checksum_column_name.as_str(),
                                Value::from(hex::encode(&execution_result.checksum)),
                            ),
                            (
                                self.executed_at_column_name.as_str(),
                                self.connection.convert_database_value(
                                    Value::DateTime(execution_result.executed_at),
                                    DATETIME,
                                )?,
                            ),
                            (
                                self.execution_time_column_name.as_str(),
                                Value::Int(execution_result.execution_time),
                            ),
                        ],
                    )
                    .await?;
            } else {
                self.connection
                    .delete(
                        self.table_name.as_str(),
                        vec![(
                            self.version_column_name.as_str(),
                            Value::from(execution_result.revision),
                        )],
                    )
                    .await?;
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MetadataStorage, TableMetadataStorage};
    use crate::migrate::Direction;
    use crate::migrate::execution_result::ExecutionResult;
    use crate::tests::FunctionalTestsHelper;

    fn result(revision: &'static str, direction: Direction) -> ExecutionResult {
        ExecutionResult {
            sql: vec![],
            revision,
            checksum: vec![0xab, 0xcd],
            direction,
            executed_at: chrono::Utc::now(),
            execution_time: 3,
            skipped: false,
        }
    }

    #[tokio::test]
    async fn records_and_removes_revisions() {
        let helper = FunctionalTestsHelper::default().await;
        let storage = TableMetadataStorage::new(&helper.connection);
        assert!(storage.get_executed_migrations().await.unwrap().is_empty());
        assert!(!helper.table_exists("schemaline_versions").await);

        storage.complete(result("aaaa00000001", Direction::Up)).await.unwrap();
        assert!(helper.table_exists("schemaline_versions").await);

        let executed = storage.get_executed_migrations().await.unwrap();
        assert_eq!(executed.len(), 1);
        let migration = executed.get_migration("aaaa00000001").unwrap();
        assert_eq!(migration.checksum.as_deref(), Some(&[0xab, 0xcd][..]));
        assert_eq!(migration.execution_time, Some(3));
        assert!(migration.executed_at.is_some());

        storage.complete(result("aaaa00000001", Direction::Down)).await.unwrap();
        assert!(storage.get_executed_migrations().await.unwrap().is_empty());
    }
}
