mod execution_result;
mod executor;
pub mod metadata;
mod migration_plan;

pub use crate::migrate::execution_result::ExecutionResult;
pub use crate::migrate::executor::Executor;
use crate::migrate::metadata::{ExecutedMigrationList, MetadataStorage, TableMetadataStorage};
use crate::migrate::migration_plan::MigrationPlan;
use crate::platform::DatabasePlatform;
use crate::schema::{GenericComparator, Schema};
use crate::{Connection, Error, Result, params};
use log::{debug, error, info, warn};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Up => "up",
                Self::Down => "down",
            }
        )
    }
}

pub type OpClosure = dyn (Fn(&mut Executor<'_>, &Schema) -> Result<()>) + Send + Sync;
pub type PreOpClosure = dyn (Fn(&Schema) -> Result<Schema>) + Send + Sync;
pub type PostOpClosure = dyn (Fn(&Schema) -> Result<()>) + Send + Sync;

/// A reversible schema change, linked to the revision it follows.
#[derive(Clone)]
pub struct Migration {
    pub revision: &'static str,
    pub down_revision: Option<&'static str>,
    pub description: &'static (dyn (Fn() -> &'static str) + Send + Sync),
    pub up: &'static OpClosure,
    pub down: &'static OpClosure,
    pub pre_up: Option<&'static PreOpClosure>,
    pub post_up: Option<&'static PostOpClosure>,
    pub pre_down: Option<&'static PreOpClosure>,
    pub post_down: Option<&'static PostOpClosure>,
    pub checksum: Cow<'static, [u8]>,
}

impl Debug for Migration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("revision", &self.revision)
            .field("down_revision", &self.down_revision)
            .field("description", &(self.description)())
            .finish_non_exhaustive()
    }
}

/// Applies and reverts a linear chain of migrations.
///
/// With `ignore_missing`, the root migration may name a predecessor which is
/// not part of the chain: it is assumed to have been applied elsewhere.
pub struct Migrator {
    migrations: Cow<'static, [Migration]>,
    ignore_missing: bool,
}

impl Migrator {
    pub const fn new(migrations: Cow<'static, [Migration]>, ignore_missing: bool) -> Self {
        Self {
            migrations,
            ignore_missing,
        }
    }

    /// Returns the migrations ordered along the predecessor chain, root first.
    ///
    /// # Errors
    ///
    /// Fails if a revision is declared twice, if a predecessor is unknown, if
    /// the history branches or if it contains a cycle.
    pub fn revisions(&self) -> Result<Vec<&Migration>> {
        let mut by_revision = HashMap::new();
        for migration in self.migrations.iter() {
            if by_revision.insert(migration.revision, migration).is_some() {
                return Err(Error::duplicate_revision(migration.revision));
            }
        }

        let mut children: HashMap<&str, Vec<&Migration>> = HashMap::new();
        let mut roots = vec![];
        for migration in self.migrations.iter() {
            match migration.down_revision {
                Some(parent) if by_revision.contains_key(parent) => {
                    children.entry(parent).or_default().push(migration)
                }
                Some(parent) if !self.ignore_missing => {
                    return Err(Error::unknown_revision(parent));
                }
                _ => roots.push(migration),
            }
        }

        let Some(first) = self.migrations.first() else {
            return Ok(vec![]);
        };

        let heads = self
            .migrations
            .iter()
            .filter(|m| !children.contains_key(m.revision))
            .map(|m| m.revision)
            .collect::<Vec<_>>();
        if heads.len() > 1 {
            return Err(Error::multiple_heads(&heads));
        }

        let Some(root) = roots.first().copied() else {
            return Err(Error::revision_cycle(first.revision));
        };

        let mut chain = vec![root];
        let mut current = root;
        while let Some(next) = children.get(current.revision).and_then(|c| c.first()) {
            chain.push(next);
            current = next;
        }

        if chain.len() != self.migrations.len() {
            let orphan = self
                .migrations
                .iter()
                .find(|m| !chain.iter().any(|c| c.revision == m.revision))
                .map_or(first.revision, |m| m.revision);
            return Err(Error::revision_cycle(orphan));
        }

        Ok(chain)
    }

    /// The latest revision of the chain.
    pub fn head(&self) -> Result<Option<&'static str>> {
        Ok(self.revisions()?.last().map(|m| m.revision))
    }

    /// The latest applied revision, `None` if the database is at base.
    pub async fn current(&self, connection: &Connection) -> Result<Option<&'static str>> {
        let executed = TableMetadataStorage::new(connection)
            .get_executed_migrations()
            .await?;

        Ok(self
            .revisions()?
            .iter()
            .rev()
            .find(|m| executed.has_migration(m.revision))
            .map(|m| m.revision))
    }

    /// Applies every pending migration.
    pub async fn upgrade(&self, connection: &Connection) -> Result<()> {
        match self.head()? {
            Some(head) => self.upgrade_to(connection, head).await,
            None => {
                info!(target: "schemaline::migrate", "No migration to execute.");
                Ok(())
            }
        }
    }

    /// Applies the pending migrations up to the given revision, included.
    pub async fn upgrade_to(&self, connection: &Connection, revision: &str) -> Result<()> {
        let chain = self.revisions()?;
        let end = Self::position(&chain, revision)? + 1;

        let executed = self.get_executed_migrations(connection, &chain).await?;
        let plans = chain[..end]
            .iter()
            .filter(|m| !executed.has_migration(m.revision))
            .map(|m| MigrationPlan::new((*m).clone(), Direction::Up))
            .collect::<Vec<_>>();

        info!(target: "schemaline::migrate", "Migrating {} to {}", Direction::Up, revision);
        self.execute(connection, plans).await
    }

    /// Reverts the applied migrations following the given revision.
    /// A `None` target reverts everything back to base.
    pub async fn downgrade_to(&self, connection: &Connection, target: Option<&str>) -> Result<()> {
        let chain = self.revisions()?;
        let start = match target {
            Some(target) => Self::position(&chain, target)? + 1,
            None => 0,
        };

        let executed = self.get_executed_migrations(connection, &chain).await?;
        let plans = chain[start..]
            .iter()
            .rev()
            .filter(|m| executed.has_migration(m.revision))
            .map(|m| MigrationPlan::new((*m).clone(), Direction::Down))
            .collect::<Vec<_>>();

        info!(target: "schemaline::migrate", "Migrating {} to {}", Direction::Down, target.unwrap_or("base"));
        self.execute(connection, plans).await
    }

    /// Renders the statements of the migrations in the given direction without
    /// executing them, starting from `from_schema`.
    ///
    /// Upwards, every migration up to `target` (head if `None`) is rendered;
    /// downwards, every migration after `target` (all if `None`) is rendered
    /// in reverse order.
    pub fn render_sql(
        &self,
        platform: &dyn DatabasePlatform,
        from_schema: &Schema,
        direction: Direction,
        target: Option<&str>,
    ) -> Result<Vec<String>> {
        let chain = self.revisions()?;
        let plans = match direction {
            Direction::Up => {
                let end = match target {
                    Some(target) => Self::position(&chain, target)? + 1,
                    None => chain.len(),
                };
                chain[..end].to_vec()
            }
            Direction::Down => {
                let start = match target {
                    Some(target) => Self::position(&chain, target)? + 1,
                    None => 0,
                };
                chain[start..].iter().rev().copied().collect()
            }
        };

        let comparator = GenericComparator::new();
        let mut schema = from_schema.clone();
        let mut sql = vec![];
        for migration in plans {
            let plan = MigrationPlan::new(migration.clone(), direction);
            let mut executor = Executor::new(platform);
            let (to_schema, _) = executor.prepare(&plan, &schema, &comparator)?;

            sql.append(&mut executor.take_sql());
            schema = to_schema;
        }

        Ok(sql)
    }

    fn position(chain: &[&Migration], revision: &str) -> Result<usize> {
        chain
            .iter()
            .position(|m| m.revision == revision)
            .ok_or_else(|| Error::unknown_revision(revision))
    }

    async fn get_executed_migrations(
        &self,
        connection: &Connection,
        chain: &[&Migration],
    ) -> Result<ExecutedMigrationList> {
        let executed = TableMetadataStorage::new(connection)
            .get_executed_migrations()
            .await?;

        for migration in chain {
            let stored = executed
                .get_migration(migration.revision)
                .and_then(|m| m.checksum.as_deref());
            if stored.is_some_and(|checksum| checksum != migration.checksum.as_ref()) {
                warn!(target: "schemaline::migrate", "Migration {} has been modified after being applied", migration.revision);
            }
        }

        Ok(executed)
    }

    async fn execute(&self, connection: &Connection, plans: Vec<MigrationPlan>) -> Result<()> {
        if plans.is_empty() {
            info!(target: "schemaline::migrate", "No migration to execute.");
            return Ok(());
        }

        let plans_count = plans.len();
        let global_start = chrono::Utc::now();

        connection.begin_transaction().await?;
        let sql_count = match self.execute_plans(connection, plans).await {
            Ok(sql_count) => sql_count,
            Err(e) => {
                if let Err(rollback_error) = connection.roll_back().await {
                    error!(target: "schemaline::migrate", "Rollback failed: {}", rollback_error);
                }

                return Err(e);
            }
        };

        connection.commit().await?;
        let total_time = chrono::Utc::now() - global_start;

        info!(target: "schemaline::migrate", "Migrated database in {}ms, {} migrations executed, {} sql queries", total_time.num_milliseconds(), plans_count, sql_count);

        Ok(())
    }

    async fn execute_plans(&self, connection: &Connection, plans: Vec<MigrationPlan>) -> Result<usize> {
        let storage = TableMetadataStorage::new(connection);
        storage.ensure_initialized().await?;

        let schema_manager = connection.create_schema_manager()?;
        let comparator = schema_manager.create_comparator();
        let platform = connection.get_platform()?;

        let mut sql_count = 0;
        for plan in plans {
            let from_schema = schema_manager.introspect_schema().await?;
            let mut executor = Executor::new(platform.as_dyn());
            let (to_schema, skipped) = executor
                .prepare(&plan, &from_schema, comparator.as_ref())
                .inspect_err(|e| {
                    error!(target: "schemaline::migrate", "Error while executing migration {}: {}", plan.revision, e)
                })?;

            let sql = executor.take_sql();
            let start = chrono::Utc::now();
            for statement in &sql {
                debug!(target: "schemaline::migrate", "{}", statement);
                if let Err(e) = connection.execute_statement(statement, params![]).await {
                    error!(target: "schemaline::migrate", "Error while executing migration {}: {}", plan.revision, e);
                    return Err(e);
                }
            }

            let post_op = match plan.direction {
                Direction::Up => plan.migration.post_up,
                Direction::Down => plan.migration.post_down,
            };
            if let Some(post_op) = post_op.filter(|_| !skipped) {
                post_op(&to_schema)?;
            }

            let execution_time = (chrono::Utc::now() - start).num_milliseconds();
            sql_count += sql.len();

            storage
                .complete(ExecutionResult {
                    sql,
                    revision: plan.revision,
                    checksum: plan.migration.checksum.to_vec(),
                    direction: plan.direction,
                    executed_at: start,
                    execution_time,
                    skipped,
                })
                .await?;
        }

        Ok(sql_count)
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Executor, Migration, Migrator};
    use crate::error::ErrorKind;
    use crate::schema::Schema;
    use crate::tests::FunctionalTestsHelper;
    use crate::{Result, params};
    use schemaline_macros::migrator;
    use std::borrow::Cow;

    migrator!(TEST_MIGRATOR, "tests/migrations");

    fn noop(_: &mut Executor<'_>, _: &Schema) -> Result<()> {
        Ok(())
    }

    fn describe() -> &'static str {
        "test migration"
    }

    fn migration(revision: &'static str, down_revision: Option<&'static str>) -> Migration {
        Migration {
            revision,
            down_revision,
            description: &describe,
            up: &noop,
            down: &noop,
            pre_up: None,
            post_up: None,
            pre_down: None,
            post_down: None,
            checksum: Cow::Borrowed(&[]),
        }
    }

    fn migrator(migrations: Vec<Migration>, ignore_missing: bool) -> Migrator {
        Migrator::new(Cow::Owned(migrations), ignore_missing)
    }

    #[test]
    fn orders_revisions_along_the_chain() {
        let chain = migrator(
            vec![
                migration("c", Some("b")),
                migration("a", None),
                migration("b", Some("a")),
            ],
            false,
        );

        let revisions = chain
            .revisions()
            .unwrap()
            .iter()
            .map(|m| m.revision)
            .collect::<Vec<_>>();
        assert_eq!(revisions, vec!["a", "b", "c"]);
        assert_eq!(chain.head().unwrap(), Some("c"));
        assert_eq!(migrator(vec![], false).head().unwrap(), None);
    }

    #[test]
    fn missing_predecessor_is_accepted_only_when_ignored() {
        let migrations = vec![migration("b", Some("a"))];
        assert_eq!(
            migrator(migrations.clone(), false).revisions().unwrap_err().kind(),
            ErrorKind::UnknownRevision
        );
        assert_eq!(migrator(migrations, true).head().unwrap(), Some("b"));
    }

    #[test]
    fn rejects_invalid_histories() {
        let duplicate = migrator(vec![migration("a", None), migration("a", None)], false);
        assert_eq!(
            duplicate.revisions().unwrap_err().kind(),
            ErrorKind::DuplicateRevision
        );

        let branched = migrator(
            vec![
                migration("a", None),
                migration("b", Some("a")),
                migration("c", Some("a")),
            ],
            false,
        );
        assert_eq!(
            branched.revisions().unwrap_err().kind(),
            ErrorKind::MultipleHeads
        );

        let cycle = migrator(vec![migration("a", Some("b")), migration("b", Some("a"))], false);
        assert_eq!(cycle.revisions().unwrap_err().kind(), ErrorKind::RevisionCycle);

        let detached_cycle = migrator(
            vec![
                migration("a", None),
                migration("b", Some("a")),
                migration("c", Some("d")),
                migration("d", Some("c")),
            ],
            false,
        );
        assert_eq!(
            detached_cycle.revisions().unwrap_err().kind(),
            ErrorKind::RevisionCycle
        );
    }

    #[tokio::test]
    async fn upgrades_and_downgrades_the_chain() {
        let helper = FunctionalTestsHelper::default().await;
        let connection = &helper.connection;
        assert_eq!(TEST_MIGRATOR.current(connection).await.unwrap(), None);

        TEST_MIGRATOR.upgrade(connection).await.unwrap();
        assert_eq!(
            TEST_MIGRATOR.current(connection).await.unwrap(),
            Some("aaaa00000002")
        );
        assert_eq!(
            helper.table_names().await,
            vec!["account", "schemaline_versions", "session"]
        );

        // nothing left to apply
        TEST_MIGRATOR.upgrade(connection).await.unwrap();

        TEST_MIGRATOR
            .downgrade_to(connection, Some("aaaa00000001"))
            .await
            .unwrap();
        assert_eq!(
            TEST_MIGRATOR.current(connection).await.unwrap(),
            Some("aaaa00000001")
        );
        assert!(!helper.table_exists("session").await);

        TEST_MIGRATOR.downgrade_to(connection, None).await.unwrap();
        assert_eq!(TEST_MIGRATOR.current(connection).await.unwrap(), None);
        assert_eq!(helper.table_names().await, vec!["schemaline_versions"]);
    }

    #[tokio::test]
    async fn failing_migration_rolls_back_the_run() {
        let helper = FunctionalTestsHelper::default().await;
        let connection = &helper.connection;
        connection
            .execute_statement("CREATE TABLE session (id INTEGER)", params![])
            .await
            .unwrap();

        let error = TEST_MIGRATOR.upgrade(connection).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableAlreadyExists);

        assert!(!connection.is_transaction_active());
        assert_eq!(helper.table_names().await, vec!["session"]);
        assert_eq!(TEST_MIGRATOR.current(connection).await.unwrap(), None);
    }

    fn add_note(schema: &Schema) -> Result<Schema> {
        let mut schema = schema.clone();
        let note = schema.create_table("note")?;
        note.add_column(crate::schema::Column::new("body", crate::r#type::TEXT)?);

        Ok(schema)
    }

    fn skip(_: &mut Executor<'_>, _: &Schema) -> Result<()> {
        Err(crate::Error::skip_migration("not needed here"))
    }

    #[tokio::test]
    async fn skipped_migrations_are_recorded_without_changes() {
        let helper = FunctionalTestsHelper::default().await;
        let mut skipped = migration("a", None);
        skipped.pre_up = Some(&add_note);
        skipped.up = &skip;
        let skipping = migrator(vec![skipped], false);

        skipping.upgrade(&helper.connection).await.unwrap();
        assert!(!helper.table_exists("note").await);
        assert_eq!(skipping.current(&helper.connection).await.unwrap(), Some("a"));
    }

    fn extend_note(schema: &Schema) -> Result<Schema> {
        let mut schema = schema.clone();
        if let Some(note) = schema.get_table_mut("note") {
            note.add_column(crate::schema::Column::new("extra", crate::r#type::TEXT)?);
        }

        Ok(schema)
    }

    #[tokio::test]
    async fn altering_a_table_fails_without_recording_the_step() {
        let helper = FunctionalTestsHelper::default().await;
        helper
            .connection
            .execute_statement("CREATE TABLE note (body TEXT)", params![])
            .await
            .unwrap();

        let mut altering = migration("a", None);
        altering.pre_up = Some(&extend_note);
        let altering = migrator(vec![altering], false);

        let error = altering.upgrade(&helper.connection).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedSchemaChange);
        assert_eq!(altering.current(&helper.connection).await.unwrap(), None);

        let columns = helper
            .get_schema_manager()
            .list_table_columns("note")
            .await
            .unwrap();
        assert_eq!(columns.len(), 1);
    }

    #[tokio::test]
    async fn unknown_targets_are_rejected() {
        let helper = FunctionalTestsHelper::default().await;
        let error = TEST_MIGRATOR
            .upgrade_to(&helper.connection, "ffff")
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownRevision);
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn renders_sql_offline() {
        use crate::platform::{DatabasePlatform, PostgreSQLPlatform};

        let platform = PostgreSQLPlatform::new();
        let up = TEST_MIGRATOR
            .render_sql(platform.as_dyn(), &Schema::default(), Direction::Up, None)
            .unwrap();
        assert_eq!(
            up,
            vec![
                "CREATE TABLE account (id INT NOT NULL, name VARCHAR(120) NOT NULL, PRIMARY KEY (id))".to_string(),
                "CREATE TABLE session (id INT NOT NULL, account_id INT NOT NULL, PRIMARY KEY (id))".to_string(),
                "ALTER TABLE session ADD CONSTRAINT fk_session_account FOREIGN KEY (account_id) REFERENCES account (id) ON DELETE CASCADE NOT DEFERRABLE INITIALLY IMMEDIATE".to_string(),
            ]
        );

        let only_first = TEST_MIGRATOR
            .render_sql(
                platform.as_dyn(),
                &Schema::default(),
                Direction::Up,
                Some("aaaa00000001"),
            )
            .unwrap();
        assert_eq!(only_first.len(), 1);
    }
}
