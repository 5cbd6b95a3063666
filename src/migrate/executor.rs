use crate::error::ErrorKind;
use crate::migrate::Direction;
use crate::migrate::migration_plan::MigrationPlan;
use crate::platform::DatabasePlatform;
use crate::schema::{Comparator, Schema};
use crate::Result;
use log::info;
use std::fmt::Display;

/// Collects the statements of a migration step.
///
/// Schema changes are derived by comparing the schema before and after the
/// step's `pre_up`/`pre_down` transform; `up`/`down` may add raw statements.
pub struct Executor<'a> {
    platform: &'a dyn DatabasePlatform,
    sql: Vec<String>,
}

impl<'a> Executor<'a> {
    pub fn new(platform: &'a dyn DatabasePlatform) -> Self {
        Self {
            platform,
            sql: vec![],
        }
    }

    pub fn get_platform(&self) -> &dyn DatabasePlatform {
        self.platform
    }

    pub fn add_sql(&mut self, sql: impl Display) {
        self.sql.push(sql.to_string());
    }

    pub fn get_sql(&self) -> &[String] {
        &self.sql
    }

    /// Prepares a step against the given schema, returning the schema after
    /// the step and whether the step asked to be skipped.
    pub(super) fn prepare(
        &mut self,
        plan: &MigrationPlan,
        from_schema: &Schema,
        comparator: &dyn Comparator,
    ) -> Result<(Schema, bool)> {
        let migration = &plan.migration;
        info!(target: "schemaline::migrate", "++ {} {} ({})", if plan.direction == Direction::Up {
            "migrating"
        } else {
            "reverting"
        }, plan.revision, (migration.description)());

        let (pre_op, op) = match plan.direction {
            Direction::Up => (migration.pre_up, migration.up),
            Direction::Down => (migration.pre_down, migration.down),
        };

        let to_schema = match pre_op {
            Some(pre_op) => pre_op(from_schema)?,
            None => from_schema.clone(),
        };

        let diff = comparator.compare_schemas(from_schema, &to_schema)?;
        self.sql.append(&mut diff.to_sql(self.platform)?);

        match op(self, &to_schema) {
            Ok(()) => Ok((to_schema, false)),
            Err(e) if e.kind() == ErrorKind::SkipMigration => {
                info!(target: "schemaline::migrate", "-- skipped {}: {}", plan.revision, e);
                self.sql.clear();
                Ok((from_schema.clone(), true))
            }
            Err(e) => Err(e),
        }
    }

    pub(super) fn take_sql(&mut self) -> Vec<String> {
        self.sql.drain(..).collect()
    }
}
