use crate::migrate::{Direction, Migration};

pub(super) struct MigrationPlan {
    pub revision: &'static str,
    pub migration: Migration,
    pub direction: Direction,
}

impl MigrationPlan {
    pub fn new(migration: Migration, direction: Direction) -> Self {
        Self {
            revision: migration.revision,
            migration,
            direction,
        }
    }
}
