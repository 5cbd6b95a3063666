/// A revision recorded in the version table.
#[derive(Clone, Debug)]
pub struct ExecutedMigration {
    pub revision: String,
    pub checksum: Option<Vec<u8>>,
    pub executed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub execution_time: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct ExecutedMigrationList {
    pub(super) items: Vec<ExecutedMigration>,
}

impl ExecutedMigrationList {
    pub fn first(&self) -> Option<&ExecutedMigration> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&ExecutedMigration> {
        self.items.last()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutedMigration> {
        self.items.iter()
    }

    pub fn has_migration(&self, revision: &str) -> bool {
        self.items.iter().any(|m| m.revision == revision)
    }

    pub fn get_migration(&self, revision: &str) -> Option<&ExecutedMigration> {
        self.items.iter().find(|m| m.revision == revision)
    }
}
