use crate::migrate::Direction;

/// Outcome of one executed step, handed to the metadata storage.
pub struct ExecutionResult {
    pub sql: Vec<String>,
    pub revision: &'static str,
    pub checksum: Vec<u8>,
    pub direction: Direction,
    pub executed_at: chrono::DateTime<chrono::Utc>,
    pub execution_time: i64,
    pub skipped: bool,
}
