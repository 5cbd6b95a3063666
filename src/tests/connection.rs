use crate::{Connection, Result};

/// Every test runs against its own in-memory database.
pub fn get_database_dsn() -> String {
    "sqlite://:memory:".to_string()
}

pub async fn create_connection() -> Result<Connection> {
    let _ = env_logger::builder().is_test(true).try_init();

    Connection::create_from_dsn(&get_database_dsn(), None)?
        .connect()
        .await
}
