pub(crate) mod driver;
mod platform;
mod schema_manager;

pub use platform::SQLitePlatform;
pub use schema_manager::SQLiteSchemaManager;
