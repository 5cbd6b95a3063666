use crate::platform::DatabasePlatform;
use crate::schema::SchemaManager;
use crate::{Connection, ConnectionOptions, Error, Parameters, Result, Rows};
use std::fmt::Debug;

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// A live connection to a database engine.
pub(crate) trait DriverConnection: Debug + Send + Sync {
    /// Executes a statement, returning the number of affected rows.
    fn execute(&self, sql: &str, params: &Parameters) -> Result<usize>;

    /// Executes a query and collects all the returned rows.
    fn query(&self, sql: &str, params: &Parameters) -> Result<Rows>;

    fn create_platform(&self) -> Box<dyn DatabasePlatform + Send + Sync>;

    fn create_schema_manager<'a>(&self, connection: &'a Connection)
    -> Box<dyn SchemaManager + 'a>;
}

#[derive(Debug)]
pub(crate) struct Driver {
    inner_driver: Box<dyn DriverConnection>,
}

impl Driver {
    pub async fn create(connection_options: &ConnectionOptions) -> Result<Self> {
        let scheme = connection_options
            .scheme
            .as_deref()
            .ok_or_else(|| Error::unknown_driver(""))?;

        let driver = match scheme {
            #[cfg(feature = "sqlite")]
            "sqlite" | "sqlite3" => {
                Box::new(sqlite::driver::Driver::create(connection_options)?)
                    as Box<dyn DriverConnection>
            }
            proto => return Err(Error::unknown_driver(proto)),
        };

        Ok(Self {
            inner_driver: driver,
        })
    }

    pub fn create_platform(&self) -> Box<dyn DatabasePlatform + Send + Sync> {
        self.inner_driver.create_platform()
    }

    pub fn create_schema_manager<'a>(
        &self,
        connection: &'a Connection,
    ) -> Box<dyn SchemaManager + 'a> {
        self.inner_driver.create_schema_manager(connection)
    }

    pub fn execute(&self, sql: &str, params: &Parameters) -> Result<usize> {
        self.inner_driver.execute(sql, params)
    }

    pub fn query(&self, sql: &str, params: &Parameters) -> Result<Rows> {
        self.inner_driver.query(sql, params)
    }
}
