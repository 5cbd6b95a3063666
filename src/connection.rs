use crate::driver::Driver;
use crate::r#type::IntoType;
use crate::schema::{Asset, IntoIdentifier, SchemaManager};
use crate::util::PlatformBox;
use crate::{Configuration, ConnectionOptions, Error, Parameter, Parameters, Result, Rows, Value};
use itertools::Itertools;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct Connection {
    connection_options: ConnectionOptions,
    configuration: Arc<Configuration>,
    driver: Option<Arc<Driver>>,
    platform: Option<PlatformBox>,
    transaction_nesting_level: AtomicUsize,
}

impl Connection {
    pub fn create(
        connection_options: ConnectionOptions,
        configuration: Option<Configuration>,
    ) -> Self {
        Self {
            connection_options,
            configuration: Arc::new(configuration.unwrap_or_default()),
            driver: None,
            platform: None,
            transaction_nesting_level: AtomicUsize::new(0),
        }
    }

    pub fn create_from_dsn(dsn: &str, configuration: Option<Configuration>) -> Result<Self> {
        Ok(Self::create(ConnectionOptions::try_from(dsn)?, configuration))
    }

    pub fn is_connected(&self) -> bool {
        self.driver.is_some()
    }

    pub async fn connect(mut self) -> Result<Self> {
        if self.driver.is_some() {
            return Ok(self);
        }

        let driver = Arc::new(Driver::create(&self.connection_options).await?);
        let platform = Arc::new(driver.create_platform());

        let _ = self.driver.insert(driver);
        let _ = self.platform.insert(platform);

        Ok(self)
    }

    pub fn get_configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Gets the database platform of the connected driver.
    ///
    /// # Errors
    ///
    /// Fails with a `NotConnected` error if `connect` has not been called.
    pub fn get_platform(&self) -> Result<PlatformBox> {
        self.platform.clone().ok_or_else(Error::not_connected)
    }

    pub fn create_schema_manager(&self) -> Result<Box<dyn SchemaManager + '_>> {
        let driver = self.driver.as_ref().ok_or_else(Error::not_connected)?;
        Ok(driver.create_schema_manager(self))
    }

    /// Executes an SQL statement with the given parameters and returns the
    /// number of affected rows.
    pub async fn execute_statement<S: AsRef<str>>(
        &self,
        sql: S,
        params: Parameters,
    ) -> Result<usize> {
        let driver = self.driver.as_ref().ok_or_else(Error::not_connected)?;
        driver.execute(sql.as_ref(), &params)
    }

    /// Executes a query and returns all the fetched rows.
    pub async fn fetch_all<S: AsRef<str>>(&self, sql: S, params: Parameters) -> Result<Rows> {
        let driver = self.driver.as_ref().ok_or_else(Error::not_connected)?;
        driver.query(sql.as_ref(), &params)
    }

    /// Inserts a row into the given table. Returns the number of inserted rows.
    pub async fn insert<T: IntoIdentifier + ?Sized>(
        &self,
        table: &T,
        data: Vec<(&str, Value)>,
    ) -> Result<usize> {
        let platform = self.get_platform()?;
        let table = table.into_identifier();
        if data.is_empty() {
            return self
                .execute_statement(
                    format!(
                        "INSERT INTO {} DEFAULT VALUES",
                        table.get_quoted_name(platform.as_dyn())
                    ),
                    Parameters::default(),
                )
                .await;
        }

        let (columns, values): (Vec<_>, Vec<_>) = data.into_iter().unzip();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.get_quoted_name(platform.as_dyn()),
            columns
                .iter()
                .map(|c| c.into_identifier().get_quoted_name(platform.as_dyn()))
                .join(", "),
            columns.iter().map(|_| "?").join(", ")
        );

        self.execute_statement(sql, Self::to_parameters(values)).await
    }

    /// Deletes the rows matching all the given column values.
    pub async fn delete<T: IntoIdentifier + ?Sized>(
        &self,
        table: &T,
        criteria: Vec<(&str, Value)>,
    ) -> Result<usize> {
        let platform = self.get_platform()?;
        let table = table.into_identifier();
        if criteria.is_empty() {
            return Err(Error::new(
                crate::error::ErrorKind::UnknownError,
                "Empty criteria was used, expected non-empty criteria",
            ));
        }

        let (columns, values): (Vec<_>, Vec<_>) = criteria.into_iter().unzip();
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            table.get_quoted_name(platform.as_dyn()),
            columns
                .iter()
                .map(|c| format!(
                    "{} = ?",
                    c.into_identifier().get_quoted_name(platform.as_dyn())
                ))
                .join(" AND ")
        );

        self.execute_statement(sql, Self::to_parameters(values)).await
    }

    pub fn is_transaction_active(&self) -> bool {
        self.transaction_nesting_level.load(Ordering::SeqCst) > 0
    }

    /// Starts a transaction. Nested calls create savepoints.
    pub async fn begin_transaction(&self) -> Result<()> {
        let level = self.transaction_nesting_level.load(Ordering::SeqCst) + 1;
        let sql = if level == 1 {
            "BEGIN".to_string()
        } else {
            self.get_platform()?
                .create_save_point(&Self::nested_transaction_save_point_name(level))
        };

        debug!(target: "schemaline::connection", "{}", sql);
        self.execute_statement(sql, Parameters::default()).await?;
        self.transaction_nesting_level.store(level, Ordering::SeqCst);

        Ok(())
    }

    /// Commits the current transaction (or releases the innermost savepoint).
    ///
    /// # Errors
    ///
    /// Fails with a `NoActiveTransaction` error if no transaction is open.
    pub async fn commit(&self) -> Result<()> {
        let level = self.transaction_nesting_level.load(Ordering::SeqCst);
        if level == 0 {
            return Err(Error::no_active_transaction());
        }

        let sql = if level == 1 {
            "COMMIT".to_string()
        } else {
            self.get_platform()?
                .release_save_point(&Self::nested_transaction_save_point_name(level))
        };

        debug!(target: "schemaline::connection", "{}", sql);
        self.execute_statement(sql, Parameters::default()).await?;
        self.transaction_nesting_level.store(level - 1, Ordering::SeqCst);

        Ok(())
    }

    /// Rolls back the current transaction (or the innermost savepoint).
    pub async fn roll_back(&self) -> Result<()> {
        let level = self.transaction_nesting_level.load(Ordering::SeqCst);
        if level == 0 {
            return Err(Error::no_active_transaction());
        }

        let sql = if level == 1 {
            "ROLLBACK".to_string()
        } else {
            self.get_platform()?
                .rollback_save_point(&Self::nested_transaction_save_point_name(level))
        };

        debug!(target: "schemaline::connection", "{}", sql);
        let result = self.execute_statement(sql, Parameters::default()).await;
        self.transaction_nesting_level.store(level - 1, Ordering::SeqCst);

        result.map(|_| ())
    }

    pub fn convert_value<T: IntoType>(&self, value: &Value, column_type: T) -> Result<Value> {
        let platform = self.get_platform()?;
        column_type
            .into_type()?
            .convert_to_value(value, platform.as_dyn())
    }

    pub fn convert_database_value<T: IntoType>(
        &self,
        value: Value,
        column_type: T,
    ) -> Result<Value> {
        let platform = self.get_platform()?;
        column_type
            .into_type()?
            .convert_to_database_value(value, platform.as_dyn())
    }

    fn to_parameters(values: Vec<Value>) -> Parameters {
        Parameters::from(values.into_iter().map(Parameter::from).collect::<Vec<_>>())
    }

    fn nested_transaction_save_point_name(level: usize) -> String {
        format!("SCHEMALINE_SAVEPOINT_{}", level)
    }
}
