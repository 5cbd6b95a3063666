use super::{SQLitePlatform, SQLiteSchemaManager};
use crate::driver::DriverConnection;
use crate::error::ErrorKind;
use crate::platform::DatabasePlatform;
use crate::schema::SchemaManager;
use crate::{
    Connection, ConnectionOptions, Error, Parameter, Parameters, Result, Row, Rows, Value,
};
use log::debug;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{ToSql, params_from_iter};
use std::fmt::{Debug, Formatter};
use std::sync::{Mutex, MutexGuard};

pub(crate) struct Driver {
    connection: Mutex<rusqlite::Connection>,
}

impl Driver {
    pub fn create(options: &ConnectionOptions) -> Result<Self> {
        let connection = match (&options.file_path, options.memory) {
            (_, true) => rusqlite::Connection::open_in_memory(),
            (Some(path), false) => rusqlite::Connection::open(path),
            (None, false) => return Err(Error::invalid_dsn("sqlite://")),
        };
        let connection = connection.map_err(convert_error)?;

        connection
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(convert_error)?;

        debug!(target: "schemaline::driver", "opened sqlite connection (memory: {})", options.memory);

        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, rusqlite::Connection>> {
        self.connection
            .lock()
            .map_err(|e| Error::new(ErrorKind::DriverError, e.to_string()))
    }
}

impl Debug for Driver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SQLite Driver").finish_non_exhaustive()
    }
}

impl DriverConnection for Driver {
    fn execute(&self, sql: &str, params: &Parameters) -> Result<usize> {
        let connection = self.lock()?;
        let mut statement = connection.prepare(sql).map_err(convert_error)?;

        match statement.execute(params_from_iter(params.iter())) {
            Ok(size) => Ok(size),
            Err(rusqlite::Error::ExecuteReturnedResults) => Ok(0),
            Err(e) => Err(convert_error(e)),
        }
    }

    fn query(&self, sql: &str, params: &Parameters) -> Result<Rows> {
        let connection = self.lock()?;
        let mut statement = connection.prepare(sql).map_err(convert_error)?;

        let column_count = statement.column_count();
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(ToString::to_string)
            .collect();

        let mut rows = statement
            .query(params_from_iter(params.iter()))
            .map_err(convert_error)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(convert_error)? {
            let mut data_vector: Vec<Value> = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row.get_ref(i).map_err(convert_error)?;
                data_vector.push(match value {
                    ValueRef::Null => Value::NULL,
                    ValueRef::Integer(v) => Value::Int(v),
                    ValueRef::Real(v) => Value::Float(v),
                    ValueRef::Text(v) => Value::String(String::from_utf8_lossy(v).into_owned()),
                    ValueRef::Blob(v) => Value::Bytes(v.to_vec()),
                });
            }

            result.push(Row::new(columns.clone(), data_vector));
        }

        Ok(Rows::new(columns, result))
    }

    fn create_platform(&self) -> Box<dyn DatabasePlatform + Send + Sync> {
        Box::new(SQLitePlatform::new())
    }

    fn create_schema_manager<'a>(
        &self,
        connection: &'a Connection,
    ) -> Box<dyn SchemaManager + 'a> {
        Box::new(SQLiteSchemaManager::new(connection))
    }
}

/// Classifies an engine error, keeping the engine message as it is.
pub(crate) fn convert_error(error: rusqlite::Error) -> Error {
    let message = error.to_string();
    let kind = match &error {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            ErrorKind::ConstraintViolation
        }
        _ if message.starts_with("no such table") => ErrorKind::TableNotFound,
        _ if message.starts_with("table ") && message.ends_with("already exists") => {
            ErrorKind::TableAlreadyExists
        }
        _ => ErrorKind::DriverError,
    };

    Error::new(kind, error)
}

impl ToSql for Parameter {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.value.to_sql()
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::NULL => ToSqlOutput::from(rusqlite::types::Null),
            Value::Int(value) => ToSqlOutput::from(*value),
            Value::String(value) => ToSqlOutput::from(value.as_str()),
            Value::Bytes(value) => ToSqlOutput::from(value.as_slice()),
            Value::Float(value) => ToSqlOutput::from(*value),
            Value::Boolean(value) => ToSqlOutput::from(*value),
            Value::DateTime(value) => ToSqlOutput::Owned(rusqlite::types::Value::Text(
                value.format("%Y-%m-%d %H:%M:%S").to_string(),
            )),
            Value::Uuid(value) => ToSqlOutput::Owned(rusqlite::types::Value::Text(
                value.hyphenated().to_string(),
            )),
        })
    }
}
