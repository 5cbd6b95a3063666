use crate::Value;
use crate::schema::{Asset, Identifier};
use std::any::TypeId;
use std::backtrace::Backtrace;
use std::fmt::{Debug, Display, Formatter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    OutOfBoundsError = 1,
    TypeMismatch = 2,
    UnknownType = 3,
    NotConnected = 4,
    UnknownDriver = 5,
    InvalidDsn = 6,
    ConversionFailed = 7,
    NoActiveTransaction = 8,

    TableNotFound = 101,
    TableAlreadyExists = 102,
    ConstraintViolation = 103,
    ForeignKeyTargetMissing = 104,
    NoColumnsSpecifiedForTable = 105,
    ForeignKeyDefinitionInvalid = 106,
    PlatformFeatureUnsupported = 107,
    ColumnDoesNotExist = 108,
    UnsupportedSchemaChange = 109,

    UnknownRevision = 201,
    DuplicateRevision = 202,
    RevisionCycle = 203,
    MultipleHeads = 204,
    SkipMigration = 205,

    DriverError = 1001,

    UnknownError = -1,
}

pub struct Error {
    pub(crate) kind: ErrorKind,
    inner: Box<dyn std::error::Error + Send + Sync>,
    backtrace: Backtrace,
}

/// Wraps [`Error`] into a type implementing [`std::error::Error`].
pub struct StdError(Error);

impl Display for StdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for StdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for StdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.inner.as_ref())
    }
}

impl From<Error> for StdError {
    fn from(e: Error) -> Self {
        StdError(e)
    }
}

impl Error {
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error {
            kind,
            inner: error.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn type_mismatch() -> Self {
        Self::new(ErrorKind::TypeMismatch, "Type mismatch")
    }

    pub fn out_of_bounds<T>(index: T) -> Self
    where
        T: ToString,
    {
        Self::new(
            ErrorKind::OutOfBoundsError,
            format!("Unable to read {} index", index.to_string()),
        )
    }

    pub fn conversion_failed_invalid_type(
        value: &Value,
        to_type: &str,
        possible_types: &[&str],
    ) -> Self {
        Self::new(
            ErrorKind::ConversionFailed,
            format!(
                r#"Could not convert value "{}" to type {}. Expected one of the following types: {}"#,
                value,
                to_type,
                possible_types.join(", ")
            ),
        )
    }

    pub fn unknown_type(type_id: TypeId) -> Self {
        Self::new(
            ErrorKind::UnknownType,
            format!("Unknown column type {:?} requested", type_id),
        )
    }

    pub fn not_connected() -> Self {
        Self::new(ErrorKind::NotConnected, "Connection is not established")
    }

    pub fn unknown_driver(scheme: &str) -> Self {
        Self::new(
            ErrorKind::UnknownDriver,
            format!(
                r#"The given driver "{}" is unknown or has not been enabled"#,
                scheme
            ),
        )
    }

    pub fn invalid_dsn(dsn: &str) -> Self {
        Self::new(ErrorKind::InvalidDsn, format!(r#"Invalid DSN "{}""#, dsn))
    }

    pub fn no_active_transaction() -> Self {
        Self::new(
            ErrorKind::NoActiveTransaction,
            "There is no active transaction",
        )
    }

    pub fn table_not_found<M: Into<String>>(message: M) -> Self {
        Self::new(ErrorKind::TableNotFound, message.into())
    }

    pub fn table_already_exists(name: &str) -> Self {
        Self::new(
            ErrorKind::TableAlreadyExists,
            format!("table {} already exists", name),
        )
    }

    pub fn foreign_key_target_missing(
        table: &Identifier,
        foreign_table: &str,
        columns: &[String],
    ) -> Self {
        Self::new(
            ErrorKind::ForeignKeyTargetMissing,
            format!(
                r#"Foreign key on table "{}" references missing "{}" ({})"#,
                table.get_name(),
                foreign_table,
                columns.join(", ")
            ),
        )
    }

    pub fn column_does_not_exist(column: &str, table: &Identifier) -> Self {
        Self::new(
            ErrorKind::ColumnDoesNotExist,
            format!(
                r#"There is no column with name "{}" on table "{}""#,
                column,
                table.get_name()
            ),
        )
    }

    pub fn no_columns_specified_for_table(table: &Identifier) -> Self {
        Self::new(
            ErrorKind::NoColumnsSpecifiedForTable,
            format!(r#"No columns specified for table "{}""#, table.get_name()),
        )
    }

    pub fn foreign_key_definition_invalid(which: &str) -> Self {
        Self::new(
            ErrorKind::ForeignKeyDefinitionInvalid,
            format!("Incomplete definition. '{}' required.", which),
        )
    }

    pub fn platform_feature_unsupported<T: Into<String>>(message: T) -> Self {
        Self::new(ErrorKind::PlatformFeatureUnsupported, message.into())
    }

    pub fn unsupported_schema_change(table: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedSchemaChange,
            format!(
                r#"Table "{}" has been altered; only creating and dropping tables is supported"#,
                table
            ),
        )
    }

    pub fn unknown_revision(revision: &str) -> Self {
        Self::new(
            ErrorKind::UnknownRevision,
            format!(r#"Can't locate revision identified by "{}""#, revision),
        )
    }

    pub fn duplicate_revision(revision: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateRevision,
            format!(r#"Revision "{}" is present more than once"#, revision),
        )
    }

    pub fn revision_cycle(revision: &str) -> Self {
        Self::new(
            ErrorKind::RevisionCycle,
            format!(r#"Cycle detected in revision history at "{}""#, revision),
        )
    }

    pub fn multiple_heads(revisions: &[&str]) -> Self {
        Self::new(
            ErrorKind::MultipleHeads,
            format!(
                "Revision history is not linear; candidates: {}",
                revisions.join(", ")
            ),
        )
    }

    /// Returned by a migration operation to mark the step as skipped.
    pub fn skip_migration<T: Into<String>>(reason: T) -> Self {
        Self::new(ErrorKind::SkipMigration, reason.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?}: {}\nBacktrace:\n{}",
            self.kind, self.inner, self.backtrace
        )
    }
}

impl<T> From<T> for Error
where
    T: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn from(err: T) -> Self {
        Error::new(ErrorKind::UnknownError, err)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn display_is_the_source_message() {
        let error = Error::new(ErrorKind::TableNotFound, "no such table: item");
        assert_eq!(error.to_string(), "no such table: item");
        assert_eq!(error.kind(), ErrorKind::TableNotFound);
    }

    #[test]
    fn foreign_errors_are_unknown() {
        let error: Error = "forty-two".parse::<u8>().map_err(Error::from).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownError);

        let error: Error = "boom".into();
        assert_eq!(error.kind(), ErrorKind::UnknownError);
        assert_eq!(error.to_string(), "boom");
    }
}
