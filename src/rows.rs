use crate::error::Error;
use crate::{Result, Value};

pub enum ColumnIndex {
    Name(String),
    Position(usize),
}

impl From<usize> for ColumnIndex {
    fn from(i: usize) -> Self {
        Self::Position(i)
    }
}

impl From<&str> for ColumnIndex {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row.
    pub(crate) fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Gets a column by index.
    ///
    /// If an index (string or numeric) is not present, an OutOfBoundsError
    /// error is raised.
    pub fn get<C: Into<ColumnIndex>>(&self, i: C) -> Result<&Value> {
        let i = match i.into() {
            ColumnIndex::Name(name) => self
                .columns
                .iter()
                .position(|column_name| column_name.eq(&name))
                .ok_or_else(|| Error::out_of_bounds(&name))?,
            ColumnIndex::Position(index) => index,
        };

        self.values.get(i).ok_or_else(|| Error::out_of_bounds(i))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Represents a row collection, collected from an executed statement.
#[derive(Clone, Debug, Default)]
pub struct Rows {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Rows {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Row;
    use crate::Value;
    use crate::error::ErrorKind;

    #[test]
    fn can_get_values_by_name_and_position() {
        let row = Row::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Value::Int(1), Value::from("first")],
        );

        assert_eq!(row.get("name").unwrap(), &Value::from("first"));
        assert_eq!(row.get(0_usize).unwrap(), &Value::Int(1));
        assert_eq!(
            row.get("nope").unwrap_err().kind(),
            ErrorKind::OutOfBoundsError
        );
        assert_eq!(row.get(2_usize).unwrap_err().kind(), ErrorKind::OutOfBoundsError);
    }
}
