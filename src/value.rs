use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    NULL,
    Int(i64),
    String(String),
    Bytes(Vec<u8>),
    Float(f64),
    Boolean(bool),

    /// date-time
    DateTime(DateTime<Utc>),

    /// uuid
    Uuid(uuid::Uuid),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::NULL)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::NULL => write!(f, "NULL"),
            Value::Int(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "{}", hex::encode(v)),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Uuid(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! from_to_value {
    ($variant:ident, $source:ty) => {
        impl From<$source> for Value {
            fn from(value: $source) -> Self {
                Value::$variant(value.into())
            }
        }
    };
}

from_to_value!(Int, i64);
from_to_value!(Int, i32);
from_to_value!(Int, u32);
from_to_value!(String, String);
from_to_value!(String, &str);
from_to_value!(Bytes, Vec<u8>);
from_to_value!(Float, f64);
from_to_value!(Boolean, bool);
from_to_value!(DateTime, DateTime<Utc>);
from_to_value!(Uuid, uuid::Uuid);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
