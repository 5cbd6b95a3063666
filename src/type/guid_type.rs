use crate::Result;
use crate::platform::DatabasePlatform;
use crate::r#type::Type;
use crate::schema::ColumnData;
use crate::{Error, Value};
use uuid::Uuid;

pub struct GuidType {}

impl Type for GuidType {
    fn default() -> Box<dyn Type + Sync + Send> {
        Box::new(GuidType {})
    }

    fn convert_to_value(&self, value: &Value, _: &dyn DatabasePlatform) -> Result<Value> {
        match value {
            Value::NULL | Value::Uuid(_) => Ok(value.clone()),
            Value::String(v) => Uuid::parse_str(v).map(Value::Uuid).map_err(|_| {
                Error::conversion_failed_invalid_type(value, self.get_name(), &["NULL", "Uuid"])
            }),
            Value::Bytes(v) => Uuid::from_slice(v).map(Value::Uuid).map_err(|_| {
                Error::conversion_failed_invalid_type(value, self.get_name(), &["NULL", "Uuid"])
            }),
            _ => Err(Error::conversion_failed_invalid_type(
                value,
                self.get_name(),
                &["NULL", "Uuid"],
            )),
        }
    }

    /// Without a native guid type the value is stored as its hyphenated text form.
    fn convert_to_database_value(
        &self,
        value: Value,
        platform: &dyn DatabasePlatform,
    ) -> Result<Value> {
        match value {
            Value::NULL => Ok(value),
            Value::Uuid(v) if !platform.has_native_guid_type() => {
                Ok(Value::String(v.hyphenated().to_string()))
            }
            Value::Uuid(_) => Ok(value),
            Value::String(ref v) => Uuid::parse_str(v)
                .map(|_| value.clone())
                .map_err(|_| {
                    Error::conversion_failed_invalid_type(&value, self.get_name(), &["NULL", "Uuid"])
                }),
            _ => Err(Error::conversion_failed_invalid_type(
                &value,
                self.get_name(),
                &["NULL", "Uuid", "String"],
            )),
        }
    }

    fn get_name(&self) -> &'static str {
        super::GUID
    }

    fn get_sql_declaration(
        &self,
        column: &ColumnData,
        platform: &dyn DatabasePlatform,
    ) -> Result<String> {
        platform.get_guid_type_declaration_sql(column)
    }
}
