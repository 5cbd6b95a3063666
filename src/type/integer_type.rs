use crate::parameter::ParameterType;
use crate::platform::DatabasePlatform;
use crate::r#type::Type;
use crate::schema::ColumnData;
use crate::{Error, Result, Value};

pub struct IntegerType {}

impl Type for IntegerType {
    fn default() -> Box<dyn Type + Sync + Send> {
        Box::new(IntegerType {})
    }

    fn convert_to_value(&self, value: &Value, _: &dyn DatabasePlatform) -> Result<Value> {
        match value {
            Value::NULL | Value::Int(_) => Ok(value.clone()),
            Value::Boolean(b) => Ok(Value::Int(i64::from(*b))),
            Value::String(s) if s.is_empty() => Ok(Value::NULL),
            Value::String(s) => s.parse().map(Value::Int).map_err(|_| {
                Error::conversion_failed_invalid_type(value, self.get_name(), &["NULL", "Integer"])
            }),
            _ => Err(Error::conversion_failed_invalid_type(
                value,
                self.get_name(),
                &["NULL", "Integer"],
            )),
        }
    }

    fn get_name(&self) -> &'static str {
        super::INTEGER
    }

    fn get_sql_declaration(
        &self,
        column: &ColumnData,
        platform: &dyn DatabasePlatform,
    ) -> Result<String> {
        platform.get_integer_type_declaration_sql(column)
    }

    fn get_binding_type(&self) -> ParameterType {
        ParameterType::Integer
    }
}
