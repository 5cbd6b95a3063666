use crate::parameter::ParameterType;
use crate::platform::DatabasePlatform;
use crate::r#type::Type;
use crate::schema::ColumnData;
use crate::{Result, Value};

pub struct BigintType {}

impl Type for BigintType {
    fn default() -> Box<dyn Type + Sync + Send> {
        Box::new(BigintType {})
    }

    fn convert_to_value(&self, value: &Value, platform: &dyn DatabasePlatform) -> Result<Value> {
        super::IntegerType {}.convert_to_value(value, platform)
    }

    fn get_name(&self) -> &'static str {
        super::BIGINT
    }

    fn get_sql_declaration(
        &self,
        column: &ColumnData,
        platform: &dyn DatabasePlatform,
    ) -> Result<String> {
        platform.get_bigint_type_declaration_sql(column)
    }

    fn get_binding_type(&self) -> ParameterType {
        ParameterType::Integer
    }
}
