use crate::platform::DatabasePlatform;
use crate::r#type::Type;
use crate::schema::ColumnData;
use crate::{Error, Result, Value};
use chrono::{NaiveDateTime, TimeZone, Utc};

pub struct DateTimeType {}

impl Type for DateTimeType {
    fn default() -> Box<dyn Type + Sync + Send> {
        Box::new(DateTimeType {})
    }

    fn convert_to_database_value(
        &self,
        value: Value,
        platform: &dyn DatabasePlatform,
    ) -> Result<Value> {
        match &value {
            Value::NULL => Ok(Value::NULL),
            Value::DateTime(dt) => Ok(Value::String(
                dt.format(platform.get_date_time_format_string())
                    .to_string(),
            )),
            _ => Err(Error::conversion_failed_invalid_type(
                &value,
                self.get_name(),
                &["NULL", "DateTime"],
            )),
        }
    }

    fn convert_to_value(&self, value: &Value, platform: &dyn DatabasePlatform) -> Result<Value> {
        match value {
            Value::NULL | Value::DateTime(_) => Ok(value.clone()),
            Value::String(s) if s.is_empty() => Ok(Value::NULL),
            Value::String(s) => {
                NaiveDateTime::parse_from_str(s, platform.get_date_time_format_string())
                    .map(|dt| Value::DateTime(Utc.from_utc_datetime(&dt)))
                    .map_err(|_| {
                        Error::conversion_failed_invalid_type(
                            value,
                            self.get_name(),
                            &["NULL", "DateTime"],
                        )
                    })
            }
            _ => Err(Error::conversion_failed_invalid_type(
                value,
                self.get_name(),
                &["NULL", "DateTime"],
            )),
        }
    }

    fn get_name(&self) -> &'static str {
        super::DATETIME
    }

    fn get_sql_declaration(
        &self,
        column: &ColumnData,
        platform: &dyn DatabasePlatform,
    ) -> Result<String> {
        platform.get_date_time_type_declaration_sql(column)
    }
}
