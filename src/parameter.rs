use crate::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterType {
    Null = 0,
    Integer = 1,
    String = 2,
    Float = 4,
    Boolean = 5,
    Binary = 16,
}

#[derive(Clone, Debug)]
pub struct Parameter {
    pub(crate) value: Value,
    pub(crate) value_type: ParameterType,
}

impl Parameter {
    pub fn new(value: Value, param_type: ParameterType) -> Self {
        Parameter {
            value,
            value_type: param_type,
        }
    }

    pub fn get_value(&self) -> &Value {
        &self.value
    }

    pub fn get_type(&self) -> ParameterType {
        self.value_type
    }
}

impl<T: Into<Value>> From<T> for Parameter {
    fn from(value: T) -> Self {
        let value = value.into();
        match value {
            Value::NULL => Parameter::new(value, ParameterType::Null),
            Value::Int(_) => Parameter::new(value, ParameterType::Integer),
            Value::Float(_) => Parameter::new(value, ParameterType::Float),
            Value::Bytes(_) => Parameter::new(value, ParameterType::Binary),
            Value::Boolean(_) => Parameter::new(value, ParameterType::Boolean),
            _ => Parameter::new(value, ParameterType::String),
        }
    }
}

/// Positional statement parameters.
#[derive(Clone, Debug, Default)]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.0.iter()
    }
}

impl From<Vec<Parameter>> for Parameters {
    fn from(value: Vec<Parameter>) -> Self {
        Parameters(value)
    }
}

pub const NO_PARAMS: Parameters = Parameters(Vec::new());

#[macro_export]
macro_rules! params {
    [] => {
        $crate::parameter::NO_PARAMS
    };

    [$($value:expr),+ $(,)?] => {
        $crate::Parameters::from(vec![ $($crate::Parameter::from($value)),+ ])
    };
}

#[cfg(test)]
mod tests {
    use crate::{ParameterType, Value};

    #[test]
    fn params_macro_builds_positional_list() {
        let params = params!["a", 1_i64, None::<String>];
        assert_eq!(params.len(), 3);

        let types: Vec<_> = params.iter().map(|p| p.get_type()).collect();
        assert_eq!(
            types,
            vec![
                ParameterType::String,
                ParameterType::Integer,
                ParameterType::Null
            ]
        );
        assert_eq!(params.iter().next().unwrap().get_value(), &Value::from("a"));
        assert!(params![].is_empty());
    }
}
