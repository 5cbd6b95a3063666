mod bigint_type;
mod datetime_type;
mod guid_type;
mod integer_type;
mod string_type;
mod text_type;

use crate::error::ErrorKind;
use crate::parameter::ParameterType;
use crate::platform::DatabasePlatform;
use crate::schema::ColumnData;
use crate::{Error, Result, Value};
pub use bigint_type::BigintType;
use dashmap::DashMap;
pub use datetime_type::DateTimeType;
pub use guid_type::GuidType;
pub use integer_type::IntegerType;
use lazy_static::lazy_static;
use std::any::{TypeId, type_name};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
pub use string_type::StringType;
pub use text_type::TextType;

pub const BIGINT: &str = "bigint";
pub const DATETIME: &str = "datetime";
pub const GUID: &str = "guid";
pub const INTEGER: &str = "integer";
pub const STRING: &str = "string";
pub const TEXT: &str = "text";

#[derive(Clone)]
pub struct TypePtr {
    t: Arc<Box<dyn Type + Send + Sync>>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Debug for TypePtr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypePtr")
            .field("type_id", &self.type_id)
            .field("type_name", &self.type_name)
            .finish()
    }
}

impl PartialEq for TypePtr {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl TypePtr {
    fn new<T: Type + Send + Sync + 'static>() -> Self {
        Self {
            t: Arc::new(T::default()),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    delegate::delegate! {
        to(**(self.t)) {
            pub fn convert_to_database_value(
                &self,
                value: Value,
                platform: &dyn DatabasePlatform,
            ) -> Result<Value>;
            pub fn convert_to_value(&self, value: &Value, platform: &dyn DatabasePlatform) -> Result<Value>;
            pub fn get_name(&self) -> &'static str;
            pub fn get_sql_declaration(
                &self,
                column: &ColumnData,
                platform: &dyn DatabasePlatform,
            ) -> Result<String>;
            pub fn get_binding_type(&self) -> ParameterType;
        }
    }
}

pub trait Type {
    fn default() -> Box<dyn Type + Sync + Send>
    where
        Self: Sized;

    /// Converts a value from its Value representation to its database representation of this type.
    #[allow(unused_variables)]
    fn convert_to_database_value(
        &self,
        value: Value,
        platform: &dyn DatabasePlatform,
    ) -> Result<Value> {
        Ok(value)
    }

    /// Converts a value from its database representation to its Value representation
    /// of this type.
    #[allow(unused_variables)]
    fn convert_to_value(&self, value: &Value, platform: &dyn DatabasePlatform) -> Result<Value> {
        Ok(value.clone())
    }

    fn get_name(&self) -> &'static str;

    fn get_sql_declaration(
        &self,
        column: &ColumnData,
        platform: &dyn DatabasePlatform,
    ) -> Result<String>;

    fn get_binding_type(&self) -> ParameterType {
        ParameterType::String
    }
}

pub trait IntoType {
    fn into_type(self) -> Result<TypePtr>;
}

impl IntoType for &str {
    fn into_type(self) -> Result<TypePtr> {
        TypeManager::get_instance().get_type_by_name(self)
    }
}

impl IntoType for &String {
    fn into_type(self) -> Result<TypePtr> {
        TypeManager::get_instance().get_type_by_name(self)
    }
}

impl IntoType for TypeId {
    fn into_type(self) -> Result<TypePtr> {
        TypeManager::get_instance().get_type(self)
    }
}

impl IntoType for TypePtr {
    fn into_type(self) -> Result<TypePtr> {
        Ok(self)
    }
}

pub struct TypeManager {
    type_map: DashMap<TypeId, TypePtr>,
}

lazy_static! {
    static ref TYPE_MANAGER_INSTANCE: TypeManager = TypeManager::new();
}

impl TypeManager {
    fn new() -> Self {
        let type_map = DashMap::new();
        type_map.insert(TypeId::of::<BigintType>(), TypePtr::new::<BigintType>());
        type_map.insert(TypeId::of::<DateTimeType>(), TypePtr::new::<DateTimeType>());
        type_map.insert(TypeId::of::<GuidType>(), TypePtr::new::<GuidType>());
        type_map.insert(TypeId::of::<IntegerType>(), TypePtr::new::<IntegerType>());
        type_map.insert(TypeId::of::<StringType>(), TypePtr::new::<StringType>());
        type_map.insert(TypeId::of::<TextType>(), TypePtr::new::<TextType>());

        Self { type_map }
    }

    pub fn register<T: Type + Send + Sync + 'static>(&self) {
        self.type_map.insert(TypeId::of::<T>(), TypePtr::new::<T>());
    }

    pub fn get_instance() -> &'static Self {
        &TYPE_MANAGER_INSTANCE
    }

    pub fn get_type_by_name(&self, type_name: &str) -> Result<TypePtr> {
        self.type_map
            .iter()
            .find(|t| t.get_name() == type_name)
            .map(|r| r.value().clone())
            .ok_or_else(|| Error::new(ErrorKind::UnknownType, format!("You have requested a non-existent type {}. Please register it in the type manager before trying to use it", type_name)))
    }

    pub fn get_type(&self, type_id: TypeId) -> Result<TypePtr> {
        self.type_map
            .get(&type_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| Error::unknown_type(type_id))
    }
}

#[cfg(test)]
mod tests {
    use super::{GUID, GuidType, IntoType, STRING, StringType, TypeManager};
    use crate::error::ErrorKind;
    use std::any::TypeId;

    #[test]
    fn resolves_types_by_name_and_id() {
        let guid = GUID.into_type().unwrap();
        assert_eq!(guid.type_id(), TypeId::of::<GuidType>());
        assert_eq!(guid.get_name(), GUID);

        let string = TypeId::of::<StringType>().into_type().unwrap();
        assert_eq!(string.get_name(), STRING);
    }

    #[test]
    fn unknown_type_name_is_an_error() {
        let err = TypeManager::get_instance()
            .get_type_by_name("geometry")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
    }
}
