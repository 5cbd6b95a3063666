use crate::Value;
use crate::platform::DatabasePlatform;
use crate::r#type::IntoType;
use crate::schema::asset::{AbstractAsset, Asset, impl_asset};
use crate::Result;
use std::any::TypeId;

/// Column definition passed to the platform when generating a declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnData {
    pub name: String,
    pub r#type: TypeId,
    pub default: Value,
    pub notnull: bool,
    pub length: Option<usize>,
    pub fixed: Option<bool>,
    pub autoincrement: Option<bool>,
    pub primary: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    asset: AbstractAsset,
    r#type: TypeId,
    default: Value,
    notnull: bool,
    length: Option<usize>,
    fixed: Option<bool>,
    autoincrement: Option<bool>,
}

impl Column {
    /// Creates a nullable column of the given type.
    ///
    /// # Errors
    ///
    /// Fails if the type is not registered in the type manager.
    pub fn new<S: AsRef<str>, T: IntoType>(name: S, r#type: T) -> Result<Self> {
        let mut asset = AbstractAsset::default();
        asset.set_name(name.as_ref());

        Ok(Self {
            asset,
            r#type: r#type.into_type()?.type_id(),
            default: Value::NULL,
            notnull: false,
            length: None,
            fixed: None,
            autoincrement: None,
        })
    }

    pub fn set_notnull(mut self, notnull: bool) -> Self {
        self.notnull = notnull;
        self
    }

    pub fn set_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn set_fixed(mut self, fixed: bool) -> Self {
        self.fixed = Some(fixed);
        self
    }

    pub fn set_default<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = default.into();
        self
    }

    pub fn set_autoincrement(mut self, autoincrement: bool) -> Self {
        self.autoincrement = Some(autoincrement);
        self
    }

    pub fn get_type(&self) -> TypeId {
        self.r#type
    }

    pub fn get_default(&self) -> &Value {
        &self.default
    }

    pub fn is_notnull(&self) -> bool {
        self.notnull
    }

    pub fn get_length(&self) -> Option<usize> {
        self.length
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.unwrap_or(false)
    }

    pub fn is_autoincrement(&self) -> bool {
        self.autoincrement.unwrap_or(false)
    }

    pub(crate) fn generate_column_data<P: DatabasePlatform + ?Sized>(
        &self,
        platform: &P,
    ) -> ColumnData {
        ColumnData {
            name: self.get_quoted_name(platform),
            r#type: self.r#type,
            default: self.default.clone(),
            notnull: self.notnull,
            length: self.length,
            fixed: self.fixed,
            autoincrement: self.autoincrement,
            primary: false,
        }
    }
}

impl_asset!(Column, asset);

#[cfg(test)]
mod tests {
    use super::Column;
    use crate::error::ErrorKind;
    use crate::r#type::{GuidType, STRING, StringType};
    use crate::schema::Asset;
    use std::any::TypeId;

    #[test]
    fn builds_columns() {
        let column = Column::new("title", STRING)
            .unwrap()
            .set_length(255)
            .set_notnull(true);

        assert_eq!(column.get_name(), "title");
        assert_eq!(column.get_type(), TypeId::of::<StringType>());
        assert_eq!(column.get_length(), Some(255));
        assert!(column.is_notnull());
        assert!(!column.is_fixed());

        let column = Column::new("id", TypeId::of::<GuidType>()).unwrap();
        assert!(!column.is_notnull());
        assert!(column.get_default().is_null());
    }

    #[test]
    fn unknown_types_are_rejected() {
        let error = Column::new("shape", "polygon").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownType);
    }
}
