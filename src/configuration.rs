use std::fmt::{Debug, Formatter};

type SchemaAssetFilterType = dyn (Fn(&str) -> bool) + Sync + Send;

pub const DEFAULT_VERSION_TABLE_NAME: &str = "schemaline_versions";

pub struct Configuration {
    schema_assets_filter: Box<SchemaAssetFilterType>,
    version_table_name: String,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            schema_assets_filter: Box::new(|_| true),
            version_table_name: DEFAULT_VERSION_TABLE_NAME.to_string(),
        }
    }

    /// Restricts the tables seen by schema introspection.
    /// The version table is never filtered out.
    pub fn set_schema_assets_filter(mut self, filter: Box<SchemaAssetFilterType>) -> Self {
        self.schema_assets_filter = filter;
        self
    }

    pub fn get_schema_assets_filter(&self) -> &SchemaAssetFilterType {
        &self.schema_assets_filter
    }

    pub fn set_version_table_name<S: Into<String>>(mut self, name: S) -> Self {
        self.version_table_name = name.into();
        self
    }

    pub fn get_version_table_name(&self) -> &str {
        &self.version_table_name
    }

    pub(crate) fn accepts_asset(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.version_table_name) || (self.schema_assets_filter)(name)
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("version_table_name", &self.version_table_name)
            .finish_non_exhaustive()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new()
    }
}
