use crate::Value;
use crate::platform::DatabasePlatform;
use crate::schema::asset::{AbstractAsset, Asset, impl_asset};
use crate::schema::{Identifier, IntoIdentifier};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ForeignKeyReferentialAction {
    Cascade,
    SetNull,
    NoAction,
    Restrict,
    SetDefault,
}

impl ForeignKeyReferentialAction {
    /// Parses the action name as reported by the database engine.
    pub fn from_sql(action: &str) -> Option<Self> {
        match action.trim().to_uppercase().as_str() {
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ForeignKeyConstraint {
    asset: AbstractAsset,
    local_columns: Vec<Identifier>,
    foreign_columns: Vec<Identifier>,
    foreign_table: Identifier,
    options: HashMap<String, Value>,
    pub on_update: Option<ForeignKeyReferentialAction>,
    pub on_delete: Option<ForeignKeyReferentialAction>,
}

impl ForeignKeyConstraint {
    pub fn new<LC, FC, FT>(
        local_columns: &[LC],
        foreign_columns: &[FC],
        foreign_table: FT,
        on_update: Option<ForeignKeyReferentialAction>,
        on_delete: Option<ForeignKeyReferentialAction>,
    ) -> Self
    where
        LC: AsRef<str>,
        FC: AsRef<str>,
        FT: IntoIdentifier,
    {
        let local_columns = local_columns
            .iter()
            .map(|c| Identifier::new(c.as_ref(), false))
            .collect();
        let foreign_columns = foreign_columns
            .iter()
            .map(|c| Identifier::new(c.as_ref(), false))
            .collect();

        Self {
            asset: AbstractAsset::default(),
            local_columns,
            foreign_columns,
            foreign_table: foreign_table.into_identifier(),
            options: HashMap::new(),
            on_update,
            on_delete,
        }
    }

    /// Sets the constraint name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.asset.set_name(name);
        self
    }

    /// Sets a platform option (`deferrable`, `deferred`).
    pub fn with_option<V: Into<Value>>(mut self, option: &str, value: V) -> Self {
        self.options.insert(option.to_string(), value.into());
        self
    }

    pub fn get_local_columns(&self) -> &[Identifier] {
        &self.local_columns
    }

    pub fn get_quoted_local_columns<P: DatabasePlatform + ?Sized>(
        &self,
        platform: &P,
    ) -> Vec<String> {
        self.local_columns
            .iter()
            .map(|c| c.get_quoted_name(platform))
            .collect()
    }

    pub fn get_unquoted_local_columns(&self) -> Vec<String> {
        self.local_columns
            .iter()
            .map(|c| c.get_name().into_owned())
            .collect()
    }

    pub fn get_foreign_columns(&self) -> &[Identifier] {
        &self.foreign_columns
    }

    pub fn get_quoted_foreign_columns<P: DatabasePlatform + ?Sized>(
        &self,
        platform: &P,
    ) -> Vec<String> {
        self.foreign_columns
            .iter()
            .map(|c| c.get_quoted_name(platform))
            .collect()
    }

    pub fn get_unquoted_foreign_columns(&self) -> Vec<String> {
        self.foreign_columns
            .iter()
            .map(|c| c.get_name().into_owned())
            .collect()
    }

    pub fn get_foreign_table(&self) -> &Identifier {
        &self.foreign_table
    }

    pub fn get_quoted_foreign_table_name<P: DatabasePlatform + ?Sized>(
        &self,
        platform: &P,
    ) -> String {
        self.foreign_table.get_quoted_name(platform)
    }

    pub fn get_option(&self, option: &str) -> Option<&Value> {
        self.options.get(option)
    }

    /// Returns the non-schema qualified foreign table name.
    pub fn get_unqualified_foreign_table_name(&self) -> String {
        let name = self.foreign_table.get_name().to_lowercase();
        match name.rsplit_once('.') {
            Some((_, name)) => name.to_string(),
            None => name,
        }
    }
}

fn lowercase_vec(v: Vec<String>) -> Vec<String> {
    v.iter().map(|c| c.to_lowercase()).collect()
}

/// Actions that behave as "no action" compare equal to an unset action.
fn normalize_action(action: Option<ForeignKeyReferentialAction>) -> Option<ForeignKeyReferentialAction> {
    match action {
        Some(ForeignKeyReferentialAction::NoAction) => None,
        action => action,
    }
}

impl PartialEq for ForeignKeyConstraint {
    fn eq(&self, other: &Self) -> bool {
        lowercase_vec(self.get_unquoted_local_columns())
            == lowercase_vec(other.get_unquoted_local_columns())
            && lowercase_vec(self.get_unquoted_foreign_columns())
                == lowercase_vec(other.get_unquoted_foreign_columns())
            && self.get_unqualified_foreign_table_name()
                == other.get_unqualified_foreign_table_name()
            && normalize_action(self.on_update) == normalize_action(other.on_update)
            && normalize_action(self.on_delete) == normalize_action(other.on_delete)
    }
}

impl_asset!(ForeignKeyConstraint, asset);

#[cfg(test)]
mod tests {
    use super::{ForeignKeyConstraint, ForeignKeyReferentialAction};

    #[test]
    fn equality_ignores_names_and_case() {
        let declared = ForeignKeyConstraint::new(
            &["owner_id"],
            &["id"],
            "user",
            None,
            Some(ForeignKeyReferentialAction::Cascade),
        )
        .with_name("FK_ITEM_OWNER");
        let introspected = ForeignKeyConstraint::new(
            &["OWNER_ID"],
            &["id"],
            "main.User",
            Some(ForeignKeyReferentialAction::NoAction),
            ForeignKeyReferentialAction::from_sql("cascade"),
        );

        assert_eq!(declared, introspected);
        assert_eq!(declared.get_unqualified_foreign_table_name(), "user");
    }
}
