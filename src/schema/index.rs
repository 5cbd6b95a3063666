use crate::platform::DatabasePlatform;
use crate::schema::asset::{AbstractAsset, Asset, impl_asset};
use crate::schema::{Identifier, IntoIdentifier};
use itertools::Itertools;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Index {
    asset: AbstractAsset,
    columns: Vec<Identifier>,
    is_unique: bool,
    is_primary: bool,
}

impl Index {
    pub fn new<N: IntoIdentifier, C: AsRef<str>>(
        name: N,
        columns: &[C],
        is_unique: bool,
        is_primary: bool,
    ) -> Self {
        let mut asset = AbstractAsset::default();
        asset.set_name(&name.into_identifier().get_name());

        Self {
            asset,
            columns: columns
                .iter()
                .map(|c| Identifier::new(c.as_ref(), false))
                .collect(),
            is_unique: is_unique || is_primary,
            is_primary,
        }
    }

    pub fn get_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.get_name().into_owned())
            .collect()
    }

    pub fn get_quoted_columns<P: DatabasePlatform + ?Sized>(&self, platform: &P) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.get_quoted_name(platform))
            .unique()
            .collect()
    }

    pub fn is_unique(&self) -> bool {
        self.is_unique
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Whether this index covers exactly the given columns, in order.
    pub fn spans_columns<C: AsRef<str>>(&self, column_names: &[C]) -> bool {
        self.columns.len() == column_names.len()
            && self
                .columns
                .iter()
                .zip(column_names)
                .all(|(c, n)| c.get_name().eq_ignore_ascii_case(n.as_ref()))
    }
}

impl_asset!(Index, asset);

#[cfg(test)]
mod tests {
    use super::Index;

    #[test]
    fn primary_indexes_are_unique() {
        let index = Index::new("primary", &["id"], false, true);
        assert!(index.is_primary());
        assert!(index.is_unique());
        assert!(index.spans_columns(&["ID"]));
        assert!(!index.spans_columns(&["id", "owner_id"]));
        assert_eq!(index.get_columns(), vec!["id".to_string()]);
    }
}
