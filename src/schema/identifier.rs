use crate::schema::asset::{AbstractAsset, Asset, impl_asset};

/// Name of a schema object referenced elsewhere (a table in a foreign key,
/// a column in an index).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Identifier {
    asset: AbstractAsset,
}

impl Identifier {
    pub fn new<S: Into<String>>(identifier: S, quote: bool) -> Self {
        let identifier = identifier.into();
        let mut asset = AbstractAsset::default();
        asset.set_name(&identifier);

        if quote {
            asset.set_quoted(true);
        }

        Self { asset }
    }
}

impl_asset!(Identifier, asset);

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::new(value, false)
    }
}

pub trait IntoIdentifier {
    fn into_identifier(&self) -> Identifier;
}

impl IntoIdentifier for str {
    fn into_identifier(&self) -> Identifier {
        Identifier::new(self, false)
    }
}

impl IntoIdentifier for String {
    fn into_identifier(&self) -> Identifier {
        Identifier::new(self.as_str(), false)
    }
}

impl<T: IntoIdentifier + ?Sized> IntoIdentifier for &T {
    fn into_identifier(&self) -> Identifier {
        (**self).into_identifier()
    }
}

#[cfg(test)]
mod tests {
    use super::{Identifier, IntoIdentifier};
    use crate::schema::Asset;

    #[test]
    fn converts_names_into_identifiers() {
        let identifier = "item".into_identifier();
        assert_eq!(identifier.get_name(), "item");
        assert!(!identifier.is_quoted());

        let quoted = Identifier::new("user", true);
        assert!(quoted.is_quoted());
        assert_eq!(quoted.into_identifier(), quoted);
    }
}
