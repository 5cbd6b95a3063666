use crate::platform::DatabasePlatform;
use crc::{CRC_32_ISO_HDLC, Crc};
use std::borrow::Cow;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct AbstractAsset {
    quoted: bool,
    namespace: Option<String>,
    name: String,
}

/// Generates an identifier from a list of names obeying a certain string length.
///
/// Used to name foreign keys and indexes that were not given an explicit name.
pub(crate) fn generate_identifier_name<S: AsRef<str>, U: Into<Option<usize>>>(
    column_names: &[S],
    prefix: &str,
    max_size: U,
) -> String {
    let max_size = max_size.into().unwrap_or(30);
    let hash = column_names
        .iter()
        .map(|name| {
            let hash = Crc::<u32>::new(&CRC_32_ISO_HDLC);
            let mut digest = hash.digest();
            digest.update(name.as_ref().as_bytes());
            format!("{:X}", digest.finalize())
        })
        .collect::<Vec<String>>()
        .join("");

    let mut identifier = format!("{}_{}", prefix, hash);
    identifier.truncate(max_size);

    identifier.to_uppercase()
}

pub trait Asset {
    /// Returns the name of this schema asset.
    fn get_name(&self) -> Cow<'_, str>;

    /// Sets the name of this asset.
    fn set_name(&mut self, name: &str);

    /// Whether the name of this asset is empty
    fn is_empty(&self) -> bool {
        self.get_name().is_empty()
    }

    /// Gets the namespace name of this asset.
    /// If None is returned this means the default namespace is used.
    fn get_namespace_name(&self) -> Option<String>;

    /// Checks if this asset's name is quoted.
    fn is_quoted(&self) -> bool;

    /// Checks if this identifier is quoted.
    fn is_identifier_quoted(&self, identifier: &str) -> bool {
        matches!(identifier.chars().next(), Some('`' | '"' | '['))
    }

    /// Trim quotes from the identifier.
    fn trim_quotes(&self, identifier: &str) -> String {
        identifier.replace(['`', '"', '[', ']'], "")
    }

    /// Gets the quoted representation of this asset. Names are quoted when they
    /// were defined quoted or when they are a reserved keyword of the platform.
    fn get_quoted_name<P: DatabasePlatform + ?Sized>(&self, platform: &P) -> String
    where
        Self: Sized,
    {
        let keywords = platform.create_reserved_keywords_list();
        self.get_name()
            .split('.')
            .map(|v| {
                if self.is_quoted() || keywords.is_keyword(v) {
                    platform.quote_single_identifier(v)
                } else {
                    v.to_string()
                }
            })
            .collect::<Vec<String>>()
            .join(".")
    }
}

macro_rules! impl_asset {
    ($t:ty, $e:ident) => {
        impl $crate::schema::Asset for $t {
            fn get_name(&self) -> ::std::borrow::Cow<'_, str> {
                $crate::schema::Asset::get_name(&self.$e)
            }

            fn set_name(&mut self, name: &str) {
                $crate::schema::Asset::set_name(&mut self.$e, name)
            }

            fn get_namespace_name(&self) -> Option<String> {
                $crate::schema::Asset::get_namespace_name(&self.$e)
            }

            fn is_quoted(&self) -> bool {
                $crate::schema::Asset::is_quoted(&self.$e)
            }
        }

        impl $crate::schema::IntoIdentifier for $t {
            fn into_identifier(&self) -> $crate::schema::Identifier {
                $crate::schema::Identifier::new(
                    $crate::schema::Asset::get_name(self),
                    $crate::schema::Asset::is_quoted(self),
                )
            }
        }
    };
}

pub(crate) use impl_asset;

impl Asset for AbstractAsset {
    fn get_name(&self) -> Cow<'_, str> {
        if let Some(namespace) = &self.namespace {
            Cow::Owned(format!("{}.{}", namespace, &self.name))
        } else {
            Cow::Borrowed(&self.name)
        }
    }

    fn set_name(&mut self, name: &str) {
        let name = if self.is_identifier_quoted(name) {
            self.quoted = true;
            self.trim_quotes(name)
        } else {
            self.quoted = false;
            name.to_string()
        };

        if let Some((namespace, name)) = name.split_once('.') {
            self.namespace = Some(namespace.to_string());
            self.name = name.to_string();
        } else {
            self.namespace = None;
            self.name = name
        }
    }

    fn get_namespace_name(&self) -> Option<String> {
        self.namespace.clone()
    }

    fn is_quoted(&self) -> bool {
        self.quoted
    }
}

impl AbstractAsset {
    pub(crate) fn set_quoted(&mut self, quoted: bool) {
        self.quoted = quoted;
    }
}

#[cfg(test)]
mod tests {
    use super::{AbstractAsset, Asset, generate_identifier_name};

    #[test]
    fn splits_namespace_and_quotes() {
        let mut asset = AbstractAsset::default();
        asset.set_name(r#""public.user""#);

        assert!(asset.is_quoted());
        assert_eq!(asset.get_namespace_name().as_deref(), Some("public"));
        assert_eq!(asset.get_name(), "public.user");
    }

    #[test]
    fn generated_names_are_stable_and_bounded() {
        let name = generate_identifier_name(&["item", "owner_id"], "fk", 30);
        assert!(name.starts_with("FK_"));
        assert!(name.len() <= 30);
        assert_eq!(name, generate_identifier_name(&["item", "owner_id"], "fk", 30));
        assert_ne!(name, generate_identifier_name(&["item", "id"], "fk", 30));
    }
}
