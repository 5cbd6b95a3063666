use std::collections::BTreeMap;

#[cfg(feature = "postgres")]
mod postgresql_keywords;
#[cfg(feature = "sqlite")]
mod sqlite_keywords;

pub trait Keywords {
    /// Returns the name of this keyword list.
    fn get_name(&self) -> &'static str;

    /// Returns the list of keywords.
    fn get_keywords(&self) -> &[&'static str];
}

pub struct KeywordList {
    name: &'static str,
    keyword_map: BTreeMap<String, &'static str>,
}

impl KeywordList {
    pub(crate) fn new(keywords: &'static dyn Keywords) -> Self {
        let mut keyword_map = BTreeMap::new();
        for keyword in keywords.get_keywords() {
            keyword_map.insert(keyword.to_uppercase(), *keyword);
        }

        Self {
            name: keywords.get_name(),
            keyword_map,
        }
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    /// Checks if the given word is a keyword of this dialect/vendor platform.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keyword_map.contains_key(&word.to_uppercase())
    }

    #[cfg(feature = "postgres")]
    pub fn postgres_keywords() -> Self {
        Self::new(&postgresql_keywords::POSTGRESQL_KEYWORDS)
    }

    #[cfg(feature = "sqlite")]
    pub fn sqlite_keywords() -> Self {
        Self::new(&sqlite_keywords::SQLITE_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::KeywordList;

    #[cfg(feature = "postgres")]
    #[test]
    fn user_is_reserved_on_postgresql() {
        let keywords = KeywordList::postgres_keywords();
        assert!(keywords.is_keyword("user"));
        assert!(keywords.is_keyword("SELECT"));
        assert!(!keywords.is_keyword("item"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_keywords_are_case_insensitive() {
        let keywords = KeywordList::sqlite_keywords();
        assert!(keywords.is_keyword("table"));
        assert!(keywords.is_keyword("References"));
        assert!(!keywords.is_keyword("user"));
    }
}
