//! Query parameter set of a signed request.

use std::collections::BTreeMap;

/// Decoded query parameters, keyed by name.
///
/// Names are kept in byte-wise ascending order, which is the order the
/// canonical message is built in. When a name occurs more than once in the raw
/// query, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string (without the leading `?`).
    pub fn parse(raw_query: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(raw_query.as_bytes()))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.insert(name, value);
        }
        params
    }

    /// Insert a parameter unless the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs.get(name).map(String::as_str)
    }

    /// Value of `name`, treating an empty value the same as an absent one.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Value of `name`, or `default` when absent or empty.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get_non_empty(name).unwrap_or(default)
    }

    /// Iterate parameters in canonical (byte-wise ascending) name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decodes_and_keeps_first_value() {
        let params = QueryParams::parse("text=hello+world&lang=de-DE&text=ignored&voice=");
        assert_eq!(params.get("text"), Some("hello world"));
        assert_eq!(params.get("lang"), Some("de-DE"));
        assert_eq!(params.get("voice"), Some(""));
        assert_eq!(params.get_non_empty("voice"), None);
        assert_eq!(params.get_or("voice", "en-US-Wavenet-D"), "en-US-Wavenet-D");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_iteration_is_bytewise_sorted() {
        let params = QueryParams::from_pairs([("b", "1"), ("Z", "2"), ("a", "3"), ("valid-to", "4")]);
        let names: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["Z", "a", "b", "valid-to"]);
    }
}
