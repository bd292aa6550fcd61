//! Market specifiers: the `key=value|key2=value2` substitution context
//! attached to every market instance in a feed message.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::SpecifierError;

/// Key the catalog inspects to pick a description tier.
pub const VARIANT_KEY: &str = "variant";

/// Ordered, immutable key/value table with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifiers {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

/// Failure of the shared pair splitter, mapped by callers to their own error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PairError {
    MissingSeparator(String),
    EmptyKey,
    DuplicateKey(String),
}

/// Split `k<sep>v|k<sep>v` into ordered pairs with unique, non-empty keys.
///
/// Shared by specifier parsing (`=`) and valid-for parsing (`~`).
pub(crate) fn parse_pairs(text: &str, separator: char) -> Result<Vec<(String, String)>, PairError> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    if text.trim().is_empty() {
        return Ok(pairs);
    }

    for pair in text.split('|') {
        let (key, value) = pair
            .split_once(separator)
            .ok_or_else(|| PairError::MissingSeparator(pair.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(PairError::EmptyKey);
        }
        if pairs.iter().any(|(k, _)| k == key) {
            return Err(PairError::DuplicateKey(key.to_string()));
        }
        pairs.push((key.to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}

impl Specifiers {
    /// An empty table, as used by markets without specifiers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse specifier text as it appears in feed messages.
    pub fn parse(text: &str) -> Result<Self, SpecifierError> {
        let pairs = parse_pairs(text, '=').map_err(|e| match e {
            PairError::MissingSeparator(pair) => SpecifierError::MissingSeparator {
                text: text.to_string(),
                pair,
            },
            PairError::EmptyKey => SpecifierError::EmptyKey {
                text: text.to_string(),
            },
            PairError::DuplicateKey(key) => SpecifierError::DuplicateKey {
                text: text.to_string(),
                key,
            },
        })?;
        Ok(Self::from_ordered(pairs))
    }

    /// Build from pairs, rejecting duplicate keys.
    pub fn try_from_pairs<K, V, I>(pairs: I) -> Result<Self, SpecifierError>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();
        for (k, v) in pairs {
            let key = k.into();
            if key.is_empty() {
                return Err(SpecifierError::EmptyKey {
                    text: render(&entries),
                });
            }
            if entries.iter().any(|(existing, _)| *existing == key) {
                return Err(SpecifierError::DuplicateKey {
                    text: render(&entries),
                    key,
                });
            }
            entries.push((key, v.into()));
        }
        Ok(Self::from_ordered(entries))
    }

    fn from_ordered(entries: Vec<(String, String)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// The `variant` specifier, if present.
    pub fn variant(&self) -> Option<&str> {
        self.get(VARIANT_KEY)
    }

    /// Entries in their original order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("|")
}

impl fmt::Display for Specifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render(&self.entries))
    }
}

impl FromStr for Specifiers {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_in_order() {
        let specifiers = Specifiers::parse("inningnr=5|runnr=3").unwrap();
        assert_eq!(specifiers.len(), 2);
        assert_eq!(specifiers.get("inningnr"), Some("5"));
        assert_eq!(specifiers.get("runnr"), Some("3"));
        let keys: Vec<_> = specifiers.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["inningnr", "runnr"]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let specifiers = Specifiers::parse("Total=1|total=2").unwrap();
        assert_eq!(specifiers.get("Total"), Some("1"));
        assert_eq!(specifiers.get("total"), Some("2"));
    }

    #[test]
    fn empty_text_is_empty_table() {
        assert!(Specifiers::parse("").unwrap().is_empty());
    }

    #[test]
    fn duplicate_key_is_format_error() {
        assert_eq!(
            Specifiers::parse("total=1.5|total=2.5"),
            Err(SpecifierError::DuplicateKey {
                text: "total=1.5|total=2.5".into(),
                key: "total".into(),
            })
        );
    }

    #[test]
    fn missing_separator_is_format_error() {
        assert!(matches!(
            Specifiers::parse("total"),
            Err(SpecifierError::MissingSeparator { .. })
        ));
    }

    #[test]
    fn empty_key_is_format_error() {
        assert!(matches!(
            Specifiers::parse("=1"),
            Err(SpecifierError::EmptyKey { .. })
        ));
    }

    #[test]
    fn value_may_contain_separator() {
        let specifiers = Specifiers::parse("variant=sr:exact_goals:4+").unwrap();
        assert_eq!(specifiers.variant(), Some("sr:exact_goals:4+"));
    }

    #[test]
    fn display_round_trips() {
        let text = "hcp=-1.5|variant=sr:correct_score:bestof:3";
        assert_eq!(Specifiers::parse(text).unwrap().to_string(), text);
    }

    #[test]
    fn try_from_pairs_rejects_duplicates() {
        let result = Specifiers::try_from_pairs([("a", "1"), ("a", "2")]);
        assert!(matches!(result, Err(SpecifierError::DuplicateKey { .. })));
    }
}
