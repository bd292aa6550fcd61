//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language code a name is rendered in (`en`, `de`, ...).
///
/// Stored lowercase so `EN` and `en` address the same cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Culture(String);

impl Culture {
    /// Create a new Culture from a language code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_lowercase())
    }

    /// Get the language code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Culture {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Culture {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Culture> for String {
    fn from(c: Culture) -> Self {
        c.0
    }
}

/// Numeric market type identifier as carried by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketId(u32);

impl MarketId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MarketId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Outcome identifier within a market.
///
/// Usually a small number (`"1"`, `"12"`), but player-prop markets use
/// entity URNs or comma-separated URN lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeId(String);

impl OutcomeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutcomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OutcomeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for OutcomeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn culture_is_normalized() {
        let culture = Culture::new(" EN ");
        assert_eq!(culture.as_str(), "en");
        assert_eq!(culture, Culture::from("en"));
    }

    #[test]
    fn culture_display() {
        assert_eq!(format!("{}", Culture::from("de")), "de");
    }

    #[test]
    fn culture_serde_normalizes() {
        let culture: Culture = serde_json::from_str("\"FR\"").unwrap();
        assert_eq!(culture.as_str(), "fr");
        assert_eq!(serde_json::to_string(&culture).unwrap(), "\"fr\"");
    }

    #[test]
    fn market_id_display_and_value() {
        let id = MarketId::from(534);
        assert_eq!(id.value(), 534);
        assert_eq!(format!("{id}"), "534");
    }

    #[test]
    fn outcome_id_from_str() {
        let id = OutcomeId::from("sr:player:1");
        assert_eq!(id.as_str(), "sr:player:1");
    }
}
