//! Vendor entity identifiers (`sr:player:12345`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GenerationCause, UrnError};

/// Structured entity identifier: `prefix:type:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn {
    prefix: String,
    kind: String,
    id: i64,
}

/// Entity categories a name can be looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Competitor,
}

impl Urn {
    pub fn new(prefix: impl Into<String>, kind: impl Into<String>, id: i64) -> Self {
        Self {
            prefix: prefix.into(),
            kind: kind.into(),
            id,
        }
    }

    pub fn parse(value: &str) -> Result<Self, UrnError> {
        let mut parts = value.splitn(3, ':');
        let (prefix, kind, id) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(k), Some(i)) if !p.is_empty() && !k.is_empty() && !i.is_empty() => {
                (p, k, i)
            }
            _ => {
                return Err(UrnError::WrongFormat {
                    value: value.to_string(),
                })
            }
        };

        let id = id.parse::<i64>().map_err(|_| UrnError::InvalidNumber {
            value: value.to_string(),
            id: id.to_string(),
        })?;

        Ok(Self::new(prefix, kind, id))
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The type segment (`player`, `competitor`, `match`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Classify this URN for name lookup.
    pub fn entity_kind(&self) -> Result<EntityKind, GenerationCause> {
        match self.kind.as_str() {
            "player" => Ok(EntityKind::Player),
            "competitor" | "simpleteam" => Ok(EntityKind::Competitor),
            _ => Err(GenerationCause::UnsupportedEntity {
                urn: self.to_string(),
            }),
        }
    }
}

/// Whether an outcome id names entities rather than a templated outcome.
///
/// Comma-separated ids are always treated as entity lists, so a malformed
/// element surfaces as a generation error instead of a missing outcome.
pub fn is_entity_list(value: &str) -> bool {
    value.contains(',')
        || Urn::parse(value)
            .ok()
            .is_some_and(|urn| urn.entity_kind().is_ok())
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.prefix, self.kind, self.id)
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Urn {
    type Error = UrnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.to_string()
    }
}
