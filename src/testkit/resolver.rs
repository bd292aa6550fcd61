//! In-memory entity resolver.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Culture, Urn};
use crate::error::NameError;
use crate::naming::EntityResolver;

/// Resolver over fixed names, identical in every culture.
///
/// Unknown entities are reported as [`NameError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct StaticEntityResolver {
    competitors: Vec<String>,
    named_competitors: HashMap<String, String>,
    players: HashMap<String, String>,
    event: Option<String>,
}

impl StaticEntityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Event competitors in position order (`$competitor1` first).
    pub fn with_competitors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.competitors = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_competitor(mut self, urn: &str, name: impl Into<String>) -> Self {
        self.named_competitors.insert(urn.to_string(), name.into());
        self
    }

    pub fn with_player(mut self, urn: &str, name: impl Into<String>) -> Self {
        self.players.insert(urn.to_string(), name.into());
        self
    }

    pub fn with_event(mut self, name: impl Into<String>) -> Self {
        self.event = Some(name.into());
        self
    }
}

fn unavailable(subject: impl Into<String>, culture: &Culture) -> NameError {
    NameError::Unavailable {
        subject: subject.into(),
        culture: culture.to_string(),
    }
}

#[async_trait]
impl EntityResolver for StaticEntityResolver {
    async fn competitor_name_by_index(
        &self,
        index: u32,
        culture: &Culture,
    ) -> Result<String, NameError> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.competitors.get(i))
            .cloned()
            .ok_or_else(|| unavailable(format!("competitor {index}"), culture))
    }

    async fn competitor_name(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError> {
        self.named_competitors
            .get(&urn.to_string())
            .cloned()
            .ok_or_else(|| unavailable(urn.to_string(), culture))
    }

    async fn player_name(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError> {
        self.players
            .get(&urn.to_string())
            .cloned()
            .ok_or_else(|| unavailable(urn.to_string(), culture))
    }

    async fn event_name(&self, culture: &Culture) -> Result<String, NameError> {
        self.event
            .clone()
            .ok_or_else(|| unavailable("sport event", culture))
    }
}
