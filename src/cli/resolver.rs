//! Entity resolver over names given on the command line.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Culture, Urn};
use crate::error::NameError;
use crate::naming::EntityResolver;

/// Names from `--competitor`, `--player` and `--event`, used for every
/// culture.
#[derive(Debug, Default)]
pub struct ArgumentResolver {
    competitors: Vec<String>,
    profiles: HashMap<String, String>,
    event: Option<String>,
}

impl ArgumentResolver {
    pub fn new(
        competitors: Vec<String>,
        profiles: impl IntoIterator<Item = (String, String)>,
        event: Option<String>,
    ) -> Self {
        Self {
            competitors,
            profiles: profiles.into_iter().collect(),
            event,
        }
    }

    fn profile(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError> {
        self.profiles
            .get(&urn.to_string())
            .cloned()
            .ok_or_else(|| NameError::Unavailable {
                subject: format!("{urn} (pass --player {urn}=NAME)"),
                culture: culture.to_string(),
            })
    }
}

#[async_trait]
impl EntityResolver for ArgumentResolver {
    async fn competitor_name_by_index(
        &self,
        index: u32,
        culture: &Culture,
    ) -> Result<String, NameError> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.competitors.get(i))
            .cloned()
            .ok_or_else(|| NameError::Unavailable {
                subject: format!("competitor {index} (pass --competitor NAME)"),
                culture: culture.to_string(),
            })
    }

    async fn competitor_name(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError> {
        self.profile(urn, culture)
    }

    async fn player_name(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError> {
        self.profile(urn, culture)
    }

    async fn event_name(&self, culture: &Culture) -> Result<String, NameError> {
        self.event.clone().ok_or_else(|| NameError::Unavailable {
            subject: "sport event (pass --event NAME)".into(),
            culture: culture.to_string(),
        })
    }
}
