//! Scripted name and mapping providers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{Culture, MarketMapping, OutcomeId, Urn};
use crate::error::{NameError, Result};
use crate::naming::{MappingProvider, NameProvider};

/// What a scripted call answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameResponse {
    Name(String),
    Missing,
    /// Fails with a missing-specifier error for the given key.
    Fail(String),
}

impl NameResponse {
    fn into_result(self) -> Result<Option<String>> {
        match self {
            Self::Name(name) => Ok(Some(name)),
            Self::Missing => Ok(None),
            Self::Fail(key) => Err(NameError::MissingSpecifier { key }.into()),
        }
    }
}

/// Provider answering from a script, counting every call.
///
/// Queued responses are used first, then the fallback forever. Market and
/// outcome calls share the script.
#[derive(Debug)]
pub struct ScriptedNameProvider {
    queued: Mutex<VecDeque<NameResponse>>,
    fallback: NameResponse,
    mappings: Vec<MarketMapping>,
    calls: AtomicU32,
    mapping_calls: AtomicU32,
}

impl ScriptedNameProvider {
    pub fn new(fallback: NameResponse) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            mappings: Vec::new(),
            calls: AtomicU32::new(0),
            mapping_calls: AtomicU32::new(0),
        }
    }

    pub fn returning(name: impl Into<String>) -> Self {
        Self::new(NameResponse::Name(name.into()))
    }

    pub fn empty() -> Self {
        Self::new(NameResponse::Missing)
    }

    pub fn failing(key: impl Into<String>) -> Self {
        Self::new(NameResponse::Fail(key.into()))
    }

    /// Answer the next calls with `responses` before falling back.
    pub fn with_queued(self, responses: impl IntoIterator<Item = NameResponse>) -> Self {
        self.queued.lock().extend(responses);
        self
    }

    pub fn with_mappings(mut self, mappings: Vec<MarketMapping>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn mapping_calls(&self) -> u32 {
        self.mapping_calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self
            .queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        response.into_result()
    }
}

#[async_trait]
impl NameProvider for ScriptedNameProvider {
    async fn market_name(&self, _culture: &Culture) -> Result<Option<String>> {
        self.next()
    }

    async fn outcome_name(
        &self,
        _outcome: &OutcomeId,
        _culture: &Culture,
    ) -> Result<Option<String>> {
        self.next()
    }
}

#[async_trait]
impl MappingProvider for ScriptedNameProvider {
    async fn valid_mappings(&self, producer_id: u32, _sport: &Urn) -> Result<Vec<MarketMapping>> {
        self.mapping_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .mappings
            .iter()
            .filter(|m| m.producers.contains(&producer_id))
            .cloned()
            .collect())
    }
}
