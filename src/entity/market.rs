//! Market and outcome facades with per-culture name memoization.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::Mutex;
use tracing::trace;

use super::strategy::ExceptionHandlingStrategy;
use crate::domain::{Culture, MarketId, MarketMapping, OutcomeId, Specifiers, Urn};
use crate::error::Result;
use crate::naming::{MappingProvider, NameProvider};

/// Names already rendered for an entity, per culture.
///
/// Only successful non-empty results are stored; a failed or empty
/// resolution is attempted again on the next request. Concurrent requests
/// for the same culture may both resolve; the last store wins.
#[derive(Debug, Default)]
struct NameCache {
    names: Mutex<HashMap<Culture, String>>,
}

impl NameCache {
    fn get(&self, culture: &Culture) -> Option<String> {
        self.names.lock().get(culture).cloned()
    }

    fn remember(&self, culture: &Culture, result: &Result<Option<String>>) {
        if let Ok(Some(name)) = result {
            self.names.lock().insert(culture.clone(), name.clone());
        }
    }
}

/// A vendor mapping of one outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeMapping {
    pub market_id: String,
    pub outcome_id: String,
}

/// A market instance of a sport event, as seen by feed consumers.
pub struct Market {
    id: MarketId,
    specifiers: Specifiers,
    outcomes: Vec<Outcome>,
    names: Arc<dyn NameProvider>,
    mappings: Arc<dyn MappingProvider>,
    strategy: ExceptionHandlingStrategy,
    cache: NameCache,
}

impl fmt::Debug for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Market")
            .field("id", &self.id)
            .field("specifiers", &self.specifiers.to_string())
            .field("outcomes", &self.outcomes)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Market {
    pub fn new(
        id: MarketId,
        specifiers: Specifiers,
        outcome_ids: Vec<OutcomeId>,
        names: Arc<dyn NameProvider>,
        mappings: Arc<dyn MappingProvider>,
        strategy: ExceptionHandlingStrategy,
    ) -> Self {
        let outcomes = outcome_ids
            .into_iter()
            .map(|outcome_id| Outcome {
                id: outcome_id,
                market_id: id,
                names: Arc::clone(&names),
                mappings: Arc::clone(&mappings),
                strategy,
                cache: NameCache::default(),
            })
            .collect();

        Self {
            id,
            specifiers,
            outcomes,
            names,
            mappings,
            strategy,
            cache: NameCache::default(),
        }
    }

    pub fn id(&self) -> MarketId {
        self.id
    }

    pub fn specifiers(&self) -> &Specifiers {
        &self.specifiers
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn outcome(&self, id: &OutcomeId) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| &o.id == id)
    }

    /// Market name in `culture`.
    ///
    /// `Ok(None)` when no name exists, or when resolution failed and the
    /// strategy is [`ExceptionHandlingStrategy::Catch`].
    pub async fn name(&self, culture: &Culture) -> Result<Option<String>> {
        if let Some(name) = self.cache.get(culture) {
            return Ok(Some(name));
        }

        trace!(market_id = %self.id, culture = %culture, "Resolving market name");
        let result = self.names.market_name(culture).await;
        self.cache.remember(culture, &result);
        self.strategy
            .handle(&format!("name of market {}", self.id), result)
    }

    /// Names in several cultures, resolved concurrently. Cultures without a
    /// name are left out.
    pub async fn names(&self, cultures: &[Culture]) -> Result<BTreeMap<Culture, String>> {
        let results = join_all(cultures.iter().map(|c| self.name(c))).await;
        let mut names = BTreeMap::new();
        for (culture, result) in cultures.iter().zip(results) {
            if let Some(name) = result? {
                names.insert(culture.clone(), name);
            }
        }
        Ok(names)
    }

    /// Vendor mappings of this market for a producer and sport.
    ///
    /// Not memoized; specifier-dependent validators make the answer cheap to
    /// recompute from the cached description.
    pub async fn valid_mappings(
        &self,
        producer_id: u32,
        sport: &Urn,
    ) -> Result<Option<Vec<MarketMapping>>> {
        let result = self
            .mappings
            .valid_mappings(producer_id, sport)
            .await
            .map(Some);
        self.strategy
            .handle(&format!("mappings of market {}", self.id), result)
    }
}

/// An outcome of a [`Market`].
pub struct Outcome {
    id: OutcomeId,
    market_id: MarketId,
    names: Arc<dyn NameProvider>,
    mappings: Arc<dyn MappingProvider>,
    strategy: ExceptionHandlingStrategy,
    cache: NameCache,
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outcome")
            .field("id", &self.id)
            .field("market_id", &self.market_id)
            .finish_non_exhaustive()
    }
}

impl Outcome {
    pub fn id(&self) -> &OutcomeId {
        &self.id
    }

    /// Outcome name in `culture`, memoized like [`Market::name`].
    pub async fn name(&self, culture: &Culture) -> Result<Option<String>> {
        if let Some(name) = self.cache.get(culture) {
            return Ok(Some(name));
        }

        trace!(market_id = %self.market_id, outcome = %self.id, culture = %culture, "Resolving outcome name");
        let result = self.names.outcome_name(&self.id, culture).await;
        self.cache.remember(culture, &result);
        self.strategy.handle(
            &format!("name of outcome {} of market {}", self.id, self.market_id),
            result,
        )
    }

    /// Vendor ids of this outcome under each valid market mapping that
    /// maps it.
    pub async fn mappings(
        &self,
        producer_id: u32,
        sport: &Urn,
    ) -> Result<Option<Vec<OutcomeMapping>>> {
        let result = self
            .mappings
            .valid_mappings(producer_id, sport)
            .await
            .map(|mappings| {
                Some(
                    mappings
                        .iter()
                        .filter_map(|m| {
                            m.outcome_mapping(&self.id).map(|target| OutcomeMapping {
                                market_id: m.target_market_id.clone(),
                                outcome_id: target.to_string(),
                            })
                        })
                        .collect(),
                )
            });
        self.strategy.handle(
            &format!("mappings of outcome {} of market {}", self.id, self.market_id),
            result,
        )
    }
}
