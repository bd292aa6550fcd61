//! Culture-aware cache tiers with de-duplicated fetches.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::try_join_all;
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::source::DescriptionSource;
use crate::domain::{Culture, MarketDescription, MarketId, VariantDescription};
use crate::error::CatalogError;

/// Values that can absorb a fetch of the same entity for other cultures.
pub(crate) trait Mergeable {
    fn merge_from(&mut self, other: Self);
}

impl Mergeable for MarketDescription {
    fn merge_from(&mut self, other: Self) {
        self.merge(other);
    }
}

impl Mergeable for VariantDescription {
    fn merge_from(&mut self, other: Self) {
        self.merge(other);
    }
}

/// Fetches in flight, at most one per key.
///
/// Callers arriving while a fetch for their key runs await it and receive a
/// clone of its result, failures included. The slot is dropped once the
/// fetch completes, so a later call starts a fresh fetch.
pub(crate) struct FetchGate<K, T> {
    in_flight: DashMap<K, Arc<OnceCell<T>>>,
}

impl<K: Hash + Eq, T> fmt::Debug for FetchGate<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchGate")
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl<K: Hash + Eq + Clone, T: Clone> FetchGate<K, T> {
    pub fn new() -> Self {
        Self {
            in_flight: DashMap::new(),
        }
    }

    /// Run `fetch` unless a fetch for `key` is already running, in which
    /// case wait for that one instead.
    pub async fn run<F, Fut>(&self, key: &K, fetch: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let slot = Arc::clone(self.in_flight.entry(key.clone()).or_default().value());
        let result = slot.get_or_init(fetch).await.clone();
        self.in_flight
            .remove_if(key, |_, current| Arc::ptr_eq(current, &slot));
        result
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Tier populated from a list endpoint that returns every entry for one
/// culture at a time.
#[derive(Debug)]
pub(crate) struct ListTier<K, V> {
    name: &'static str,
    entries: RwLock<HashMap<K, V>>,
    loaded: RwLock<BTreeSet<Culture>>,
    gate: FetchGate<Culture, Result<(), CatalogError>>,
}

impl<K, V> ListTier<K, V>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Mergeable + Clone + Send + Sync,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            loaded: RwLock::new(BTreeSet::new()),
            gate: FetchGate::new(),
        }
    }

    fn missing(&self, cultures: &[Culture]) -> Vec<Culture> {
        let loaded = self.loaded.read();
        cultures
            .iter()
            .filter(|c| !loaded.contains(*c))
            .cloned()
            .collect()
    }

    /// Make sure every culture has been fetched, fetching only those that
    /// have not been.
    pub async fn ensure<F, Fut>(&self, cultures: &[Culture], fetch: F) -> Result<(), CatalogError>
    where
        F: Fn(Culture) -> Fut + Sync,
        Fut: Future<Output = Result<Vec<(K, V)>, CatalogError>> + Send,
    {
        let missing = self.missing(cultures);
        if missing.is_empty() {
            return Ok(());
        }
        try_join_all(missing.into_iter().map(|c| self.load(c, &fetch))).await?;
        Ok(())
    }

    async fn load<F, Fut>(&self, culture: Culture, fetch: &F) -> Result<(), CatalogError>
    where
        F: Fn(Culture) -> Fut + Sync,
        Fut: Future<Output = Result<Vec<(K, V)>, CatalogError>> + Send,
    {
        self.gate
            .run(&culture, || async {
                if self.loaded.read().contains(&culture) {
                    debug!(tier = self.name, culture = %culture, "Culture loaded by an earlier fetch");
                    return Ok(());
                }

                debug!(tier = self.name, culture = %culture, "Fetching descriptions");
                let items = fetch(culture.clone()).await?;
                let count = items.len();
                self.merge_items(items);
                self.loaded.write().insert(culture.clone());
                info!(tier = self.name, culture = %culture, count, "Loaded descriptions");
                Ok(())
            })
            .await
    }

    fn merge_items(&self, items: Vec<(K, V)>) {
        let mut entries = self.entries.write();
        for (key, value) in items {
            match entries.get_mut(&key) {
                Some(existing) => existing.merge_from(value),
                None => {
                    entries.insert(key, value);
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    pub fn loaded_cultures(&self) -> Vec<Culture> {
        self.loaded.read().iter().cloned().collect()
    }

    pub fn values(&self) -> Vec<V> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Merge entries from an external snapshot and mark its cultures loaded.
    pub fn import(&self, items: Vec<(K, V)>, cultures: Vec<Culture>) {
        self.merge_items(items);
        self.loaded.write().extend(cultures);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.loaded.write().clear();
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SingleEntry {
    pub description: MarketDescription,
    pub cultures: BTreeSet<Culture>,
}

type SingleKey = (MarketId, String);
type SingleFetchKey = (MarketId, String, Culture);

/// Tier for single variants, fetched per market, variant and culture.
#[derive(Debug)]
pub(crate) struct SingleTier {
    entries: RwLock<HashMap<SingleKey, SingleEntry>>,
    gate: FetchGate<SingleFetchKey, Result<Option<MarketDescription>, CatalogError>>,
    caching: bool,
}

impl SingleTier {
    pub fn new(caching: bool) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            gate: FetchGate::new(),
            caching,
        }
    }

    /// Description for the market specialised by `variant` in every culture
    /// the source knows it in, or `None` if the source knows it in none.
    ///
    /// Unknown combinations are not remembered, so they are asked for again.
    pub async fn get_or_fetch(
        &self,
        source: &dyn DescriptionSource,
        market_id: MarketId,
        variant: &str,
        cultures: &[Culture],
    ) -> Result<Option<MarketDescription>, CatalogError> {
        let key = (market_id, variant.to_string());
        let missing: Vec<&Culture> = cultures
            .iter()
            .filter(|c| self.cached(&key, c).is_none())
            .collect();

        let fetched = try_join_all(
            missing
                .into_iter()
                .map(|culture| self.fetch_culture(source, market_id, variant, culture)),
        )
        .await?;

        if self.caching {
            return Ok(self.entries.read().get(&key).map(|e| e.description.clone()));
        }

        let mut merged: Option<MarketDescription> = None;
        for description in fetched.into_iter().flatten() {
            match merged.as_mut() {
                Some(existing) => existing.merge(description),
                None => merged = Some(description),
            }
        }
        Ok(merged)
    }

    fn cached(&self, key: &SingleKey, culture: &Culture) -> Option<MarketDescription> {
        if !self.caching {
            return None;
        }
        self.entries
            .read()
            .get(key)
            .filter(|entry| entry.cultures.contains(culture))
            .map(|entry| entry.description.clone())
    }

    /// Fetch one culture, sharing the call with concurrent requests for the
    /// same market, variant and culture.
    async fn fetch_culture(
        &self,
        source: &dyn DescriptionSource,
        market_id: MarketId,
        variant: &str,
        culture: &Culture,
    ) -> Result<Option<MarketDescription>, CatalogError> {
        let key = (market_id, variant.to_string(), culture.clone());
        self.gate
            .run(&key, || async {
                let cache_key = (market_id, variant.to_string());
                if let Some(description) = self.cached(&cache_key, culture) {
                    return Ok(Some(description));
                }

                debug!(market_id = %market_id, variant, culture = %culture, "Fetching single variant");
                let description = source.single_variant(market_id, variant, culture).await?;
                if self.caching {
                    if let Some(description) = &description {
                        self.store(
                            cache_key,
                            SingleEntry {
                                description: description.clone(),
                                cultures: BTreeSet::from([culture.clone()]),
                            },
                        );
                    }
                }
                Ok(description)
            })
            .await
    }

    fn store(&self, key: SingleKey, entry: SingleEntry) {
        let mut entries = self.entries.write();
        match entries.get_mut(&key) {
            Some(existing) => {
                existing.description.merge(entry.description);
                existing.cultures.extend(entry.cultures);
            }
            None => {
                entries.insert(key, entry);
            }
        }
    }

    pub fn entries(&self) -> Vec<SingleEntry> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn import(&self, entry: SingleEntry) {
        let Some(variant) = entry.description.variant.clone() else {
            return;
        };
        self.store((entry.description.id, variant), entry);
    }

    pub fn invalidate(&self, market_id: MarketId) {
        self.entries.write().retain(|(id, _), _| *id != market_id);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
