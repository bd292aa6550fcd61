//! In-memory description source.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::catalog::DescriptionSource;
use crate::domain::{
    Culture, LocalizedText, MarketDescription, MarketId, OutcomeDescription, VariantDescription,
};
use crate::error::CatalogError;

/// Description source over fixed descriptions.
///
/// Every call returns the descriptions with text restricted to the requested
/// culture, the way the remote endpoints answer one culture per request.
#[derive(Debug, Default)]
pub struct StaticDescriptionSource {
    invariant: RwLock<Vec<MarketDescription>>,
    variants: Vec<VariantDescription>,
    singles: Vec<MarketDescription>,
    delay: Option<Duration>,
    failure: Option<String>,
    invariant_calls: AtomicU32,
    variant_list_calls: AtomicU32,
    single_variant_calls: AtomicU32,
}

impl StaticDescriptionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invariant(mut self, market: MarketDescription) -> Self {
        self.invariant.get_mut().push(market);
        self
    }

    /// Swap the invariant list served from now on.
    pub fn replace_invariant(&self, markets: Vec<MarketDescription>) {
        *self.invariant.write() = markets;
    }

    pub fn with_variant(mut self, variant: VariantDescription) -> Self {
        self.variants.push(variant);
        self
    }

    /// A single-variant description; its `variant` must be set.
    pub fn with_single_variant(mut self, market: MarketDescription) -> Self {
        self.singles.push(market);
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with [`CatalogError::Source`].
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn invariant_calls(&self) -> u32 {
        self.invariant_calls.load(Ordering::SeqCst)
    }

    pub fn variant_list_calls(&self) -> u32 {
        self.variant_list_calls.load(Ordering::SeqCst)
    }

    pub fn single_variant_calls(&self) -> u32 {
        self.single_variant_calls.load(Ordering::SeqCst)
    }

    async fn answer(&self, counter: &AtomicU32) -> Result<(), CatalogError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(CatalogError::Source {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn localize_text(text: &LocalizedText, culture: &Culture) -> LocalizedText {
    text.get(culture)
        .map(|t| LocalizedText::single(culture.clone(), t))
        .unwrap_or_default()
}

fn localize_outcomes(outcomes: &[OutcomeDescription], culture: &Culture) -> Vec<OutcomeDescription> {
    outcomes
        .iter()
        .map(|o| OutcomeDescription::new(o.id.clone(), localize_text(&o.name, culture)))
        .collect()
}

fn localize_market(market: &MarketDescription, culture: &Culture) -> MarketDescription {
    MarketDescription {
        name: localize_text(&market.name, culture),
        outcomes: localize_outcomes(&market.outcomes, culture),
        ..market.clone()
    }
}

#[async_trait]
impl DescriptionSource for StaticDescriptionSource {
    async fn invariant_markets(
        &self,
        culture: &Culture,
    ) -> Result<Vec<MarketDescription>, CatalogError> {
        self.answer(&self.invariant_calls).await?;
        Ok(self
            .invariant
            .read()
            .iter()
            .map(|m| localize_market(m, culture))
            .collect())
    }

    async fn variant_list(
        &self,
        culture: &Culture,
    ) -> Result<Vec<VariantDescription>, CatalogError> {
        self.answer(&self.variant_list_calls).await?;
        Ok(self
            .variants
            .iter()
            .map(|v| VariantDescription {
                outcomes: localize_outcomes(&v.outcomes, culture),
                ..v.clone()
            })
            .collect())
    }

    async fn single_variant(
        &self,
        market_id: MarketId,
        variant: &str,
        culture: &Culture,
    ) -> Result<Option<MarketDescription>, CatalogError> {
        self.answer(&self.single_variant_calls).await?;
        Ok(self
            .singles
            .iter()
            .find(|m| m.id == market_id && m.variant.as_deref() == Some(variant))
            .map(|m| localize_market(m, culture)))
    }
}
