//! Caller-facing market and outcome entities.
//!
//! Entities memoize rendered names per culture and apply the configured
//! [`ExceptionHandlingStrategy`] to every failure of the naming core.

mod market;
mod strategy;

pub use market::{Market, Outcome, OutcomeMapping};
pub use strategy::ExceptionHandlingStrategy;

use std::sync::Arc;

use crate::catalog::MarketCatalog;
use crate::config::Config;
use crate::domain::{Culture, MarketId, OutcomeId, Specifiers};
use crate::mapping::MappingSelector;
use crate::naming::{CatalogNameProvider, EntityResolver, NamingContext, TemplateRegistry};

/// Builds [`Market`] entities that share one catalog and template registry.
#[derive(Clone)]
pub struct MarketFactory {
    context: NamingContext,
    strategy: ExceptionHandlingStrategy,
}

impl MarketFactory {
    pub fn new(context: NamingContext, strategy: ExceptionHandlingStrategy) -> Self {
        Self { context, strategy }
    }

    /// Factory over `catalog` using the process-wide template registry.
    pub fn from_config(catalog: Arc<MarketCatalog>, config: &Config) -> Self {
        let context = NamingContext {
            catalog,
            registry: TemplateRegistry::global(),
            selector: MappingSelector::from_config(&config.mapping),
            mapping_cultures: config.naming.default_cultures.clone(),
        };
        Self::new(context, config.naming.exception_handling)
    }

    pub fn strategy(&self) -> ExceptionHandlingStrategy {
        self.strategy
    }

    pub fn default_cultures(&self) -> &[Culture] {
        &self.context.mapping_cultures
    }

    /// A market of the sport event `resolver` answers for.
    pub fn build(
        &self,
        market_id: MarketId,
        specifiers: Specifiers,
        outcome_ids: Vec<OutcomeId>,
        resolver: Arc<dyn EntityResolver>,
    ) -> Market {
        let provider = Arc::new(CatalogNameProvider::new(
            self.context.clone(),
            resolver,
            market_id,
            specifiers.clone(),
        ));
        Market::new(
            market_id,
            specifiers,
            outcome_ids,
            provider.clone(),
            provider,
            self.strategy,
        )
    }
}
