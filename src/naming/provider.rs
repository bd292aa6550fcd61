//! Name and mapping providers bound to one market instance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::evaluator::{evaluate, resolve_entity_list, EntityResolver};
use super::registry::TemplateRegistry;
use crate::catalog::MarketCatalog;
use crate::domain::{is_entity_list, Culture, MarketId, MarketMapping, OutcomeId, Specifiers, Urn};
use crate::error::{NameError, Result};
use crate::mapping::MappingSelector;

/// Renders market and outcome names for one market instance.
///
/// `Ok(None)` means no name exists for the request; it is not cached by
/// callers, the same as an error.
#[async_trait]
pub trait NameProvider: Send + Sync {
    async fn market_name(&self, culture: &Culture) -> Result<Option<String>>;

    async fn outcome_name(&self, outcome: &OutcomeId, culture: &Culture)
        -> Result<Option<String>>;
}

/// Selects vendor mappings for one market instance.
#[async_trait]
pub trait MappingProvider: Send + Sync {
    async fn valid_mappings(&self, producer_id: u32, sport: &Urn) -> Result<Vec<MarketMapping>>;
}

/// Everything a [`CatalogNameProvider`] shares with other market instances.
#[derive(Clone)]
pub struct NamingContext {
    pub catalog: Arc<MarketCatalog>,
    pub registry: Arc<TemplateRegistry>,
    pub selector: MappingSelector,
    /// Cultures fetched when only mappings are needed.
    pub mapping_cultures: Vec<Culture>,
}

/// Providers backed by the market catalog, the template registry and an
/// entity resolver for the market's sport event.
pub struct CatalogNameProvider {
    context: NamingContext,
    resolver: Arc<dyn EntityResolver>,
    market_id: MarketId,
    specifiers: Specifiers,
}

impl CatalogNameProvider {
    pub fn new(
        context: NamingContext,
        resolver: Arc<dyn EntityResolver>,
        market_id: MarketId,
        specifiers: Specifiers,
    ) -> Self {
        Self {
            context,
            resolver,
            market_id,
            specifiers,
        }
    }

    async fn render(&self, template: &str, culture: &Culture) -> Result<String> {
        let ast = self.context.registry.get_or_parse(template)?;
        Ok(evaluate(&ast, &self.specifiers, self.resolver.as_ref(), culture).await?)
    }
}

#[async_trait]
impl NameProvider for CatalogNameProvider {
    async fn market_name(&self, culture: &Culture) -> Result<Option<String>> {
        let description = self
            .context
            .catalog
            .resolve(self.market_id, &self.specifiers, std::slice::from_ref(culture))
            .await?;

        let Some(template) = description.name.get(culture) else {
            return Ok(None);
        };
        self.render(template, culture).await.map(Some)
    }

    async fn outcome_name(
        &self,
        outcome: &OutcomeId,
        culture: &Culture,
    ) -> Result<Option<String>> {
        if is_entity_list(outcome.as_str()) {
            debug!(market_id = %self.market_id, outcome = %outcome, "Naming outcome from profiles");
            let name = resolve_entity_list(self.resolver.as_ref(), outcome.as_str(), culture).await?;
            return Ok(Some(name));
        }

        let description = self
            .context
            .catalog
            .resolve(self.market_id, &self.specifiers, std::slice::from_ref(culture))
            .await?;

        let template = description
            .outcome(outcome)
            .and_then(|o| o.name.get(culture))
            .ok_or_else(|| NameError::Unavailable {
                subject: format!("outcome '{outcome}' of market {}", self.market_id),
                culture: culture.to_string(),
            })?;
        self.render(template, culture).await.map(Some)
    }
}

#[async_trait]
impl MappingProvider for CatalogNameProvider {
    async fn valid_mappings(&self, producer_id: u32, sport: &Urn) -> Result<Vec<MarketMapping>> {
        let description = self
            .context
            .catalog
            .resolve(
                self.market_id,
                &self.specifiers,
                &self.context.mapping_cultures,
            )
            .await?;

        let selected =
            self.context
                .selector
                .valid_mappings(&description, producer_id, sport, &self.specifiers)?;
        Ok(selected.into_iter().cloned().collect())
    }
}
