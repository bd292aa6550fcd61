//! Vendor mapping selection.
//!
//! A market description may carry several mappings onto third-party market
//! ids; which one applies depends on the producer, the sport and the live
//! specifiers of the market instance.

mod validator;

pub use validator::ValidatorExpression;

use tracing::trace;

use crate::config::MappingConfig;
use crate::domain::{MarketDescription, MarketMapping, Specifiers, Urn};
use crate::error::MappingError;

/// Producer whose mappings skip valid-for checks unless configured otherwise.
pub const DEFAULT_UNCONDITIONAL_PRODUCER: u32 = 5;

/// Picks the mappings of a market that apply to a live market instance.
#[derive(Debug, Clone)]
pub struct MappingSelector {
    unconditional_producer: Option<u32>,
}

impl MappingSelector {
    pub fn new(unconditional_producer: Option<u32>) -> Self {
        Self {
            unconditional_producer,
        }
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        if config.disable_producer_bypass {
            Self::new(None)
        } else {
            Self::new(Some(config.unconditional_producer))
        }
    }

    /// Mappings whose producer and sport restrictions match and whose
    /// valid-for expression accepts the specifiers, in description order.
    ///
    /// Mappings for the unconditional producer are included without
    /// evaluating their valid-for expression.
    pub fn valid_mappings<'a>(
        &self,
        description: &'a MarketDescription,
        producer_id: u32,
        sport: &Urn,
        specifiers: &Specifiers,
    ) -> Result<Vec<&'a MarketMapping>, MappingError> {
        let mut selected = Vec::new();

        for mapping in &description.mappings {
            if !mapping.producers.contains(&producer_id) || !mapping.sports.allows(sport) {
                continue;
            }

            let accepted = if self.unconditional_producer == Some(producer_id) {
                true
            } else {
                match &mapping.valid_for {
                    Some(expr) => expr.accepts(specifiers)?,
                    None => true,
                }
            };

            trace!(
                market_id = %description.id,
                target = %mapping.target_market_id,
                accepted,
                "Evaluated market mapping"
            );

            if accepted {
                selected.push(mapping);
            }
        }

        Ok(selected)
    }
}

impl Default for MappingSelector {
    fn default() -> Self {
        Self::new(Some(DEFAULT_UNCONDITIONAL_PRODUCER))
    }
}
