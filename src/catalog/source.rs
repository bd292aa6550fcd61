//! Description endpoints the catalog fetches from.

use async_trait::async_trait;

use crate::domain::{Culture, MarketDescription, MarketId, VariantDescription};
use crate::error::CatalogError;

/// Remote source of market descriptions, one culture per call.
///
/// Transport, retries and deserialization are the implementor's concern;
/// failures are reported as [`CatalogError::Source`].
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    /// Every invariant market description, with text in `culture`.
    async fn invariant_markets(
        &self,
        culture: &Culture,
    ) -> Result<Vec<MarketDescription>, CatalogError>;

    /// Every shared list variant, with text in `culture`.
    async fn variant_list(&self, culture: &Culture)
        -> Result<Vec<VariantDescription>, CatalogError>;

    /// The description of one market specialised by a single variant.
    ///
    /// `Ok(None)` means the source does not know the combination.
    async fn single_variant(
        &self,
        market_id: MarketId,
        variant: &str,
        culture: &Culture,
    ) -> Result<Option<MarketDescription>, CatalogError>;
}
