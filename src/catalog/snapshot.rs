//! Exportable view of the catalog contents.
//!
//! The snapshot is plain serde data; where it is stored and in which format
//! is up to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Culture, MarketDescription, VariantDescription};

/// A cached single-variant description and the cultures fetched for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleVariantItem {
    pub cultures: Vec<Culture>,
    pub description: MarketDescription,
}

/// Every entry cached by a [`MarketCatalog`](super::MarketCatalog).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub invariant_cultures: Vec<Culture>,
    #[serde(default)]
    pub invariant: Vec<MarketDescription>,
    #[serde(default)]
    pub variant_cultures: Vec<Culture>,
    #[serde(default)]
    pub variants: Vec<VariantDescription>,
    #[serde(default)]
    pub single_variants: Vec<SingleVariantItem>,
}

impl CatalogSnapshot {
    pub fn is_empty(&self) -> bool {
        self.invariant.is_empty() && self.variants.is_empty() && self.single_variants.is_empty()
    }
}

/// Entry counts and loaded cultures per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub invariant_markets: usize,
    pub invariant_cultures: Vec<Culture>,
    pub list_variants: usize,
    pub variant_cultures: Vec<Culture>,
    pub single_variants: usize,
}
