//! Tiered market description catalog.
//!
//! Descriptions come from three endpoints:
//!
//! - **invariant** markets, identical for every event (no `variant`
//!   specifier);
//! - **list** variants, a shared enumeration of outcome sets referenced by
//!   the `variant` specifier;
//! - **single** variants, outcome sets specific to one market instance
//!   (player props and other `pre:` variants).
//!
//! Each tier is filled per culture on demand. Concurrent requests for the
//! same missing culture wait on a single fetch and all receive its result,
//! including a failure.

mod snapshot;
mod source;
mod tier;

pub use snapshot::{CatalogSnapshot, CatalogStats, SingleVariantItem};
pub use source::DescriptionSource;

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::config::CatalogConfig;
use crate::domain::{Culture, MarketDescription, MarketId, Specifiers, VariantDescription};
use crate::error::CatalogError;
use tier::{ListTier, SingleEntry, SingleTier};

/// Variant values with this prefix are never looked up in the list tier.
pub const SINGLE_VARIANT_PREFIX: &str = "pre:";

/// Whether a variant is known to be instance-specific without a lookup.
pub fn is_single_variant(variant: &str) -> bool {
    variant.starts_with(SINGLE_VARIANT_PREFIX)
}

pub struct MarketCatalog {
    source: Arc<dyn DescriptionSource>,
    invariant: ListTier<MarketId, MarketDescription>,
    variants: ListTier<String, VariantDescription>,
    singles: SingleTier,
}

impl MarketCatalog {
    pub fn new(source: Arc<dyn DescriptionSource>, config: &CatalogConfig) -> Self {
        Self {
            source,
            invariant: ListTier::new("invariant"),
            variants: ListTier::new("variant_list"),
            singles: SingleTier::new(config.cache_single_variants),
        }
    }

    /// Description of a market instance in every requested culture.
    ///
    /// Without a `variant` specifier the invariant description is returned.
    /// With one, the invariant description is specialised by the list
    /// variant of that name, or by the single variant when the list does not
    /// contain it (or the variant is a `pre:` variant). A single variant
    /// unknown to the invariant tier is returned as the source sent it.
    pub async fn resolve(
        &self,
        market_id: MarketId,
        specifiers: &Specifiers,
        cultures: &[Culture],
    ) -> Result<MarketDescription, CatalogError> {
        if cultures.is_empty() {
            return Err(CatalogError::NoCultures {
                market_id: market_id.value(),
            });
        }
        let invariant = self.invariant_market(market_id, cultures).await?;
        let not_found = |variant: Option<&str>| CatalogError::NotFound {
            market_id: market_id.value(),
            variant: variant.map(str::to_string),
        };

        let description = match specifiers.variant() {
            None => invariant.ok_or_else(|| not_found(None))?,
            Some(variant) => {
                let listed = if is_single_variant(variant) {
                    None
                } else {
                    self.list_variant(variant, cultures).await?
                };

                match (invariant, listed) {
                    (Some(inv), Some(listed)) => inv.specialise(&listed),
                    (None, Some(_)) => return Err(not_found(Some(variant))),
                    (invariant, None) => {
                        let single = self
                            .singles
                            .get_or_fetch(self.source.as_ref(), market_id, variant, cultures)
                            .await
                            .map_err(|e| {
                                warn!(market_id = %market_id, variant, error = %e, "Single variant fetch failed");
                                e
                            })?;
                        match (invariant, single) {
                            (Some(inv), Some(single)) => {
                                inv.specialise(&VariantDescription::from(&single))
                            }
                            (None, Some(single)) => single,
                            (_, None) => return Err(not_found(Some(variant))),
                        }
                    }
                }
            }
        };

        for culture in cultures {
            if !description.has_culture(culture) {
                return Err(CatalogError::CultureMissing {
                    market_id: market_id.value(),
                    culture: culture.to_string(),
                });
            }
        }

        Ok(description)
    }

    async fn invariant_market(
        &self,
        market_id: MarketId,
        cultures: &[Culture],
    ) -> Result<Option<MarketDescription>, CatalogError> {
        let source = &self.source;
        self.invariant
            .ensure(cultures, |culture| async move {
                let markets = source.invariant_markets(&culture).await.map_err(|e| {
                    warn!(culture = %culture, error = %e, "Invariant market fetch failed");
                    e
                })?;
                Ok(markets.into_iter().map(|m| (m.id, m)).collect())
            })
            .await?;
        Ok(self.invariant.get(&market_id))
    }

    async fn list_variant(
        &self,
        variant: &str,
        cultures: &[Culture],
    ) -> Result<Option<VariantDescription>, CatalogError> {
        let source = &self.source;
        self.variants
            .ensure(cultures, |culture| async move {
                let variants = source.variant_list(&culture).await.map_err(|e| {
                    warn!(culture = %culture, error = %e, "Variant list fetch failed");
                    e
                })?;
                Ok(variants.into_iter().map(|v| (v.id.clone(), v)).collect())
            })
            .await?;
        Ok(self.variants.get(&variant.to_string()))
    }

    /// Drop every cached description of a market.
    ///
    /// The invariant endpoint only serves whole lists, so the invariant tier
    /// is emptied and refilled from fresh lists on the next request. Entries
    /// of other markets are replaced rather than merged into, which drops
    /// outcomes removed upstream.
    pub fn invalidate(&self, market_id: MarketId) {
        self.invariant.clear();
        self.singles.invalidate(market_id);
    }

    pub fn clear(&self) {
        self.invariant.clear();
        self.variants.clear();
        self.singles.clear();
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            invariant_markets: self.invariant.len(),
            invariant_cultures: self.invariant.loaded_cultures(),
            list_variants: self.variants.len(),
            variant_cultures: self.variants.loaded_cultures(),
            single_variants: self.singles.len(),
        }
    }

    /// Enumerate every cached entry.
    pub fn export(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            exported_at: Utc::now(),
            invariant_cultures: self.invariant.loaded_cultures(),
            invariant: self.invariant.values(),
            variant_cultures: self.variants.loaded_cultures(),
            variants: self.variants.values(),
            single_variants: self
                .singles
                .entries()
                .into_iter()
                .map(|e| SingleVariantItem {
                    cultures: e.cultures.into_iter().collect(),
                    description: e.description,
                })
                .collect(),
        }
    }

    /// Merge a snapshot into the cache; nothing already cached is dropped.
    pub fn import(&self, snapshot: CatalogSnapshot) {
        self.invariant.import(
            snapshot.invariant.into_iter().map(|m| (m.id, m)).collect(),
            snapshot.invariant_cultures,
        );
        self.variants.import(
            snapshot
                .variants
                .into_iter()
                .map(|v| (v.id.clone(), v))
                .collect(),
            snapshot.variant_cultures,
        );
        for item in snapshot.single_variants {
            self.singles.import(SingleEntry {
                description: item.description,
                cultures: item.cultures.into_iter().collect(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalizedText, OutcomeDescription};
    use crate::testkit::source::StaticDescriptionSource;

    fn text(pairs: &[(&str, &str)]) -> LocalizedText {
        let mut t = LocalizedText::new();
        for (culture, value) in pairs {
            t.insert(Culture::from(*culture), *value);
        }
        t
    }

    fn cultures(codes: &[&str]) -> Vec<Culture> {
        codes.iter().map(|c| Culture::from(*c)).collect()
    }

    fn source() -> Arc<StaticDescriptionSource> {
        Arc::new(
            StaticDescriptionSource::new()
                .with_invariant(MarketDescription::new(
                    1,
                    text(&[("en", "1x2"), ("de", "1x2")]),
                ))
                .with_invariant(MarketDescription::new(
                    21,
                    text(&[("en", "Exact goals"), ("de", "Genaue Tore")]),
                ))
                .with_variant(VariantDescription::new("sr:exact_goals:4+").with_outcome(
                    OutcomeDescription::new("sr:exact_goals:4+:1", text(&[("en", "0"), ("de", "0")])),
                ))
                .with_single_variant(
                    MarketDescription::new(768, text(&[("en", "Player points")]))
                        .with_variant("pre:playerprops:1:2")
                        .with_outcome(OutcomeDescription::new(
                            "pre:playerprops:1:2:1",
                            text(&[("en", "over")]),
                        )),
                ),
        )
    }

    fn catalog(source: Arc<StaticDescriptionSource>) -> MarketCatalog {
        MarketCatalog::new(source, &CatalogConfig::default())
    }

    #[tokio::test]
    async fn invariant_market_without_variant() {
        let source = source();
        let catalog = catalog(source.clone());

        let market = catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &cultures(&["en"]))
            .await
            .unwrap();

        assert_eq!(market.name.get(&Culture::from("en")), Some("1x2"));
        assert_eq!(source.invariant_calls(), 1);
        assert_eq!(source.variant_list_calls(), 0);
    }

    #[tokio::test]
    async fn missing_culture_is_fetched_and_merged() {
        let source = source();
        let catalog = catalog(source.clone());
        let specifiers = Specifiers::new();

        catalog
            .resolve(MarketId::new(1), &specifiers, &cultures(&["en"]))
            .await
            .unwrap();
        let market = catalog
            .resolve(MarketId::new(1), &specifiers, &cultures(&["en", "de"]))
            .await
            .unwrap();

        assert!(market.has_culture(&Culture::from("en")));
        assert!(market.has_culture(&Culture::from("de")));
        assert_eq!(source.invariant_calls(), 2);

        catalog
            .resolve(MarketId::new(21), &specifiers, &cultures(&["de", "en"]))
            .await
            .unwrap();
        assert_eq!(source.invariant_calls(), 2);
    }

    #[tokio::test]
    async fn unknown_market_is_not_found() {
        let catalog = catalog(source());
        let result = catalog
            .resolve(MarketId::new(999), &Specifiers::new(), &cultures(&["en"]))
            .await;
        assert_eq!(
            result,
            Err(CatalogError::NotFound {
                market_id: 999,
                variant: None
            })
        );
    }

    #[tokio::test]
    async fn source_failure_is_not_a_not_found() {
        let source = Arc::new(StaticDescriptionSource::new().failing("endpoint down"));
        let catalog = catalog(source);
        let result = catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &cultures(&["en"]))
            .await;
        assert!(matches!(result, Err(CatalogError::Source { .. })));
    }

    #[tokio::test]
    async fn list_variant_specialises_invariant() {
        let source = source();
        let catalog = catalog(source.clone());
        let specifiers = Specifiers::parse("variant=sr:exact_goals:4+").unwrap();

        let market = catalog
            .resolve(MarketId::new(21), &specifiers, &cultures(&["en"]))
            .await
            .unwrap();

        assert_eq!(market.name.get(&Culture::from("en")), Some("Exact goals"));
        assert_eq!(market.variant.as_deref(), Some("sr:exact_goals:4+"));
        assert_eq!(market.outcomes.len(), 1);
        assert_eq!(source.single_variant_calls(), 0);
    }

    #[tokio::test]
    async fn pre_variant_uses_single_tier() {
        let source = source();
        let catalog = catalog(source.clone());
        let specifiers = Specifiers::parse("variant=pre:playerprops:1:2").unwrap();

        let market = catalog
            .resolve(MarketId::new(768), &specifiers, &cultures(&["en"]))
            .await
            .unwrap();
        assert_eq!(market.name.get(&Culture::from("en")), Some("Player points"));
        assert_eq!(source.variant_list_calls(), 0);

        catalog
            .resolve(MarketId::new(768), &specifiers, &cultures(&["en"]))
            .await
            .unwrap();
        assert_eq!(source.single_variant_calls(), 1);
    }

    #[tokio::test]
    async fn single_variant_caching_can_be_disabled() {
        let source = source();
        let catalog = MarketCatalog::new(
            source.clone(),
            &CatalogConfig {
                cache_single_variants: false,
            },
        );
        let specifiers = Specifiers::parse("variant=pre:playerprops:1:2").unwrap();

        for _ in 0..2 {
            catalog
                .resolve(MarketId::new(768), &specifiers, &cultures(&["en"]))
                .await
                .unwrap();
        }
        assert_eq!(source.single_variant_calls(), 2);
        assert_eq!(catalog.stats().single_variants, 0);
    }

    #[tokio::test]
    async fn unknown_variant_is_not_found_with_variant() {
        let catalog = catalog(source());
        let specifiers = Specifiers::parse("variant=sr:unknown").unwrap();
        let result = catalog
            .resolve(MarketId::new(21), &specifiers, &cultures(&["en"]))
            .await;
        assert_eq!(
            result,
            Err(CatalogError::NotFound {
                market_id: 21,
                variant: Some("sr:unknown".into())
            })
        );
    }

    #[tokio::test]
    async fn culture_absent_after_fetch() {
        let catalog = catalog(source());
        let result = catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &cultures(&["fr"]))
            .await;
        assert!(matches!(result, Err(CatalogError::CultureMissing { .. })));
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_fetch() {
        let source = Arc::new(
            StaticDescriptionSource::new()
                .with_invariant(MarketDescription::new(1, text(&[("en", "1x2")])))
                .with_delay(std::time::Duration::from_millis(50)),
        );
        let catalog = Arc::new(catalog(source.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    catalog
                        .resolve(MarketId::new(1), &Specifiers::new(), &[Culture::from("en")])
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(source.invariant_calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_failures_share_one_fetch() {
        let source = Arc::new(
            StaticDescriptionSource::new()
                .with_delay(std::time::Duration::from_millis(50))
                .failing("503"),
        );
        let catalog = Arc::new(catalog(source.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    catalog
                        .resolve(MarketId::new(1), &Specifiers::new(), &[Culture::from("en")])
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                Err(CatalogError::Source { .. })
            ));
        }
        assert_eq!(source.invariant_calls(), 1);

        assert!(catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &[Culture::from("en")])
            .await
            .is_err());
        assert_eq!(source.invariant_calls(), 2);
    }

    #[tokio::test]
    async fn empty_culture_list_is_rejected() {
        let source = source();
        let catalog = catalog(source.clone());
        let result = catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &[])
            .await;
        assert_eq!(result, Err(CatalogError::NoCultures { market_id: 1 }));
        assert_eq!(source.invariant_calls(), 0);
    }

    #[tokio::test]
    async fn export_and_import_round_trip() {
        let catalog_a = catalog(source());
        catalog_a
            .resolve(
                MarketId::new(768),
                &Specifiers::parse("variant=pre:playerprops:1:2").unwrap(),
                &cultures(&["en"]),
            )
            .await
            .unwrap();
        let snapshot = catalog_a.export();
        assert!(!snapshot.is_empty());

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: CatalogSnapshot = serde_json::from_str(&json).unwrap();

        let empty = Arc::new(StaticDescriptionSource::new());
        let catalog_b = catalog(empty.clone());
        catalog_b.import(restored);

        assert_eq!(catalog_b.stats(), catalog_a.stats());
        let market = catalog_b
            .resolve(
                MarketId::new(768),
                &Specifiers::parse("variant=pre:playerprops:1:2").unwrap(),
                &cultures(&["en"]),
            )
            .await
            .unwrap();
        assert_eq!(market.name.get(&Culture::from("en")), Some("Player points"));
        assert_eq!(empty.invariant_calls(), 0);
        assert_eq!(empty.single_variant_calls(), 0);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let source = source();
        let catalog = catalog(source.clone());
        let en = cultures(&["en"]);

        catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &en)
            .await
            .unwrap();
        catalog.invalidate(MarketId::new(1));
        catalog
            .resolve(MarketId::new(1), &Specifiers::new(), &en)
            .await
            .unwrap();

        assert_eq!(source.invariant_calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_replaces_other_markets() {
        let source = Arc::new(
            StaticDescriptionSource::new()
                .with_invariant(MarketDescription::new(1, text(&[("en", "1x2")])))
                .with_invariant(
                    MarketDescription::new(18, text(&[("en", "Total")]))
                        .with_outcome(OutcomeDescription::new("12", text(&[("en", "over")])))
                        .with_outcome(OutcomeDescription::new("13", text(&[("en", "under")]))),
                ),
        );
        let catalog = catalog(source.clone());
        let en = cultures(&["en"]);

        let total = catalog
            .resolve(MarketId::new(18), &Specifiers::new(), &en)
            .await
            .unwrap();
        assert_eq!(total.outcomes.len(), 2);

        source.replace_invariant(vec![
            MarketDescription::new(1, text(&[("en", "1x2")])),
            MarketDescription::new(18, text(&[("en", "Total")]))
                .with_outcome(OutcomeDescription::new("12", text(&[("en", "over")]))),
        ]);
        catalog.invalidate(MarketId::new(1));

        let total = catalog
            .resolve(MarketId::new(18), &Specifiers::new(), &en)
            .await
            .unwrap();
        assert_eq!(total.outcomes.len(), 1);
        assert_eq!(source.invariant_calls(), 2);
    }
}
