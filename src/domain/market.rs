//! Market descriptions: name templates, outcome templates and vendor mappings.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ids::{Culture, MarketId, OutcomeId};
use super::urn::Urn;
use crate::mapping::ValidatorExpression;

/// A string per culture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Culture, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for a single culture.
    pub fn single(culture: Culture, text: impl Into<String>) -> Self {
        let mut t = Self::new();
        t.insert(culture, text);
        t
    }

    pub fn get(&self, culture: &Culture) -> Option<&str> {
        self.0.get(culture).map(String::as_str)
    }

    pub fn insert(&mut self, culture: Culture, text: impl Into<String>) {
        self.0.insert(culture, text.into());
    }

    pub fn contains(&self, culture: &Culture) -> bool {
        self.0.contains_key(culture)
    }

    pub fn cultures(&self) -> impl Iterator<Item = &Culture> {
        self.0.keys()
    }

    /// Add every culture of `other`; cultures already present are overwritten
    /// with the newer text, none are removed.
    pub fn merge(&mut self, other: LocalizedText) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of a market, with its name template per culture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDescription {
    pub id: OutcomeId,
    pub name: LocalizedText,
}

impl OutcomeDescription {
    pub fn new(id: impl Into<OutcomeId>, name: LocalizedText) -> Self {
        Self {
            id: id.into(),
            name,
        }
    }
}

/// Sports a mapping applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportRestriction {
    #[default]
    All,
    Only(Vec<Urn>),
}

impl SportRestriction {
    pub fn allows(&self, sport: &Urn) -> bool {
        match self {
            SportRestriction::All => true,
            SportRestriction::Only(sports) => sports.contains(sport),
        }
    }
}

/// Mapping of a market onto a third-party market id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketMapping {
    pub target_market_id: String,
    #[serde(default)]
    pub sports: SportRestriction,
    pub producers: Vec<u32>,
    #[serde(default)]
    pub valid_for: Option<ValidatorExpression>,
    #[serde(default)]
    pub outcome_mappings: BTreeMap<OutcomeId, String>,
}

impl MarketMapping {
    pub fn new(target_market_id: impl Into<String>, producers: Vec<u32>) -> Self {
        Self {
            target_market_id: target_market_id.into(),
            sports: SportRestriction::All,
            producers,
            valid_for: None,
            outcome_mappings: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_valid_for(mut self, valid_for: ValidatorExpression) -> Self {
        self.valid_for = Some(valid_for);
        self
    }

    #[must_use]
    pub fn with_sports(mut self, sports: SportRestriction) -> Self {
        self.sports = sports;
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<OutcomeId>, target: impl Into<String>) -> Self {
        self.outcome_mappings.insert(outcome.into(), target.into());
        self
    }

    /// Vendor outcome id for a source outcome.
    pub fn outcome_mapping(&self, outcome: &OutcomeId) -> Option<&str> {
        self.outcome_mappings.get(outcome).map(String::as_str)
    }
}

/// Description of a market, possibly specialised by a variant.
///
/// Identity is `(id, variant)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDescription {
    pub id: MarketId,
    #[serde(default)]
    pub variant: Option<String>,
    pub name: LocalizedText,
    #[serde(default)]
    pub outcomes: Vec<OutcomeDescription>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub mappings: Vec<MarketMapping>,
}

impl MarketDescription {
    pub fn new(id: u32, name: LocalizedText) -> Self {
        Self {
            id: MarketId::new(id),
            variant: None,
            name,
            outcomes: Vec::new(),
            groups: Vec::new(),
            attributes: BTreeMap::new(),
            mappings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: OutcomeDescription) -> Self {
        self.outcomes.push(outcome);
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: MarketMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    pub fn outcome(&self, id: &OutcomeId) -> Option<&OutcomeDescription> {
        self.outcomes.iter().find(|o| &o.id == id)
    }

    /// Cultures the market name is available in.
    pub fn cultures(&self) -> impl Iterator<Item = &Culture> {
        self.name.cultures()
    }

    pub fn has_culture(&self, culture: &Culture) -> bool {
        self.name.contains(culture)
    }

    /// Merge a fetch of the same market for other cultures into this one.
    ///
    /// Localized text is unioned per culture; culture-independent parts
    /// (groups, attributes, mappings) are taken from `other` when it has them.
    pub fn merge(&mut self, other: MarketDescription) {
        self.name.merge(other.name);

        merge_outcomes(&mut self.outcomes, other.outcomes);

        if !other.groups.is_empty() {
            self.groups = other.groups;
        }
        if !other.attributes.is_empty() {
            self.attributes = other.attributes;
        }
        if !other.mappings.is_empty() {
            self.mappings = other.mappings;
        }
    }

    /// Specialise an invariant description with a variant description.
    ///
    /// The invariant name, groups and attributes are kept; outcomes come from
    /// the variant, as do mappings when the variant carries any.
    #[must_use]
    pub fn specialise(&self, variant: &VariantDescription) -> MarketDescription {
        let mut merged = self.clone();
        merged.variant = Some(variant.id.clone());
        merged.outcomes = variant.outcomes.clone();
        if !variant.mappings.is_empty() {
            merged.mappings = variant.mappings.clone();
        }
        merged
    }
}

/// Outcomes and mappings shared by every market using a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDescription {
    pub id: String,
    #[serde(default)]
    pub outcomes: Vec<OutcomeDescription>,
    #[serde(default)]
    pub mappings: Vec<MarketMapping>,
}

impl VariantDescription {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            outcomes: Vec::new(),
            mappings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: OutcomeDescription) -> Self {
        self.outcomes.push(outcome);
        self
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: MarketMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    /// Cultures any outcome name is available in.
    pub fn cultures(&self) -> BTreeSet<Culture> {
        self.outcomes
            .iter()
            .flat_map(|o| o.name.cultures().cloned())
            .collect()
    }

    pub fn merge(&mut self, other: VariantDescription) {
        merge_outcomes(&mut self.outcomes, other.outcomes);
        if !other.mappings.is_empty() {
            self.mappings = other.mappings;
        }
    }
}

impl From<&MarketDescription> for VariantDescription {
    fn from(market: &MarketDescription) -> Self {
        Self {
            id: market.variant.clone().unwrap_or_default(),
            outcomes: market.outcomes.clone(),
            mappings: market.mappings.clone(),
        }
    }
}

fn merge_outcomes(into: &mut Vec<OutcomeDescription>, from: Vec<OutcomeDescription>) {
    for outcome in from {
        match into.iter_mut().find(|o| o.id == outcome.id) {
            Some(existing) => existing.name.merge(outcome.name),
            None => into.push(outcome),
        }
    }
}
