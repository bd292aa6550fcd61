//! Feed domain types: identifiers, specifiers and market descriptions.

mod ids;
mod market;
mod specifier;
mod urn;

pub use ids::{Culture, MarketId, OutcomeId};
pub use market::{
    LocalizedText, MarketDescription, MarketMapping, OutcomeDescription, SportRestriction,
    VariantDescription,
};
pub(crate) use specifier::parse_pairs;
pub(crate) use specifier::PairError;
pub use specifier::{Specifiers, VARIANT_KEY};
pub use urn::{is_entity_list, EntityKind, Urn};
