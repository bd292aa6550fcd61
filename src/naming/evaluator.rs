//! Template evaluation against live specifiers and entity lookups.

use std::str::FromStr;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::ast::{ArithmeticOp, CompetitorSelector, NameAst, OperandExpr, Segment};
use super::format::{ordinal, signed};
use crate::domain::{Culture, EntityKind, Specifiers, Urn};
use crate::error::{GenerationCause, NameError};

/// Names of entities referenced from templates and outcome ids.
///
/// Backed by the sport event and profile caches, which live outside this
/// crate. Implementations report a profile that cannot be supplied for the
/// culture, even after a fetch, as [`NameError::Unavailable`].
#[async_trait]
pub trait EntityResolver: Send + Sync {
    /// Competitor at a 1-based position of the sport event.
    async fn competitor_name_by_index(
        &self,
        index: u32,
        culture: &Culture,
    ) -> Result<String, NameError>;

    async fn competitor_name(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError>;

    async fn player_name(&self, urn: &Urn, culture: &Culture) -> Result<String, NameError>;

    /// Name of the sport event the market belongs to.
    async fn event_name(&self, culture: &Culture) -> Result<String, NameError>;
}

/// Evaluate a compiled template.
///
/// Placeholders are resolved in order; the first failure is returned.
pub async fn evaluate(
    ast: &NameAst,
    specifiers: &Specifiers,
    resolver: &dyn EntityResolver,
    culture: &Culture,
) -> Result<String, NameError> {
    let mut out = String::with_capacity(ast.template().len());
    for segment in ast.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(expr) => {
                let value = evaluate_operand(expr, specifiers, resolver, culture).await?;
                out.push_str(&value);
            }
        }
    }
    Ok(out)
}

async fn evaluate_operand(
    expr: &OperandExpr,
    specifiers: &Specifiers,
    resolver: &dyn EntityResolver,
    culture: &Culture,
) -> Result<String, NameError> {
    match expr {
        OperandExpr::SpecifierRef(key) => Ok(specifier(specifiers, key)?.to_string()),
        OperandExpr::OrdinalRef(key) => {
            let raw = specifier(specifiers, key)?;
            Ok(ordinal(whole(number(key, raw)?, raw)?))
        }
        OperandExpr::SignedRef { key, negate } => {
            let value = number(key, specifier(specifiers, key)?)?;
            Ok(signed(if *negate { -value } else { value }))
        }
        OperandExpr::Arithmetic {
            key,
            op,
            literal,
            ordinal: as_ordinal,
        } => {
            let raw = specifier(specifiers, key)?;
            let value = number(key, raw)?;
            let (result, symbol) = match op {
                ArithmeticOp::Add => (value.checked_add(Decimal::from(*literal)), '+'),
                ArithmeticOp::Subtract => (value.checked_sub(Decimal::from(*literal)), '-'),
            };
            let result = result.ok_or_else(|| NameError::ArithmeticOverflow {
                key: key.to_string(),
                value: raw.to_string(),
                operation: format!("{symbol}{literal}"),
            })?;
            if *as_ordinal {
                Ok(ordinal(whole(result, &result.to_string())?))
            } else {
                Ok(result.to_string())
            }
        }
        OperandExpr::CompetitorRef(CompetitorSelector::Index(index)) => {
            resolver.competitor_name_by_index(*index, culture).await
        }
        OperandExpr::CompetitorRef(CompetitorSelector::Named(key))
        | OperandExpr::PlayerRef(key)
        | OperandExpr::GroupRef(key) => {
            resolve_entity_list(resolver, specifier(specifiers, key)?, culture).await
        }
        OperandExpr::EventRef => resolver.event_name(culture).await,
    }
}

/// Name a comma-separated list of player / competitor URNs.
///
/// Every element is parsed before any lookup; names are joined with `,` in
/// the original order.
pub async fn resolve_entity_list(
    resolver: &dyn EntityResolver,
    ids: &str,
    culture: &Culture,
) -> Result<String, NameError> {
    let entities = ids
        .split(',')
        .map(|element| {
            let element = element.trim();
            let generation = |cause: GenerationCause| NameError::Generation {
                id: element.to_string(),
                cause,
            };
            let urn = Urn::parse(element).map_err(|e| generation(e.into()))?;
            let kind = urn.entity_kind().map_err(generation)?;
            Ok((urn, kind))
        })
        .collect::<Result<Vec<_>, NameError>>()?;

    let names = try_join_all(entities.iter().map(|(urn, kind)| async move {
        match kind {
            EntityKind::Player => resolver.player_name(urn, culture).await,
            EntityKind::Competitor => resolver.competitor_name(urn, culture).await,
        }
    }))
    .await?;

    Ok(names.join(","))
}

fn specifier<'a>(specifiers: &'a Specifiers, key: &str) -> Result<&'a str, NameError> {
    specifiers
        .get(key)
        .ok_or_else(|| NameError::MissingSpecifier {
            key: key.to_string(),
        })
}

fn number(key: &str, raw: &str) -> Result<Decimal, NameError> {
    Decimal::from_str(raw).map_err(|_| NameError::NonNumericSpecifier {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn whole(value: Decimal, raw: &str) -> Result<i64, NameError> {
    let non_integer = || NameError::NonIntegerOrdinal {
        value: raw.to_string(),
    };
    if !value.fract().is_zero() {
        return Err(non_integer());
    }
    value.to_i64().ok_or_else(non_integer)
}
