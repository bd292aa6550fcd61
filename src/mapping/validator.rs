//! Valid-for expressions attached to vendor mappings.
//!
//! Syntax is specifier-like: `key~value` pairs joined with `|`. A value of
//! the form `*.5` / `*.25` constrains only the fractional part of a numeric
//! specifier; any other value must match the specifier text exactly. All
//! pairs must hold.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{parse_pairs, PairError, Specifiers};
use crate::error::MappingError;

#[derive(Debug, Clone)]
enum Predicate {
    Exact { key: String, value: String },
    Fraction { key: String, fraction: Decimal },
}

impl Predicate {
    fn build(key: String, value: String, text: &str) -> Result<Self, MappingError> {
        if value.is_empty() {
            return Err(MappingError::InvalidExpression {
                text: text.to_string(),
                reason: format!("no value for '{key}'"),
            });
        }

        match fraction_pattern(&value) {
            Some(digits) => {
                let fraction = Decimal::from_str(&format!("0.{digits}")).map_err(|e| {
                    MappingError::InvalidExpression {
                        text: text.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Predicate::Fraction { key, fraction })
            }
            None => Ok(Predicate::Exact { key, value }),
        }
    }

    fn key(&self) -> &str {
        match self {
            Predicate::Exact { key, .. } | Predicate::Fraction { key, .. } => key,
        }
    }

    fn accepts(&self, actual: &str) -> Result<bool, MappingError> {
        match self {
            Predicate::Exact { value, .. } => Ok(actual == value),
            Predicate::Fraction { key, fraction } => {
                let number = Decimal::from_str(actual)
                    .or_else(|_| Decimal::from_scientific(actual))
                    .map_err(|_| MappingError::NonNumericSpecifier {
                        key: key.clone(),
                        value: actual.to_string(),
                    })?;
                Ok(number - number.floor() == *fraction)
            }
        }
    }
}

/// `*.` followed by one or two digits; returns the digits.
fn fraction_pattern(value: &str) -> Option<&str> {
    let digits = value.strip_prefix("*.")?;
    let valid = matches!(digits.len(), 1 | 2) && digits.bytes().all(|b| b.is_ascii_digit());
    valid.then_some(digits)
}

#[derive(Debug, Clone)]
enum Validator {
    Single(Predicate),
    All(Vec<Predicate>),
}

/// A compiled valid-for expression.
///
/// Equality is defined on the source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValidatorExpression {
    source: String,
    validator: Validator,
}

impl ValidatorExpression {
    /// Compile a valid-for expression.
    pub fn build(text: &str) -> Result<Self, MappingError> {
        let pairs = parse_pairs(text, '~').map_err(|e| MappingError::InvalidExpression {
            text: text.to_string(),
            reason: match e {
                PairError::MissingSeparator(pair) => format!("'{pair}' is not key~value"),
                PairError::EmptyKey => "empty key".to_string(),
                PairError::DuplicateKey(key) => format!("duplicate key '{key}'"),
            },
        })?;

        let mut predicates = pairs
            .into_iter()
            .map(|(key, value)| Predicate::build(key, value, text))
            .collect::<Result<Vec<_>, _>>()?;

        let validator = match predicates.len() {
            0 => {
                return Err(MappingError::InvalidExpression {
                    text: text.to_string(),
                    reason: "expression is empty".to_string(),
                })
            }
            1 => Validator::Single(predicates.remove(0)),
            _ => Validator::All(predicates),
        };

        Ok(Self {
            source: text.to_string(),
            validator,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the live specifiers satisfy every predicate.
    ///
    /// A specifier the expression needs but the table lacks is an error,
    /// not a rejection.
    pub fn accepts(&self, specifiers: &Specifiers) -> Result<bool, MappingError> {
        match &self.validator {
            Validator::Single(p) => self.check(p, specifiers),
            Validator::All(predicates) => {
                for p in predicates {
                    if !self.check(p, specifiers)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    fn check(&self, predicate: &Predicate, specifiers: &Specifiers) -> Result<bool, MappingError> {
        let actual = specifiers
            .get(predicate.key())
            .ok_or_else(|| MappingError::MissingSpecifier {
                key: predicate.key().to_string(),
                expression: self.source.clone(),
            })?;
        predicate.accepts(actual)
    }
}

impl PartialEq for ValidatorExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for ValidatorExpression {}

impl fmt::Display for ValidatorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl FromStr for ValidatorExpression {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::build(s)
    }
}

impl TryFrom<String> for ValidatorExpression {
    type Error = MappingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::build(&value)
    }
}

impl From<ValidatorExpression> for String {
    fn from(v: ValidatorExpression) -> Self {
        v.source
    }
}
