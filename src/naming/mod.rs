//! Name template language.
//!
//! Market and outcome names are templates with `{...}` placeholders that are
//! filled from the market's specifiers and from the sport event's entities:
//!
//! | placeholder        | renders                                        |
//! |--------------------|------------------------------------------------|
//! | `{key}`            | specifier value                                |
//! | `{!key}`           | specifier as an ordinal (`3rd`)                |
//! | `{+key}`, `{-key}` | value (or negated value) with explicit sign    |
//! | `{(key+1)}`        | specifier plus or minus an integer             |
//! | `{!(key+1)}`       | the same, as an ordinal                        |
//! | `{$competitorN}`   | N-th competitor of the event                   |
//! | `{$event}`         | event name                                     |
//! | `{%key}`           | player or competitor URN(s) in specifier `key` |
//!
//! Templates are compiled once ([`TemplateRegistry`]) and evaluated per
//! market instance and culture ([`evaluate`]).

mod ast;
mod evaluator;
mod format;
mod parser;
mod provider;
mod registry;

pub use ast::{ArithmeticOp, CompetitorSelector, NameAst, OperandExpr, Segment};
pub use evaluator::{evaluate, resolve_entity_list, EntityResolver};
pub use format::{ordinal, signed};
pub use parser::parse;
pub use provider::{CatalogNameProvider, MappingProvider, NameProvider, NamingContext};
pub use registry::TemplateRegistry;
