//! Oddsfeed - market and outcome naming for sports odds feeds.
//!
//! Feed messages identify markets by id and a set of specifiers
//! (`total=2.5|variant=sr:exact_goals:4+`). This crate turns them into
//! display names and vendor mappings.
//!
//! # Architecture
//!
//! - **`catalog`** - Tiered, culture-aware cache of market descriptions
//!   (invariant markets, variant lists and single variants) with
//!   de-duplicated fetches
//! - **`naming`** - Name template parser, evaluator and compiled-template
//!   registry
//! - **`mapping`** - Valid-for validators selecting vendor mappings
//! - **`entity`** - Market and outcome facades with name memoization and
//!   the throw / catch failure policy
//!
//! # Modules
//!
//! - [`cli`] - Command definitions and handlers of the `oddsfeed` binary
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Specifiers, URNs, cultures and market descriptions
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use oddsfeed::domain::Specifiers;
//! use oddsfeed::naming::TemplateRegistry;
//!
//! let specifiers = Specifiers::parse("inningnr=5|runnr=3").unwrap();
//! let ast = TemplateRegistry::global()
//!     .get_or_parse("When will the {!runnr} run be scored")
//!     .unwrap();
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod entity;
pub mod error;
pub mod mapping;
pub mod naming;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
