//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`source`] - In-memory [`DescriptionSource`](crate::catalog::DescriptionSource)
//!   with call counters, optional latency and failure injection.
//! - [`resolver`] - In-memory [`EntityResolver`](crate::naming::EntityResolver).
//! - [`provider`] - Scripted [`NameProvider`](crate::naming::NameProvider) for
//!   memoization tests.

pub mod provider;
pub mod resolver;
pub mod source;
