//! Configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. The default cultures can be
//! overridden with `ODDSFEED_DEFAULT_CULTURES` (comma separated).

use std::path::Path;

use serde::Deserialize;

use crate::domain::Culture;
use crate::entity::ExceptionHandlingStrategy;
use crate::error::{ConfigError, Result};
use crate::mapping::DEFAULT_UNCONDITIONAL_PRODUCER;

mod logging;

pub use logging::LoggingConfig;

/// Environment variable overriding `naming.default_cultures`.
pub const DEFAULT_CULTURES_ENV: &str = "ODDSFEED_DEFAULT_CULTURES";

/// Name rendering settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Cultures fetched and rendered when a caller does not name any.
    pub default_cultures: Vec<Culture>,
    pub exception_handling: ExceptionHandlingStrategy,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            default_cultures: vec![Culture::from("en")],
            exception_handling: ExceptionHandlingStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Keep single-variant descriptions after fetching them.
    pub cache_single_variants: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_single_variants: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Producer whose mappings skip the `valid_for` check.
    pub unconditional_producer: u32,
    pub disable_producer_bypass: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            unconditional_producer: DEFAULT_UNCONDITIONAL_PRODUCER,
            disable_producer_bypass: false,
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.apply_cultures_override(std::env::var(DEFAULT_CULTURES_ENV).ok().as_deref());

        config.validate()?;

        Ok(config)
    }

    fn apply_cultures_override(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        let cultures: Vec<Culture> = value
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Culture::from)
            .collect();
        if !cultures.is_empty() {
            self.naming.default_cultures = cultures;
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.naming.default_cultures.is_empty() {
            return Err(ConfigError::MissingField {
                field: "naming.default_cultures",
            }
            .into());
        }
        if let Some(culture) = self
            .naming
            .default_cultures
            .iter()
            .find(|c| c.as_str().is_empty())
        {
            return Err(ConfigError::InvalidValue {
                field: "naming.default_cultures",
                reason: format!("empty culture code '{culture}'"),
            }
            .into());
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.format",
                    reason: format!("expected 'pretty' or 'json', got '{other}'"),
                }
                .into())
            }
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
