use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Malformed `key=value|key=value` specifier text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecifierError {
    #[error("malformed specifier '{pair}' in '{text}': expected key=value")]
    MissingSeparator { text: String, pair: String },

    #[error("empty specifier key in '{text}'")]
    EmptyKey { text: String },

    #[error("duplicate specifier key '{key}' in '{text}'")]
    DuplicateKey { text: String, key: String },
}

/// Entity identifiers that do not have the `prefix:type:id` shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrnError {
    #[error("'{value}' has a wrong id format: expected prefix:type:id")]
    WrongFormat { value: String },

    #[error("'{value}' is not a valid id: '{id}' is not a number")]
    InvalidNumber { value: String, id: String },
}

/// Structural errors in a name template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unmatched '{{' at position {position} in template '{template}'")]
    UnmatchedOpen { template: String, position: usize },

    #[error("unmatched '}}' at position {position} in template '{template}'")]
    UnmatchedClose { template: String, position: usize },

    #[error("malformed expression '{{{expression}}}' at position {position} in template '{template}'")]
    MalformedExpression {
        template: String,
        expression: String,
        position: usize,
    },
}

/// Why a cross-entity placeholder or URN outcome id could not be named.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationCause {
    #[error(transparent)]
    InvalidId(#[from] UrnError),

    #[error("'{urn}' is not a valid player or competitor id (expected sr:player:<id> or sr:competitor:<id>)")]
    UnsupportedEntity { urn: String },
}

/// Errors raised while evaluating a parsed name template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("specifier '{key}' required by the name template is missing")]
    MissingSpecifier { key: String },

    #[error("specifier '{key}' has non-numeric value '{value}'")]
    NonNumericSpecifier { key: String, value: String },

    #[error("cannot render '{value}' as an ordinal: not a whole number")]
    NonIntegerOrdinal { value: String },

    #[error("specifier '{key}' value '{value}' overflows when applying '{operation}'")]
    ArithmeticOverflow {
        key: String,
        value: String,
        operation: String,
    },

    #[error("failed to generate name for '{id}': {cause}")]
    Generation {
        id: String,
        #[source]
        cause: GenerationCause,
    },

    #[error("no name available for {subject} in culture '{culture}'")]
    Unavailable { subject: String, culture: String },

    #[error("profile lookup for {subject} failed: {message}")]
    Profile { subject: String, message: String },
}

/// Errors from building or applying valid-for mapping validators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("invalid valid-for expression '{text}': {reason}")]
    InvalidExpression { text: String, reason: String },

    #[error("specifier '{key}' required by valid-for '{expression}' is missing")]
    MissingSpecifier { key: String, expression: String },

    #[error("specifier '{key}' value '{value}' is not a decimal number")]
    NonNumericSpecifier { key: String, value: String },
}

/// Errors from the market description catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("no description for market {market_id} (variant: {variant:?})")]
    NotFound {
        market_id: u32,
        variant: Option<String>,
    },

    #[error("description of market {market_id} has no data for culture '{culture}' after fetch")]
    CultureMissing { market_id: u32, culture: String },

    #[error("description source failed: {message}")]
    Source { message: String },

    #[error("no culture requested for market {market_id}")]
    NoCultures { market_id: u32 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Specifier(#[from] SpecifierError),

    #[error(transparent)]
    Urn(#[from] UrnError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
