//! Parsed form of a name template.

/// Which competitor a competitor placeholder refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompetitorSelector {
    /// `{$competitorN}`: the N-th competitor of the sport event (1-based).
    Index(u32),
    /// `{%competitor}`: the competitor whose URN is the specifier value.
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
}

/// A single placeholder expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandExpr {
    /// `{key}`: the raw specifier value.
    SpecifierRef(String),
    /// `{!key}`: the specifier value as an English ordinal.
    OrdinalRef(String),
    /// `{+key}` / `{-key}`: the value (negated for `-`) with an explicit sign.
    SignedRef { key: String, negate: bool },
    /// `{(key+N)}` / `{(key-N)}`, optionally ordinalized as `{!(key+N)}`.
    Arithmetic {
        key: String,
        op: ArithmeticOp,
        literal: i64,
        ordinal: bool,
    },
    CompetitorRef(CompetitorSelector),
    /// `{%player}`: the player whose URN is the specifier value.
    PlayerRef(String),
    /// `{%key}` for any other key: the specifier value is one or more
    /// comma-separated player / competitor URNs.
    GroupRef(String),
    /// `{$event}`: the sport event name.
    EventRef,
}

/// A template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(OperandExpr),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAst {
    template: String,
    segments: Vec<Segment>,
}

impl NameAst {
    pub(crate) fn new(template: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            template: template.into(),
            segments,
        }
    }

    /// The template text this was parsed from.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the template renders without any lookup.
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| matches!(s, Segment::Literal(_)))
    }
}
