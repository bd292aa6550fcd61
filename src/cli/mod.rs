//! Command-line interface definitions.

pub mod render;
pub mod resolver;
pub mod valid_for;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Oddsfeed - render market names and check mapping validators.
#[derive(Parser, Debug)]
#[command(name = "oddsfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a name template against specifiers
    Render(RenderArgs),

    /// Evaluate a valid-for expression against specifiers
    ValidFor(ValidForArgs),
}

/// Arguments for the `render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Name template, e.g. "When will the {!runnr} run be scored"
    #[arg(short, long)]
    pub template: String,

    /// Specifiers as key=value pairs joined with '|'
    #[arg(short, long, default_value = "")]
    pub specifiers: String,

    /// Event competitor name, in position order (repeatable)
    #[arg(long = "competitor", value_name = "NAME")]
    pub competitors: Vec<String>,

    /// Player or competitor profile as URN=NAME (repeatable)
    #[arg(long = "player", alias = "entity", value_name = "URN=NAME", value_parser = parse_entity)]
    pub entities: Vec<(String, String)>,

    /// Sport event name
    #[arg(long)]
    pub event: Option<String>,

    /// Culture to render in
    #[arg(long, default_value = "en")]
    pub culture: String,
}

/// Arguments for the `valid-for` subcommand.
#[derive(Parser, Debug)]
pub struct ValidForArgs {
    /// Valid-for expression, e.g. "total~*.5"
    #[arg(short, long)]
    pub expr: String,

    /// Specifiers as key=value pairs joined with '|'
    #[arg(short, long)]
    pub specifiers: String,
}

fn parse_entity(value: &str) -> Result<(String, String), String> {
    let (urn, name) = value
        .split_once('=')
        .ok_or_else(|| format!("expected URN=NAME, got '{value}'"))?;
    if urn.trim().is_empty() || name.trim().is_empty() {
        return Err(format!("expected URN=NAME, got '{value}'"));
    }
    Ok((urn.trim().to_string(), name.trim().to_string()))
}
