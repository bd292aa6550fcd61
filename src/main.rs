use anyhow::Context;
use clap::Parser;
use oddsfeed::cli::{render, valid_for, Cli, Commands};
use oddsfeed::config::Config;
use tracing::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    config.init_logging();
    debug!(command = ?cli.command, "oddsfeed starting");

    match cli.command {
        Commands::Render(args) => {
            let name = render::execute(args).await?;
            println!("{name}");
        }
        Commands::ValidFor(args) => {
            let accepted = valid_for::execute(&args)?;
            println!("{}", if accepted { "accepted" } else { "rejected" });
        }
    }

    Ok(())
}
