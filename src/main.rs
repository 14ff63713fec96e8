//! Main entry point for the Translate Gateway CLI

#![forbid(unsafe_code)]

use clap::{CommandFactory, Parser};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use translate_gateway::cli::{self, commands::Commands};

/// Translate Gateway - self-hosted translation API
#[derive(Parser, Debug)]
#[command(name = "translate-gateway", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    let default_filter = format!(
        "{}={},tower_http={}",
        env!("CARGO_CRATE_NAME"),
        log_level,
        log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Commands::Serve {
            host,
            port,
            req_limit,
            trust_proxy,
            google_analytics,
            catalog,
        }) => {
            cli::commands::handle_serve(host, port, req_limit, trust_proxy, google_analytics, catalog)
                .await?;
        }
        Some(Commands::Languages { catalog }) => {
            cli::commands::handle_languages(catalog).await?;
        }
        Some(Commands::Translate {
            q,
            source,
            target,
            catalog,
        }) => {
            cli::commands::handle_translate(q, source, target, catalog).await?;
        }
        Some(Commands::Spec { yaml }) => {
            cli::commands::handle_spec(yaml).await?;
        }
        None => {
            Args::command().print_help()?;
        }
    }

    Ok(())
}
