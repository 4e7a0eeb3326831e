use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gh_app_jwt::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the jwt= line
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting gh-app-jwt v{}", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    cli::run(&cli, &mut stdout.lock())?;

    Ok(())
}
