//! Command-line interface for gh-app-jwt.
//!
//! Every input can be given as a flag or through its environment variable,
//! so CI pipelines can rely on secrets alone.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{Config, ConfigInput};
use crate::error::Result;
use crate::github::{self, AppToken};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "gh-app-jwt")]
#[command(author, version, about = "Mint a short-lived GitHub App JWT", long_about = None)]
pub struct Cli {
    /// GitHub App ID
    #[arg(long, env = "GH_APP_ID")]
    pub app_id: Option<String>,

    /// PEM-encoded RSA private key of the App
    #[arg(long, env = "GH_APP_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Path to the PEM-encoded RSA private key (used when no inline key is given)
    #[arg(long, env = "GH_APP_PRIVATE_KEY_PATH")]
    pub private_key_path: Option<PathBuf>,

    /// Token lifetime in seconds (at most 600)
    #[arg(long, env = "GH_APP_JWT_LIFETIME")]
    pub lifetime: Option<i64>,

    /// Override log level (diagnostics go to stderr)
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn config_input(&self) -> ConfigInput {
        ConfigInput {
            app_id: self.app_id.clone(),
            private_key: self.private_key.clone(),
            private_key_path: self.private_key_path.clone(),
            lifetime_secs: self.lifetime,
        }
    }
}

/// Resolve configuration, mint a token and write the `jwt=` line to `out`.
///
/// Nothing is written unless minting succeeds.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let config = Config::resolve(cli.config_input())?;
    let token = github::mint(&config)?;
    emit(out, &token)
}

/// Write `jwt=<token>` followed by a newline.
pub fn emit(out: &mut impl Write, token: &AppToken) -> Result<()> {
    writeln!(out, "jwt={}", token.as_str())?;
    out.flush()?;
    Ok(())
}
