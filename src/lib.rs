pub mod cli;
pub mod config;
pub mod error;
pub mod github;

pub use config::{Config, ConfigInput, Credentials, MAX_TOKEN_LIFETIME_SECS};
pub use error::MintError;
pub use github::{mint, mint_at, AppClaims, AppToken};
