//! GitHub App authentication.
//!
//! Provides RS256 App JWT minting from an App ID and private key.

pub mod token_manager;

pub use token_manager::{mint, mint_at, AppClaims, AppToken};
