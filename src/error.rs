//! Error types for token minting.

use thiserror::Error;

/// Errors that can occur while minting a GitHub App JWT
#[derive(Error, Debug)]
pub enum MintError {
    /// A required input is absent or malformed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The key could not be used for RS256 or the signing call failed
    #[error("signing error: {0}")]
    Signing(String),

    /// The token could not be written out
    #[error("failed to write token: {0}")]
    Output(#[from] std::io::Error),
}

impl MintError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_signing(&self) -> bool {
        matches!(self, Self::Signing(_))
    }
}

pub type Result<T, E = MintError> = std::result::Result<T, E>;
