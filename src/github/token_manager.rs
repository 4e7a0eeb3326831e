//! App JWT minting for GitHub App authentication.
//!
//! GitHub authenticates an App (as opposed to one of its installations) with
//! a short-lived JWT signed by the App's private key. The token is later
//! exchanged for installation access tokens by whoever consumes it.

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{MintError, Result};

/// JWT claims for GitHub App authentication.
/// GitHub requires: iat (issued at), exp (expiration), iss (issuer = app_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer - the GitHub App ID
    pub iss: String,
}

impl AppClaims {
    pub fn new(app_id: impl Into<String>, issued_at: i64, lifetime_secs: i64) -> Self {
        Self {
            iat: issued_at,
            exp: issued_at + lifetime_secs,
            iss: app_id.into(),
        }
    }
}

/// A signed compact JWS (`header.payload.signature`)
#[derive(Clone, PartialEq, Eq)]
pub struct AppToken(String);

impl AppToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AppToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppToken(<redacted>)")
    }
}

/// Mint an App JWT issued at the current wall-clock time.
pub fn mint(config: &Config) -> Result<AppToken> {
    mint_at(config, Utc::now().timestamp())
}

/// Mint an App JWT issued at `now` (Unix seconds).
///
/// The JWT is signed with RS256 (RSA-SHA256) and expires
/// `config.lifetime_secs` after `now`.
pub fn mint_at(config: &Config, now: i64) -> Result<AppToken> {
    let claims = AppClaims::new(config.credentials.app_id.as_str(), now, config.lifetime_secs);
    let token = sign(&claims, &config.credentials.private_key)?;

    info!(
        app_id = %claims.iss,
        iat = claims.iat,
        exp = claims.exp,
        "Minted GitHub App JWT"
    );

    Ok(token)
}

/// Sign `claims` with the RSA private key in `private_key_pem`.
///
/// PKCS#1 (`RSA PRIVATE KEY`) and PKCS#8 (`PRIVATE KEY`) encodings are
/// accepted. RSASSA-PKCS1-v1_5 is deterministic, so identical claims and key
/// always produce an identical token.
pub(crate) fn sign(claims: &AppClaims, private_key_pem: &str) -> Result<AppToken> {
    let header = Header::new(Algorithm::RS256);

    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| MintError::signing(format!("not a usable RSA private key: {}", e)))?;

    debug!("Signing claims with RS256");
    let token = encode(&header, claims, &encoding_key)
        .map_err(|e| MintError::signing(format!("failed to encode JWT: {}", e)))?;

    Ok(AppToken(token))
}
