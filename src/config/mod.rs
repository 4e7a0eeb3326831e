use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{MintError, Result};

/// Environment variable holding the GitHub App identifier
pub const APP_ID_ENV: &str = "GH_APP_ID";

/// Environment variable holding the PEM-encoded private key
pub const PRIVATE_KEY_ENV: &str = "GH_APP_PRIVATE_KEY";

/// Environment variable holding a path to the PEM-encoded private key
pub const PRIVATE_KEY_PATH_ENV: &str = "GH_APP_PRIVATE_KEY_PATH";

/// Environment variable overriding the token lifetime in seconds
pub const LIFETIME_ENV: &str = "GH_APP_JWT_LIFETIME";

/// Longest token lifetime GitHub accepts for an App JWT (10 minutes)
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 600;

/// App identifier and signing key for one invocation
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub private_key: String,
}

// Keep the key out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Validated minting configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Seconds between `iat` and `exp`
    pub lifetime_secs: i64,
}

/// Raw, unvalidated inputs as collected from flags and the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigInput {
    pub app_id: Option<String>,
    pub private_key: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub lifetime_secs: Option<i64>,
}

impl Config {
    /// Build a config with the default lifetime.
    pub fn new(app_id: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                app_id: app_id.into(),
                private_key: private_key.into(),
            },
            lifetime_secs: MAX_TOKEN_LIFETIME_SECS,
        }
    }

    /// Validate raw inputs into a usable configuration.
    ///
    /// The app id is trimmed of surrounding whitespace, so a value pasted with a
    /// trailing newline still becomes the exact `iss` GitHub expects.
    /// An inline key takes precedence over a key file. Non-PEM key material is
    /// rejected here; whether the PEM holds a usable RSA key is left to the
    /// signer.
    pub fn resolve(input: ConfigInput) -> Result<Self> {
        let app_id = input
            .app_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                MintError::configuration(format!("{} is not set or is empty", APP_ID_ENV))
            })?
            .to_string();

        let raw_key = match (input.private_key, input.private_key_path) {
            (Some(key), _) if !key.trim().is_empty() => key,
            (_, Some(path)) => read_key_file(&path)?,
            _ => {
                return Err(MintError::configuration(format!(
                    "{} is not set or is empty (alternatively set {})",
                    PRIVATE_KEY_ENV, PRIVATE_KEY_PATH_ENV
                )))
            }
        };

        let private_key = normalize_pem(&raw_key);
        if private_key.is_empty() {
            return Err(MintError::configuration("private key is empty"));
        }

        let parsed = pem::parse(&private_key).map_err(|e| {
            MintError::configuration(format!("private key is not PEM-encoded: {}", e))
        })?;
        debug!(tag = parsed.tag(), "Parsed private key PEM envelope");

        let lifetime_secs = input.lifetime_secs.unwrap_or(MAX_TOKEN_LIFETIME_SECS);
        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&lifetime_secs) {
            return Err(MintError::configuration(format!(
                "token lifetime must be between 1 and {} seconds, got {}",
                MAX_TOKEN_LIFETIME_SECS, lifetime_secs
            )));
        }

        Ok(Self {
            credentials: Credentials {
                app_id,
                private_key,
            },
            lifetime_secs,
        })
    }
}

fn read_key_file(path: &Path) -> Result<String> {
    info!("Loading private key from {}", path.display());
    std::fs::read_to_string(path).map_err(|e| {
        MintError::configuration(format!(
            "failed to read private key file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Undo the `\n` escaping that CI secret stores often apply to multi-line
/// values. Keys that already contain real newlines are left untouched.
pub(crate) fn normalize_pem(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains('\n') && trimmed.contains("\\n") {
        trimmed.replace("\\n", "\n")
    } else {
        trimmed.to_string()
    }
}
