//! Session token derivation.
//!
//! Tokens are a truncated SHA-256 over the Telegram identity and the server secret.
//! They never expire and are not checked by any endpoint.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest.
pub const TOKEN_LEN: usize = 32;

/// Derive the token for a Telegram user. Missing or empty names hash as `anon`.
pub fn generate_token(telegram_id: i64, username: Option<&str>, secret: &str) -> String {
    let name = username.filter(|name| !name.is_empty()).unwrap_or("anon");
    let data = format!("{}:{}:{}", telegram_id, name, secret);

    let mut token = hex::encode(Sha256::digest(data.as_bytes()));
    token.truncate(TOKEN_LEN);
    token
}

/// Token generator bound to the configured secret.
#[derive(Clone)]
pub struct TokenGenerator {
    secret: String,
}

impl TokenGenerator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn generate(&self, telegram_id: i64, username: Option<&str>) -> String {
        generate_token(telegram_id, username, &self.secret)
    }
}

impl std::fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("secret", &"<redacted>")
            .finish()
    }
}
