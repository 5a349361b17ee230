//! User model and the authentication exchange.

use serde::{Deserialize, Serialize};

use super::Level;

/// A mini-app user, keyed by their Telegram id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub places_count: i64,
    pub level: Level,
}

/// Request body for POST /auth.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthRequest {
    pub telegram_id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl AuthRequest {
    /// Name stored for the user; anonymous users get a synthetic handle.
    pub fn stored_username(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("user_{}", self.telegram_id),
        }
    }
}

/// Response body for POST /auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_username_keeps_given_name() {
        let request = AuthRequest {
            telegram_id: 7,
            username: Some("alice".to_string()),
        };
        assert_eq!(request.stored_username(), "alice");
    }

    #[test]
    fn test_stored_username_falls_back_for_missing_or_empty() {
        let missing = AuthRequest {
            telegram_id: 7,
            username: None,
        };
        let empty = AuthRequest {
            telegram_id: 7,
            username: Some(String::new()),
        };
        assert_eq!(missing.stored_username(), "user_7");
        assert_eq!(empty.stored_username(), "user_7");
    }
}
