use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token obtained from a client-credentials exchange.
///
/// The `Debug` implementation never prints the token value.
///
/// # Examples
///
/// ```
/// use core_auth::AccessToken;
///
/// let token = AccessToken::new("BQDx...".to_string(), "Bearer".to_string(), 3600);
/// assert!(!token.is_expired());
/// assert!(!format!("{:?}", token).contains("BQDx"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Token value sent as `Authorization: Bearer <value>`
    pub value: String,
    /// Token type reported by the endpoint (normally `Bearer`)
    pub token_type: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token that expires `expires_in` seconds from now.
    ///
    /// An `expires_in` outside chrono's range saturates to the earliest or
    /// latest representable instant.
    pub fn new(value: String, token_type: String, expires_in: i64) -> Self {
        let expires_at = expiry_after(expires_in).unwrap_or(if expires_in < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        Self {
            value,
            token_type,
            expires_at,
        }
    }

    /// Like [`new`](Self::new), but `None` when `expires_in` cannot be
    /// represented as an instant.
    pub fn try_new(value: String, token_type: String, expires_in: i64) -> Option<Self> {
        expiry_after(expires_in).map(|expires_at| Self {
            value,
            token_type,
            expires_at,
        })
    }

    /// Whether the recorded expiry has passed.
    ///
    /// Informational only: nothing in this crate refreshes a token.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time remaining until expiry, `None` once expired
    pub fn time_until_expiry(&self) -> Option<Duration> {
        let now = Utc::now();
        if now >= self.expires_at {
            None
        } else {
            Some(self.expires_at - now)
        }
    }
}

fn expiry_after(expires_in: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(expires_in).and_then(|delta| Utc::now().checked_add_signed(delta))
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Lifecycle of the credential state held by a [`TokenManager`](crate::TokenManager).
///
/// # State Transitions
///
/// ```text
/// Unconfigured -> TokenRequested -> Authenticated
///                              \--> CredentialError
/// ```
///
/// Any state returns to `TokenRequested` (or `Unconfigured` for empty
/// credentials) on the next `set_credentials` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthState {
    /// No credentials configured
    #[default]
    Unconfigured,
    /// Token exchange in flight
    TokenRequested,
    /// A bearer token is available
    Authenticated,
    /// The last exchange failed; terminal until reconfigured
    CredentialError(String),
}

impl AuthState {
    /// Check if a bearer token is available
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    /// Check if a token exchange is in progress
    pub fn is_in_progress(&self) -> bool {
        matches!(self, AuthState::TokenRequested)
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Unconfigured => write!(f, "Unconfigured"),
            AuthState::TokenRequested => write!(f, "Requesting Token..."),
            AuthState::Authenticated => write!(f, "Authenticated"),
            AuthState::CredentialError(reason) => write!(f, "Credential Error: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_expiry() {
        let token = AccessToken::new("t".to_string(), "Bearer".to_string(), 3600);
        assert!(!token.is_expired());
        assert!(token.time_until_expiry().is_some());

        let expired = AccessToken::new("t".to_string(), "Bearer".to_string(), -10);
        assert!(expired.is_expired());
        assert!(expired.time_until_expiry().is_none());
    }

    #[test]
    fn test_access_token_extreme_expiry() {
        assert!(AccessToken::try_new("t".to_string(), "Bearer".to_string(), i64::MAX).is_none());
        assert!(AccessToken::try_new("t".to_string(), "Bearer".to_string(), i64::MIN).is_none());

        let far = AccessToken::new("t".to_string(), "Bearer".to_string(), i64::MAX);
        assert_eq!(far.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!far.is_expired());

        let past = AccessToken::new("t".to_string(), "Bearer".to_string(), i64::MIN);
        assert!(past.is_expired());
    }

    #[test]
    fn test_access_token_debug_redacts_value() {
        let token = AccessToken::new("very-secret".to_string(), "Bearer".to_string(), 60);
        let debug = format!("{:?}", token);

        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("Bearer"));
    }

    #[test]
    fn test_auth_state_predicates() {
        assert!(!AuthState::Unconfigured.is_authenticated());
        assert!(!AuthState::TokenRequested.is_authenticated());
        assert!(AuthState::Authenticated.is_authenticated());
        assert!(!AuthState::CredentialError("x".into()).is_authenticated());

        assert!(AuthState::TokenRequested.is_in_progress());
        assert!(!AuthState::Authenticated.is_in_progress());
    }

    #[test]
    fn test_auth_state_default_and_display() {
        assert_eq!(AuthState::default(), AuthState::Unconfigured);
        assert_eq!(AuthState::Authenticated.to_string(), "Authenticated");
        assert_eq!(
            AuthState::CredentialError("Invalid client".into()).to_string(),
            "Credential Error: Invalid client"
        );
    }
}
