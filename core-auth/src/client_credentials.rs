//! Client-credentials token exchange
//!
//! Exchanges an application id and secret for a bearer token:
//!
//! ```text
//! POST <token_url>
//! Authorization: Basic base64(client_id:client_secret)
//! Content-Type: application/x-www-form-urlencoded
//!
//! grant_type=client_credentials
//! ```
//!
//! ## Example
//!
//! ```no_run
//! # use core_auth::TokenManager;
//! # use std::sync::Arc;
//! # use bridge_traits::http::HttpClient;
//! # async fn example() -> core_auth::Result<()> {
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let manager = TokenManager::new(http_client);
//! manager.set_credentials("client-id", "client-secret").await?;
//!
//! if let Some(token) = manager.bearer_token().await {
//!     // attach `Authorization: Bearer {token}` to search requests
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessToken, AuthState};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Spotify accounts service token endpoint.
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Token endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentialsConfig {
    /// Token endpoint URL
    pub token_url: String,
    /// Timeout for the token request
    pub timeout: Duration,
}

impl Default for ClientCredentialsConfig {
    fn default() -> Self {
        Self {
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientCredentialsConfig {
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Default)]
struct CredentialState {
    client_id: String,
    client_secret: String,
    token: Option<AccessToken>,
    state: AuthState,
    // Bumped by every set_credentials call
    generation: u64,
}

/// Holds client credentials and the bearer token obtained for them.
///
/// All reads and writes go through one lock, so a request observes either the
/// old or the new credentials, never a mix. When `set_credentials` calls
/// overlap, the last call wins: a token response that arrives for a replaced
/// configuration is dropped and its caller receives [`AuthError::Superseded`].
pub struct TokenManager {
    config: ClientCredentialsConfig,
    http_client: Arc<dyn HttpClient>,
    inner: RwLock<CredentialState>,
}

impl TokenManager {
    /// Create a manager for the Spotify token endpoint
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_config(ClientCredentialsConfig::default(), http_client)
    }

    pub fn with_config(config: ClientCredentialsConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            config,
            http_client,
            inner: RwLock::new(CredentialState::default()),
        }
    }

    /// Store credentials and immediately exchange them for a token.
    ///
    /// An empty id or secret clears any stored credentials and token, returns
    /// the manager to [`AuthState::Unconfigured`] and sends nothing.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenRejected`] with the endpoint's error description
    /// - [`AuthError::Transport`], [`AuthError::UnexpectedStatus`] or
    ///   [`AuthError::MalformedResponse`] for transport level failures
    /// - [`AuthError::Superseded`] if another call replaced the credentials
    ///   while this exchange was in flight
    #[instrument(skip(self, client_secret))]
    pub async fn set_credentials(&self, client_id: &str, client_secret: &str) -> Result<()> {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            inner.token = None;

            if client_id.is_empty() || client_secret.is_empty() {
                inner.client_id.clear();
                inner.client_secret.clear();
                inner.state = AuthState::Unconfigured;
                debug!("Empty client credentials, token exchange skipped");
                return Ok(());
            }

            inner.client_id = client_id.to_string();
            inner.client_secret = client_secret.to_string();
            inner.state = AuthState::TokenRequested;
            inner.generation
        };

        let outcome = self.request_token(client_id, client_secret).await;

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            debug!(
                generation,
                current = inner.generation,
                "Discarding token response for replaced credentials"
            );
            return Err(AuthError::Superseded);
        }

        match outcome {
            Ok(token) => {
                info!(
                    token_type = %token.token_type,
                    expires_at = %token.expires_at,
                    "Client credentials accepted"
                );
                inner.token = Some(token);
                inner.state = AuthState::Authenticated;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Client credentials exchange failed");
                inner.token = None;
                inner.state = AuthState::CredentialError(e.to_string());
                Err(e)
            }
        }
    }

    /// The bearer token, available only in [`AuthState::Authenticated`].
    pub async fn bearer_token(&self) -> Option<String> {
        let inner = self.inner.read().await;
        match inner.state {
            AuthState::Authenticated => inner.token.as_ref().map(|t| t.value.clone()),
            _ => None,
        }
    }

    /// Current lifecycle state
    pub async fn state(&self) -> AuthState {
        self.inner.read().await.state.clone()
    }

    /// Copy of the stored token, including its recorded expiry
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.inner.read().await.token.clone()
    }

    /// Whether a complete id/secret pair is stored
    pub async fn has_credentials(&self) -> bool {
        let inner = self.inner.read().await;
        !inner.client_id.is_empty() && !inner.client_secret.is_empty()
    }

    async fn request_token(&self, client_id: &str, client_secret: &str) -> Result<AccessToken> {
        let basic = STANDARD.encode(format!("{}:{}", client_id, client_secret));

        let request = HttpRequest::post(self.config.token_url.clone())
            .header("Authorization", format!("Basic {}", basic))
            .form(&[("grant_type", "client_credentials")])?
            .timeout(self.config.timeout);

        debug!(token_url = %self.config.token_url, "Requesting client credentials token");

        let response = self.http_client.execute(request).await?;
        parse_token_response(&response)
    }
}

/// Successful token endpoint payload.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

/// Token endpoint error payload (`{"error": "...", "error_description": "..."}`).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenErrorResponse {
    fn into_reason(self) -> String {
        self.error_description
            .filter(|d| !d.is_empty())
            .unwrap_or(self.error)
    }
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_expires_in() -> i64 {
    3600
}

fn parse_token_response(response: &HttpResponse) -> Result<AccessToken> {
    // The error envelope takes precedence regardless of status
    if let Ok(envelope) = response.json::<TokenErrorResponse>() {
        return Err(AuthError::TokenRejected(envelope.into_reason()));
    }

    if !response.is_success() {
        return Err(AuthError::UnexpectedStatus {
            status: response.status,
        });
    }

    let token: TokenResponse = response
        .json()
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

    if token.access_token.is_empty() {
        return Err(AuthError::MalformedResponse(
            "token response carried no access_token".to_string(),
        ));
    }

    let expires_in = token.expires_in;
    AccessToken::try_new(token.access_token, token.token_type, expires_in).ok_or_else(|| {
        AuthError::MalformedResponse(format!("expires_in out of range: {}", expires_in))
    })
}
