//! # Artwork Configuration Module
//!
//! Builder-based configuration for the artwork providers.
//!
//! ## Overview
//!
//! [`ArtworkConfig`] carries the HTTP collaborator plus the per-provider
//! credentials and settings. The builder validates eagerly so a bad timeout or
//! a missing HTTP client fails at startup rather than on the first lookup.
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::ArtworkConfig;
//!
//! let config = ArtworkConfig::builder()
//!     .lastfm_api_key("your_lastfm_api_key")
//!     .spotify_credentials("client-id", "client-secret")
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ### Loading from the environment
//!
//! ```ignore
//! use core_runtime::config::ArtworkConfigBuilder;
//!
//! // LASTFM_APIKEY, SPOTIFY_CLIENTID, SPOTIFY_CLIENTSECRET
//! let config = ArtworkConfigBuilder::from_env().build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the Last.fm API key.
pub const ENV_LASTFM_API_KEY: &str = "LASTFM_APIKEY";
/// Environment variable holding the Spotify client id.
pub const ENV_SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENTID";
/// Environment variable holding the Spotify client secret.
pub const ENV_SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENTSECRET";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Default `User-Agent` sent by the desktop HTTP client.
pub const DEFAULT_USER_AGENT: &str = concat!("coverart/", env!("CARGO_PKG_VERSION"));

/// Client id and secret for the client-credentials exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Both halves are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl std::fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Resolved configuration for building artwork provider clients.
///
/// Use [`ArtworkConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct ArtworkConfig {
    /// HTTP collaborator shared by every provider client
    pub http_client: Arc<dyn HttpClient>,

    /// Last.fm API key; `None` disables the Last.fm provider
    pub lastfm_api_key: Option<String>,

    /// Ask Last.fm to correct misspelled names
    pub lastfm_autocorrect: bool,

    /// Spotify client credentials; `None` means unauthenticated searches
    pub spotify_credentials: Option<SpotifyCredentials>,

    /// Timeout applied to every provider request
    pub request_timeout: Duration,

    /// User agent for the default HTTP client
    pub user_agent: String,
}

impl std::fmt::Debug for ArtworkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtworkConfig")
            .field("http_client", &"HttpClient { ... }")
            .field(
                "lastfm_api_key",
                &self.lastfm_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("lastfm_autocorrect", &self.lastfm_autocorrect)
            .field("spotify_credentials", &self.spotify_credentials)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ArtworkConfig {
    /// Creates a new builder for constructing an `ArtworkConfig`.
    pub fn builder() -> ArtworkConfigBuilder {
        ArtworkConfigBuilder::default()
    }

    /// Checks if Last.fm is configured
    pub fn has_lastfm(&self) -> bool {
        self.lastfm_api_key.is_some()
    }

    /// Checks if a complete Spotify client id/secret pair is configured
    pub fn has_spotify_credentials(&self) -> bool {
        self.spotify_credentials
            .as_ref()
            .map(SpotifyCredentials::is_complete)
            .unwrap_or(false)
    }

    /// Validates the configuration
    ///
    /// This checks:
    /// - Request timeout is within 1..=300 seconds
    /// - User agent is not empty
    /// - A Last.fm key, when present, is not empty
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout < Duration::from_secs(1) {
            return Err(Error::Config(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(
                "Request timeout exceeds maximum of 300 seconds".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        if matches!(self.lastfm_api_key.as_deref(), Some("")) {
            return Err(Error::Config("Last.fm API key cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for provider lookups. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Other hosts: inject an HttpClient via ArtworkConfigBuilder::http_client."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration, user_agent: &str) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_settings(timeout, user_agent));
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(
    _timeout: Duration,
    _user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Builder for constructing [`ArtworkConfig`] instances.
///
/// Call [`build()`](ArtworkConfigBuilder::build) to validate and produce the
/// final config.
#[derive(Default)]
pub struct ArtworkConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    lastfm_api_key: Option<String>,
    lastfm_autocorrect: bool,
    spotify_credentials: Option<SpotifyCredentials>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ArtworkConfigBuilder {
    /// Seeds a builder from `LASTFM_APIKEY`, `SPOTIFY_CLIENTID` and
    /// `SPOTIFY_CLIENTSECRET`. Unset and empty variables are treated as absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(key) = non_empty(lookup(ENV_LASTFM_API_KEY)) {
            builder = builder.lastfm_api_key(key);
        }

        let id = non_empty(lookup(ENV_SPOTIFY_CLIENT_ID));
        let secret = non_empty(lookup(ENV_SPOTIFY_CLIENT_SECRET));
        if let (Some(id), Some(secret)) = (id, secret) {
            builder = builder.spotify_credentials(id, secret);
        }

        builder
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the Last.fm API key
    pub fn lastfm_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.lastfm_api_key = Some(api_key.into());
        self
    }

    /// Enables Last.fm spelling auto-correction
    pub fn lastfm_autocorrect(mut self, enabled: bool) -> Self {
        self.lastfm_autocorrect = enabled;
        self
    }

    /// Sets the Spotify client credentials
    pub fn spotify_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.spotify_credentials = Some(SpotifyCredentials::new(client_id, client_secret));
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the user agent used by the default HTTP client
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the [`ArtworkConfig`].
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if no HTTP client was injected and the
    ///   `desktop-shims` feature is disabled
    /// - [`Error::Config`] if validation fails
    pub fn build(self) -> Result<ArtworkConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        // Validate before touching the HTTP stack
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                if request_timeout < Duration::from_secs(1) || user_agent.trim().is_empty() {
                    return Err(Error::Config(
                        "Invalid timeout or user agent for default HttpClient".to_string(),
                    ));
                }
                provide_default_http_client(request_timeout, &user_agent)?
            }
        };

        let config = ArtworkConfig {
            http_client,
            lastfm_api_key: self.lastfm_api_key,
            lastfm_autocorrect: self.lastfm_autocorrect,
            spotify_credentials: self.spotify_credentials,
            request_timeout,
            user_agent,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{error::Result as BridgeResult, HttpRequest, HttpResponse};
    use std::collections::HashMap;

    struct NullHttpClient;

    #[async_trait]
    impl HttpClient for NullHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Ok(HttpResponse::new(204, ""))
        }
    }

    fn builder() -> ArtworkConfigBuilder {
        ArtworkConfig::builder().http_client(Arc::new(NullHttpClient))
    }

    #[test]
    fn test_builder_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(!config.lastfm_autocorrect);
        assert!(!config.has_lastfm());
        assert!(!config.has_spotify_credentials());
    }

    #[test]
    fn test_builder_with_all_fields() {
        let config = builder()
            .lastfm_api_key("key")
            .lastfm_autocorrect(true)
            .spotify_credentials("id", "secret")
            .request_timeout(Duration::from_secs(10))
            .user_agent("MyApp/1.0")
            .build()
            .unwrap();

        assert!(config.has_lastfm());
        assert!(config.lastfm_autocorrect);
        assert!(config.has_spotify_credentials());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, "MyApp/1.0");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let result = builder().request_timeout(Duration::ZERO).build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 1 second"));
    }

    #[test]
    fn test_validate_rejects_excessive_timeout() {
        let result = builder().request_timeout(Duration::from_secs(301)).build();

        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_validate_rejects_empty_user_agent() {
        let result = builder().user_agent("  ").build();

        assert!(result.unwrap_err().to_string().contains("User agent"));
    }

    #[test]
    fn test_validate_rejects_empty_lastfm_key() {
        let result = builder().lastfm_api_key("").build();

        assert!(result.unwrap_err().to_string().contains("Last.fm API key"));
    }

    #[test]
    fn test_partial_spotify_credentials_are_not_complete() {
        let config = builder().spotify_credentials("id", "").build().unwrap();

        assert!(!config.has_spotify_credentials());
    }

    #[test]
    fn test_from_lookup_reads_known_variables() {
        let vars: HashMap<&str, &str> = [
            (ENV_LASTFM_API_KEY, "lastfm-key"),
            (ENV_SPOTIFY_CLIENT_ID, "spotify-id"),
            (ENV_SPOTIFY_CLIENT_SECRET, "spotify-secret"),
        ]
        .into_iter()
        .collect();

        let config = ArtworkConfigBuilder::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .http_client(Arc::new(NullHttpClient))
            .build()
            .unwrap();

        assert_eq!(config.lastfm_api_key.as_deref(), Some("lastfm-key"));
        assert_eq!(
            config.spotify_credentials,
            Some(SpotifyCredentials::new("spotify-id", "spotify-secret"))
        );
    }

    #[test]
    fn test_from_lookup_treats_empty_as_absent() {
        let vars: HashMap<&str, &str> = [
            (ENV_LASTFM_API_KEY, ""),
            (ENV_SPOTIFY_CLIENT_ID, "spotify-id"),
        ]
        .into_iter()
        .collect();

        let config = ArtworkConfigBuilder::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
            .http_client(Arc::new(NullHttpClient))
            .build()
            .unwrap();

        assert!(!config.has_lastfm());
        assert!(config.spotify_credentials.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = builder()
            .lastfm_api_key("lastfm-key")
            .spotify_credentials("spotify-id", "spotify-secret")
            .build()
            .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("lastfm-key"));
        assert!(!debug.contains("spotify-secret"));
        assert!(debug.contains("spotify-id"));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_default_client() {
        let config = ArtworkConfig::builder().build();
        assert!(config.is_ok());
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_http_client() {
        let err = ArtworkConfig::builder().build().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("HttpClient"));
        assert!(msg.contains("desktop-shims"));
    }
}
