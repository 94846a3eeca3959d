//! # Coverart
//!
//! Cover artwork lookup across the iTunes Search API, Last.fm and Spotify.
//!
//! Every provider answers with the same [`ArtworkResult`]: six optional size
//! tiers plus a `default` URL that is always populated on success.
//!
//! ## Quick start
//!
//! ```ignore
//! let itunes = coverart::itunes();
//! let artwork = itunes.album_cover("Halcyon Days", "Ellie Goulding", &[]).await?;
//! println!("{}", artwork.default);
//! ```
//!
//! ## Workspace crates
//!
//! - `bridge-traits` - the `HttpClient` seam
//! - `bridge-desktop` - reqwest implementation (feature `desktop-shims`)
//! - `core-runtime` - logging and configuration
//! - `core-auth` - client-credentials token manager
//! - `core-artwork` - normalizer, provider clients and fallback service

pub use bridge_traits::{BridgeError, HttpClient, HttpRequest, HttpResponse};
pub use core_artwork::{
    ArtworkError, ArtworkProvider, ArtworkResult, ArtworkService, ArtworkSource, Capability,
    ITunesClient, LastFmClient, LastFmSettings, ProviderEndpoints, Result, SizeTier,
    SpotifyClient,
};
pub use core_auth::AuthState;
pub use core_runtime::config::{ArtworkConfig, ArtworkConfigBuilder, SpotifyCredentials};
pub use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

use std::sync::Arc;
use tracing::{debug, info};

#[cfg(feature = "desktop-shims")]
fn default_http_client() -> Arc<dyn HttpClient> {
    Arc::new(bridge_desktop::ReqwestHttpClient::new())
}

/// iTunes client over the default desktop HTTP client.
#[cfg(feature = "desktop-shims")]
pub fn itunes() -> ITunesClient {
    ITunesClient::new(default_http_client())
}

/// Last.fm client over the default desktop HTTP client.
///
/// # Errors
///
/// [`ArtworkError::Credential`] when `api_key` is empty.
#[cfg(feature = "desktop-shims")]
pub fn lastfm(api_key: &str) -> Result<LastFmClient> {
    lastfm_with(default_http_client(), api_key)
}

/// Unauthenticated Spotify client over the default desktop HTTP client.
/// Call [`SpotifyClient::set_credentials`] to attach a bearer token.
#[cfg(feature = "desktop-shims")]
pub fn spotify() -> SpotifyClient {
    SpotifyClient::new(default_http_client())
}

fn lastfm_with(http_client: Arc<dyn HttpClient>, api_key: &str) -> Result<LastFmClient> {
    if api_key.is_empty() {
        return Err(ArtworkError::Credential(
            "Last.fm API key must not be empty".to_string(),
        ));
    }
    Ok(LastFmClient::with_api_key(http_client, api_key))
}

/// Build a fallback service from a resolved configuration.
///
/// Providers are tried in the order iTunes, Last.fm, Spotify. Last.fm is only
/// registered when a key is configured. Spotify is always registered and
/// exchanges its credentials up front when a complete pair is present.
///
/// # Errors
///
/// [`ArtworkError::Credential`] when the Spotify token exchange is rejected.
pub async fn service_from_config(config: &ArtworkConfig) -> Result<ArtworkService> {
    service_with_endpoints(config, &ProviderEndpoints::default()).await
}

/// [`service_from_config`] against custom provider endpoints.
pub async fn service_with_endpoints(
    config: &ArtworkConfig,
    endpoints: &ProviderEndpoints,
) -> Result<ArtworkService> {
    let http = config.http_client.clone();
    let timeout = config.request_timeout;

    let mut service = ArtworkService::new();
    service.add_provider(Arc::new(
        ITunesClient::with_endpoints(http.clone(), endpoints).with_timeout(timeout),
    ));

    match config.lastfm_api_key.as_deref() {
        Some(key) if !key.is_empty() => {
            let lastfm = LastFmClient::with_endpoints(http.clone(), endpoints)
                .with_settings(LastFmSettings {
                    api_key: Some(key.to_string()),
                    autocorrect: config.lastfm_autocorrect,
                })
                .with_timeout(timeout);
            service.add_provider(Arc::new(lastfm));
        }
        _ => debug!("No Last.fm API key, skipping provider"),
    }

    let spotify = SpotifyClient::with_endpoints(http, endpoints).with_timeout(timeout);
    if let Some(credentials) = config.spotify_credentials.as_ref().filter(|c| c.is_complete()) {
        spotify
            .set_credentials(&credentials.client_id, &credentials.client_secret)
            .await?;
    }
    service.add_provider(Arc::new(spotify));

    info!(
        providers = service.providers().len(),
        "Artwork service ready"
    );
    Ok(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use std::sync::Mutex;

    /// Records request URLs and answers with a Spotify token.
    #[derive(Default)]
    struct RecordingHttp {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpClient for RecordingHttp {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.urls.lock().unwrap().push(request.url);
            Ok(HttpResponse::new(
                200,
                r#"{"access_token":"t","token_type":"Bearer","expires_in":3600}"#,
            ))
        }
    }

    fn config(http: Arc<RecordingHttp>) -> ArtworkConfigBuilder {
        ArtworkConfig::builder().http_client(http)
    }

    #[test]
    fn test_lastfm_requires_key() {
        let http: Arc<dyn HttpClient> = Arc::new(RecordingHttp::default());

        assert!(lastfm_with(http.clone(), "").unwrap_err().is_credential());
        assert!(lastfm_with(http, "abc").is_ok());
    }

    #[tokio::test]
    async fn test_service_without_credentials() {
        let http = Arc::new(RecordingHttp::default());
        let config = config(http.clone()).build().unwrap();

        let service = service_from_config(&config).await.unwrap();
        let sources: Vec<_> = service.providers().iter().map(|p| p.source()).collect();

        assert_eq!(sources, vec![ArtworkSource::ITunes, ArtworkSource::Spotify]);
        assert!(http.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_service_with_all_providers() {
        let http = Arc::new(RecordingHttp::default());
        let config = config(http.clone())
            .lastfm_api_key("key")
            .spotify_credentials("id", "secret")
            .build()
            .unwrap();

        let service = service_from_config(&config).await.unwrap();
        let sources: Vec<_> = service.providers().iter().map(|p| p.source()).collect();

        assert_eq!(
            sources,
            vec![
                ArtworkSource::ITunes,
                ArtworkSource::LastFm,
                ArtworkSource::Spotify
            ]
        );

        let urls = http.urls.lock().unwrap();
        assert_eq!(urls.as_slice(), [core_auth::SPOTIFY_TOKEN_URL]);
    }
}
