//! Provider Clients
//!
//! - iTunes Search API - no credentials, album and track lookups
//! - Last.fm - static API key, album, artist and track lookups
//! - Spotify Web API - optional client-credentials token, album, artist and
//!   track lookups
//!
//! Each client builds its query, issues one request through the
//! [`HttpClient`](bridge_traits::http::HttpClient) bridge, adapts the response
//! into descriptors and hands them to [`normalize`](crate::normalize::normalize).

pub mod itunes;
pub mod lastfm;
pub mod spotify;

pub use itunes::ITunesClient;
pub use lastfm::{LastFmClient, LastFmSettings};
pub use spotify::SpotifyClient;

use crate::error::{ArtworkError, Result};
use crate::provider::ArtworkSource;
use bridge_traits::http::HttpResponse;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";
pub const LASTFM_API_URL: &str = "http://ws.audioscrobbler.com/2.0/";
pub const SPOTIFY_SEARCH_URL: &str = "https://api.spotify.com/v1/search";

/// Default timeout for provider requests
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs for every provider endpoint.
///
/// Overridable so tests and proxies can point clients elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub itunes_search: String,
    pub lastfm_api: String,
    pub spotify_search: String,
    pub spotify_token: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            itunes_search: ITUNES_SEARCH_URL.to_string(),
            lastfm_api: LASTFM_API_URL.to_string(),
            spotify_search: SPOTIFY_SEARCH_URL.to_string(),
            spotify_token: core_auth::SPOTIFY_TOKEN_URL.to_string(),
        }
    }
}

/// Append `params` to `base` as an encoded query string.
fn build_url(base: &str, params: &[(&str, &str)]) -> Result<String> {
    Url::parse_with_params(base, params)
        .map(String::from)
        .map_err(|e| ArtworkError::Transport(format!("Invalid endpoint URL '{}': {}", base, e)))
}

/// Decode a JSON body, treating failure as a transport problem.
fn decode<T: DeserializeOwned>(source: ArtworkSource, response: &HttpResponse) -> Result<T> {
    response
        .json()
        .map_err(|e| ArtworkError::Transport(format!("Malformed {} response: {}", source, e)))
}

fn unexpected_status(source: ArtworkSource, response: &HttpResponse) -> ArtworkError {
    ArtworkError::Transport(format!(
        "{} returned HTTP {}",
        source, response.status
    ))
}
