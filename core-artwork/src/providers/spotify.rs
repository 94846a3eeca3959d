//! Spotify Web API Client
//!
//! ## API Endpoints
//!
//! - **Search**: `https://api.spotify.com/v1/search?type={album|artist|track}&limit=1&q={query}`
//!
//! ## Authentication
//!
//! Credentials are optional. After [`SpotifyClient::set_credentials`]
//! succeeds, searches carry `Authorization: Bearer <token>`; until then (or
//! after clearing them with empty strings) searches go out unauthenticated.
//!
//! ## Images
//!
//! Spotify returns images largest-first without size labels. Index 0 maps to
//! large, 1 to medium and 2 to small. Tracks have no images of their own, so
//! track lookups read `items[0].album.images`.

use super::{build_url, decode, unexpected_status, ProviderEndpoints, REQUEST_TIMEOUT};
use crate::artwork::{ArtworkResult, RawImageDescriptor, SizeTier, TierTable};
use crate::error::{ArtworkError, Result};
use crate::normalize::normalize;
use crate::provider::{ArtworkProvider, ArtworkSource, Capability};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_auth::{AuthState, ClientCredentialsConfig, TokenManager};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const TIERS: TierTable =
    TierTable::Positional(&[SizeTier::Large, SizeTier::Medium, SizeTier::Small]);

const CAPABILITIES: &[Capability] = &[
    Capability::AlbumCover,
    Capability::ArtistCover,
    Capability::TrackCover,
];

const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    #[serde(default)]
    url: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

type Images = Option<Vec<Option<SpotifyImage>>>;

/// A `null` image keeps its position but carries no URL, so the tiers of the
/// images after it do not shift.
fn descriptors(images: Images) -> Vec<RawImageDescriptor> {
    images
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, img)| match img {
            Some(img) => RawImageDescriptor::positioned(index, img.url.unwrap_or_default())
                .with_dimensions(img.width, img.height),
            None => RawImageDescriptor::positioned(index, ""),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct AlbumRef {
    images: Images,
}

/// Search hit; albums and artists carry `images`, tracks carry `album`.
#[derive(Debug, Deserialize)]
struct SearchItem {
    images: Images,
    album: Option<AlbumRef>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    #[serde(default)]
    items: Option<Vec<Option<SearchItem>>>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: Option<Paging>,
    artists: Option<Paging>,
    tracks: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetails {
    status: u16,
    #[serde(default)]
    message: Option<String>,
}

/// Spotify error response: `{"error": {"status": 401, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetails,
}

impl ErrorResponse {
    fn into_error(self) -> ArtworkError {
        let message = self.error.message.unwrap_or_default();
        if self.error.status == STATUS_UNAUTHORIZED {
            ArtworkError::Credential(message)
        } else {
            ArtworkError::ProviderReported(message)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SearchType {
    Album,
    Artist,
    Track,
}

impl SearchType {
    fn as_param(&self) -> &'static str {
        match self {
            SearchType::Album => "album",
            SearchType::Artist => "artist",
            SearchType::Track => "track",
        }
    }
}

/// Spotify Web API client
pub struct SpotifyClient {
    http_client: Arc<dyn HttpClient>,
    search_url: String,
    timeout: Duration,
    tokens: Arc<TokenManager>,
}

impl SpotifyClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(http_client, &ProviderEndpoints::default())
    }

    pub fn with_endpoints(http_client: Arc<dyn HttpClient>, endpoints: &ProviderEndpoints) -> Self {
        let token_config = ClientCredentialsConfig::default()
            .with_token_url(endpoints.spotify_token.clone())
            .with_timeout(REQUEST_TIMEOUT);

        Self {
            tokens: Arc::new(TokenManager::with_config(token_config, http_client.clone())),
            http_client,
            search_url: endpoints.spotify_search.clone(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Share an existing token manager, e.g. between several clients
    pub fn with_token_manager(mut self, tokens: Arc<TokenManager>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Timeout for search requests
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exchange client credentials for a bearer token right away.
    ///
    /// Empty strings clear the credentials and send nothing; later searches
    /// run unauthenticated.
    ///
    /// # Errors
    ///
    /// [`ArtworkError::Credential`] with the token endpoint's description
    /// when the exchange is rejected.
    pub async fn set_credentials(&self, client_id: &str, client_secret: &str) -> Result<()> {
        self.tokens
            .set_credentials(client_id, client_secret)
            .await
            .map_err(ArtworkError::from)
    }

    pub async fn auth_state(&self) -> AuthState {
        self.tokens.state().await
    }

    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    #[instrument(skip(self), fields(provider = "spotify"))]
    pub async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        let query = Self::album_query(album, artist, extra);
        let response = self.search(SearchType::Album, &query).await?;
        let item = first_item(response.albums)?;
        normalize(&descriptors(item.images), &TIERS)
    }

    #[instrument(skip(self), fields(provider = "spotify"))]
    pub async fn artist_cover(&self, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        let query = Self::artist_query(artist, extra);
        let response = self.search(SearchType::Artist, &query).await?;
        let item = first_item(response.artists)?;
        normalize(&descriptors(item.images), &TIERS)
    }

    /// Track artwork comes from the first hit's album.
    #[instrument(skip(self), fields(provider = "spotify"))]
    pub async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        let query = Self::track_query(track, artist, extra);
        let response = self.search(SearchType::Track, &query).await?;
        let album = first_item(response.tracks)?
            .album
            .ok_or(ArtworkError::NotFound)?;
        normalize(&descriptors(album.images), &TIERS)
    }

    /// `album:<album> artist:<artist> [artist:<extra>...]`
    fn album_query(album: &str, artist: &str, extra: &[&str]) -> String {
        let mut query = format!("album:{} artist:{}", album, artist);
        for name in extra {
            query.push_str(" artist:");
            query.push_str(name);
        }
        query
    }

    /// `<artist> [genre:<extra>...]`
    fn artist_query(artist: &str, extra: &[&str]) -> String {
        let mut query = artist.to_string();
        for genre in extra {
            query.push_str(" genre:");
            query.push_str(genre);
        }
        query
    }

    /// `track:<track> artist:<artist> [artist:<extra>...]`
    fn track_query(track: &str, artist: &str, extra: &[&str]) -> String {
        let mut query = format!("track:{} artist:{}", track, artist);
        for name in extra {
            query.push_str(" artist:");
            query.push_str(name);
        }
        query
    }

    async fn search(&self, search_type: SearchType, query: &str) -> Result<SearchResponse> {
        let url = build_url(
            &self.search_url,
            &[
                ("type", search_type.as_param()),
                ("limit", "1"),
                ("q", query),
            ],
        )?;

        let mut request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        match self.tokens.bearer_token().await {
            Some(token) => request = request.bearer_token(token),
            None => debug!("No Spotify token, searching unauthenticated"),
        }

        debug!(url = %request.url, "Querying Spotify search");

        let response = self.http_client.execute(request).await?;

        if let Ok(error) = serde_json::from_slice::<ErrorResponse>(&response.body) {
            warn!(
                status = error.error.status,
                message = ?error.error.message,
                "Spotify reported an error"
            );
            return Err(error.into_error());
        }

        if !response.is_success() {
            return Err(unexpected_status(ArtworkSource::Spotify, &response));
        }

        decode(ArtworkSource::Spotify, &response)
    }
}

/// First hit of a page. A `null` first item counts as no match.
fn first_item(paging: Option<Paging>) -> Result<SearchItem> {
    paging
        .and_then(|page| page.items)
        .and_then(|items| items.into_iter().next())
        .flatten()
        .ok_or(ArtworkError::NotFound)
}

#[async_trait]
impl ArtworkProvider for SpotifyClient {
    fn source(&self) -> ArtworkSource {
        ArtworkSource::Spotify
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        SpotifyClient::album_cover(self, album, artist, extra).await
    }

    async fn artist_cover(&self, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        SpotifyClient::artist_cover(self, artist, extra).await
    }

    async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        SpotifyClient::track_cover(self, track, artist, extra).await
    }
}
