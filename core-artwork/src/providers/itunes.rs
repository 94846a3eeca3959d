//! iTunes Search API Client
//!
//! ## API Endpoints
//!
//! - **Search**: `https://itunes.apple.com/search?media=music&entity={album|musicTrack}&limit=1&term={terms}`
//!
//! No credentials are needed. The first result carries flat
//! `artworkUrl30`/`artworkUrl60`/`artworkUrl100` fields, mapped to the tiny,
//! small and medium tiers. The Search API has no artist artwork, so
//! `artist_cover` is unsupported.

use super::{build_url, decode, unexpected_status, ProviderEndpoints, REQUEST_TIMEOUT};
use crate::artwork::{ArtworkResult, RawImageDescriptor, SizeTier, TierTable};
use crate::error::{ArtworkError, Result};
use crate::normalize::normalize;
use crate::provider::{ArtworkProvider, ArtworkSource, Capability};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const TIERS: TierTable = TierTable::Labels(&[
    ("artworkUrl30", SizeTier::Tiny),
    ("artworkUrl60", SizeTier::Small),
    ("artworkUrl100", SizeTier::Medium),
]);

const CAPABILITIES: &[Capability] = &[Capability::AlbumCover, Capability::TrackCover];

/// iTunes search result (only the artwork fields are read)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResult {
    #[serde(default)]
    artwork_url30: Option<String>,
    #[serde(default)]
    artwork_url60: Option<String>,
    #[serde(default)]
    artwork_url100: Option<String>,
}

impl SearchResult {
    fn descriptors(self) -> Vec<RawImageDescriptor> {
        [
            ("artworkUrl30", self.artwork_url30),
            ("artworkUrl60", self.artwork_url60),
            ("artworkUrl100", self.artwork_url100),
        ]
        .into_iter()
        .filter_map(|(field, url)| url.map(|url| RawImageDescriptor::labeled(field, url)))
        .collect()
    }
}

/// iTunes search envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    result_count: u32,
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// iTunes answers malformed queries with `{"errorMessage": "..."}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error_message: String,
}

#[derive(Debug, Clone, Copy)]
enum Entity {
    Album,
    Track,
}

impl Entity {
    fn as_param(&self) -> &'static str {
        match self {
            Entity::Album => "album",
            Entity::Track => "musicTrack",
        }
    }
}

/// iTunes Search API client
#[derive(Clone)]
pub struct ITunesClient {
    http_client: Arc<dyn HttpClient>,
    search_url: String,
    timeout: Duration,
}

impl ITunesClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(http_client, &ProviderEndpoints::default())
    }

    pub fn with_endpoints(http_client: Arc<dyn HttpClient>, endpoints: &ProviderEndpoints) -> Self {
        Self {
            http_client,
            search_url: endpoints.itunes_search.clone(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Album artwork, searching for `"<album> <artist> <extra>..."`
    #[instrument(skip(self), fields(provider = "itunes"))]
    pub async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        self.search(Entity::Album, album, artist, extra).await
    }

    /// Track artwork, searching for `"<track> <artist> <extra>..."`
    #[instrument(skip(self), fields(provider = "itunes"))]
    pub async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        self.search(Entity::Track, track, artist, extra).await
    }

    fn search_term(primary: &str, artist: &str, extra: &[&str]) -> String {
        let mut terms = vec![primary, artist];
        terms.extend_from_slice(extra);
        terms.join(" ")
    }

    async fn search(
        &self,
        entity: Entity,
        primary: &str,
        artist: &str,
        extra: &[&str],
    ) -> Result<ArtworkResult> {
        let term = Self::search_term(primary, artist, extra);
        let url = build_url(
            &self.search_url,
            &[
                ("media", "music"),
                ("entity", entity.as_param()),
                ("limit", "1"),
                ("term", term.as_str()),
            ],
        )?;

        debug!(%url, "Querying iTunes search");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await?;

        if let Ok(error) = serde_json::from_slice::<ErrorResponse>(&response.body) {
            return Err(ArtworkError::ProviderReported(error.error_message));
        }

        if !response.is_success() {
            return Err(unexpected_status(ArtworkSource::ITunes, &response));
        }

        let envelope: SearchResponse = decode(ArtworkSource::ITunes, &response)?;
        if envelope.result_count == 0 {
            debug!("No iTunes match");
            return Err(ArtworkError::NotFound);
        }

        let first = envelope
            .results
            .into_iter()
            .next()
            .ok_or(ArtworkError::NotFound)?;

        normalize(&first.descriptors(), &TIERS)
    }
}

#[async_trait]
impl ArtworkProvider for ITunesClient {
    fn source(&self) -> ArtworkSource {
        ArtworkSource::ITunes
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        ITunesClient::album_cover(self, album, artist, extra).await
    }

    async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        ITunesClient::track_cover(self, track, artist, extra).await
    }
}
