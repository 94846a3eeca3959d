//! Last.fm API Client
//!
//! ## API Endpoints
//!
//! - **Album Info**: `?method=album.getinfo&api_key={key}&artist={artist}&album={album}&format=json`
//! - **Artist Info**: `?method=artist.getinfo&api_key={key}&artist={artist}&format=json`
//! - **Track Info**: `?method=track.getinfo&api_key={key}&artist={artist}&track={track}&format=json`
//!
//! `&autocorrect=1` is appended when auto-correction is enabled.
//!
//! ## API Key Requirement
//!
//! Last.fm requires an API key for all requests. Lookups without one fail with
//! [`ArtworkError::Credential`] before anything is sent.
//! Obtain one at: https://www.last.fm/api/account/create
//!
//! ## Usage
//!
//! ```ignore
//! use core_artwork::providers::LastFmClient;
//!
//! let client = LastFmClient::with_api_key(http_client, "your_api_key");
//! client.set_autocorrect(true).await;
//!
//! let artwork = client.album_cover("Halcyon Days", "Ellie Goulding", &[]).await?;
//! println!("{}", artwork.default);
//! ```

use super::{build_url, decode, unexpected_status, ProviderEndpoints, REQUEST_TIMEOUT};
use crate::artwork::{ArtworkResult, RawImageDescriptor, SizeTier, TierTable};
use crate::error::{ArtworkError, Result};
use crate::normalize::normalize;
use crate::provider::{ArtworkProvider, ArtworkSource, Capability};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::logging::redact_url;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

const TIERS: TierTable = TierTable::Labels(&[
    ("small", SizeTier::Small),
    ("medium", SizeTier::Medium),
    ("large", SizeTier::Large),
    ("extralarge", SizeTier::ExtraLarge),
    ("mega", SizeTier::Mega),
]);

const CAPABILITIES: &[Capability] = &[
    Capability::AlbumCover,
    Capability::ArtistCover,
    Capability::TrackCover,
];

/// Error codes Last.fm uses for key problems
const ERROR_INVALID_API_KEY: i32 = 10;
const ERROR_SUSPENDED_API_KEY: i32 = 26;

/// Per-client Last.fm settings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LastFmSettings {
    pub api_key: Option<String>,
    pub autocorrect: bool,
}

impl LastFmSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl fmt::Debug for LastFmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LastFmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("autocorrect", &self.autocorrect)
            .finish()
    }
}

/// Last.fm image. Either field may be `null`; a missing URL is treated as
/// empty and skipped by the normalizer.
#[derive(Debug, Clone, Deserialize)]
struct LastFmImage {
    #[serde(rename = "#text", default)]
    url: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

/// Any entity carrying an `image` array
#[derive(Debug, Default, Deserialize)]
struct ImageHolder {
    #[serde(default)]
    image: Option<Vec<Option<LastFmImage>>>,
}

impl ImageHolder {
    fn descriptors(self) -> Vec<RawImageDescriptor> {
        self.image
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(|img| {
                RawImageDescriptor::labeled(img.size.unwrap_or_default(), img.url.unwrap_or_default())
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct AlbumResponse {
    album: Option<ImageHolder>,
}

#[derive(Debug, Deserialize)]
struct ArtistResponse {
    artist: Option<ImageHolder>,
}

/// A track carries no images; its album does.
#[derive(Debug, Deserialize)]
struct TrackInfo {
    album: Option<ImageHolder>,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    track: Option<TrackInfo>,
}

/// Last.fm error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: i32,
    message: String,
}

impl ErrorResponse {
    fn into_error(self) -> ArtworkError {
        match self.error {
            ERROR_INVALID_API_KEY | ERROR_SUSPENDED_API_KEY => {
                ArtworkError::Credential(self.message)
            }
            _ => ArtworkError::ProviderReported(self.message),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Album,
    Artist,
    Track,
}

impl Method {
    fn as_param(&self) -> &'static str {
        match self {
            Method::Album => "album.getinfo",
            Method::Artist => "artist.getinfo",
            Method::Track => "track.getinfo",
        }
    }
}

/// Last.fm API client
///
/// Settings live behind a lock so one client can be reconfigured while shared.
pub struct LastFmClient {
    http_client: Arc<dyn HttpClient>,
    api_url: String,
    timeout: Duration,
    settings: RwLock<LastFmSettings>,
}

impl fmt::Debug for LastFmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // try_read: settings may be mid-update; the key is redacted either way
        let settings = self.settings.try_read().ok().map(|s| s.clone());
        f.debug_struct("LastFmClient")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("settings", &settings)
            .finish()
    }
}

impl LastFmClient {
    /// Creates an unconfigured client; call [`configure`](Self::configure)
    /// before looking anything up.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(http_client, &ProviderEndpoints::default())
    }

    pub fn with_api_key(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self::new(http_client).with_settings(LastFmSettings {
            api_key: Some(api_key.into()),
            autocorrect: false,
        })
    }

    pub fn with_endpoints(http_client: Arc<dyn HttpClient>, endpoints: &ProviderEndpoints) -> Self {
        Self {
            http_client,
            api_url: endpoints.lastfm_api.clone(),
            timeout: REQUEST_TIMEOUT,
            settings: RwLock::new(LastFmSettings::default()),
        }
    }

    pub fn with_settings(mut self, settings: LastFmSettings) -> Self {
        self.settings = RwLock::new(settings);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the API key. The auto-correct flag is left as it is.
    pub async fn configure(&self, api_key: impl Into<String>) {
        let mut settings = self.settings.write().await;
        settings.api_key = Some(api_key.into());
        debug!("Last.fm API key configured");
    }

    /// Whether a non-empty API key is set
    pub async fn check_key_present(&self) -> bool {
        self.settings.read().await.has_api_key()
    }

    /// Ask Last.fm to correct misspelled artist, album and track names
    pub async fn set_autocorrect(&self, enabled: bool) {
        self.settings.write().await.autocorrect = enabled;
    }

    /// Snapshot of the current settings
    pub async fn settings(&self) -> LastFmSettings {
        self.settings.read().await.clone()
    }

    #[instrument(skip(self), fields(provider = "lastfm"))]
    pub async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        Self::ignore_extra(extra);
        let response: AlbumResponse = self
            .get_info(Method::Album, &[("artist", artist), ("album", album)])
            .await?;

        let album = response.album.ok_or(ArtworkError::NotFound)?;
        normalize(&album.descriptors(), &TIERS)
    }

    #[instrument(skip(self), fields(provider = "lastfm"))]
    pub async fn artist_cover(&self, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        Self::ignore_extra(extra);
        let response: ArtistResponse = self
            .get_info(Method::Artist, &[("artist", artist)])
            .await?;

        let artist = response.artist.ok_or(ArtworkError::NotFound)?;
        normalize(&artist.descriptors(), &TIERS)
    }

    /// Track artwork comes from the track's album. A matched track without
    /// an album is reported as not found.
    #[instrument(skip(self), fields(provider = "lastfm"))]
    pub async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        Self::ignore_extra(extra);
        let response: TrackResponse = self
            .get_info(Method::Track, &[("artist", artist), ("track", track)])
            .await?;

        let album = response
            .track
            .and_then(|track| track.album)
            .ok_or(ArtworkError::NotFound)?;
        normalize(&album.descriptors(), &TIERS)
    }

    fn ignore_extra(extra: &[&str]) {
        if !extra.is_empty() {
            debug!(?extra, "Last.fm getinfo takes no extra terms, ignoring");
        }
    }

    async fn get_info<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        terms: &[(&str, &str)],
    ) -> Result<T> {
        let settings = self.settings().await;
        let api_key = settings
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ArtworkError::Credential("Last.fm API key is not configured".to_string()))?;

        let mut params: Vec<(&str, &str)> = vec![
            ("format", "json"),
            ("method", method.as_param()),
            ("api_key", api_key.as_str()),
        ];
        params.extend_from_slice(terms);
        if settings.autocorrect {
            params.push(("autocorrect", "1"));
        }

        let url = build_url(&self.api_url, &params)?;
        debug!(url = %redact_url(&url), "Querying Last.fm");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await?;

        // Last.fm reports errors in the body, sometimes with a 200 status
        if let Ok(error) = serde_json::from_slice::<ErrorResponse>(&response.body) {
            info!(code = error.error, message = %error.message, "Last.fm reported an error");
            return Err(error.into_error());
        }

        if !response.is_success() {
            return Err(unexpected_status(ArtworkSource::LastFm, &response));
        }

        decode(ArtworkSource::LastFm, &response)
    }
}

#[async_trait]
impl ArtworkProvider for LastFmClient {
    fn source(&self) -> ArtworkSource {
        ArtworkSource::LastFm
    }

    fn capabilities(&self) -> &'static [Capability] {
        CAPABILITIES
    }

    async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        LastFmClient::album_cover(self, album, artist, extra).await
    }

    async fn artist_cover(&self, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        LastFmClient::artist_cover(self, artist, extra).await
    }

    async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        LastFmClient::track_cover(self, track, artist, extra).await
    }
}
