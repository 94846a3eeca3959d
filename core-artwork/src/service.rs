//! Multi-provider lookup with ordered fallback
//!
//! Providers are tried in registration order and the first success wins.
//! `NotFound` and `Unsupported` move on quietly; any other failure is logged
//! and remembered so the caller sees the first real error when nothing
//! succeeds.

use crate::artwork::ArtworkResult;
use crate::error::{ArtworkError, Result};
use crate::provider::ArtworkProvider;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    Album {
        album: &'a str,
        artist: &'a str,
        extra: &'a [&'a str],
    },
    Artist {
        artist: &'a str,
        extra: &'a [&'a str],
    },
    Track {
        track: &'a str,
        artist: &'a str,
        extra: &'a [&'a str],
    },
}

impl Lookup<'_> {
    async fn run(&self, provider: &dyn ArtworkProvider) -> Result<ArtworkResult> {
        match *self {
            Lookup::Album {
                album,
                artist,
                extra,
            } => provider.album_cover(album, artist, extra).await,
            Lookup::Artist { artist, extra } => provider.artist_cover(artist, extra).await,
            Lookup::Track {
                track,
                artist,
                extra,
            } => provider.track_cover(track, artist, extra).await,
        }
    }
}

/// Ordered set of artwork providers.
#[derive(Default, Clone)]
pub struct ArtworkService {
    providers: Vec<Arc<dyn ArtworkProvider>>,
}

impl ArtworkService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider (builder form).
    pub fn with_provider(mut self, provider: Arc<dyn ArtworkProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn add_provider(&mut self, provider: Arc<dyn ArtworkProvider>) {
        self.providers.push(provider);
    }

    pub fn providers(&self) -> &[Arc<dyn ArtworkProvider>] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    #[instrument(skip(self))]
    pub async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        self.lookup(Lookup::Album {
            album,
            artist,
            extra,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn artist_cover(&self, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        self.lookup(Lookup::Artist { artist, extra }).await
    }

    #[instrument(skip(self))]
    pub async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        self.lookup(Lookup::Track {
            track,
            artist,
            extra,
        })
        .await
    }

    async fn lookup(&self, lookup: Lookup<'_>) -> Result<ArtworkResult> {
        let mut first_failure: Option<ArtworkError> = None;

        for provider in &self.providers {
            match lookup.run(provider.as_ref()).await {
                Ok(result) => {
                    info!(
                        source = %provider.source().as_str(),
                        "Found artwork"
                    );
                    return Ok(result);
                }
                Err(e) if e.is_recoverable() => {
                    debug!(
                        source = %provider.source().as_str(),
                        reason = %e,
                        "No artwork at provider"
                    );
                }
                Err(e) => {
                    warn!(
                        source = %provider.source().as_str(),
                        error = %e,
                        "Provider lookup failed"
                    );
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                info!(?lookup, "No artwork found from any provider");
                Err(ArtworkError::NotFound)
            }
        }
    }
}
