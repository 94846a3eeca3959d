//! Uniform provider surface
//!
//! [`ArtworkProvider`] lets callers treat every provider client the same way.
//! A provider that lacks a lookup simply does not override the method and
//! answers [`ArtworkError::Unsupported`].

use crate::artwork::ArtworkResult;
use crate::error::{ArtworkError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which provider produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtworkSource {
    ITunes,
    LastFm,
    Spotify,
}

impl ArtworkSource {
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtworkSource::ITunes => "iTunes",
            ArtworkSource::LastFm => "Last.fm",
            ArtworkSource::Spotify => "Spotify",
        }
    }

    /// Identifier used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkSource::ITunes => "itunes",
            ArtworkSource::LastFm => "lastfm",
            ArtworkSource::Spotify => "spotify",
        }
    }
}

impl fmt::Display for ArtworkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lookup kinds a provider may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    AlbumCover,
    ArtistCover,
    TrackCover,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::AlbumCover => write!(f, "album cover lookup"),
            Capability::ArtistCover => write!(f, "artist cover lookup"),
            Capability::TrackCover => write!(f, "track cover lookup"),
        }
    }
}

/// A source of cover artwork.
///
/// `extra` holds optional secondary search terms (additional artists, genres)
/// in caller order. An empty slice never changes the base query.
#[async_trait]
pub trait ArtworkProvider: Send + Sync {
    fn source(&self) -> ArtworkSource;

    fn capabilities(&self) -> &'static [Capability];

    fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    async fn album_cover(&self, album: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        let _ = (album, artist, extra);
        Err(ArtworkError::Unsupported {
            provider: self.source(),
            capability: Capability::AlbumCover,
        })
    }

    async fn artist_cover(&self, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        let _ = (artist, extra);
        Err(ArtworkError::Unsupported {
            provider: self.source(),
            capability: Capability::ArtistCover,
        })
    }

    async fn track_cover(&self, track: &str, artist: &str, extra: &[&str]) -> Result<ArtworkResult> {
        let _ = (track, artist, extra);
        Err(ArtworkError::Unsupported {
            provider: self.source(),
            capability: Capability::TrackCover,
        })
    }
}
