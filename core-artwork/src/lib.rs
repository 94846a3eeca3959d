//! # Artwork Lookup Module
//!
//! Fetches album, artist and track cover artwork from remote providers and
//! normalizes every response into one [`ArtworkResult`] shape.
//!
//! ## Overview
//!
//! This module handles:
//! - Size tiers and per-provider tier tables
//! - Normalization of raw image descriptors into tiered results
//! - Provider clients for the iTunes Search API, Last.fm and Spotify
//! - Ordered fallback across providers via [`ArtworkService`]
//!
//! ## Example
//!
//! ```ignore
//! use core_artwork::{ArtworkService, ITunesClient, LastFmClient};
//! use std::sync::Arc;
//!
//! let service = ArtworkService::new()
//!     .with_provider(Arc::new(ITunesClient::new(http.clone())))
//!     .with_provider(Arc::new(LastFmClient::with_api_key(http, api_key)));
//!
//! let artwork = service.album_cover("Halcyon Days", "Ellie Goulding", &[]).await?;
//! println!("{}", artwork.default);
//! ```

pub mod artwork;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod providers;
pub mod service;

pub use artwork::{
    ArtworkResult, RawImageDescriptor, SizeIndicator, SizeTier, TierMapping, TierTable,
};
pub use error::{ArtworkError, Result};
pub use normalize::normalize;
pub use provider::{ArtworkProvider, ArtworkSource, Capability};
pub use providers::{ITunesClient, LastFmClient, LastFmSettings, ProviderEndpoints, SpotifyClient};
pub use service::ArtworkService;
