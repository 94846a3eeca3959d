//! Artwork lookup demonstration
//!
//! Looks up cover artwork through every configured provider and prints the
//! tiers that came back.
//!
//! Run with:
//! ```bash
//! # iTunes and unauthenticated Spotify only
//! cargo run --example lookup -- album "Halcyon Days" "Ellie Goulding"
//!
//! # With Last.fm and authenticated Spotify
//! LASTFM_APIKEY=... SPOTIFY_CLIENTID=... SPOTIFY_CLIENTSECRET=... \
//!     cargo run --example lookup -- artist "Ellie Goulding"
//!
//! # JSON logs with provider debug output
//! RUST_LOG=core_artwork=debug cargo run --example lookup -- track "Burn" "Ellie Goulding"
//! ```

use anyhow::{bail, Context};
use coverart::{
    init_logging, service_from_config, ArtworkConfigBuilder, ArtworkResult, LoggingConfig,
};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut logging = LoggingConfig::default();
    if let Ok(filter) = env::var("RUST_LOG") {
        logging = logging.with_filter(filter);
    }
    init_logging(logging).context("Failed to initialize logging")?;

    let args: Vec<String> = env::args().skip(1).collect();
    let (kind, rest) = match args.split_first() {
        Some((kind, rest)) => (kind.as_str(), rest),
        None => bail!("usage: lookup <album|artist|track> <name> [artist] [extra...]"),
    };

    let config = ArtworkConfigBuilder::from_env()
        .build()
        .context("Failed to build artwork config")?;
    info!(?config, "Loaded configuration");

    let service = service_from_config(&config)
        .await
        .context("Failed to set up providers")?;

    let extra: Vec<&str> = rest.iter().skip(2).map(String::as_str).collect();
    let result = match (kind, rest) {
        ("album", [album, artist, ..]) => service.album_cover(album, artist, &extra).await,
        ("track", [track, artist, ..]) => service.track_cover(track, artist, &extra).await,
        ("artist", [artist, ..]) => {
            let genres: Vec<&str> = rest.iter().skip(1).map(String::as_str).collect();
            service.artist_cover(artist, &genres).await
        }
        _ => bail!("usage: lookup <album|artist|track> <name> [artist] [extra...]"),
    };

    match result {
        Ok(artwork) => print_result(&artwork),
        Err(e) if e.is_not_found() => println!("No artwork found"),
        Err(e) => return Err(e).context("Artwork lookup failed"),
    }

    Ok(())
}

fn print_result(artwork: &ArtworkResult) {
    for tier in artwork.populated_tiers().into_iter().rev() {
        let url = artwork.get(tier).unwrap_or_default();
        println!("{:>12}: {}", tier.as_str(), url);
    }
    println!("{:>12}: {}", "default", artwork.default);
}
