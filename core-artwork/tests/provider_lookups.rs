//! End-to-end lookups against a scripted HTTP bridge.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_artwork::{
    ArtworkError, ArtworkProvider, ArtworkService, ITunesClient, LastFmClient, ProviderEndpoints,
    SpotifyClient,
};
use core_auth::AuthState;
use std::sync::{Arc, Mutex};

const ITUNES: &str = "https://itunes.test/search";
const LASTFM: &str = "https://lastfm.test/2.0/";
const SPOTIFY_SEARCH: &str = "https://spotify.test/v1/search";
const SPOTIFY_TOKEN: &str = "https://accounts.spotify.test/api/token";

fn endpoints() -> ProviderEndpoints {
    ProviderEndpoints {
        itunes_search: ITUNES.to_string(),
        lastfm_api: LASTFM.to_string(),
        spotify_search: SPOTIFY_SEARCH.to_string(),
        spotify_token: SPOTIFY_TOKEN.to_string(),
    }
}

/// Serves a fixed response per URL prefix and records every request.
#[derive(Default)]
struct ScriptedHttp {
    routes: Mutex<Vec<(String, u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttp {
    fn route(self, prefix: &str, status: u16, body: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .push((prefix.to_string(), status, body.to_string()));
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn requests_to(&self, prefix: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.starts_with(prefix))
            .collect()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let routes = self.routes.lock().unwrap();
        routes
            .iter()
            .find(|(prefix, _, _)| request.url.starts_with(prefix.as_str()))
            .map(|(_, status, body)| HttpResponse::new(*status, body.clone()))
            .ok_or_else(|| BridgeError::Connection(format!("no route for {}", request.url)))
    }
}

const HALCYON_ITUNES: &str = r#"{
    "resultCount": 1,
    "results": [{
        "wrapperType": "collection",
        "collectionName": "Halcyon Days",
        "artistName": "Ellie Goulding",
        "artworkUrl100": "https://is1.mzstatic.test/halcyon/100x100bb.jpg"
    }]
}"#;

const LASTFM_EMPTY_IMAGE: &str = r##"{
    "album": {
        "name": "Halcyon Days",
        "artist": "Ellie Goulding",
        "image": [{"size": "large", "#text": ""}]
    }
}"##;

const SPOTIFY_ALBUM: &str = r#"{
    "albums": {"items": [{
        "name": "Halcyon Days",
        "images": [
            {"url": "https://i.scdn.test/a640", "width": 640, "height": 640},
            {"url": "https://i.scdn.test/a300", "width": 300, "height": 300},
            {"url": "https://i.scdn.test/a64", "width": 64, "height": 64}
        ]
    }]}
}"#;

const SPOTIFY_TOKEN_BODY: &str =
    r#"{"access_token":"bearer-123","token_type":"Bearer","expires_in":3600}"#;

#[tokio::test]
async fn test_itunes_halcyon_days() {
    let http = Arc::new(ScriptedHttp::default().route(ITUNES, 200, HALCYON_ITUNES));
    let client = ITunesClient::with_endpoints(http.clone(), &endpoints());

    let result = client
        .album_cover("halcyon days", "ellie goulding", &[])
        .await
        .unwrap();

    let url = "https://is1.mzstatic.test/halcyon/100x100bb.jpg";
    assert_eq!(result.medium.as_deref(), Some(url));
    assert_eq!(result.default, url);
    assert!(result.large.is_none());

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.contains("term=halcyon+days+ellie+goulding"));
}

#[tokio::test]
async fn test_lastfm_empty_url_is_not_found() {
    let http = Arc::new(ScriptedHttp::default().route(LASTFM, 200, LASTFM_EMPTY_IMAGE));
    let client = LastFmClient::with_endpoints(http, &endpoints());
    client.configure("test-key").await;

    let err = client
        .album_cover("halcyon days", "ellie goulding", &[])
        .await
        .unwrap_err();

    assert_eq!(err, ArtworkError::NotFound);
}

#[tokio::test]
async fn test_lastfm_configure_twice_sends_identical_requests() {
    let http = Arc::new(ScriptedHttp::default().route(LASTFM, 200, LASTFM_EMPTY_IMAGE));
    let client = LastFmClient::with_endpoints(http.clone(), &endpoints());

    client.configure("test-key").await;
    let _ = client.album_cover("a", "b", &[]).await;
    client.configure("test-key").await;
    let _ = client.album_cover("a", "b", &[]).await;

    let requests = http.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url, requests[1].url);
}

#[tokio::test]
async fn test_spotify_optional_auth() {
    let http = Arc::new(
        ScriptedHttp::default()
            .route(SPOTIFY_TOKEN, 200, SPOTIFY_TOKEN_BODY)
            .route(SPOTIFY_SEARCH, 200, SPOTIFY_ALBUM),
    );
    let client = SpotifyClient::with_endpoints(http.clone(), &endpoints());

    client.set_credentials("", "").await.unwrap();
    assert_eq!(client.auth_state().await, AuthState::Unconfigured);
    assert!(http.requests_to(SPOTIFY_TOKEN).is_empty());

    let result = client
        .album_cover("halcyon days", "ellie goulding", &[])
        .await
        .unwrap();
    assert_eq!(result.default, "https://i.scdn.test/a640");
    assert_eq!(result.small.as_deref(), Some("https://i.scdn.test/a64"));

    let searches = http.requests_to(SPOTIFY_SEARCH);
    assert_eq!(searches.len(), 1);
    assert!(searches[0].header_value("Authorization").is_none());
}

#[tokio::test]
async fn test_spotify_bearer_after_credentials() {
    let http = Arc::new(
        ScriptedHttp::default()
            .route(SPOTIFY_TOKEN, 200, SPOTIFY_TOKEN_BODY)
            .route(SPOTIFY_SEARCH, 200, SPOTIFY_ALBUM),
    );
    let client = SpotifyClient::with_endpoints(http.clone(), &endpoints());

    client.set_credentials("client-id", "client-secret").await.unwrap();
    assert_eq!(client.auth_state().await, AuthState::Authenticated);

    client.album_cover("halcyon days", "ellie goulding", &[]).await.unwrap();

    let searches = http.requests_to(SPOTIFY_SEARCH);
    assert_eq!(
        searches[0].header_value("Authorization"),
        Some("Bearer bearer-123")
    );
}

#[tokio::test]
async fn test_service_falls_back_past_not_found() {
    let http = Arc::new(
        ScriptedHttp::default()
            .route(ITUNES, 200, r#"{"resultCount":0,"results":[]}"#)
            .route(LASTFM, 200, LASTFM_EMPTY_IMAGE)
            .route(SPOTIFY_SEARCH, 200, SPOTIFY_ALBUM),
    );
    let lastfm = LastFmClient::with_endpoints(http.clone(), &endpoints());
    lastfm.configure("test-key").await;

    let service = ArtworkService::new()
        .with_provider(Arc::new(ITunesClient::with_endpoints(http.clone(), &endpoints())))
        .with_provider(Arc::new(lastfm))
        .with_provider(Arc::new(SpotifyClient::with_endpoints(http.clone(), &endpoints())));

    let result = service
        .album_cover("halcyon days", "ellie goulding", &[])
        .await
        .unwrap();

    assert_eq!(result.default, "https://i.scdn.test/a640");
    assert_eq!(http.requests().len(), 3);
}

#[tokio::test]
async fn test_service_reports_first_real_error() {
    let http = Arc::new(ScriptedHttp::default().route(SPOTIFY_SEARCH, 503, ""));

    let service = ArtworkService::new()
        // No key configured: fails before any request.
        .with_provider(Arc::new(LastFmClient::with_endpoints(http.clone(), &endpoints())))
        .with_provider(Arc::new(SpotifyClient::with_endpoints(http.clone(), &endpoints())));

    let err = service.artist_cover("ellie goulding", &[]).await.unwrap_err();

    assert!(err.is_credential());
    assert_eq!(http.requests_to(LASTFM).len(), 0);
    assert_eq!(http.requests_to(SPOTIFY_SEARCH).len(), 1);
}

#[tokio::test]
async fn test_itunes_artist_lookup_is_skipped() {
    let http = Arc::new(ScriptedHttp::default());
    let itunes = ITunesClient::with_endpoints(http.clone(), &endpoints());

    assert!(!itunes.supports(core_artwork::Capability::ArtistCover));

    let service = ArtworkService::new().with_provider(Arc::new(itunes));
    let err = service.artist_cover("ellie goulding", &[]).await.unwrap_err();

    assert_eq!(err, ArtworkError::NotFound);
    assert!(http.requests().is_empty());
}
