//! # Host Bridge Traits
//!
//! Platform abstraction traits that the artwork core depends on but does not
//! implement itself.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - one async HTTP round trip per call
//!
//! ## Error Handling
//!
//! Bridge implementations convert their native failures (DNS, TLS, timeouts)
//! into [`BridgeError`](error::BridgeError). HTTP status codes are returned as
//! data, never as errors, so that provider clients can read error envelopes.
//!
//! ## Thread Safety
//!
//! `HttpClient` requires `Send + Sync` so a single client can be shared by
//! several provider clients behind an `Arc`.
//!
//! ## Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;

pub use error::BridgeError;
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
