//! # Authentication Module
//!
//! Client-credentials token management for providers that need a bearer token.
//!
//! ## Overview
//!
//! [`TokenManager`] exchanges an application id and secret for a bearer token
//! and keeps it for the lifetime of the process. Supplying credentials is
//! optional: without them, [`TokenManager::bearer_token`] returns `None` and
//! callers issue unauthenticated requests.
//!
//! ## State machine
//!
//! ```text
//! Unconfigured --set_credentials--> TokenRequested --ok--> Authenticated
//!                                                  \--err--> CredentialError
//! ```
//!
//! `set_credentials("", "")` returns to `Unconfigured` without a request.
//! Tokens are never refreshed automatically.

pub mod client_credentials;
pub mod error;
pub mod types;

pub use client_credentials::{ClientCredentialsConfig, TokenManager, SPOTIFY_TOKEN_URL};
pub use error::{AuthError, Result};
pub use types::{AccessToken, AuthState};
