use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The token endpoint answered with an error envelope.
    #[error("Token request rejected: {0}")]
    TokenRejected(String),

    /// Non-2xx answer without a readable error envelope.
    #[error("Token endpoint returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),

    /// A newer `set_credentials` call replaced the configuration this
    /// request was made for.
    #[error("Credentials were replaced before the token request completed")]
    Superseded,

    #[error("Transport error: {0}")]
    Transport(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
