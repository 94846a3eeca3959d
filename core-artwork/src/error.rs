use crate::provider::{ArtworkSource, Capability};
use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtworkError {
    /// No match, or a match without a usable image URL.
    #[error("No artwork found")]
    NotFound,

    /// Missing or rejected API key, or a failed token exchange.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Network failure, non-2xx status without an error envelope, or an
    /// undecodable body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider's own error envelope, message kept verbatim.
    #[error("{0}")]
    ProviderReported(String),

    #[error("{provider} does not support {capability}")]
    Unsupported {
        provider: ArtworkSource,
        capability: Capability,
    },
}

impl ArtworkError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtworkError::NotFound)
    }

    /// `NotFound` and `Unsupported` mean "try elsewhere"; everything else is a
    /// real failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ArtworkError::NotFound | ArtworkError::Unsupported { .. }
        )
    }

    pub fn is_credential(&self) -> bool {
        matches!(self, ArtworkError::Credential(_))
    }
}

impl From<BridgeError> for ArtworkError {
    fn from(error: BridgeError) -> Self {
        ArtworkError::Transport(error.to_string())
    }
}

impl From<AuthError> for ArtworkError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::TokenRejected(reason) => ArtworkError::Credential(reason),
            AuthError::Superseded => ArtworkError::Credential(error.to_string()),
            AuthError::UnexpectedStatus { .. }
            | AuthError::MalformedResponse(_)
            | AuthError::Transport(_) => ArtworkError::Transport(error.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArtworkError>;
