//! Identity provider trait abstraction.
//!
//! The third-party identity handshake is opaque to the client core: all it
//! needs is a credential string to hand to the backend login exchange.

use async_trait::async_trait;

use crate::error::{AuthError, HaiResult};

/// Source of a third-party identity credential (an ID token).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the provider handshake and return the credential.
    async fn credential(&self) -> HaiResult<String>;
}

/// Provider that returns a credential obtained out of band.
///
/// Used by the CLI, where the ID token is passed on the command line or
/// through `HAI_ID_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    credential: Option<String>,
}

impl StaticIdentity {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: Some(credential.into()),
        }
    }

    /// Read the credential from `HAI_ID_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            credential: std::env::var("HAI_ID_TOKEN").ok(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn credential(&self) -> HaiResult<String> {
        match self.credential.as_deref().map(str::trim) {
            Some(credential) if !credential.is_empty() => Ok(credential.to_string()),
            _ => Err(AuthError::IdentityUnavailable {
                message: "No ID token received from the identity provider".to_string(),
            }
            .into()),
        }
    }
}
