//! Wire types for the login exchange.

use serde::{Deserialize, Serialize};

/// Body of the backend login exchange, `POST /auth/google`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    /// Credential produced by the identity provider.
    pub id_token: String,
}

/// Response of the backend login exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    /// Opaque session token used as the bearer credential.
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}
