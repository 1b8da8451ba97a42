//! Sign-in flow: provider handshake, backend login, session update.

use tracing::{info, warn};

use crate::backend::BackendClient;
use crate::error::{HaiError, HaiResult};
use crate::session::SessionManager;
use crate::traits::{HttpClient, IdentityProvider};

/// Run the full sign-in sequence.
///
/// 1. Ask the identity provider for a credential.
/// 2. Exchange it with the backend for a session token.
/// 3. Hand the token to the session manager.
///
/// Failures in steps 1 and 2 leave the session untouched. A storage failure
/// in step 3 is returned, but the session is already active in memory.
pub async fn sign_in_with_provider<P, C>(
    provider: &P,
    backend: &BackendClient<C>,
    session: &SessionManager,
) -> HaiResult<()>
where
    P: IdentityProvider + ?Sized,
    C: HttpClient,
{
    let credential = provider.credential().await?;

    let token = backend.login(&credential).await.map_err(|e| {
        warn!(error_code = e.error_code(), "Backend login failed: {}", e);
        e
    })?;

    match session.sign_in(&token).await {
        Ok(()) => {
            info!("Signed in with identity provider");
            Ok(())
        }
        Err(e @ HaiError::Storage(_)) => {
            info!("Signed in with identity provider (session not persisted)");
            Err(e)
        }
        Err(e) => Err(e),
    }
}
