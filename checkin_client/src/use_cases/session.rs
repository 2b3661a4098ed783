use std::sync::Arc;

use crate::domain::{AuthError, CredentialStore, SessionAuthority};

// Organizer login/logout around the shared credential store.
pub struct SessionUseCase {
    pub authority: Arc<dyn SessionAuthority>,
    pub store: Arc<dyn CredentialStore>,
}

impl SessionUseCase {
    #[tracing::instrument(name = "login", skip_all, fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let credential = self.authority.obtain(username, password).await?;
        self.store.replace(credential).await;
        tracing::info!("organizer signed in.");
        Ok(())
    }

    /// Clears the local credential even when server-side revocation fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let Some(credential) = self.store.get().await else {
            return Ok(());
        };
        self.store.clear().await;

        // Best-effort revocation of the refresh token.
        if let Err(err) = self.authority.revoke(&credential.refresh).await {
            tracing::warn!(error = %err, "failed to revoke refresh token.");
            return Err(err);
        }
        tracing::info!("organizer signed out.");
        Ok(())
    }
}
