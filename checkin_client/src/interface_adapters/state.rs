use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Credential, CredentialStore};

// In-memory credential store shared by every executor caller.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credential: RwLock<Option<Credential>>,
}

impl InMemoryCredentialStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self) -> Option<Credential> {
        self.credential.read().await.clone()
    }

    // The pair is swapped under the write lock, so readers never see half of it.
    async fn replace(&self, credential: Credential) {
        *self.credential.write().await = Some(credential);
    }

    async fn clear(&self) {
        *self.credential.write().await = None;
    }
}
