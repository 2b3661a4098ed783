// Authenticated request execution with a single shared token refresh.

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{
    ApiError, ApiRequest, ApiResponse, ApiTransport, AuthError, Credential, CredentialStore,
    TokenRefresher,
};

type PendingRefresh = Shared<BoxFuture<'static, Result<Credential, AuthError>>>;

/// Attaches the current credential to API calls and recovers from an expired
/// access token with at most one refresh and one retry per call.
///
/// Concurrent callers that hit `token_not_valid` while a refresh is running
/// await that same refresh instead of starting their own.
pub struct AuthenticatedExecutor {
    transport: Arc<dyn ApiTransport>,
    refresher: Arc<dyn TokenRefresher>,
    store: Arc<dyn CredentialStore>,
    // Process-wide in-flight refresh; `Some` while a refresh is running.
    pending_refresh: Mutex<Option<PendingRefresh>>,
}

impl AuthenticatedExecutor {
    pub fn new(
        transport: Arc<dyn ApiTransport>,
        refresher: Arc<dyn TokenRefresher>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            transport,
            refresher,
            store,
            pending_refresh: Mutex::new(None),
        }
    }

    /// Executes one remote call. Only 2xx responses are returned as `Ok`.
    #[tracing::instrument(
        name = "api_call",
        skip_all,
        fields(method = %request.method, path = %request.path)
    )]
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        // Without a credential the call goes out bare (public reads, RSVP).
        let Some(credential) = self.store.get().await else {
            let response = self.dispatch(&request, None).await?;
            return into_result(response);
        };

        let response = self.dispatch(&request, Some(&credential.access)).await?;
        if !response.is_token_not_valid() {
            return into_result(response);
        }

        tracing::info!("access token rejected, refreshing credential.");
        let fresh = match self.refreshed_credential(&credential).await {
            Ok(fresh) => fresh,
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed.");
                return Err(ApiError::Unauthorized);
            }
        };

        // Exactly one retry; a second rejection is surfaced as Unauthorized.
        let retry = self.dispatch(&request, Some(&fresh.access)).await?;
        into_result(retry)
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        tracing::debug!(authenticated = bearer.is_some(), "dispatching request.");
        self.transport.send(request, bearer).await.map_err(|err| {
            tracing::error!(error = %err, "request transport failed.");
            ApiError::Network(err.0)
        })
    }

    // Returns a credential newer than `stale`, refreshing at most once across
    // all concurrent callers.
    async fn refreshed_credential(&self, stale: &Credential) -> Result<Credential, AuthError> {
        let refresh = {
            let mut pending = self.pending_refresh.lock().await;
            match pending.as_ref() {
                Some(refresh) => {
                    tracing::debug!("joining in-flight token refresh.");
                    refresh.clone()
                }
                None => {
                    match self.store.get().await {
                        // Signed out (or a previous refresh failed) while this call was in flight.
                        None => return Err(AuthError::SignedOut),
                        // Another caller already rotated the token.
                        Some(current) if current.access != stale.access => return Ok(current),
                        Some(_) => {}
                    }
                    let refresh = self.start_refresh(stale.refresh.clone());
                    *pending = Some(refresh.clone());
                    refresh
                }
            }
        };

        let result = refresh.clone().await;

        let mut pending = self.pending_refresh.lock().await;
        if pending
            .as_ref()
            .is_some_and(|current| current.ptr_eq(&refresh))
        {
            *pending = None;
        }
        result
    }

    fn start_refresh(&self, refresh_token: String) -> PendingRefresh {
        let refresher = self.refresher.clone();
        let store = self.store.clone();
        async move {
            match refresher.refresh(&refresh_token).await {
                Ok(credential) => {
                    store.replace(credential.clone()).await;
                    tracing::info!("credential refreshed.");
                    Ok(credential)
                }
                Err(err) => {
                    store.clear().await;
                    Err(err)
                }
            }
        }
        .boxed()
        .shared()
    }
}

fn into_result(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    if response.status == 401 || response.is_token_not_valid() {
        return Err(ApiError::Unauthorized);
    }
    Err(ApiError::Server {
        status: response.status,
        message: response.error_message(),
    })
}

// Empty bodies decode as JSON null so `Option`/defaulted targets still work.
pub(crate) fn decode_body<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, String> {
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|err| err.to_string())
}
