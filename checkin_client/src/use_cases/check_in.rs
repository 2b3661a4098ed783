use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{ApiRequest, CheckInError, GuestCheckIn, GuestToken, ScanResult};
use crate::interface_adapters::protocol::{CHECK_IN_PATH, CheckInRequest, CheckInResponse};
use crate::use_cases::executor::{AuthenticatedExecutor, decode_body};

const DEFAULT_MESSAGE: &str = "Successfully checked in!";
const DEFAULT_NAME: &str = "Guest";

// Commits a decoded guest token to the remote check-in endpoint.
pub struct CheckInCommitter {
    pub executor: Arc<AuthenticatedExecutor>,
}

impl CheckInCommitter {
    pub fn new(executor: Arc<AuthenticatedExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl GuestCheckIn for CheckInCommitter {
    #[tracing::instrument(
        name = "check_in",
        skip_all,
        fields(guest_id = %token.guest_id, event_id = %token.event_id)
    )]
    async fn commit(&self, token: &GuestToken) -> Result<ScanResult, CheckInError> {
        let request = ApiRequest::post(
            CHECK_IN_PATH,
            &CheckInRequest {
                guest_id: &token.guest_id,
                event_id: &token.event_id,
                email: &token.email,
            },
        )?;

        let response = self.executor.execute(request).await.inspect_err(|err| {
            tracing::warn!(error = %err, "check-in call failed.");
        })?;

        let body: Option<CheckInResponse> =
            decode_body(&response).map_err(CheckInError::MalformedResponse)?;
        let body = body.unwrap_or_default();

        // Server-supplied name wins over the one embedded in the QR; blank names are skipped.
        let name = body
            .guest
            .and_then(|guest| guest.name)
            .filter(|name| !name.trim().is_empty())
            .or_else(|| token.name.clone().filter(|name| !name.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        let message = body
            .message
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        tracing::info!(%message, "guest checked in.");
        Ok(ScanResult { name, message })
    }
}
