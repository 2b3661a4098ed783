use async_trait::async_trait;

use crate::domain::credential::Credential;
use crate::domain::errors::{AuthError, CaptureError, CheckInError, TransportError};
use crate::domain::request::{ApiRequest, ApiResponse};
use crate::domain::scan::{CaptureConfig, Frame, ScanResult};
use crate::domain::token::GuestToken;

// Use cases depend on these traits, not on the concrete adapters.
// Dependencies point inwards to the domain layer.

// Port for dispatching one HTTP call to the remote API.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, TransportError>;
}

// Port for the external token-refresh endpoint.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<Credential, AuthError>;
}

// Port for the organizer session endpoints around the refresh call.
#[async_trait]
pub trait SessionAuthority: TokenRefresher {
    async fn obtain(&self, username: &str, password: &str) -> Result<Credential, AuthError>;
    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError>;
}

// Port for the process-wide credential holder. `replace` is atomic with
// respect to `get`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self) -> Option<Credential>;
    async fn replace(&self, credential: Credential);
    async fn clear(&self);
}

// Port for the camera (or any QR reader). Owned exclusively by the scan
// pipeline while a session is open.
#[async_trait]
pub trait CaptureDevice: Send {
    async fn start(&mut self, config: CaptureConfig) -> Result<(), CaptureError>;
    async fn next_frame(&mut self) -> Result<Frame, CaptureError>;
    async fn stop(&mut self);
}

// Port the scan pipeline uses to commit a decoded token.
#[async_trait]
pub trait GuestCheckIn: Send + Sync {
    async fn commit(&self, token: &GuestToken) -> Result<ScanResult, CheckInError>;
}
