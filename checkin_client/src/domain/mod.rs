// Domain layer: check-in payloads, error taxonomy, and ports.

mod credential;
mod errors;
mod events;
mod ports;
mod request;
mod rsvp;
mod scan;
mod token;

// Re-export the domain boundary types and ports.
pub use credential::Credential;
pub use errors::{
    ApiError, AuthError, CaptureError, CheckInError, EventError, RegistrationError, TokenError,
    TransportError,
};
pub use events::{Event, Guest, NewEvent};
pub use ports::{
    ApiTransport, CaptureDevice, CredentialStore, GuestCheckIn, SessionAuthority, TokenRefresher,
};
pub use request::{ApiRequest, ApiResponse, Method, TOKEN_NOT_VALID};
pub use rsvp::RsvpStatus;
pub use scan::{CaptureConfig, Frame, SCAN_FAILED_MESSAGE, ScanResult, ScanState};
pub use token::{GuestToken, Identifier};
