use thiserror::Error;

// Domain-level errors for the check-in workflows.

/// Failures decoding scanned QR text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("incomplete token: missing {field}")]
    Incomplete { field: &'static str },
}

/// Transport-level failure reported by an `ApiTransport` adapter.
#[derive(Debug, Clone, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Failures of the token endpoints (create, refresh, logout). Cloneable so
/// every caller awaiting the same refresh receives it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("no credential held")]
    SignedOut,
    #[error("auth rejected with status {status}")]
    Rejected { status: u16 },
    #[error("auth transport error: {0}")]
    Transport(String),
    #[error("auth response decode error: {0}")]
    Decode(String),
}

/// Errors surfaced by the authenticated request executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("network error: {0}")]
    Network(String),
    #[error("server error {status}")]
    Server { status: u16, message: Option<String> },
    #[error("request body could not be encoded: {0}")]
    InvalidRequest(String),
}

/// Umbrella failure for a check-in commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckInError {
    #[error("check-in failed: {0}")]
    Rejected(#[from] ApiError),
    #[error("check-in failed: malformed response: {0}")]
    MalformedResponse(String),
}

impl CheckInError {
    // Short subtype label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckInError::Rejected(ApiError::Unauthorized) => "unauthorized",
            CheckInError::Rejected(ApiError::Network(_)) => "network",
            CheckInError::Rejected(ApiError::Server { .. }) => "server",
            CheckInError::Rejected(ApiError::InvalidRequest(_)) => "invalid_request",
            CheckInError::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("validation failed: {field} is required")]
    ValidationFailed { field: &'static str },
    #[error("registration failed: {0}")]
    RegistrationFailed(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event request failed: {0}")]
    Api(#[from] ApiError),
    #[error("malformed event response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("capture device closed")]
    Closed,
    #[error("capture device error: {0}")]
    Device(String),
}
