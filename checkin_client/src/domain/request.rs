use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::domain::errors::ApiError;

// Error code the API attaches when a bearer token is expired or invalid.
pub const TOKEN_NOT_VALID: &str = "token_not_valid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Describes a single remote call: method, API-relative path, optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: &impl Serialize) -> Result<Self, ApiError> {
        let body =
            serde_json::to_value(body).map_err(|err| ApiError::InvalidRequest(err.to_string()))?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        })
    }
}

/// Raw response as seen by the executor; the body is left as text so each
/// caller decides how strictly to parse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    // Error bodies from the API carry `code` and `detail`/`message`/`error`.
    fn error_field(&self, key: &str) -> Option<String> {
        serde_json::from_str::<Value>(&self.body)
            .ok()?
            .get(key)?
            .as_str()
            .map(str::to_string)
    }

    /// True when the response is the API's expired/invalid token signal.
    pub fn is_token_not_valid(&self) -> bool {
        matches!(self.status, 401 | 403)
            && self.error_field("code").as_deref() == Some(TOKEN_NOT_VALID)
    }

    pub fn error_message(&self) -> Option<String> {
        ["detail", "message", "error"]
            .iter()
            .find_map(|key| self.error_field(key))
    }
}
