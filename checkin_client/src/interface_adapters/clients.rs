use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::domain::{
    ApiRequest, ApiResponse, ApiTransport, AuthError, Credential, Method, SessionAuthority,
    TokenRefresher, TransportError,
};
use crate::interface_adapters::protocol::{
    LOGOUT_PATH, LogoutRequest, TOKEN_CREATE_PATH, TOKEN_REFRESH_PATH, TokenCreateRequest,
    TokenPairResponse, TokenRefreshRequest, TokenRefreshResponse,
};

// The clients defined here are reqwest clients for the event-management API.

#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

fn build(base_url: &str, timeout: Duration) -> Result<(Client, Url), ClientInitError> {
    // Trailing slash so joined paths keep any prefix of the base (e.g. `/api/`).
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    let http = Client::builder().timeout(timeout).build()?;
    Ok((http, base))
}

fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path.trim_start_matches('/'))
}

// Thin wrapper around reqwest carrying every API call for the executor.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientInitError> {
        let (http, base_url) = build(base_url, timeout)?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        let url = endpoint(&self.base_url, &request.path)
            .map_err(|err| TransportError(format!("invalid request path: {err}")))?;

        let mut builder = match request.method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Delete => self.http.delete(url),
        }
        .header(ACCEPT, "application/json");
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder
            .send()
            .await
            .map_err(|err| TransportError(err.to_string()))?;
        let status = res.status().as_u16();
        let body = res
            .text()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[derive(Debug, Deserialize)]
struct AuthErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

// Client for the JWT create/refresh/logout endpoints.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: Url,
}

impl AuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientInitError> {
        let (http, base_url) = build(base_url, timeout)?;
        Ok(Self { http, base_url })
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, AuthError> {
        let url = endpoint(&self.base_url, path).map_err(|err| AuthError::Transport(err.to_string()))?;
        let res = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| AuthError::Transport(err.to_string()))?;
        let status = res.status();

        // Keep upstream status so callers can tell rejection from outage.
        if !status.is_success() {
            let detail = res
                .json::<AuthErrorResponse>()
                .await
                .ok()
                .and_then(|payload| payload.detail);
            tracing::debug!(%status, detail = ?detail, path, "auth endpoint rejected request.");
            return Err(rejected(status));
        }
        Ok(res)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AuthError> {
        self.post(path, body)
            .await?
            .json::<T>()
            .await
            .map_err(|err| AuthError::Decode(err.to_string()))
    }
}

fn rejected(status: StatusCode) -> AuthError {
    AuthError::Rejected {
        status: status.as_u16(),
    }
}

#[async_trait]
impl TokenRefresher for AuthClient {
    async fn refresh(&self, refresh_token: &str) -> Result<Credential, AuthError> {
        let res: TokenRefreshResponse = self
            .post_json(
                TOKEN_REFRESH_PATH,
                &TokenRefreshRequest {
                    refresh: refresh_token,
                },
            )
            .await?;

        // Without rotation the previous refresh token stays valid.
        Ok(Credential::new(
            res.access,
            res.refresh.unwrap_or_else(|| refresh_token.to_string()),
        ))
    }
}

#[async_trait]
impl SessionAuthority for AuthClient {
    async fn obtain(&self, username: &str, password: &str) -> Result<Credential, AuthError> {
        let res: TokenPairResponse = self
            .post_json(TOKEN_CREATE_PATH, &TokenCreateRequest { username, password })
            .await?;
        Ok(Credential::new(res.access, res.refresh))
    }

    async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.post(
            LOGOUT_PATH,
            &LogoutRequest {
                refresh: refresh_token,
            },
        )
        .await?;
        Ok(())
    }
}
