// Fake event-management API for driving the real HTTP adapters end to end.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{
    // `Arc` shares the recorded state between the server task and the test.
    sync::{Arc, Mutex},
    time::Duration,
};

use checkin_client::domain::{Credential, Identifier};
use checkin_client::interface_adapters::clients::{AuthClient, HttpTransport};
use checkin_client::interface_adapters::state::InMemoryCredentialStore;
use checkin_client::use_cases::{AuthenticatedExecutor, SessionUseCase};

// Credentials the fake accepts.
pub const USERNAME: &str = "organizer";
pub const PASSWORD: &str = "secret";
pub const REFRESH_TOKEN: &str = "refresh-1";
// Issued at login already expired, so the first authorized call must refresh.
pub const STALE_ACCESS: &str = "access-stale";
pub const FRESH_ACCESS: &str = "access-fresh";

pub const GUEST_ID: &str = "5f0c6c1e-4a53-4c1e-9d53-0f6c1d2b7a10";
pub const EVENT_ID: u64 = 7;
pub const GUEST_EMAIL: &str = "ann@example.com";
pub const GUEST_NAME: &str = "Ann";

// Everything the fake observed, for assertions.
#[derive(Default)]
pub struct Recorded {
    pub refresh_calls: usize,
    pub check_in_bodies: Vec<Value>,
    pub registrations: Vec<Value>,
    pub revoked: Vec<String>,
    pub checked_in: bool,
}

pub struct FakeApi {
    pub base_url: String,
    pub recorded: Arc<Mutex<Recorded>>,
}

impl FakeApi {
    pub fn refresh_calls(&self) -> usize {
        self.recorded.lock().expect("recorded lock").refresh_calls
    }

    pub fn recorded<T>(&self, read: impl FnOnce(&Recorded) -> T) -> T {
        read(&self.recorded.lock().expect("recorded lock"))
    }
}

// Start the fake API on an ephemeral port inside the current test runtime.
pub async fn spawn_fake_api() -> FakeApi {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let app = Router::new()
        .route("/auth/jwt/create/", post(create_token))
        .route("/auth/jwt/refresh/", post(refresh_token))
        .route("/auth/logout/", post(logout))
        .route("/guests/check-in/", post(check_in))
        .route("/guests/", post(register_guest))
        .route("/guests/by-event/{id}/", get(guests_for_event))
        .with_state(recorded.clone());

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake api failed");
    });

    FakeApi {
        base_url: format!("http://{addr}"),
        recorded,
    }
}

// Executor, auth client, and store wired against the fake, as the kiosk wires them.
pub struct Stack {
    pub executor: Arc<AuthenticatedExecutor>,
    pub session: SessionUseCase,
    pub store: Arc<InMemoryCredentialStore>,
}

pub fn stack(base_url: &str) -> Stack {
    let timeout = Duration::from_secs(5);
    let transport = HttpTransport::new(base_url, timeout).expect("transport should build");
    let auth = Arc::new(AuthClient::new(base_url, timeout).expect("auth client should build"));
    let store = Arc::new(InMemoryCredentialStore::default());
    let executor = Arc::new(AuthenticatedExecutor::new(
        Arc::new(transport),
        auth.clone(),
        store.clone(),
    ));
    Stack {
        executor,
        session: SessionUseCase {
            authority: auth,
            store: store.clone(),
        },
        store,
    }
}

pub fn guest_identifier() -> Identifier {
    Identifier::Text(GUEST_ID.to_string())
}

pub fn stale_credential() -> Credential {
    Credential::new(STALE_ACCESS, REFRESH_TOKEN)
}

type Shared = State<Arc<Mutex<Recorded>>>;

fn token_not_valid() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "detail": "Given token not valid for any token type",
            "code": "token_not_valid",
            "messages": [{"token_class": "AccessToken", "message": "Token is invalid or expired"}]
        })),
    )
        .into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn create_token(Json(body): Json<Value>) -> Response {
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        return Json(json!({"access": STALE_ACCESS, "refresh": REFRESH_TOKEN})).into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "No active account found with the given credentials"})),
    )
        .into_response()
}

// The fake does not rotate refresh tokens.
async fn refresh_token(State(recorded): Shared, Json(body): Json<Value>) -> Response {
    recorded.lock().expect("recorded lock").refresh_calls += 1;
    if body["refresh"] == REFRESH_TOKEN {
        return Json(json!({"access": FRESH_ACCESS})).into_response();
    }
    token_not_valid()
}

async fn logout(State(recorded): Shared, Json(body): Json<Value>) -> StatusCode {
    let refresh = body["refresh"].as_str().unwrap_or_default().to_string();
    recorded.lock().expect("recorded lock").revoked.push(refresh);
    StatusCode::NO_CONTENT
}

async fn check_in(State(recorded): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != Some(FRESH_ACCESS) {
        return token_not_valid();
    }

    let mut recorded = recorded.lock().expect("recorded lock");
    recorded.check_in_bodies.push(body.clone());
    let (Some(guest_id), Some(event_id), Some(email)) = (
        body.get("guest_id"),
        body.get("event_id"),
        body.get("email"),
    ) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing data"}))).into_response();
    };

    if guest_id != GUEST_ID || event_id != EVENT_ID || email != GUEST_EMAIL {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "Invalid QR code"}))).into_response();
    }
    if recorded.checked_in {
        return Json(json!({"message": "Guest already checked in"})).into_response();
    }
    recorded.checked_in = true;
    Json(json!({
        "message": "Check-in successful",
        "guest": {
            "id": GUEST_ID,
            "event": EVENT_ID,
            "name": GUEST_NAME,
            "email": GUEST_EMAIL,
            "rsvp_status": "Y",
            "check_in_time": "2026-10-17T18:00:00Z"
        }
    }))
    .into_response()
}

async fn register_guest(State(recorded): Shared, Json(body): Json<Value>) -> Response {
    recorded
        .lock()
        .expect("recorded lock")
        .registrations
        .push(body.clone());
    let mut guest = body;
    guest["id"] = json!(GUEST_ID);
    guest["check_in_time"] = Value::Null;
    (StatusCode::CREATED, Json(guest)).into_response()
}

async fn guests_for_event(Path(id): Path<u64>, headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(FRESH_ACCESS) {
        return token_not_valid();
    }
    if id != EVENT_ID {
        return Json(json!([])).into_response();
    }
    Json(json!([{
        "id": GUEST_ID,
        "event": EVENT_ID,
        "name": GUEST_NAME,
        "email": GUEST_EMAIL,
        "rsvp_status": "M",
        "check_in_time": null
    }]))
    .into_response()
}
