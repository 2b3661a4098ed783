use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{
    ApiRequest, ApiResponse, ApiTransport, AuthError, CaptureConfig, CaptureDevice, CaptureError,
    CheckInError, Credential, CredentialStore, Frame, GuestCheckIn, GuestToken, ScanResult,
    TokenRefresher, TransportError,
};
use crate::interface_adapters::state::InMemoryCredentialStore;

pub(crate) const TOKEN_NOT_VALID_BODY: &str =
    r#"{"detail":"Given token not valid for any token type","code":"token_not_valid"}"#;

type Responder =
    Box<dyn Fn(&ApiRequest, Option<&str>) -> Result<ApiResponse, TransportError> + Send + Sync>;

// Request as observed by the fake transport, with the bearer that was attached.
#[derive(Debug, Clone)]
pub(crate) struct SentRequest {
    pub request: ApiRequest,
    pub bearer: Option<String>,
}

enum Script {
    Queue(Mutex<VecDeque<Result<ApiResponse, TransportError>>>),
    Responder(Responder),
}

// Transport that answers from a script and records every call.
pub(crate) struct ScriptedTransport {
    script: Script,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn with_responses(
        responses: impl IntoIterator<Item = Result<ApiResponse, TransportError>>,
    ) -> Self {
        Self {
            script: Script::Queue(Mutex::new(responses.into_iter().collect())),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_responder(
        responder: impl Fn(&ApiRequest, Option<&str>) -> Result<ApiResponse, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            script: Script::Responder(Box::new(responder)),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().expect("sent mutex poisoned").clone()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, TransportError> {
        self.sent.lock().expect("sent mutex poisoned").push(SentRequest {
            request: request.clone(),
            bearer: bearer.map(str::to_string),
        });

        match &self.script {
            Script::Queue(queue) => queue
                .lock()
                .expect("queue mutex poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted response".to_string()))),
            Script::Responder(responder) => responder(request, bearer),
        }
    }
}

// Refresher returning a fixed outcome, optionally held until released.
pub(crate) struct CountingRefresher {
    outcome: Result<Credential, AuthError>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl CountingRefresher {
    pub(crate) fn succeeding(credential: Credential) -> Self {
        Self {
            outcome: Ok(credential),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub(crate) fn failing(error: AuthError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    // Refresh calls block until the returned gate is notified.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for CountingRefresher {
    async fn refresh(&self, _refresh_token: &str) -> Result<Credential, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.outcome.clone()
    }
}

pub(crate) async fn store_with(credential: Option<Credential>) -> Arc<InMemoryCredentialStore> {
    let store = Arc::new(InMemoryCredentialStore::default());
    if let Some(credential) = credential {
        store.replace(credential).await;
    }
    store
}

// Committer double for pipeline tests.
pub(crate) struct FakeCheckIn {
    outcomes: Mutex<VecDeque<Result<ScanResult, CheckInError>>>,
    committed: Mutex<Vec<GuestToken>>,
}

impl FakeCheckIn {
    pub(crate) fn new(outcomes: impl IntoIterator<Item = Result<ScanResult, CheckInError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            committed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn committed(&self) -> Vec<GuestToken> {
        self.committed.lock().expect("committed mutex poisoned").clone()
    }
}

#[async_trait]
impl GuestCheckIn for FakeCheckIn {
    async fn commit(&self, token: &GuestToken) -> Result<ScanResult, CheckInError> {
        self.committed
            .lock()
            .expect("committed mutex poisoned")
            .push(token.clone());
        self.outcomes
            .lock()
            .expect("outcomes mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(CheckInError::MalformedResponse(
                    "no scripted outcome".to_string(),
                ))
            })
    }
}

#[derive(Debug, Default)]
pub(crate) struct DeviceLog {
    pub started: Vec<CaptureConfig>,
    pub stopped: usize,
    pub frames_read: usize,
}

// Capture device replaying scripted frames; once the script runs out it waits
// forever, like a camera pointed at nothing.
pub(crate) struct ScriptedCaptureDevice {
    frames: VecDeque<Result<Frame, CaptureError>>,
    log: Arc<Mutex<DeviceLog>>,
}

impl ScriptedCaptureDevice {
    pub(crate) fn new(
        frames: impl IntoIterator<Item = Result<Frame, CaptureError>>,
    ) -> (Self, Arc<Mutex<DeviceLog>>) {
        let log = Arc::new(Mutex::new(DeviceLog::default()));
        (
            Self {
                frames: frames.into_iter().collect(),
                log: log.clone(),
            },
            log,
        )
    }
}

#[async_trait]
impl CaptureDevice for ScriptedCaptureDevice {
    async fn start(&mut self, config: CaptureConfig) -> Result<(), CaptureError> {
        self.log.lock().expect("log mutex poisoned").started.push(config);
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        match self.frames.pop_front() {
            Some(frame) => {
                self.log.lock().expect("log mutex poisoned").frames_read += 1;
                frame
            }
            None => std::future::pending().await,
        }
    }

    async fn stop(&mut self) {
        self.log.lock().expect("log mutex poisoned").stopped += 1;
    }
}
