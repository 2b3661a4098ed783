// Scan pipeline: capture device -> token codec -> check-in committer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::domain::{
    CaptureConfig, CaptureDevice, CaptureError, Frame, GuestCheckIn, GuestToken,
    SCAN_FAILED_MESSAGE, ScanState,
};

/// Settings applied to every scanning session.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Decode rate and detection box handed to the capture device.
    pub capture: CaptureConfig,
    /// How long a success stays on screen before returning to idle.
    pub result_display: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            result_display: Duration::from_secs(4),
        }
    }
}

/// Cloneable handle for cancelling the scanning session from elsewhere.
#[derive(Clone)]
pub struct ScanControl {
    cancel_tx: mpsc::Sender<()>,
}

impl ScanControl {
    /// Requests cancellation of the current session. Requests made while no
    /// session is scanning are discarded when the next one starts.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.try_send(());
    }
}

/// Single-shot scan state machine: `Idle -> Scanning -> (Success | Failed) -> Idle`.
///
/// Each session processes exactly one decoded payload: the capture device is
/// stopped as soon as the first code is decoded, before the payload is handled.
pub struct ScanPipeline<D> {
    device: D,
    committer: Arc<dyn GuestCheckIn>,
    settings: ScanSettings,
    state_tx: Arc<watch::Sender<ScanState>>,
    // Bumped at every session start; display timers from older sessions are no-ops.
    session: Arc<AtomicU64>,
    cancel_tx: mpsc::Sender<()>,
    cancel_rx: mpsc::Receiver<()>,
}

impl<D: CaptureDevice> ScanPipeline<D> {
    pub fn new(device: D, committer: Arc<dyn GuestCheckIn>, settings: ScanSettings) -> Self {
        let (state_tx, _state_rx) = watch::channel(ScanState::Idle);
        let (cancel_tx, cancel_rx) = mpsc::channel(1);
        Self {
            device,
            committer,
            settings,
            state_tx: Arc::new(state_tx),
            session: Arc::new(AtomicU64::new(0)),
            cancel_tx,
            cancel_rx,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.state_tx.subscribe()
    }

    pub fn control(&self) -> ScanControl {
        ScanControl {
            cancel_tx: self.cancel_tx.clone(),
        }
    }

    /// Runs one scanning session to completion and returns the state it ended
    /// in. Callable from any state; from `Failed` this is the user's retry.
    pub async fn scan(&mut self) -> Result<ScanState, CaptureError> {
        // Drop cancel requests aimed at an earlier session.
        while self.cancel_rx.try_recv().is_ok() {}
        let session = self.session.fetch_add(1, Ordering::SeqCst) + 1;

        if let Err(err) = self.device.start(self.settings.capture).await {
            tracing::error!(error = %err, "failed to start capture device.");
            self.transition(ScanState::Idle);
            return Err(err);
        }
        self.transition(ScanState::Scanning);

        let decoded = loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel_rx.recv() => None,
                frame = self.device.next_frame() => Some(frame),
            };

            match next {
                None => {
                    self.device.stop().await;
                    tracing::info!(session, "scan cancelled.");
                    self.transition(ScanState::Idle);
                    return Ok(ScanState::Idle);
                }
                Some(Ok(Frame::Decoded(text))) => break text,
                Some(Ok(Frame::Miss(reason))) => {
                    // No code in view; not an error for the session.
                    tracing::trace!(%reason, "no qr code in frame.");
                }
                Some(Err(err)) => {
                    self.device.stop().await;
                    tracing::warn!(error = %err, "capture device failed while scanning.");
                    self.transition(ScanState::Idle);
                    return Err(err);
                }
            }
        };

        // Close the session before handling the payload so later decodes are never seen.
        self.device.stop().await;

        let outcome = self.process(&decoded).await;
        self.transition(outcome.clone());
        if matches!(outcome, ScanState::Success(_)) {
            self.schedule_clear(session);
        }
        Ok(outcome)
    }

    async fn process(&self, decoded: &str) -> ScanState {
        let token = match GuestToken::decode(decoded) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "scanned payload rejected.");
                return failed();
            }
        };

        match self.committer.commit(&token).await {
            Ok(result) => ScanState::Success(result),
            Err(err) => {
                tracing::warn!(error = %err, kind = err.kind(), "check-in commit failed.");
                failed()
            }
        }
    }

    fn transition(&self, next: ScanState) {
        tracing::info!(state = next.label(), "scan state changed.");
        self.state_tx.send_replace(next);
    }

    // Timers are never cancelled; a stale one finds a newer session and does nothing.
    fn schedule_clear(&self, session: u64) {
        let state_tx = self.state_tx.clone();
        let current = self.session.clone();
        let window = self.settings.result_display;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if current.load(Ordering::SeqCst) != session {
                return;
            }
            state_tx.send_if_modified(|state| {
                if matches!(state, ScanState::Success(_)) {
                    *state = ScanState::Idle;
                    true
                } else {
                    false
                }
            });
        });
    }
}

fn failed() -> ScanState {
    ScanState::Failed {
        message: SCAN_FAILED_MESSAGE.to_string(),
    }
}
