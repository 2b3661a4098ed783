// Framework bootstrap for the check-in kiosk runtime.

use crate::domain::{CaptureDevice, CaptureError, CredentialStore, ScanState};
use crate::frameworks::config;
use crate::interface_adapters::capture::LineCaptureDevice;
use crate::interface_adapters::clients::{AuthClient, HttpTransport};
use crate::interface_adapters::state::InMemoryCredentialStore;
use crate::use_cases::{
    AuthenticatedExecutor, CheckInCommitter, ScanPipeline, ScanSettings, SessionUseCase,
};

use std::io::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        subscriber.json().with_current_span(true).init();
    } else {
        subscriber.compact().init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "kiosk panicked");
    }));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api_base_url = %config::api_base_url(),
        json_logs = json,
        "check-in kiosk starting"
    );
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let base_url = config::api_base_url();
    let timeout = config::request_timeout();
    let transport = HttpTransport::new(&base_url, timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize api client: {e}")))?;
    let auth = Arc::new(
        AuthClient::new(&base_url, timeout)
            .map_err(|e| std::io::Error::other(format!("failed to initialize auth client: {e}")))?,
    );
    tracing::debug!(
        base_url = %base_url,
        timeout_ms = timeout.as_millis(),
        "api clients configured"
    );

    let store = Arc::new(InMemoryCredentialStore::default());
    let session = SessionUseCase {
        authority: auth.clone(),
        store: store.clone(),
    };
    let logged_in = sign_in(&session, store.as_ref()).await?;

    let executor = Arc::new(AuthenticatedExecutor::new(
        Arc::new(transport),
        auth,
        store,
    ));
    let committer = Arc::new(CheckInCommitter::new(executor));
    let settings = ScanSettings {
        capture: config::capture_config(),
        result_display: config::result_display(),
    };

    let outcome = run(LineCaptureDevice::stdin(), committer, settings).await;

    if logged_in {
        if let Err(e) = session.logout().await {
            tracing::warn!(error = %e, "logout failed");
        }
    }
    outcome
}

// Login takes precedence over seeded tokens; with neither, the kiosk runs signed out
// and the server decides whether anonymous check-ins are allowed.
async fn sign_in(session: &SessionUseCase, store: &InMemoryCredentialStore) -> Result<bool> {
    if let Some((username, password)) = config::kiosk_login() {
        session
            .login(&username, &password)
            .await
            .map_err(|e| std::io::Error::other(format!("organizer login failed: {e}")))?;
        return Ok(true);
    }
    if let Some(credential) = config::seeded_credential() {
        store.replace(credential).await;
        tracing::info!("using seeded organizer tokens");
    } else {
        tracing::warn!("no organizer credentials configured; running signed out");
    }
    Ok(false)
}

/// Runs scanning sessions back to back until the capture device closes or the
/// process is interrupted. Device failures on a single read are logged and the
/// scanner is armed again.
pub async fn run<D: CaptureDevice>(
    device: D,
    committer: Arc<CheckInCommitter>,
    settings: ScanSettings,
) -> Result<()> {
    let result_display = settings.result_display;
    let mut pipeline = ScanPipeline::new(device, committer, settings);
    tokio::spawn(report_states(pipeline.subscribe()));

    let shutdown = Arc::new(AtomicBool::new(false));
    let control = pipeline.control();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.store(true, Ordering::SeqCst);
            control.cancel();
        }
    });

    tracing::info!("kiosk ready; present an invitation QR code");
    while !shutdown.load(Ordering::SeqCst) {
        match pipeline.scan().await {
            Ok(ScanState::Success(_) | ScanState::Failed { .. }) => {
                // Leave the result up before arming the scanner again.
                tokio::time::sleep(result_display).await;
            }
            Ok(_) => {}
            Err(CaptureError::Closed) => {
                tracing::info!("capture device closed");
                break;
            }
            Err(e) => {
                // Only a closed device ends the kiosk; anything else is retried.
                tracing::error!(error = %e, "capture device failed");
                tokio::time::sleep(result_display).await;
            }
        }
    }
    Ok(())
}

async fn report_states(mut states: watch::Receiver<ScanState>) {
    while states.changed().await.is_ok() {
        let state = states.borrow_and_update().clone();
        match &state {
            ScanState::Success(result) => {
                tracing::info!(name = %result.name, message = %result.message, "check-in succeeded");
            }
            ScanState::Failed { message } => {
                tracing::warn!(%message, "check-in failed");
            }
            other => tracing::debug!(state = other.label(), "scan state changed"),
        }
    }
}
