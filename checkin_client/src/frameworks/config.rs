use std::{env, time::Duration};

use crate::domain::{CaptureConfig, Credential};

// Runtime constants for the kiosk (API location, timeouts, scanner tuning).

pub fn api_base_url() -> String {
    env::var("EMS_API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
}

pub fn request_timeout() -> Duration {
    let millis = env::var("EMS_REQUEST_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(5000);
    Duration::from_millis(millis)
}

pub fn capture_config() -> CaptureConfig {
    let defaults = CaptureConfig::default();
    CaptureConfig {
        fps: env::var("SCAN_FPS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.fps),
        qr_box: env::var("SCAN_QR_BOX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.qr_box),
    }
}

// Success messages stay on screen this long before the kiosk goes idle.
pub fn result_display() -> Duration {
    let millis = env::var("SCAN_RESULT_DISPLAY_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(4000);
    Duration::from_millis(millis)
}

pub fn kiosk_login() -> Option<(String, String)> {
    let username = non_empty("KIOSK_USERNAME")?;
    let password = non_empty("KIOSK_PASSWORD")?;
    Some((username, password))
}

pub fn seeded_credential() -> Option<Credential> {
    let access = non_empty("KIOSK_ACCESS_TOKEN")?;
    let refresh = non_empty("KIOSK_REFRESH_TOKEN")?;
    Some(Credential::new(access, refresh))
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
