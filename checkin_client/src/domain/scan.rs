// Scan pipeline states and capture-device vocabulary.

/// Fixed end-user message for any scan or check-in failure.
pub const SCAN_FAILED_MESSAGE: &str = "Invalid QR! Failed to check in guest. Please try again.";

/// Confirmation shown on a successful check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Success(ScanResult),
    Failed { message: String },
}

impl ScanState {
    pub fn label(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Scanning => "scanning",
            ScanState::Success(_) => "success",
            ScanState::Failed { .. } => "failed",
        }
    }
}

/// Capture session settings: decode rate and square detection box edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    pub fps: u32,
    pub qr_box: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            qr_box: 280,
        }
    }
}

/// One callback from the capture device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A QR code was found and decoded to text.
    Decoded(String),
    /// No code in this frame; carries the decoder's reason.
    Miss(String),
}
