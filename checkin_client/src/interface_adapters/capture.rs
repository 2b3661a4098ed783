use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::domain::{CaptureConfig, CaptureDevice, CaptureError, Frame};

// Capture device for handheld keyboard-wedge scanners: each decoded QR arrives
// as one line of text. A blank line counts as a frame without a code.
pub struct LineCaptureDevice<R> {
    reader: R,
    line: Vec<u8>,
    active: bool,
}

impl<R: AsyncBufRead + Unpin + Send> LineCaptureDevice<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            active: false,
        }
    }
}

impl LineCaptureDevice<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> CaptureDevice for LineCaptureDevice<R> {
    async fn start(&mut self, config: CaptureConfig) -> Result<(), CaptureError> {
        // Hardware scanners decode on their own; the settings are only reported.
        tracing::debug!(fps = config.fps, qr_box = config.qr_box, "capture session started.");
        self.active = true;
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        if !self.active {
            return Err(CaptureError::Device("capture session not started".to_string()));
        }

        self.line.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.line)
            .await
            .map_err(|err| CaptureError::Device(err.to_string()))?;
        if read == 0 {
            return Err(CaptureError::Closed);
        }

        // Garbled bytes still count as a decoded code; the token codec rejects them.
        let text = String::from_utf8_lossy(&self.line);
        let text = text.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            return Ok(Frame::Miss("blank line".to_string()));
        }
        Ok(Frame::Decoded(text.to_string()))
    }

    async fn stop(&mut self) {
        self.active = false;
    }
}
