//! Host implementations of the engine's collaborator traits.

use std::io::Write;
use std::path::PathBuf;

use shakecat_core::{HapticPattern, Haptics, ShareError, ShareRequest, ShareTarget};

/// A terminal has no vibration motor; requests are logged instead.
#[derive(Debug, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn vibrate(&mut self, pattern: &HapticPattern) {
        match pattern {
            HapticPattern::Pulse(ms) => tracing::debug!("haptic pulse {ms}ms"),
            HapticPattern::Pattern(steps) => {
                tracing::debug!("haptic pattern {steps:?} ({}ms)", pattern.total_ms())
            }
        }
    }
}

/// "Native" share sheet: writes title and text to stdout.
#[derive(Debug, Default)]
pub struct StdoutShare;

impl ShareTarget for StdoutShare {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "[{}]", request.title)
            .and_then(|_| writeln!(out, "{}", request.text))
            .map_err(|e| ShareError::Failed(e.to_string()))
    }
}

/// Clipboard stand-in: the share text is written to a file.
#[derive(Debug)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ShareTarget for FileClipboard {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError> {
        std::fs::write(&self.path, &request.text).map_err(|e| ShareError::Failed(e.to_string()))
    }
}
