//! Copy-to-clipboard with a transient "Copied!" confirmation.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use thiserror::Error;
use tokio::time::Instant;

use team_protocol::COPY_FEEDBACK_MS;

/// Label shown while the confirmation window is open.
pub const COPIED_LABEL: &str = "Copied!";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write to clipboard: {0}")]
    Io(#[from] std::io::Error),
}

/// Clipboard capability provided by the host environment.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard writes through the terminal using the OSC 52 escape sequence.
///
/// Works over SSH and inside multiplexers that pass OSC 52 through; the
/// terminal decides whether to honour it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Osc52Clipboard;

impl Osc52Clipboard {
    fn sequence(text: &str) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
        format!("\x1b]52;c;{encoded}\x07")
    }
}

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(Self::sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Keeps copied strings in memory. Used where no terminal is attached.
#[derive(Debug, Default)]
pub struct RecordingClipboard {
    writes: Mutex<Vec<String>>,
    unavailable: bool,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails.
    pub fn unavailable() -> Self {
        Self { writes: Mutex::new(Vec::new()), unavailable: true }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::Unavailable("no clipboard in this environment".into()));
        }
        self.writes
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?
            .push(text.to_string());
        Ok(())
    }
}

/// Confirmation state of a copy button.
///
/// Each successful copy (re)opens a window of [`COPY_FEEDBACK_MS`]; the
/// latest copy decides when it closes. Failures are logged and leave the
/// state untouched.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    copied_until: Option<Instant>,
    window: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(COPY_FEEDBACK_MS))
    }

    pub fn with_window(window: Duration) -> Self {
        Self { copied_until: None, window }
    }

    /// Copy `text`. Returns whether the write succeeded.
    pub fn copy(&mut self, clipboard: &dyn Clipboard, text: &str) -> bool {
        match clipboard.write_text(text) {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + self.window);
                tracing::debug!(chars = text.chars().count(), "Copied to clipboard");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to copy");
                false
            }
        }
    }

    pub fn is_copied(&self) -> bool {
        self.copied_until.is_some_and(|until| Instant::now() < until)
    }

    /// `Copied!` inside the window, `idle` otherwise.
    pub fn label(&self, idle: &'static str) -> &'static str {
        if self.is_copied() {
            COPIED_LABEL
        } else {
            idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn osc52_sequence_encodes_payload() {
        assert_eq!(Osc52Clipboard::sequence("REF123"), "\x1b]52;c;UkVGMTIz\x07");
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_reverts_after_window() {
        let clipboard = RecordingClipboard::new();
        let mut feedback = CopyFeedback::new();
        assert_eq!(feedback.label("Copy Code"), "Copy Code");

        assert!(feedback.copy(&clipboard, "REF123"));
        assert_eq!(clipboard.writes(), vec!["REF123".to_string()]);
        assert_eq!(feedback.label("Copy Code"), "Copied!");

        tokio::time::advance(Duration::from_millis(1_999)).await;
        assert_eq!(feedback.label("Copy Code"), "Copied!");
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(feedback.label("Copy Code"), "Copy Code");
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_copy_restarts_window() {
        let clipboard = RecordingClipboard::new();
        let mut feedback = CopyFeedback::new();

        feedback.copy(&clipboard, "REF123");
        tokio::time::advance(Duration::from_millis(1_500)).await;
        feedback.copy(&clipboard, "https://example.com/?ref=REF123");

        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert!(feedback.is_copied(), "first window's expiry must not revert the second copy");
        tokio::time::advance(Duration::from_millis(1_000)).await;
        assert!(!feedback.is_copied());
    }

    #[tokio::test]
    async fn failed_copy_is_silent() {
        let clipboard = RecordingClipboard::unavailable();
        let mut feedback = CopyFeedback::new();
        assert!(!feedback.copy(&clipboard, "REF123"));
        assert!(!feedback.is_copied());
    }
}
