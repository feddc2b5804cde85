//! Outbound side of the connection.
//!
//! [`Transport`] is the seam between the engine and the encrypted stream.
//! [`Outbox`] sits on top of it and turns send failures into visible output
//! lines instead of errors, so a dead connection never stops the session.

use crate::app::action::Action;
use crate::app::event::OutputSink;
use crate::irc::codec;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed")]
    Closed,
    #[error("invalid server name: {0}")]
    InvalidServerName(String),
}

/// A bidirectional byte stream's sending half.
pub trait Transport: Send + Sync {
    fn send(&self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// Frames [`Action`]s and hands them to the transport, reporting failures
/// through the output sink.
#[derive(Clone)]
pub struct Outbox {
    transport: Arc<dyn Transport>,
    sink: OutputSink,
}

impl Outbox {
    pub fn new(transport: Arc<dyn Transport>, sink: OutputSink) -> Self {
        Self { transport, sink }
    }

    pub fn send(&self, action: &Action) {
        tracing::debug!(line = %action.redacted(), "send");
        let bytes = codec::frame(&action.to_string());
        if let Err(e) = self.transport.send(&bytes) {
            tracing::warn!(error = %e, "send failed");
            self.sink.text(format!("[send error] {}", e));
        }
    }
}

/// Transport that records every line it is given. Test helper.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingTransport {
    lines: std::sync::Mutex<Vec<String>>,
    fail: bool,
}

#[cfg(test)]
impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Recorded lines with their `\r\n` terminator stripped.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.trim_end_matches("\r\n").to_string())
            .collect()
    }

    pub fn raw(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Transport for RecordingTransport {
    fn send(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail {
            return Err(TransportError::Closed);
        }
        self.lines
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(bytes).into_owned());
        Ok(())
    }
}
