use tokio::sync::mpsc;

/// Everything the output activity can be asked to do. The order in which
/// events enter the queue is the order in which the terminal is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// Insert a message line above the prompt.
    Text(String),
    /// Repaint the prompt only.
    Redraw,
    /// Stop the output activity after everything queued before it.
    Shutdown,
}

pub type OutputReceiver = mpsc::UnboundedReceiver<OutputEvent>;

/// Cloneable handle used by every producer of terminal output.
///
/// Sends never block. Once the output activity is gone, events are dropped
/// silently: there is nowhere left to show them.
#[derive(Debug, Clone)]
pub struct OutputSink {
    tx: mpsc::UnboundedSender<OutputEvent>,
}

impl OutputSink {
    pub fn channel() -> (Self, OutputReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn text(&self, line: impl Into<String>) {
        let _ = self.tx.send(OutputEvent::Text(line.into()));
    }

    pub fn redraw(&self) {
        let _ = self.tx.send(OutputEvent::Redraw);
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(OutputEvent::Shutdown);
    }
}

/// Drain whatever is queued right now. Test helper for asserting on output.
#[cfg(test)]
pub fn drain(rx: &mut OutputReceiver) -> Vec<OutputEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Only the `Text` lines among the queued events.
#[cfg(test)]
pub fn drain_text(rx: &mut OutputReceiver) -> Vec<String> {
    drain(rx)
        .into_iter()
        .filter_map(|e| match e {
            OutputEvent::Text(line) => Some(line),
            _ => None,
        })
        .collect()
}
