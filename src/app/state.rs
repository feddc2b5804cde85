use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mutable record of the connection as seen by this client.
///
/// `current_channel` moves as soon as the user asks to join somewhere;
/// `joined_channels` only changes when the server confirms, except for the
/// optimistic removal done by `/part`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub nickname: String,
    pub registered: bool,
    pub current_channel: String,
    pub joined_channels: HashSet<String>,
}

impl SessionState {
    pub fn new(nickname: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            registered: false,
            current_channel: channel.into(),
            joined_channels: HashSet::new(),
        }
    }

    pub fn is_self(&self, nick: &str) -> bool {
        nick.eq_ignore_ascii_case(&self.nickname)
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.current_channel)
    }
}

/// Shared handle to the session, used by the receive and input activities.
///
/// Every read and write goes through [`Session::lock`]; callers keep the guard
/// for one logical update and never across a network send or a sleep.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    pub fn new(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Poisoning is ignored: each field update is a single assignment.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    #[cfg(test)]
    pub fn is_locked(&self) -> bool {
        matches!(
            self.inner.try_lock(),
            Err(std::sync::TryLockError::WouldBlock)
        )
    }
}

/// The line the user is typing. Written only by the input activity; the
/// output activity reads it to repaint the prompt.
#[derive(Debug, Clone, Default)]
pub struct PendingInput {
    inner: Arc<Mutex<String>>,
}

impl PendingInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_char(&self, c: char) {
        self.lock().push(c);
    }

    pub fn delete_back(&self) {
        self.lock().pop();
    }

    /// Take the submitted line, leaving the buffer empty.
    pub fn take_text(&self) -> String {
        std::mem::take(&mut *self.lock())
    }

    pub fn text(&self) -> String {
        self.lock().clone()
    }
}
