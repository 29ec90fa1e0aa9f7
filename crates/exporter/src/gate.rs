use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Open,
    Closed,
    Published,
}

/// Settles the race between a finished write and a caller that stopped waiting.
///
/// Publishing and closing are serialized: either the artifact is published and
/// `close` reports it, or the gate is closed first and nothing is published.
#[derive(Debug)]
pub struct PublishGate {
    state: Mutex<GateState>,
}

impl Default for PublishGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Open),
        }
    }

    /// Forbids any later publish. Returns `false` if the artifact was already
    /// published, in which case the file on disk is the new one.
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if *state == GateState::Published {
            return false;
        }
        *state = GateState::Closed;
        true
    }

    pub fn is_closed(&self) -> bool {
        *self.lock() == GateState::Closed
    }

    pub fn is_published(&self) -> bool {
        *self.lock() == GateState::Published
    }

    /// Runs `publish` unless the gate is closed. The gate stays locked while it
    /// runs, so `close` waits for an in-progress publish to settle.
    pub(crate) fn publish<T, E>(&self, publish: impl FnOnce() -> Result<T, E>) -> Option<Result<T, E>> {
        let mut state = self.lock();
        if *state == GateState::Closed {
            return None;
        }
        let result = publish();
        if result.is_ok() {
            *state = GateState::Published;
        }
        Some(result)
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
