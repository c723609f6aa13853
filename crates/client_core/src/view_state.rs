//! Single-writer view state shared between the submission controller and any
//! number of presenters.

use std::sync::Arc;

use shared::protocol::GenerationResult;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub result: Option<Arc<GenerationResult>>,
    pub is_pending: bool,
    pub error: Option<String>,
}

/// Writer side. Only the submission controller holds one.
#[derive(Debug)]
pub struct ViewStateStore {
    tx: watch::Sender<ViewState>,
}

impl Default for ViewStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> ViewStateReader {
        ViewStateReader {
            rx: self.tx.subscribe(),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.tx.borrow().clone()
    }

    /// Computes the next state from the current one and swaps it in whole.
    /// Returning `None` leaves the state (and subscribers) untouched.
    pub(crate) fn replace_with(&self, next: impl FnOnce(&ViewState) -> Option<ViewState>) -> bool {
        self.tx.send_if_modified(|current| match next(current) {
            Some(state) => {
                *current = state;
                true
            }
            None => false,
        })
    }
}

/// Read-only handle. Every snapshot is a complete, consistent state.
#[derive(Debug, Clone)]
pub struct ViewStateReader {
    rx: watch::Receiver<ViewState>,
}

impl ViewStateReader {
    pub fn snapshot(&self) -> ViewState {
        self.rx.borrow().clone()
    }

    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Marks the current state as seen and returns it.
    pub fn snapshot_and_mark_seen(&mut self) -> ViewState {
        self.rx.borrow_and_update().clone()
    }

    /// Waits for the next state change. Returns `false` once the writer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
