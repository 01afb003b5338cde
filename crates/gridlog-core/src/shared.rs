//! Write-serialized handle for sharing one history across threads.
//!
//! Exactly one apply/undo/redo runs at a time per history; reads of the
//! current snapshot proceed concurrently but never interleave with a
//! write. This is the full-serialization discipline: the cursor-and-
//! sequence transition is not atomic across its check-then-act, so writers
//! hold the lock for the whole transition.

use std::sync::{Arc, PoisonError, RwLock};

use gridlog_grid::GridState;

use crate::change::Change;
use crate::history::{History, HistoryError};

#[derive(Debug, Clone)]
pub struct SharedHistory {
    inner: Arc<RwLock<History>>,
}

impl SharedHistory {
    pub fn new(history: History) -> Self {
        Self {
            inner: Arc::new(RwLock::new(history)),
        }
    }

    /// Applies a change under the write lock and returns the resulting
    /// snapshot. The returned value is an owned handle; cloning a grid is
    /// cheap because row storage is shared.
    pub fn apply(
        &self,
        change: Box<dyn Change>,
        description: impl Into<String>,
    ) -> Result<GridState, HistoryError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.apply(change, description).map(GridState::clone)
    }

    pub fn undo(&self) -> Result<GridState, HistoryError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.undo().map(GridState::clone)
    }

    pub fn redo(&self) -> Result<GridState, HistoryError> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.redo().map(GridState::clone)
    }

    /// Snapshot at the cursor, taken under the read lock.
    pub fn current_state(&self) -> GridState {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.current_state().clone()
    }

    /// Read access to the underlying history, e.g. for persistence.
    pub fn with<R>(&self, f: impl FnOnce(&History) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}
