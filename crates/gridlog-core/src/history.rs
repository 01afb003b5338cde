//! Ordered change log with undo/redo navigation.
//!
//! The history owns the project's initial snapshot plus an append-only
//! entry sequence and a cursor in `[0, N]`; cursor 0 denotes the initial
//! state. Every entry caches the snapshot its change produced, so undo and
//! redo are cursor moves, not recomputation. Replaying the prefix up to the
//! cursor from the initial state must reproduce the cached current state;
//! [`History::replayed_state`] exposes that path so the equivalence can be
//! checked.

use chrono::{DateTime, Utc};
use gridlog_grid::GridState;
use thiserror::Error;

use crate::change::{Change, ChangeError};

#[derive(Debug, Error)]
pub enum HistoryError {
    /// Undo requested at cursor 0.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Redo requested with no undone tail.
    #[error("nothing to redo")]
    NothingToRedo,

    /// The submitted change rejected the current snapshot.
    #[error(transparent)]
    Change(#[from] ChangeError),
}

/// One applied change plus its provenance and resulting snapshot.
/// Immutable once recorded.
#[derive(Debug)]
pub struct HistoryEntry {
    change: Box<dyn Change>,
    description: String,
    timestamp: DateTime<Utc>,
    state: GridState,
}

impl HistoryEntry {
    pub fn change(&self) -> &dyn Change {
        self.change.as_ref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The snapshot this entry's change produced.
    pub fn state(&self) -> &GridState {
        &self.state
    }
}

/// The navigable log of applied changes for one project.
#[derive(Debug)]
pub struct History {
    initial: GridState,
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new(initial: GridState) -> Self {
        Self {
            initial,
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Applies `change` to the current snapshot and records the result,
    /// stamped with the current time.
    ///
    /// Any undone tail past the cursor is discarded on success: a divergent
    /// edit deliberately invalidates redo. On failure the entry sequence
    /// and cursor are untouched and the change's error propagates.
    pub fn apply(
        &mut self,
        change: Box<dyn Change>,
        description: impl Into<String>,
    ) -> Result<&GridState, HistoryError> {
        self.record(change, description, Utc::now())
    }

    /// Same transition as [`History::apply`] with an explicit timestamp.
    /// Used when loading persisted histories, where the stamp comes from
    /// the stored entry rather than the clock.
    pub fn record(
        &mut self,
        change: Box<dyn Change>,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<&GridState, HistoryError> {
        // The new snapshot is computed before any mutation, so a failed
        // apply leaves the log exactly as it was.
        let state = change.apply(self.current_state())?;
        self.entries.truncate(self.cursor);
        self.entries.push(HistoryEntry {
            change,
            description: description.into(),
            timestamp,
            state,
        });
        self.cursor += 1;
        Ok(&self.entries[self.cursor - 1].state)
    }

    pub fn undo(&mut self) -> Result<&GridState, HistoryError> {
        if self.cursor == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        self.cursor -= 1;
        Ok(self.current_state())
    }

    pub fn redo(&mut self) -> Result<&GridState, HistoryError> {
        if self.cursor == self.entries.len() {
            return Err(HistoryError::NothingToRedo);
        }
        self.cursor += 1;
        Ok(self.current_state())
    }

    /// The snapshot at the cursor, via the cached path.
    pub fn current_state(&self) -> &GridState {
        if self.cursor == 0 {
            &self.initial
        } else {
            &self.entries[self.cursor - 1].state
        }
    }

    /// Recomputes the snapshot at the cursor by replaying every entry up to
    /// it from the initial state. Must equal [`History::current_state`];
    /// callers use it as a recovery path and tests hold the two equal.
    pub fn replayed_state(&self) -> Result<GridState, HistoryError> {
        let mut state = self.initial.clone();
        for entry in &self.entries[..self.cursor] {
            state = entry.change.apply(&state)?;
        }
        Ok(state)
    }

    /// Retention window: discards entries older than the last `retain`,
    /// folding them into a new initial state. Entries past the cursor are
    /// never folded, so undo down to the new floor and redo both survive.
    pub fn compact(&mut self, retain: usize) {
        let drop = self
            .entries
            .len()
            .saturating_sub(retain)
            .min(self.cursor);
        if drop == 0 {
            return;
        }
        self.initial = self.entries[drop - 1].state.clone();
        self.entries.drain(..drop);
        self.cursor -= drop;
    }

    pub fn initial_state(&self) -> &GridState {
        &self.initial
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }
}
