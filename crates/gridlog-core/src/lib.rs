//! Append-only change history for tabular project data.
//!
//! A project's data lives in an immutable [`GridState`](gridlog_grid::GridState)
//! snapshot. Every edit is a [`Change`]: a named, serializable, deterministic
//! transformation from one snapshot to the next. Applied changes accumulate
//! in a [`History`], which navigates undo/redo by moving a cursor over
//! cached snapshots, and persists through a tagged JSON envelope whose
//! `type` field is resolved by a [`ChangeTypeRegistry`].
//!
//! ```
//! use gridlog_core::{changes::AddColumn, History};
//! use gridlog_grid::GridState;
//! use serde_json::Value;
//!
//! let mut history = History::new(GridState::empty());
//! history
//!     .apply(Box::new(AddColumn::new("name", Value::Null)), "add name column")
//!     .unwrap();
//! assert_eq!(history.current_state().column_count(), 1);
//! history.undo().unwrap();
//! assert_eq!(history.current_state().column_count(), 0);
//! ```

pub mod change;
pub mod changes;
pub mod history;
pub mod history_codec;
pub mod registry;
pub mod shared;

pub use change::{changes_equal, Change, ChangeError, DecodeFn};
pub use history::{History, HistoryEntry, HistoryError};
pub use registry::{ChangeTypeRegistry, RegistryError};
pub use shared::SharedHistory;

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
