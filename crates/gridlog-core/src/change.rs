//! The polymorphic change contract.
//!
//! A change is a pure function from one grid snapshot to the next, plus a
//! stable serialized form. `apply` must not read the clock, randomness, or
//! any external state: replaying the same change against the same snapshot
//! has to reproduce the same result byte for byte.

use std::fmt;

use gridlog_grid::GridState;
use serde_json::{Map, Value};
use thiserror::Error;

/// Precondition and decode failures raised by change variants.
#[derive(Debug, Error)]
pub enum ChangeError {
    /// A required column is absent from the target snapshot.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// A column that must not exist is already present.
    #[error("column already exists: {0}")]
    DuplicateColumn(String),

    /// A row index points past the end of the snapshot.
    #[error("row index {index} out of bounds (row count {count})")]
    RowOutOfBounds { index: usize, count: usize },

    /// A serialized field required by the variant's decoder is absent.
    #[error("{tag}: missing field `{field}`")]
    MissingField {
        tag: &'static str,
        field: &'static str,
    },

    /// A serialized field is present but has the wrong shape.
    #[error("{tag}: invalid field `{field}`")]
    InvalidField {
        tag: &'static str,
        field: &'static str,
    },
}

/// A discrete, serializable mutation of a grid snapshot.
///
/// Implementations are closed, independently testable units. The contract:
///
/// - `apply` is deterministic and side-effect free; precondition violations
///   come back as a [`ChangeError`] naming the offending resource, never a
///   panic.
/// - `type_tag` is a durable on-disk identifier. Once a tag has shipped it
///   must never change; persisted histories depend on it.
/// - `to_fields` and the variant's registered decoder round-trip: decoding
///   the produced field map yields a value-equal change. Field evolution is
///   additive-only.
pub trait Change: fmt::Debug + Send + Sync {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError>;

    fn type_tag(&self) -> &'static str;

    /// Variant-specific fields of the serialized form. The envelope keys
    /// `type`, `description`, and `timestamp` are reserved and must not
    /// appear here.
    fn to_fields(&self) -> Map<String, Value>;
}

/// Reconstructs a change from its serialized field map. The map is the full
/// envelope object; decoders read only their documented fields.
pub type DecodeFn = fn(&Map<String, Value>) -> Result<Box<dyn Change>, ChangeError>;

/// Value equality across change trait objects: same tag, same fields.
pub fn changes_equal(a: &dyn Change, b: &dyn Change) -> bool {
    a.type_tag() == b.type_tag() && a.to_fields() == b.to_fields()
}
