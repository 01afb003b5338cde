//! Builtin change variants.
//!
//! One file per variant; each holds the variant struct, its [`Change`]
//! impl, and the decoder registered under its tag. Tags are frozen strings
//! and field sets evolve additively only — see each variant's docs for the
//! documented field map.

mod add_column;
mod mass_edit;
mod reconcile_column;
mod remove_column;
mod remove_rows;
mod rename_column;
mod set_cell;

pub use add_column::AddColumn;
pub use mass_edit::{MassEdit, MassEditEntry};
pub use reconcile_column::{ReconMatch, ReconcileColumn};
pub use remove_column::RemoveColumn;
pub use remove_rows::RemoveRows;
pub use rename_column::RenameColumn;
pub use set_cell::SetCell;

use serde_json::{Map, Value};

use crate::change::{ChangeError, DecodeFn};
use crate::registry::{ChangeTypeRegistry, RegistryError};

/// Every variant shipped with this crate, in tag order.
pub const BUILTIN_CHANGES: &[(&str, DecodeFn)] = &[
    (AddColumn::TAG, add_column::decode),
    (RenameColumn::TAG, rename_column::decode),
    (RemoveColumn::TAG, remove_column::decode),
    (SetCell::TAG, set_cell::decode),
    (MassEdit::TAG, mass_edit::decode),
    (RemoveRows::TAG, remove_rows::decode),
    (ReconcileColumn::TAG, reconcile_column::decode),
];

/// Registers all builtin variants on an existing registry.
pub fn register_builtin_changes(registry: &mut ChangeTypeRegistry) -> Result<(), RegistryError> {
    for (tag, decode) in BUILTIN_CHANGES {
        registry.register(*tag, *decode)?;
    }
    Ok(())
}

/// A fresh registry pre-loaded with all builtin variants.
pub fn builtin_registry() -> ChangeTypeRegistry {
    let mut registry = ChangeTypeRegistry::new();
    register_builtin_changes(&mut registry).expect("builtin change tags are unique");
    registry
}

fn require_str<'a>(
    fields: &'a Map<String, Value>,
    tag: &'static str,
    field: &'static str,
) -> Result<&'a str, ChangeError> {
    match fields.get(field) {
        Some(v) => v
            .as_str()
            .ok_or(ChangeError::InvalidField { tag, field }),
        None => Err(ChangeError::MissingField { tag, field }),
    }
}

fn require_usize(
    fields: &Map<String, Value>,
    tag: &'static str,
    field: &'static str,
) -> Result<usize, ChangeError> {
    match fields.get(field) {
        Some(v) => {
            let n = v
                .as_u64()
                .ok_or(ChangeError::InvalidField { tag, field })?;
            usize::try_from(n).map_err(|_| ChangeError::InvalidField { tag, field })
        }
        None => Err(ChangeError::MissingField { tag, field }),
    }
}

fn require_array<'a>(
    fields: &'a Map<String, Value>,
    tag: &'static str,
    field: &'static str,
) -> Result<&'a [Value], ChangeError> {
    match fields.get(field) {
        Some(v) => v
            .as_array()
            .map(Vec::as_slice)
            .ok_or(ChangeError::InvalidField { tag, field }),
        None => Err(ChangeError::MissingField { tag, field }),
    }
}

fn require_value(
    fields: &Map<String, Value>,
    tag: &'static str,
    field: &'static str,
) -> Result<Value, ChangeError> {
    fields
        .get(field)
        .cloned()
        .ok_or(ChangeError::MissingField { tag, field })
}
