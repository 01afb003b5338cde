//! Immutable tabular state for the gridlog history model.
//!
//! A [`GridState`] is a published snapshot of a project's data: a column
//! schema, rows of JSON cells, and optional metadata. Snapshots are values,
//! never mutated in place; new snapshots are derived through the pure
//! `remap_*` helpers, which share row storage whenever a derivation leaves
//! the rows untouched.

mod codec;
mod state;

pub use codec::{decode_grid, encode_grid, GridCodecError};
pub use state::{Column, GridState, Row};

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
