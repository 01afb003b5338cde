//! Tag-to-decoder registry for change deserialization.
//!
//! The registry is an explicitly constructed value that is passed to
//! whatever loads persisted histories; there is no process-wide instance.
//! New change variants register themselves without touching any central
//! enumeration.

use indexmap::IndexMap;
use thiserror::Error;

use crate::change::DecodeFn;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration-time conflict. A configuration bug; fail fast.
    #[error("duplicate change type tag: {0}")]
    DuplicateTag(String),

    /// Deserialization met a tag nobody registered. Fatal to loading the
    /// affected history; must be surfaced, never swallowed, because a
    /// silently dropped change corrupts replay.
    #[error("unknown change type tag: {0}")]
    UnknownTag(String),
}

/// Maps a stable string tag to the decoder for one change variant.
#[derive(Debug, Default)]
pub struct ChangeTypeRegistry {
    decoders: IndexMap<String, DecodeFn>,
}

impl ChangeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `tag` to `decoder`. Registration happens during startup, not
    /// per request; a tag bound twice is an error.
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        decoder: DecodeFn,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if self.decoders.contains_key(&tag) {
            return Err(RegistryError::DuplicateTag(tag));
        }
        self.decoders.insert(tag, decoder);
        Ok(())
    }

    pub fn resolve(&self, tag: &str) -> Result<DecodeFn, RegistryError> {
        self.decoders
            .get(tag)
            .copied()
            .ok_or_else(|| RegistryError::UnknownTag(tag.to_string()))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.decoders.keys().map(String::as_str)
    }
}
