//! Tagged JSON envelope for persisted histories.
//!
//! Each entry serializes to one object:
//!
//! ```json
//! { "type": "add-column", "description": "add column C",
//!   "timestamp": "2024-05-01T12:00:00Z", "name": "C", "default": 0 }
//! ```
//!
//! `type` is mandatory and is read first: it selects the variant decoder
//! through the registry before any other field is interpreted. The envelope
//! keys `type`, `description`, and `timestamp` are reserved; everything
//! else belongs to the variant. Timestamps encode as RFC 3339 and decode
//! from either RFC 3339 strings or epoch-seconds integers.
//!
//! A whole history persists as a versioned document holding the initial
//! grid, the entry list, and the cursor, so an undone tail survives a
//! save/load cycle. Decode failures are read-only: they abort the load and
//! construct nothing.

use chrono::{DateTime, Utc};
use gridlog_grid::{decode_grid, encode_grid, GridCodecError};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::change::{Change, ChangeError};
use crate::history::{History, HistoryEntry, HistoryError};
use crate::registry::{ChangeTypeRegistry, RegistryError};

pub const HISTORY_FORMAT_VERSION: u64 = 1;

/// Envelope keys reserved for entry provenance; never variant fields.
const RESERVED_KEYS: &[&str] = &["type", "description", "timestamp"];

#[derive(Debug, Error)]
pub enum HistoryCodecError {
    #[error("unsupported history format version: {0}")]
    UnsupportedVersion(u64),
    #[error("invalid history payload")]
    InvalidPayload,
    #[error("invalid history entry")]
    InvalidEntry,
    #[error("missing change type tag")]
    MissingTypeTag,
    #[error("invalid entry timestamp")]
    InvalidTimestamp,
    #[error("stored cursor {cursor} out of range (entry count {count})")]
    CursorOutOfRange { cursor: usize, count: usize },
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("change decode failed: {0}")]
    Change(#[from] ChangeError),
    #[error("grid decode failed: {0}")]
    Grid(#[from] GridCodecError),
    #[error("history replay failed: {0}")]
    Replay(#[from] HistoryError),
}

/// A decoded entry envelope, before it is replayed into a history.
#[derive(Debug)]
pub struct DecodedEntry {
    pub change: Box<dyn Change>,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

pub fn encode_entry(entry: &HistoryEntry) -> Value {
    let mut out = Map::new();
    out.insert(
        "type".to_string(),
        Value::String(entry.change().type_tag().to_string()),
    );
    out.insert(
        "description".to_string(),
        Value::String(entry.description().to_string()),
    );
    out.insert(
        "timestamp".to_string(),
        Value::String(entry.timestamp().to_rfc3339()),
    );
    for (key, value) in entry.change().to_fields() {
        // Variant fields must not shadow envelope provenance.
        if !RESERVED_KEYS.contains(&key.as_str()) {
            out.insert(key, value);
        }
    }
    Value::Object(out)
}

pub fn decode_entry(
    value: &Value,
    registry: &ChangeTypeRegistry,
) -> Result<DecodedEntry, HistoryCodecError> {
    let obj = value.as_object().ok_or(HistoryCodecError::InvalidEntry)?;
    let tag = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(HistoryCodecError::MissingTypeTag)?;
    let decode = registry.resolve(tag)?;
    let change = decode(obj)?;
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let timestamp = decode_timestamp(
        obj.get("timestamp")
            .ok_or(HistoryCodecError::InvalidTimestamp)?,
    )?;
    Ok(DecodedEntry {
        change,
        description,
        timestamp,
    })
}

fn decode_timestamp(value: &Value) -> Result<DateTime<Utc>, HistoryCodecError> {
    if let Some(secs) = value.as_i64() {
        return DateTime::from_timestamp(secs, 0).ok_or(HistoryCodecError::InvalidTimestamp);
    }
    let text = value
        .as_str()
        .ok_or(HistoryCodecError::InvalidTimestamp)?;
    DateTime::parse_from_rfc3339(text)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| HistoryCodecError::InvalidTimestamp)
}

pub fn encode_history(history: &History) -> Value {
    let mut root = Map::new();
    root.insert(
        "version".to_string(),
        Value::from(HISTORY_FORMAT_VERSION),
    );
    root.insert("initial".to_string(), encode_grid(history.initial_state()));
    root.insert("cursor".to_string(), Value::from(history.cursor() as u64));
    root.insert(
        "entries".to_string(),
        Value::Array(history.entries().iter().map(encode_entry).collect()),
    );
    Value::Object(root)
}

pub fn decode_history(
    value: &Value,
    registry: &ChangeTypeRegistry,
) -> Result<History, HistoryCodecError> {
    let root = value.as_object().ok_or(HistoryCodecError::InvalidPayload)?;

    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(HistoryCodecError::InvalidPayload)?;
    if version != HISTORY_FORMAT_VERSION {
        return Err(HistoryCodecError::UnsupportedVersion(version));
    }

    let initial = decode_grid(root.get("initial").ok_or(HistoryCodecError::InvalidPayload)?)?;
    let rows = root
        .get("entries")
        .and_then(Value::as_array)
        .ok_or(HistoryCodecError::InvalidPayload)?;
    let cursor = root
        .get("cursor")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(HistoryCodecError::InvalidPayload)?;
    if cursor > rows.len() {
        return Err(HistoryCodecError::CursorOutOfRange {
            cursor,
            count: rows.len(),
        });
    }

    // Decode every envelope before building the history, so an unknown tag
    // or malformed entry constructs nothing.
    let mut decoded = Vec::with_capacity(rows.len());
    for row in rows {
        decoded.push(decode_entry(row, registry)?);
    }

    let mut history = History::new(initial);
    for entry in decoded {
        history.record(entry.change, entry.description, entry.timestamp)?;
    }
    while history.cursor() > cursor {
        history.undo()?;
    }
    Ok(history)
}
