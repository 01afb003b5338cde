use gridlog_core::changes::{builtin_registry, AddColumn, MassEdit, MassEditEntry, SetCell};
use gridlog_core::history_codec::{
    decode_entry, decode_history, encode_entry, encode_history, HistoryCodecError,
    HISTORY_FORMAT_VERSION,
};
use gridlog_core::registry::RegistryError;
use gridlog_core::{changes_equal, History};
use gridlog_grid::{Column, GridState, Row};
use serde_json::{json, Value};

fn sample_history() -> History {
    let mut history = History::new(GridState::new(
        vec![Column::new("name"), Column::new("city")],
        vec![
            Row::new(vec![json!("ada"), json!("london")]),
            Row::new(vec![json!("grace"), json!("nyc")]),
        ],
    ));
    history
        .apply(Box::new(AddColumn::new("score", json!(0))), "add score")
        .expect("apply must succeed");
    history
        .apply(Box::new(SetCell::new(0, "score", json!(7))), "set ada's score")
        .expect("apply must succeed");
    history
        .apply(
            Box::new(MassEdit::new(
                "city",
                vec![MassEditEntry {
                    from: json!("nyc"),
                    to: json!("New York"),
                }],
            )),
            "normalize cities",
        )
        .expect("apply must succeed");
    history
}

#[test]
fn entry_envelope_has_tag_first_layout() {
    let history = sample_history();
    let encoded = encode_entry(&history.entries()[0]);
    let obj = encoded.as_object().expect("entry must encode to an object");

    // preserve_order keeps insertion order: envelope keys lead, variant
    // fields follow.
    let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    assert_eq!(&keys[..3], &["type", "description", "timestamp"]);
    assert_eq!(obj.get("type"), Some(&json!("add-column")));
    assert_eq!(obj.get("description"), Some(&json!("add score")));
    assert_eq!(obj.get("name"), Some(&json!("score")));
}

#[test]
fn entry_roundtrip_preserves_change_and_provenance() {
    let registry = builtin_registry();
    let history = sample_history();

    for entry in history.entries() {
        let encoded = encode_entry(entry);
        let decoded = decode_entry(&encoded, &registry).expect("entry must decode");
        assert!(
            changes_equal(entry.change(), decoded.change.as_ref()),
            "change must round-trip for {}",
            entry.change().type_tag()
        );
        assert_eq!(decoded.description, entry.description());
        assert_eq!(decoded.timestamp, entry.timestamp());
    }
}

#[test]
fn epoch_seconds_timestamps_decode() {
    let registry = builtin_registry();
    let payload = json!({
        "type": "add-column",
        "description": "add score",
        "timestamp": 1714564800,
        "name": "score"
    });
    let decoded = decode_entry(&payload, &registry).expect("epoch timestamp must decode");
    assert_eq!(decoded.timestamp.timestamp(), 1714564800);
}

#[test]
fn malformed_timestamps_are_rejected() {
    let registry = builtin_registry();
    for timestamp in [json!("not a date"), json!(true), Value::Null] {
        let payload = json!({
            "type": "add-column",
            "timestamp": timestamp,
            "name": "score"
        });
        let err = decode_entry(&payload, &registry).expect_err("bad timestamp must fail");
        assert!(matches!(err, HistoryCodecError::InvalidTimestamp));
    }
}

#[test]
fn missing_type_tag_is_a_hard_failure() {
    let registry = builtin_registry();
    let payload = json!({"description": "mystery", "timestamp": 0, "name": "x"});
    let err = decode_entry(&payload, &registry).expect_err("missing type must fail");
    assert!(matches!(err, HistoryCodecError::MissingTypeTag));
}

#[test]
fn unknown_type_tag_is_a_hard_failure() {
    let registry = builtin_registry();
    let payload = json!({"type": "nonexistent-type", "timestamp": 0});
    let err = decode_entry(&payload, &registry).expect_err("unknown type must fail");
    assert!(matches!(
        err,
        HistoryCodecError::Registry(RegistryError::UnknownTag(tag)) if tag == "nonexistent-type"
    ));
}

#[test]
fn history_document_roundtrips() {
    let registry = builtin_registry();
    let history = sample_history();

    let encoded = encode_history(&history);
    let decoded = decode_history(&encoded, &registry).expect("history must decode");

    assert_eq!(decoded.cursor(), history.cursor());
    assert_eq!(decoded.len(), history.len());
    assert_eq!(decoded.initial_state(), history.initial_state());
    assert_eq!(decoded.current_state(), history.current_state());
    for (a, b) in decoded.entries().iter().zip(history.entries()) {
        assert!(changes_equal(a.change(), b.change()));
        assert_eq!(a.state(), b.state(), "replayed snapshots must match");
        assert_eq!(a.timestamp(), b.timestamp());
    }
}

#[test]
fn history_document_roundtrips_with_undone_tail() {
    let registry = builtin_registry();
    let mut history = sample_history();
    history.undo().expect("undo must succeed");
    history.undo().expect("undo must succeed");

    let encoded = encode_history(&history);
    assert_eq!(encoded["cursor"], json!(1));

    let mut decoded = decode_history(&encoded, &registry).expect("history must decode");
    assert_eq!(decoded.cursor(), 1);
    assert_eq!(decoded.len(), 3, "undone tail must survive persistence");
    assert_eq!(decoded.current_state(), history.current_state());

    // Redo still replays the stored tail.
    decoded.redo().expect("redo must succeed after load");
    decoded.redo().expect("second redo must succeed after load");
    let fully_redone = decoded.current_state().clone();
    history.redo().expect("redo must succeed");
    history.redo().expect("redo must succeed");
    assert_eq!(&fully_redone, history.current_state());
}

#[test]
fn loaded_history_satisfies_replay_equivalence() {
    let registry = builtin_registry();
    let encoded = encode_history(&sample_history());
    let decoded = decode_history(&encoded, &registry).expect("history must decode");
    assert_eq!(
        &decoded.replayed_state().expect("replay must succeed"),
        decoded.current_state()
    );
}

#[test]
fn unsupported_version_is_rejected() {
    let registry = builtin_registry();
    let mut encoded = encode_history(&sample_history());
    encoded["version"] = json!(HISTORY_FORMAT_VERSION + 1);

    let err = decode_history(&encoded, &registry).expect_err("future version must be rejected");
    assert!(matches!(err, HistoryCodecError::UnsupportedVersion(v) if v == HISTORY_FORMAT_VERSION + 1));
}

#[test]
fn stored_cursor_out_of_range_is_rejected() {
    let registry = builtin_registry();
    let mut encoded = encode_history(&sample_history());
    encoded["cursor"] = json!(99);

    let err = decode_history(&encoded, &registry).expect_err("bad cursor must be rejected");
    assert!(matches!(
        err,
        HistoryCodecError::CursorOutOfRange { cursor: 99, count: 3 }
    ));
}

#[test]
fn one_unknown_entry_fails_the_whole_load() {
    let registry = builtin_registry();
    let mut encoded = encode_history(&sample_history());
    encoded["entries"][1] = json!({"type": "nonexistent-type", "timestamp": 0});

    let err = decode_history(&encoded, &registry)
        .expect_err("a single unknown entry must fail the load");
    assert!(matches!(
        err,
        HistoryCodecError::Registry(RegistryError::UnknownTag(_))
    ));
}

#[test]
fn decode_failure_leaves_the_source_bytes_usable() {
    // Read-only failure: the same document decodes fine once the registry
    // knows the tag, so nothing was consumed or corrupted by the failed
    // attempt.
    let full = builtin_registry();
    let empty = gridlog_core::ChangeTypeRegistry::new();
    let encoded = encode_history(&sample_history());

    decode_history(&encoded, &empty).expect_err("empty registry must fail the load");
    decode_history(&encoded, &full).expect("same payload must decode with a full registry");
}
