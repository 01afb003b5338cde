use gridlog_core::change::{Change, ChangeError};
use gridlog_core::changes::{
    AddColumn, MassEdit, MassEditEntry, ReconMatch, ReconcileColumn, RemoveColumn, RemoveRows,
    RenameColumn, SetCell,
};
use gridlog_grid::{Column, GridState, Row};
use serde_json::{json, Value};

fn people_grid() -> GridState {
    GridState::new(
        vec![Column::new("name"), Column::new("city")],
        vec![
            Row::new(vec![json!("ada"), json!("london")]),
            Row::new(vec![json!("grace"), json!("nyc")]),
            Row::new(vec![json!("alan"), json!("london")]),
        ],
    )
}

#[test]
fn add_column_fills_default_and_rejects_duplicate() {
    let grid = people_grid();
    let next = AddColumn::new("score", json!(0))
        .apply(&grid)
        .expect("adding a fresh column must succeed");

    assert_eq!(next.column_index("score"), Some(2));
    assert_eq!(next.cell(0, 2), Some(&json!(0)));
    assert_eq!(next.cell(2, 2), Some(&json!(0)));
    // The prior snapshot is untouched.
    assert_eq!(grid.column_count(), 2);

    let err = AddColumn::new("name", Value::Null)
        .apply(&grid)
        .expect_err("duplicate column must be rejected");
    assert!(matches!(err, ChangeError::DuplicateColumn(name) if name == "name"));
}

#[test]
fn rename_column_shares_rows_and_checks_both_names() {
    let grid = people_grid();
    let next = RenameColumn::new("city", "location")
        .apply(&grid)
        .expect("rename must succeed");

    assert_eq!(next.column_index("location"), Some(1));
    assert_eq!(next.column_index("city"), None);
    assert!(
        std::ptr::eq(grid.rows().as_ptr(), next.rows().as_ptr()),
        "rename must not copy rows"
    );

    let err = RenameColumn::new("ghost", "x")
        .apply(&grid)
        .expect_err("renaming an absent column must fail");
    assert!(matches!(err, ChangeError::MissingColumn(name) if name == "ghost"));

    let err = RenameColumn::new("city", "name")
        .apply(&grid)
        .expect_err("renaming onto an existing column must fail");
    assert!(matches!(err, ChangeError::DuplicateColumn(name) if name == "name"));
}

#[test]
fn rename_column_to_itself_is_allowed() {
    let grid = people_grid();
    let next = RenameColumn::new("city", "city")
        .apply(&grid)
        .expect("self-rename must succeed");
    assert_eq!(next, grid);
}

#[test]
fn remove_column_drops_cells() {
    let grid = people_grid();
    let next = RemoveColumn::new("name")
        .apply(&grid)
        .expect("removing an existing column must succeed");

    assert_eq!(next.column_count(), 1);
    assert_eq!(next.cell(0, 0), Some(&json!("london")));

    let err = RemoveColumn::new("ghost")
        .apply(&grid)
        .expect_err("removing an absent column must fail");
    assert!(matches!(err, ChangeError::MissingColumn(_)));
}

#[test]
fn set_cell_replaces_one_cell_and_checks_bounds() {
    let grid = people_grid();
    let next = SetCell::new(1, "city", json!("boston"))
        .apply(&grid)
        .expect("in-bounds set must succeed");

    assert_eq!(next.cell(1, 1), Some(&json!("boston")));
    assert_eq!(next.cell(0, 1), Some(&json!("london")));
    assert_eq!(grid.cell(1, 1), Some(&json!("nyc")));

    let err = SetCell::new(3, "city", Value::Null)
        .apply(&grid)
        .expect_err("out-of-bounds row must fail");
    assert!(matches!(
        err,
        ChangeError::RowOutOfBounds { index: 3, count: 3 }
    ));

    let err = SetCell::new(0, "ghost", Value::Null)
        .apply(&grid)
        .expect_err("absent column must fail");
    assert!(matches!(err, ChangeError::MissingColumn(_)));
}

#[test]
fn mass_edit_rewrites_matching_cells_only() {
    let grid = people_grid();
    let change = MassEdit::new(
        "city",
        vec![MassEditEntry {
            from: json!("london"),
            to: json!("London"),
        }],
    );
    let next = change.apply(&grid).expect("mass edit must succeed");

    assert_eq!(next.cell(0, 1), Some(&json!("London")));
    assert_eq!(next.cell(1, 1), Some(&json!("nyc")));
    assert_eq!(next.cell(2, 1), Some(&json!("London")));

    let err = MassEdit::new("ghost", Vec::new())
        .apply(&grid)
        .expect_err("absent column must fail");
    assert!(matches!(err, ChangeError::MissingColumn(_)));
}

#[test]
fn mass_edit_first_matching_entry_wins() {
    let grid = people_grid();
    let change = MassEdit::new(
        "city",
        vec![
            MassEditEntry {
                from: json!("london"),
                to: json!("first"),
            },
            MassEditEntry {
                from: json!("london"),
                to: json!("second"),
            },
        ],
    );
    let next = change.apply(&grid).expect("mass edit must succeed");
    assert_eq!(next.cell(0, 1), Some(&json!("first")));
}

#[test]
fn remove_rows_drops_by_index_and_checks_bounds() {
    let grid = people_grid();
    let next = RemoveRows::new(vec![2, 0])
        .apply(&grid)
        .expect("in-bounds removal must succeed");

    assert_eq!(next.row_count(), 1);
    assert_eq!(next.cell(0, 0), Some(&json!("grace")));

    let err = RemoveRows::new(vec![0, 7])
        .apply(&grid)
        .expect_err("out-of-bounds index must fail");
    assert!(matches!(
        err,
        ChangeError::RowOutOfBounds { index: 7, count: 3 }
    ));
}

#[test]
fn remove_rows_canonicalizes_selection() {
    // Same selection in different orders and with duplicates is one change.
    let a = RemoveRows::new(vec![2, 0, 2]);
    let b = RemoveRows::new(vec![0, 2]);
    assert_eq!(a.to_fields(), b.to_fields());
}

#[test]
fn reconcile_column_wraps_cells_with_match_data() {
    let grid = people_grid();
    let change = ReconcileColumn::new(
        "city",
        vec![ReconMatch {
            row: 1,
            id: "Q60".to_string(),
            label: "New York City".to_string(),
        }],
    );
    let next = change.apply(&grid).expect("reconcile must succeed");

    assert_eq!(
        next.cell(1, 1),
        Some(&json!({
            "value": "nyc",
            "recon": {"id": "Q60", "label": "New York City"}
        }))
    );
    assert_eq!(next.cell(0, 1), Some(&json!("london")));

    let err = ReconcileColumn::new(
        "city",
        vec![ReconMatch {
            row: 9,
            id: "Q1".to_string(),
            label: "x".to_string(),
        }],
    )
    .apply(&grid)
    .expect_err("out-of-bounds match must fail");
    assert!(matches!(err, ChangeError::RowOutOfBounds { index: 9, .. }));
}

#[test]
fn apply_is_deterministic_for_every_builtin() {
    let grid = people_grid();
    let changes: Vec<Box<dyn Change>> = vec![
        Box::new(AddColumn::new("score", json!(0))),
        Box::new(RenameColumn::new("city", "location")),
        Box::new(RemoveColumn::new("name")),
        Box::new(SetCell::new(0, "name", json!("ADA"))),
        Box::new(MassEdit::new(
            "city",
            vec![MassEditEntry {
                from: json!("nyc"),
                to: json!("NYC"),
            }],
        )),
        Box::new(RemoveRows::new(vec![1])),
        Box::new(ReconcileColumn::new(
            "name",
            vec![ReconMatch {
                row: 0,
                id: "Q7259".to_string(),
                label: "Ada Lovelace".to_string(),
            }],
        )),
    ];

    for change in &changes {
        let once = change.apply(&grid).expect("apply must succeed");
        let twice = change.apply(&grid).expect("second apply must succeed");
        assert_eq!(
            once,
            twice,
            "apply must be deterministic for {}",
            change.type_tag()
        );
    }
}
