use gridlog_grid::GridState;
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// One resolved reconciliation match for a single row.
///
/// The lookup against the external reconciliation service happens before
/// the change is constructed; only its result is carried here, so `apply`
/// stays pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconMatch {
    pub row: usize,
    pub id: String,
    pub label: String,
}

/// Writes reconciliation results into a column's cells.
///
/// A matched cell becomes `{"value": <original>, "recon": {"id", "label"}}`,
/// preserving the original value alongside the match. When several matches
/// name the same row, the last one wins.
///
/// Fields: `column` (string), `matches` (array of
/// `{"row": .., "id": .., "label": ..}` objects). Preconditions: the column
/// exists and every matched row is in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileColumn {
    column: String,
    matches: Vec<ReconMatch>,
}

impl ReconcileColumn {
    pub const TAG: &'static str = "reconcile-column";

    pub fn new(column: impl Into<String>, matches: Vec<ReconMatch>) -> Self {
        Self {
            column: column.into(),
            matches,
        }
    }
}

impl Change for ReconcileColumn {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        let column = state
            .column_index(&self.column)
            .ok_or_else(|| ChangeError::MissingColumn(self.column.clone()))?;
        let count = state.row_count();
        for m in &self.matches {
            if m.row >= count {
                return Err(ChangeError::RowOutOfBounds {
                    index: m.row,
                    count,
                });
            }
        }
        let mut rows = state.rows().to_vec();
        for m in &self.matches {
            let original = rows[m.row].cell(column).clone();
            let mut recon = Map::new();
            recon.insert("id".to_string(), Value::String(m.id.clone()));
            recon.insert("label".to_string(), Value::String(m.label.clone()));
            let mut cell = Map::new();
            cell.insert("value".to_string(), original);
            cell.insert("recon".to_string(), Value::Object(recon));
            rows[m.row] = rows[m.row].with_cell(column, Value::Object(cell));
        }
        Ok(state.remap_rows(rows))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("column".to_string(), Value::String(self.column.clone()));
        fields.insert(
            "matches".to_string(),
            Value::Array(
                self.matches
                    .iter()
                    .map(|m| {
                        let mut entry = Map::new();
                        entry.insert("row".to_string(), Value::from(m.row as u64));
                        entry.insert("id".to_string(), Value::String(m.id.clone()));
                        entry.insert("label".to_string(), Value::String(m.label.clone()));
                        Value::Object(entry)
                    })
                    .collect(),
            ),
        );
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let column = super::require_str(fields, ReconcileColumn::TAG, "column")?;
    let matches = super::require_array(fields, ReconcileColumn::TAG, "matches")?
        .iter()
        .map(|entry| {
            let invalid = ChangeError::InvalidField {
                tag: ReconcileColumn::TAG,
                field: "matches",
            };
            let obj = entry.as_object().ok_or(invalid)?;
            let row = obj
                .get("row")
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
                .ok_or(ChangeError::InvalidField {
                    tag: ReconcileColumn::TAG,
                    field: "matches",
                })?;
            let id = obj
                .get("id")
                .and_then(Value::as_str)
                .ok_or(ChangeError::InvalidField {
                    tag: ReconcileColumn::TAG,
                    field: "matches",
                })?;
            let label = obj
                .get("label")
                .and_then(Value::as_str)
                .ok_or(ChangeError::InvalidField {
                    tag: ReconcileColumn::TAG,
                    field: "matches",
                })?;
            Ok(ReconMatch {
                row,
                id: id.to_string(),
                label: label.to_string(),
            })
        })
        .collect::<Result<Vec<_>, ChangeError>>()?;
    Ok(Box::new(ReconcileColumn::new(column, matches)))
}
