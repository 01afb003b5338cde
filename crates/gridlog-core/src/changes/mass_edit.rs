use gridlog_grid::GridState;
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// One from/to replacement within a mass edit.
#[derive(Debug, Clone, PartialEq)]
pub struct MassEditEntry {
    pub from: Value,
    pub to: Value,
}

/// Rewrites every cell in a column that matches one of the `from` values.
///
/// The first matching entry wins; cells matching no entry are untouched.
///
/// Fields: `column` (string), `edits` (array of `{"from": .., "to": ..}`
/// objects, both keys required). Precondition: the column exists.
#[derive(Debug, Clone, PartialEq)]
pub struct MassEdit {
    column: String,
    edits: Vec<MassEditEntry>,
}

impl MassEdit {
    pub const TAG: &'static str = "mass-edit";

    pub fn new(column: impl Into<String>, edits: Vec<MassEditEntry>) -> Self {
        Self {
            column: column.into(),
            edits,
        }
    }
}

impl Change for MassEdit {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        let column = state
            .column_index(&self.column)
            .ok_or_else(|| ChangeError::MissingColumn(self.column.clone()))?;
        let rows = state
            .rows()
            .iter()
            .map(|row| {
                let cell = row.cell(column);
                match self.edits.iter().find(|e| e.from == *cell) {
                    Some(edit) => row.with_cell(column, edit.to.clone()),
                    None => row.clone(),
                }
            })
            .collect();
        Ok(state.remap_rows(rows))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("column".to_string(), Value::String(self.column.clone()));
        fields.insert(
            "edits".to_string(),
            Value::Array(
                self.edits
                    .iter()
                    .map(|e| {
                        let mut edit = Map::new();
                        edit.insert("from".to_string(), e.from.clone());
                        edit.insert("to".to_string(), e.to.clone());
                        Value::Object(edit)
                    })
                    .collect(),
            ),
        );
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let column = super::require_str(fields, MassEdit::TAG, "column")?;
    let edits = super::require_array(fields, MassEdit::TAG, "edits")?
        .iter()
        .map(|entry| {
            let obj = entry.as_object().ok_or(ChangeError::InvalidField {
                tag: MassEdit::TAG,
                field: "edits",
            })?;
            let from = obj.get("from").cloned().ok_or(ChangeError::InvalidField {
                tag: MassEdit::TAG,
                field: "edits",
            })?;
            let to = obj.get("to").cloned().ok_or(ChangeError::InvalidField {
                tag: MassEdit::TAG,
                field: "edits",
            })?;
            Ok(MassEditEntry { from, to })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(MassEdit::new(column, edits)))
}
