use gridlog_grid::{Column, GridState};
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// Renames a column. Row storage is shared with the prior snapshot.
///
/// Fields: `from` (string), `to` (string).
/// Preconditions: `from` exists; `to` does not (unless it equals `from`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameColumn {
    from: String,
    to: String,
}

impl RenameColumn {
    pub const TAG: &'static str = "rename-column";

    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Change for RenameColumn {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        let index = state
            .column_index(&self.from)
            .ok_or_else(|| ChangeError::MissingColumn(self.from.clone()))?;
        if self.to != self.from && state.column_index(&self.to).is_some() {
            return Err(ChangeError::DuplicateColumn(self.to.clone()));
        }
        let mut columns = state.columns().to_vec();
        columns[index] = Column::new(self.to.clone());
        Ok(state.remap_columns(columns))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("from".to_string(), Value::String(self.from.clone()));
        fields.insert("to".to_string(), Value::String(self.to.clone()));
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let from = super::require_str(fields, RenameColumn::TAG, "from")?;
    let to = super::require_str(fields, RenameColumn::TAG, "to")?;
    Ok(Box::new(RenameColumn::new(from, to)))
}
