use gridlog_grid::{Column, GridState};
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// Appends a column to the schema, filling every existing row with a
/// default cell value.
///
/// Fields: `name` (string), `default` (any JSON value; omitted when null).
/// Precondition: no column named `name` may already exist.
#[derive(Debug, Clone, PartialEq)]
pub struct AddColumn {
    name: String,
    default: Value,
}

impl AddColumn {
    pub const TAG: &'static str = "add-column";

    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

impl Change for AddColumn {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        if state.column_index(&self.name).is_some() {
            return Err(ChangeError::DuplicateColumn(self.name.clone()));
        }
        let index = state.column_count();
        let mut columns = state.columns().to_vec();
        columns.push(Column::new(self.name.clone()));
        let rows = state
            .rows()
            .iter()
            .map(|row| row.with_cell(index, self.default.clone()))
            .collect();
        Ok(state.remap(columns, rows))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(self.name.clone()));
        if !self.default.is_null() {
            fields.insert("default".to_string(), self.default.clone());
        }
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let name = super::require_str(fields, AddColumn::TAG, "name")?;
    let default = fields.get("default").cloned().unwrap_or(Value::Null);
    Ok(Box::new(AddColumn::new(name, default)))
}
