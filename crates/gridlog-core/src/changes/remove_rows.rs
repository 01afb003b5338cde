use gridlog_grid::GridState;
use serde_json::{Map, Value};

use crate::change::{Change, ChangeError};

/// Drops a set of rows by index.
///
/// Indices are stored sorted and deduplicated, so two removals built from
/// the same selection in different orders are value-equal.
///
/// Fields: `rows` (array of unsigned integers). Precondition: every index
/// is in bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRows {
    rows: Vec<usize>,
}

impl RemoveRows {
    pub const TAG: &'static str = "remove-rows";

    pub fn new(mut rows: Vec<usize>) -> Self {
        rows.sort_unstable();
        rows.dedup();
        Self { rows }
    }
}

impl Change for RemoveRows {
    fn apply(&self, state: &GridState) -> Result<GridState, ChangeError> {
        let count = state.row_count();
        for &index in &self.rows {
            if index >= count {
                return Err(ChangeError::RowOutOfBounds { index, count });
            }
        }
        let rows = state
            .rows()
            .iter()
            .enumerate()
            .filter(|(i, _)| self.rows.binary_search(i).is_err())
            .map(|(_, row)| row.clone())
            .collect();
        Ok(state.remap_rows(rows))
    }

    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "rows".to_string(),
            Value::Array(self.rows.iter().map(|&i| Value::from(i as u64)).collect()),
        );
        fields
    }
}

pub(super) fn decode(fields: &Map<String, Value>) -> Result<Box<dyn Change>, ChangeError> {
    let rows = super::require_array(fields, RemoveRows::TAG, "rows")?
        .iter()
        .map(|v| {
            let n = v.as_u64().ok_or(ChangeError::InvalidField {
                tag: RemoveRows::TAG,
                field: "rows",
            })?;
            usize::try_from(n).map_err(|_| ChangeError::InvalidField {
                tag: RemoveRows::TAG,
                field: "rows",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Box::new(RemoveRows::new(rows)))
}
