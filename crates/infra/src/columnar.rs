//! Column-oriented JSON layout for flat records.
//!
//! ```json
//! { "customer_id": { "0": 3, "1": 7 }, "title": { "0": "Item4", "1": "Item0" }, ... }
//! ```
//!
//! Each field maps zero-based row indices (as strings) to that row's value.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use marketsim_core::Record;

#[derive(Debug, Error)]
pub enum ColumnarError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("missing column: {0}")]
    MissingColumn(&'static str),

    #[error("column {0} is not an object")]
    MalformedColumn(&'static str),

    #[error("invalid row index {index:?} in column {column}")]
    InvalidIndex { column: &'static str, index: String },

    #[error("row {index} has no value in column {column}")]
    MissingCell { column: &'static str, index: usize },

    #[error("rows are not contiguous (expected index {expected}, found {found})")]
    RowGap { expected: usize, found: usize },

    #[error("row {index} does not decode: {source}")]
    Row {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One empty mapping per field: the layout of a store with no rows.
pub fn empty_columns<R: Record>() -> Value {
    Value::Object(
        R::FIELDS
            .iter()
            .map(|field| ((*field).to_owned(), Value::Object(Map::new())))
            .collect(),
    )
}

/// Transpose row records into the column layout.
pub fn to_columns<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Result<Value, ColumnarError>
where
    R: Record + 'a,
{
    let mut columns: Vec<Map<String, Value>> = vec![Map::new(); R::FIELDS.len()];

    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(mut row) = serde_json::to_value(record).map_err(ColumnarError::Encode)? else {
            return Err(ColumnarError::NotAnObject);
        };
        for (field, column) in R::FIELDS.iter().zip(columns.iter_mut()) {
            let cell = row
                .remove(*field)
                .ok_or(ColumnarError::MissingCell {
                    column: *field,
                    index,
                })?;
            column.insert(index.to_string(), cell);
        }
    }

    Ok(Value::Object(
        R::FIELDS
            .iter()
            .zip(columns)
            .map(|(field, column)| ((*field).to_owned(), Value::Object(column)))
            .collect(),
    ))
}

/// Transpose the column layout back into row records, ordered by numeric index.
///
/// Every field column must hold the same contiguous `0..n` indices.
pub fn from_columns<R: Record>(value: &Value) -> Result<Vec<R>, ColumnarError> {
    let columns = value.as_object().ok_or(ColumnarError::NotAnObject)?;
    let mut rows: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();

    for field in R::FIELDS {
        let column = columns
            .get(*field)
            .ok_or(ColumnarError::MissingColumn(*field))?
            .as_object()
            .ok_or(ColumnarError::MalformedColumn(*field))?;

        for (key, cell) in column {
            let index = key.parse::<usize>().map_err(|_| ColumnarError::InvalidIndex {
                column: *field,
                index: key.clone(),
            })?;
            rows.entry(index)
                .or_default()
                .insert((*field).to_owned(), cell.clone());
        }
    }

    rows.into_iter()
        .enumerate()
        .map(|(expected, (index, row))| {
            if index != expected {
                return Err(ColumnarError::RowGap {
                    expected,
                    found: index,
                });
            }
            if let Some(&column) = R::FIELDS.iter().find(|f| !row.contains_key(**f)) {
                return Err(ColumnarError::MissingCell { column, index });
            }
            serde_json::from_value(Value::Object(row))
                .map_err(|source| ColumnarError::Row { index, source })
        })
        .collect()
}
