// src/analysis/table.rs

//! Flattening of nested JSON payloads into rows with dotted column names.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{table}: expected an object or an array of objects, found {found}")]
    Shape { table: String, found: &'static str },

    #[error("{table}: row {index} is malformed: {source}")]
    Row {
        table: String,
        index: usize,
        source: serde_json::Error,
    },

    #[error("{table}: row {index} failed validation: {source}")]
    Invalid {
        table: String,
        index: usize,
        source: ValidationErrors,
    },

    #[error("'{value}' is not a percentage")]
    Accuracy { value: String },
}

/// A flat row: dotted column path to cell value.
pub type Row = Map<String, Value>;

/// Row-set produced from one feed payload.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// Per-column summary printed by the report binary.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableInfo {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
}

impl Table {
    /// Flattens a payload. An object is one row, an array holds one object per row.
    pub fn flatten(name: &str, payload: &Value) -> Result<Self, ParseError> {
        let mut table = Table {
            name: name.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
        };

        match payload {
            Value::Object(obj) => table.push_object(obj),
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(obj) => table.push_object(obj),
                        other => {
                            return Err(ParseError::Shape {
                                table: name.to_string(),
                                found: kind_of(other),
                            });
                        }
                    }
                }
            }
            other => {
                return Err(ParseError::Shape {
                    table: name.to_string(),
                    found: kind_of(other),
                });
            }
        }

        Ok(table)
    }

    fn push_object(&mut self, obj: &Map<String, Value>) {
        let mut row = Row::new();
        flatten_into(&mut row, None, obj);

        for key in row.keys() {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Narrows to the `prefix.*` columns with the prefix stripped.
    ///
    /// Returns a plain copy when no column lives under `prefix`.
    pub fn scoped(&self, prefix: &str) -> Table {
        let dotted = format!("{prefix}.");
        if !self.columns.iter().any(|c| c.starts_with(&dotted)) {
            return self.clone();
        }

        let strip = |key: &String| key.strip_prefix(&dotted).map(str::to_string);

        Table {
            name: format!("{}.{}", self.name, prefix),
            columns: self.columns.iter().filter_map(strip).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .filter_map(|(k, v)| strip(k).map(|k| (k, v.clone())))
                        .collect()
                })
                .collect(),
        }
    }

    /// Converts every row into `T`. The first bad row fails the whole table.
    pub fn records<T: DeserializeOwned>(&self) -> Result<Vec<T>, ParseError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(Value::Object(row.clone())).map_err(|source| {
                    ParseError::Row {
                        table: self.name.clone(),
                        index,
                        source,
                    }
                })
            })
            .collect()
    }

    /// Like [`Table::records`], then runs `validator` checks on each record.
    pub fn validated_records<T: DeserializeOwned + Validate>(&self) -> Result<Vec<T>, ParseError> {
        let records: Vec<T> = self.records()?;

        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|source| ParseError::Invalid {
                table: self.name.clone(),
                index,
                source,
            })?;
        }

        Ok(records)
    }

    pub fn info(&self) -> TableInfo {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let cells: Vec<&Value> = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .filter(|v| !v.is_null())
                    .collect();

                ColumnInfo {
                    name: column.clone(),
                    non_null: cells.len(),
                    dtype: column_dtype(&cells),
                }
            })
            .collect();

        TableInfo {
            name: self.name.clone(),
            rows: self.rows.len(),
            columns,
        }
    }
}

fn flatten_into(row: &mut Row, prefix: Option<&str>, obj: &Map<String, Value>) {
    for (key, value) in obj {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };

        match value {
            Value::Object(nested) => flatten_into(row, Some(&path), nested),
            other => {
                row.insert(path, other.clone());
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn column_dtype(cells: &[&Value]) -> &'static str {
    if cells.is_empty() {
        return "empty";
    }
    if cells.iter().all(|v| v.is_i64() || v.is_u64()) {
        "int"
    } else if cells.iter().all(|v| v.is_number()) {
        "float"
    } else if cells.iter().all(|v| v.is_boolean()) {
        "bool"
    } else {
        "object"
    }
}

impl std::fmt::Display for TableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {} rows, {} columns", self.name, self.rows, self.columns.len())?;
        for (i, column) in self.columns.iter().enumerate() {
            writeln!(
                f,
                "  {:>3}  {:<40} {:>6} non-null  {}",
                i, column.name, column.non_null, column.dtype
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::QuizMetadata;
    use serde_json::json;

    #[test]
    fn test_flatten_object_is_one_row_with_dotted_columns() {
        let payload = json!({
            "id": 7,
            "quiz": {"id": 43, "topic": "Biology", "meta": {"level": "easy"}},
            "tags": ["a", "b"]
        });

        let table = Table::flatten("current", &payload).unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.has_column("quiz.id"));
        assert!(table.has_column("quiz.meta.level"));
        assert_eq!(table.rows()[0]["tags"], json!(["a", "b"]));
        assert_eq!(table.rows()[0]["quiz.meta.level"], "easy");
    }

    #[test]
    fn test_flatten_array_collects_union_of_columns() {
        let payload = json!([{"score": 1}, {"score": 2, "extra": true}]);

        let table = Table::flatten("historical", &payload).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["score", "extra"]);
    }

    #[test]
    fn test_columns_keep_first_appearance_order() {
        let payload = json!([
            {"score": 1, "accuracy": "1%", "quiz_id": 3},
            {"zeta": true, "score": 2, "alpha": 0}
        ]);

        let table = Table::flatten("submissions", &payload).unwrap();

        assert_eq!(
            table.columns(),
            ["score", "accuracy", "quiz_id", "zeta", "alpha"]
        );
        assert_eq!(table.info().columns[0].name, "score");
    }

    #[test]
    fn test_flatten_rejects_scalar_payload_and_elements() {
        assert!(matches!(
            Table::flatten("t", &json!(42)),
            Err(ParseError::Shape { found: "a number", .. })
        ));
        assert!(matches!(
            Table::flatten("t", &json!([{"a": 1}, "oops"])),
            Err(ParseError::Shape { found: "a string", .. })
        ));
    }

    #[test]
    fn test_scoped_strips_prefix() {
        let payload = json!([{"id": 1, "quiz": {"id": 43, "topic": "Math"}}]);
        let table = Table::flatten("current", &payload).unwrap();

        let scoped = table.scoped("quiz");

        assert_eq!(scoped.columns(), ["id", "topic"]);
        assert_eq!(scoped.rows()[0]["id"], 43);
    }

    #[test]
    fn test_scoped_without_prefix_returns_copy() {
        let table = Table::flatten("current", &json!([{"id": 1, "topic": "Math"}])).unwrap();

        let scoped = table.scoped("quiz");

        assert_eq!(scoped.columns(), table.columns());
        assert_eq!(scoped.name(), "current");
    }

    #[test]
    fn test_validated_records_reports_failing_row() {
        let payload = json!([
            {"id": 1, "topic": "Math", "correct_answer_marks": "4"},
            {"id": 2, "topic": "Physics", "correct_answer_marks": "-1"}
        ]);
        let table = Table::flatten("current", &payload).unwrap();

        let err = table.validated_records::<QuizMetadata>().unwrap_err();

        assert!(matches!(err, ParseError::Invalid { index: 1, .. }));
    }

    #[test]
    fn test_records_reports_malformed_row() {
        let table = Table::flatten("current", &json!([{"id": "abc"}])).unwrap();

        let err = table.records::<QuizMetadata>().unwrap_err();

        assert!(matches!(err, ParseError::Row { index: 0, .. }));
    }

    #[test]
    fn test_info_counts_non_null_cells() {
        let payload = json!([{"score": 1, "note": null}, {"score": 2.5}]);
        let info = Table::flatten("historical", &payload).unwrap().info();

        assert_eq!(info.rows, 2);
        assert_eq!(info.columns[0].non_null, 2);
        assert_eq!(info.columns[0].dtype, "float");
        assert_eq!(info.columns[1].non_null, 0);
        assert_eq!(info.columns[1].dtype, "empty");
    }
}
