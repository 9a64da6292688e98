//! Pin table parsing
//!
//! The `pin_table` column holds `{"pins": [[header...], [row...], ...]}`,
//! either as JSON or as a string containing that JSON.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum PinTable {
    /// No payload, no `pins` field, or an empty list
    Empty,
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Payload present but unusable
    Error(String),
}

impl PinTable {
    pub fn parse(payload: Option<&Value>) -> Self {
        match payload {
            None | Some(Value::Null) => PinTable::Empty,
            Some(Value::String(text)) if text.is_empty() => PinTable::Empty,
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Null) => PinTable::Error("pin table payload is null".to_string()),
                Ok(value) => Self::from_value(&value),
                Err(e) => PinTable::Error(format!("malformed pin table: {e}")),
            },
            Some(value) => Self::from_value(value),
        }
    }

    fn from_value(value: &Value) -> Self {
        let pins = match value.get("pins") {
            None | Some(Value::Null) => return PinTable::Empty,
            Some(Value::Array(pins)) => pins,
            Some(other) => {
                return PinTable::Error(format!("`pins` is not a list: {other}"));
            }
        };

        let mut rows = Vec::with_capacity(pins.len());
        for (i, row) in pins.iter().enumerate() {
            match row {
                Value::Array(cells) => rows.push(cells.iter().map(cell_text).collect()),
                other => return PinTable::Error(format!("pin row {i} is not a list: {other}")),
            }
        }

        let mut rows = rows.into_iter();
        match rows.next() {
            None => PinTable::Empty,
            Some(header) => PinTable::Table {
                header,
                rows: rows.collect(),
            },
        }
    }

    #[cfg(test)]
    pub fn is_error(&self) -> bool {
        matches!(self, PinTable::Error(_))
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
