pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A command result split into printable parts.
///
/// Scalars (including those of nested objects, under dotted keys such as
/// `sample.mean`) go to `fields`; arrays of objects such as a distribution's
/// `frequencies` or a simulation's `histogram` become row sets.
#[derive(Debug, Default)]
pub struct Sections {
    pub fields: Vec<(String, Value)>,
    pub row_sets: Vec<(String, Vec<Map<String, Value>>)>,
    pub warnings: Vec<String>,
    pub methodology: Option<String>,
}

impl Sections {
    pub fn from_value(value: &Value) -> Self {
        let mut sections = Sections::default();

        // Unwrap the computation envelope when there is one.
        let result = match value.get("result") {
            Some(result) => {
                if let Some(Value::Array(ws)) = value.get("warnings") {
                    sections.warnings = ws
                        .iter()
                        .filter_map(|w| w.as_str().map(str::to_string))
                        .collect();
                }
                sections.methodology = value
                    .get("methodology")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                result
            }
            None => value,
        };

        match result {
            Value::Object(map) => sections.collect(map, ""),
            other => sections.fields.push(("value".into(), other.clone())),
        }
        sections
    }

    fn collect(&mut self, map: &Map<String, Value>, prefix: &str) {
        for (key, val) in map {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match val {
                Value::Object(inner) => self.collect(inner, &name),
                Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                    let rows = items.iter().filter_map(Value::as_object).cloned().collect();
                    self.row_sets.push((name, rows));
                }
                _ => self.fields.push((name, val.clone())),
            }
        }
    }

    /// Look up a flattened field by its dotted name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, val)| key == name && !val.is_null())
            .map(|(_, val)| val)
    }
}

/// Render a JSON scalar (or a short array of scalars) as plain text.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sections_flatten_envelope() {
        let value = json!({
            "result": {
                "n": 10,
                "sample": { "mean": 38.4, "percentiles": { "p50": 38.0 } },
                "histogram": [{ "lower": 10.0, "upper": 12.0, "count": 3 }],
            },
            "methodology": "Monte Carlo Payment Simulation",
            "warnings": ["drifted"],
        });
        let s = Sections::from_value(&value);
        assert_eq!(s.field("n"), Some(&json!(10)));
        assert_eq!(s.field("sample.mean"), Some(&json!(38.4)));
        assert_eq!(s.field("sample.percentiles.p50"), Some(&json!(38.0)));
        assert_eq!(s.row_sets.len(), 1);
        assert_eq!(s.row_sets[0].0, "histogram");
        assert_eq!(s.warnings, vec!["drifted".to_string()]);
        assert_eq!(s.methodology.as_deref(), Some("Monte Carlo Payment Simulation"));
    }

    #[test]
    fn test_sections_plain_object() {
        let s = Sections::from_value(&json!({ "coins": [3, 1, 2], "payment": 6 }));
        assert_eq!(format_value(s.field("coins").unwrap()), "3, 1, 2");
        assert_eq!(s.field("payment"), Some(&json!(6)));
        assert!(s.row_sets.is_empty());
    }
}
