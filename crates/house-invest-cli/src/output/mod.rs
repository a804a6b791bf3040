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

/// The `result` object of a computation envelope, or the value itself.
fn result_object(value: &Value) -> Option<&Map<String, Value>> {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
        .as_object()
}

/// Per-period rows (`result.schedule`) when the command produced a time series.
fn schedule_rows(value: &Value) -> Option<&Vec<Value>> {
    result_object(value)
        .and_then(|m| m.get("schedule"))
        .and_then(Value::as_array)
}

/// Scalar fields of the result, with nested objects flattened as `parent.child`.
/// Arrays are left out; they are printed as the schedule instead.
fn scalar_fields(map: &Map<String, Value>) -> Vec<(String, &Value)> {
    let mut fields = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(_) => {}
            Value::Object(inner) => {
                for (child, child_val) in inner {
                    if !child_val.is_array() && !child_val.is_object() {
                        fields.push((format!("{key}.{child}"), child_val));
                    }
                }
            }
            _ => fields.push((key.clone(), val)),
        }
    }
    fields
}
