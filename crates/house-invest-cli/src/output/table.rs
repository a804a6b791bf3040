use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{result_object, scalar_fields, schedule_rows};

/// Format output as tables: the scalar results first, then the per-period
/// schedule when there is one.
pub fn print_table(value: &Value) {
    match result_object(value) {
        Some(result) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in scalar_fields(result) {
                builder.push_record([key, format_value(val)]);
            }
            println!("{}", Table::from(builder));

            if let Some(rows) = schedule_rows(value) {
                println!();
                print_rows(rows);
            } else if let Some(Value::Array(values)) = result.get("values") {
                println!();
                print_rows(values);
            }
        }
        None => println!("{}", format_value(value)),
    }

    print_envelope_notes(value);
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = rows.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for row in rows {
            if let Value::Object(map) = row {
                let cells: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(cells);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        // Bare series: index it by period
        let mut builder = Builder::default();
        builder.push_record(["Period", "Value"]);
        for (period, item) in rows.iter().enumerate() {
            builder.push_record([(period + 1).to_string(), format_value(item)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_envelope_notes(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
