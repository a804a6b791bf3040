use serde_json::Value;

use super::result_object;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, first at the top
/// of the result and then inside its `summary`, and falls back to the first
/// scalar field.
pub fn print_minimal(value: &Value) {
    let priority_keys = [
        "house_advantage",
        "periodic_payment",
        "total",
        "monthly_payment",
        "final_equity",
    ];

    if let Some(map) = result_object(value) {
        let summary = map.get("summary").and_then(Value::as_object);
        for key in &priority_keys {
            let found = map
                .get(*key)
                .or_else(|| summary.and_then(|s| s.get(*key)));
            if let Some(val) = found {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(value));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
