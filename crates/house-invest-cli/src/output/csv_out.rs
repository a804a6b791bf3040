use serde_json::Value;
use std::io;

use super::{result_object, scalar_fields, schedule_rows};

/// Write output as CSV to stdout.
///
/// Time series results are written one row per period; everything else as
/// field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(rows) = schedule_rows(value) {
        write_rows(&mut wtr, rows);
    } else if let Some(result) = result_object(value) {
        if let Some(Value::Array(values)) = result.get("values") {
            let _ = wtr.write_record(["period", "value"]);
            for (period, item) in values.iter().enumerate() {
                let _ = wtr.write_record([(period + 1).to_string(), format_csv_value(item)]);
            }
        } else {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in scalar_fields(result) {
                let _ = wtr.write_record([key, format_csv_value(val)]);
            }
        }
    } else {
        let _ = wtr.write_record([format_csv_value(value)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
