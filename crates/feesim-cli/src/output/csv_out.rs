use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// A simulate run flattens to one row per period with a leading scheme
/// column; envelope results flatten to field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(schemes)) = map.get("schemes") {
                write_period_rows(&mut wtr, schemes);
            } else if let Some(Value::Object(result)) = map.get("result") {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_period_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, schemes: &[Value]) {
    let _ = wtr.write_record([
        "scheme",
        "date",
        "gross_return",
        "net_return",
        "mgmt_fee_revenue",
        "perf_fee_revenue",
        "aum_end",
    ]);

    for report in schemes {
        let Some(map) = report.as_object() else {
            continue;
        };
        let name = map
            .get("scheme")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        let Some(periods) = report
            .pointer("/simulation/result/periods")
            .and_then(|v| v.as_array())
        else {
            continue;
        };
        for period in periods {
            if let Value::Object(p) = period {
                let field = |key: &str| {
                    p.get(key)
                        .map(format_csv_value)
                        .unwrap_or_default()
                };
                let _ = wtr.write_record([
                    name.to_string(),
                    field("date"),
                    field("gross_return"),
                    field("net_return"),
                    field("mgmt_fee_revenue"),
                    field("perf_fee_revenue"),
                    field("aum_end"),
                ]);
            }
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
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
