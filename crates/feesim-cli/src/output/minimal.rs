use serde_json::Value;

/// Print just the key answer value from the output.
///
/// A simulate run prints one `scheme: final AUM` line per scheme;
/// single-calculation envelopes fall back to a priority list of
/// well-known result fields.
pub fn print_minimal(value: &Value) {
    if let Some(schemes) = value.get("schemes").and_then(|v| v.as_array()) {
        for report in schemes {
            print_scheme_line(report);
        }
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "fee",
        "sharpe_ratio",
        "annualized_return",
        "tracking_error",
        "information_ratio",
        "beta",
        "total_fee_revenue",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn print_scheme_line(report: &Value) {
    let name = report
        .get("scheme")
        .and_then(|v| v.as_str())
        .unwrap_or("(unnamed)");

    if let Some(err) = report.get("error").and_then(|v| v.as_str()) {
        println!("{}: error: {}", name, err);
        return;
    }

    let final_aum = report
        .pointer("/simulation/result/periods")
        .and_then(|v| v.as_array())
        .and_then(|periods| periods.last())
        .and_then(|p| p.get("aum_end"))
        .map(format_minimal)
        .unwrap_or_default();
    println!("{}: {}", name, final_aum);
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
