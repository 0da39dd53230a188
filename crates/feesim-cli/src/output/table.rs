use serde_json::Value;
use tabled::{builder::Builder, Table};

const PERIOD_COLUMNS: [&str; 6] = [
    "date",
    "gross_return",
    "net_return",
    "mgmt_fee_revenue",
    "perf_fee_revenue",
    "aum_end",
];

/// Format output as tables using the tabled crate.
///
/// A simulate run (object with a "schemes" array) gets one section per
/// scheme: the period trace, annual aggregates, and the metric records.
/// Everything else falls back to generic envelope/array rendering.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(schemes)) = map.get("schemes") {
                for report in schemes {
                    print_scheme_report(report);
                }
            } else if let Some(result) = map.get("result") {
                print_envelope(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr, None),
        _ => println!("{}", value),
    }
}

fn print_scheme_report(report: &Value) {
    let Some(map) = report.as_object() else {
        return;
    };
    let name = map
        .get("scheme")
        .and_then(|v| v.as_str())
        .unwrap_or("(unnamed)");
    println!("\n=== {} ===", name);

    if let Some(Value::String(err)) = map.get("error") {
        println!("error: {}", err);
        return;
    }

    if let Some(periods) = report
        .pointer("/simulation/result/periods")
        .and_then(|v| v.as_array())
    {
        println!("\nPeriods:");
        print_array_table(periods, Some(&PERIOD_COLUMNS));
    }
    if let Some(Value::Object(annual)) = report.pointer("/simulation/result/annual") {
        println!("\nAnnual fee revenue:");
        let rows: Vec<Value> = annual.values().cloned().collect();
        print_array_table(&rows, None);
    }
    if let Some(Value::Array(warnings)) = report.pointer("/simulation/warnings") {
        print_warnings(warnings);
    }

    if let Some(metrics) = report.pointer("/performance/result") {
        println!("\nPerformance:");
        print_flat_object(metrics);
    }
    if let Some(stats) = map.get("revenue_stats") {
        println!("\nRevenue statistics:");
        print_flat_object(stats);
    }
    if let Some(comparison) = report.pointer("/benchmark_comparison/result") {
        println!("\nBenchmark comparison:");
        print_flat_object(comparison);
    }
    if let Some(yearly) = map.get("yearly_net_returns") {
        println!("\nYearly net returns:");
        print_flat_object(yearly);
    }
}

fn print_envelope(result: &Value, envelope: &serde_json::Map<String, Value>) {
    print_flat_object(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        print_warnings(warnings);
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_warnings(warnings: &[Value]) {
    if warnings.is_empty() {
        return;
    }
    println!("\nWarnings:");
    for w in warnings {
        if let Value::String(s) = w {
            println!("  - {}", s);
        }
    }
}

fn print_flat_object(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            println!("{}", Table::from(builder));
        }
        other => println!("{}", format_value(other)),
    }
}

fn print_array_table(arr: &[Value], columns: Option<&[&str]>) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let headers: Vec<String> = match columns {
        Some(cols) => cols.iter().map(|c| c.to_string()).collect(),
        None => match arr.first() {
            Some(Value::Object(first)) => first.keys().cloned().collect(),
            _ => {
                for item in arr {
                    println!("{}", format_value(item));
                }
                return;
            }
        },
    };

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
