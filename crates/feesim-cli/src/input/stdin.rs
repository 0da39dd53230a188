use rust_decimal::Decimal;
use std::io::{self, Read};

/// Attempt to read a JSON array of returns piped via stdin.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_returns_stdin() -> Result<Option<Vec<Decimal>>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
    let returns = values
        .iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s
                .parse::<Decimal>()
                .map_err(|e| format!("Invalid return '{s}': {e}").into()),
            serde_json::Value::Number(n) => n
                .to_string()
                .parse::<Decimal>()
                .map_err(|e| format!("Invalid return '{n}': {e}").into()),
            other => Err(format!("Expected a number or string, got {other}").into()),
        })
        .collect::<Result<Vec<Decimal>, Box<dyn std::error::Error>>>()?;

    Ok(Some(returns))
}
