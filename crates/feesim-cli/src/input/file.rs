use chrono::NaiveDate;
use feesim_core::ReturnObservation;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::Path;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Read a configuration file, accepting JSON or YAML by extension.
pub fn read_config<T: DeserializeOwned>(path: &str) -> CliResult<T> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let is_yaml = matches!(
        canonical.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
    }
}

#[derive(Debug, Deserialize)]
struct ReturnRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "GrossReturn")]
    gross_return: Decimal,
}

#[derive(Debug, Deserialize)]
struct BenchmarkRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Return")]
    ret: Decimal,
}

/// Read a fund return CSV with `Date,GrossReturn` columns, parse dates,
/// and sort chronologically. Missing columns surface as parse errors.
pub fn read_returns_csv(path: &str) -> CliResult<Vec<ReturnObservation>> {
    let canonical = resolve_path(path)?;
    let mut reader = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let mut observations: Vec<ReturnObservation> = Vec::new();
    for row in reader.deserialize::<ReturnRow>() {
        let row = row.map_err(|e| format!("Invalid row in '{}': {}", canonical.display(), e))?;
        observations.push(ReturnObservation {
            date: parse_date(&row.date)?,
            gross_return: row.gross_return,
        });
    }
    if observations.is_empty() {
        return Err(format!("No return observations in '{}'", canonical.display()).into());
    }

    observations.sort_by_key(|o| o.date);
    Ok(observations)
}

/// Read a benchmark return CSV with `Date,Return` columns, sorted
/// chronologically. Alignment to the fund's dates happens separately.
pub fn read_benchmark_csv(path: &str) -> CliResult<Vec<ReturnObservation>> {
    let canonical = resolve_path(path)?;
    let mut reader = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let mut observations: Vec<ReturnObservation> = Vec::new();
    for row in reader.deserialize::<BenchmarkRow>() {
        let row = row.map_err(|e| format!("Invalid row in '{}': {}", canonical.display(), e))?;
        observations.push(ReturnObservation {
            date: parse_date(&row.date)?,
            gross_return: row.ret,
        });
    }

    observations.sort_by_key(|o| o.date);
    Ok(observations)
}

/// Parse a formatted AUM string (with optional thousands separators)
/// into a Decimal, e.g. "30,000,000.00".
pub fn parse_aum(aum_str: &str) -> CliResult<Decimal> {
    let cleaned = aum_str.replace(',', "");
    cleaned.trim().parse::<Decimal>().map_err(|_| {
        "Invalid AUM format. Enter a number like 30,000,000.00"
            .to_string()
            .into()
    })
}

fn parse_date(text: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{text}' (expected YYYY-MM-DD)").into())
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> CliResult<std::path::PathBuf> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_aum_with_separators() {
        assert_eq!(parse_aum("30,000,000.00").unwrap(), dec!(30000000));
        assert_eq!(parse_aum("1000000").unwrap(), dec!(1000000));
    }

    #[test]
    fn test_parse_aum_rejects_text() {
        assert!(parse_aum("thirty million").is_err());
        assert!(parse_aum("").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("03/01/2024").is_err());
    }
}
