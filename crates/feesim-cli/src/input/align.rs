use chrono::NaiveDate;
use feesim_core::ReturnObservation;
use rust_decimal::Decimal;

/// Align a benchmark return series to the fund's observation dates.
///
/// For each target date the most recent benchmark value at or before it
/// is used (forward fill); dates before the first benchmark observation
/// fill with zero. The core's comparison contract requires the two
/// series to be equal length and date-aligned, and this is where that
/// contract is met.
pub fn align_to_dates(benchmark: &[ReturnObservation], dates: &[NaiveDate]) -> Vec<Decimal> {
    let mut aligned = Vec::with_capacity(dates.len());
    let mut idx = 0;
    let mut last: Option<Decimal> = None;

    for date in dates {
        while idx < benchmark.len() && benchmark[idx].date <= *date {
            last = Some(benchmark[idx].gross_return);
            idx += 1;
        }
        aligned.push(last.unwrap_or(Decimal::ZERO));
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn obs(year: i32, month: u32, ret: Decimal) -> ReturnObservation {
        ReturnObservation {
            date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            gross_return: ret,
        }
    }

    fn dates(months: &[u32]) -> Vec<NaiveDate> {
        months
            .iter()
            .map(|m| NaiveDate::from_ymd_opt(2024, *m, 1).unwrap())
            .collect()
    }

    #[test]
    fn test_exact_match() {
        let bench = vec![obs(2024, 1, dec!(0.01)), obs(2024, 2, dec!(0.02))];
        let aligned = align_to_dates(&bench, &dates(&[1, 2]));
        assert_eq!(aligned, vec![dec!(0.01), dec!(0.02)]);
    }

    #[test]
    fn test_missing_month_forward_fills() {
        let bench = vec![obs(2024, 1, dec!(0.01)), obs(2024, 3, dec!(0.03))];
        let aligned = align_to_dates(&bench, &dates(&[1, 2, 3]));
        assert_eq!(aligned, vec![dec!(0.01), dec!(0.01), dec!(0.03)]);
    }

    #[test]
    fn test_leading_gap_zero_fills() {
        let bench = vec![obs(2024, 3, dec!(0.03))];
        let aligned = align_to_dates(&bench, &dates(&[1, 2, 3]));
        assert_eq!(aligned, vec![dec!(0), dec!(0), dec!(0.03)]);
    }

    #[test]
    fn test_empty_benchmark_zero_fills() {
        let aligned = align_to_dates(&[], &dates(&[1, 2]));
        assert_eq!(aligned, vec![dec!(0), dec!(0)]);
    }
}
