use crate::report::*;

/// Formats a count with comma thousands separators: 169743 -> "169,743".
pub fn with_thousands(count: u64) -> String {
    let digits = count.to_string();
    let mut res = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            res.push(',');
        }
        res.push(c);
    }
    res
}

/// Formats a share as a percentage with two decimals: 1/3 -> "33.33%".
///
/// A zero denominator is an error: there is nothing to take a share of.
pub fn percent(numerator: u64, denominator: u64, what: &str) -> ReportResult<String> {
    ensure!(denominator > 0, EmptyDenominatorSnafu { what });
    // The ratio is rounded to the hundredth of a percent after scaling.
    let ratio = numerator as f64 / denominator as f64;
    Ok(format!("{:.2}%", ratio * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1_000), "1,000");
        assert_eq!(with_thousands(169_743), "169,743");
        assert_eq!(with_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn percentages() {
        assert_eq!(percent(1, 3, "x").unwrap(), "33.33%");
        assert_eq!(percent(2, 3, "x").unwrap(), "66.67%");
        assert_eq!(percent(5, 5, "x").unwrap(), "100.00%");
        assert_eq!(percent(0, 5, "x").unwrap(), "0.00%");
    }

    #[test]
    fn percentage_ties() {
        // 23/160 scales to 14.374999... and rounds down.
        assert_eq!(percent(23, 160, "x").unwrap(), "14.37%");
    }

    #[test]
    fn empty_denominator() {
        let err = percent(0, 0, "received ballots").unwrap_err();
        assert!(matches!(err, ReportError::EmptyDenominator { .. }));
    }
}
