use itertools::Itertools;

/// Reads the first number out of a unit-suffixed string, ie. `545.84ms`.
///
/// Scanning starts at the first ASCII digit and takes digits, at most one `.`,
/// then digits. No digit at all gives `0.0`.
pub fn parse_numeric_prefix(text: &str) -> f64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0.0;
    };
    let rest = &text[start..];

    let mut end = 0;
    let mut seen_dot = false;
    for (idx, c) in rest.char_indices() {
        match c {
            '0'..='9' => end = idx + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = idx + 1;
            }
            _ => break,
        }
    }

    rest[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}

/// Formats `value` with `,` thousand separators and `decimals` fraction digits.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let grouped = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",");

    let negative = value < 0.0 && formatted.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_prefix_with_unit() {
        assert_eq!(parse_numeric_prefix("545.84ms"), 545.84);
        assert_eq!(parse_numeric_prefix("12ms"), 12.0);
        assert_eq!(parse_numeric_prefix("0ms"), 0.0);
        assert_eq!(parse_numeric_prefix("7"), 7.0);
    }

    #[test]
    fn numeric_prefix_without_digits() {
        assert_eq!(parse_numeric_prefix("ms"), 0.0);
        assert_eq!(parse_numeric_prefix(""), 0.0);
        assert_eq!(parse_numeric_prefix("n/a"), 0.0);
    }

    #[test]
    fn numeric_prefix_stops_early() {
        assert_eq!(parse_numeric_prefix("1.2.3ms"), 1.2);
        assert_eq!(parse_numeric_prefix("1,234ms"), 1.0);
        assert_eq!(parse_numeric_prefix("15.ms"), 15.0);
    }

    #[test]
    fn numeric_prefix_starts_at_first_digit() {
        assert_eq!(parse_numeric_prefix("latency 30.5ms"), 30.5);
        assert_eq!(parse_numeric_prefix("~12ms"), 12.0);
        // digits inside a leading word count too
        assert_eq!(parse_numeric_prefix("p99: 30.5ms"), 99.0);
    }

    #[test]
    fn thousands() {
        assert_eq!(format_thousands(1234567.0, 0), "1,234,567");
        assert_eq!(format_thousands(999.0, 0), "999");
        assert_eq!(format_thousands(1000.0, 0), "1,000");
        assert_eq!(format_thousands(0.0, 0), "0");
        assert_eq!(format_thousands(1234.5678, 1), "1,234.6");
        assert_eq!(format_thousands(-98765.4, 0), "-98,765");
        assert_eq!(format_thousands(-0.2, 0), "0");
    }
}
