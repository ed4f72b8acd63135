use std::fmt::Write;

const MAX_FRACTION_DIGITS: usize = 3;

/// Format a value for tooltips: thousands grouping, at most three fraction
/// digits, trailing zeros dropped (`1234.5678` → `1,234.568`).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_owned();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if !frac_part.is_empty() {
        let _ = write!(out, ".{frac_part}");
    }
    out
}

/// Raw value text for accessible labels (`30`, `0.25`).
pub fn plain_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::{format_value, plain_value};

    #[test]
    fn formats_integers_without_fraction() {
        assert_eq!(format_value(30.0), "30");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_value(1234.0), "1,234");
        assert_eq!(format_value(1_234_567.0), "1,234,567");
        assert_eq!(format_value(100_000.0), "100,000");
    }

    #[test]
    fn rounds_to_three_fraction_digits() {
        assert_eq!(format_value(1234.5678), "1,234.568");
        assert_eq!(format_value(0.1), "0.1");
        assert_eq!(format_value(2.5), "2.5");
    }

    #[test]
    fn negative_values_keep_sign_unless_rounded_to_zero() {
        assert_eq!(format_value(-9876.5), "-9,876.5");
        assert_eq!(format_value(-0.0001), "0");
    }

    #[test]
    fn non_finite_values_have_symbols() {
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "∞");
    }

    #[test]
    fn plain_value_matches_shortest_repr() {
        assert_eq!(plain_value(30.0), "30");
        assert_eq!(plain_value(0.25), "0.25");
    }
}
