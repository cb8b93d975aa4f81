//! Number formatting for KPI cards and tables.

/// Format with `,` thousands separators and a fixed number of decimals.
/// Example: `1234567.891` with 2 decimals -> `"1,234,567.89"`
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    // Rounding can turn a tiny negative into zero; never print "-0.00".
    if value < 0.0 && text.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Money value with the currency prefix, e.g. `R$ 1,234.50`.
pub fn money(currency: &str, value: f64) -> String {
    format!("{currency} {}", group_thousands(value, 2))
}

/// Signed percentage with one decimal, e.g. `+12.5%`.
pub fn signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(0.0, 2), "0.00");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(group_thousands(-1234.5, 2), "-1,234.50");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_money_and_percent() {
        assert_eq!(money("R$", 261.96), "R$ 261.96");
        assert_eq!(signed_percent(-50.0), "-50.0%");
        assert_eq!(signed_percent(12.345), "+12.3%");
    }
}
