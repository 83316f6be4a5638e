//! Rupiah formatting for display.

/// Format an amount as Indonesian rupiah, e.g. `Rp 5.000.000,00`.
///
/// Uses the Indonesian locale conventions: `.` groups thousands, `,`
/// separates the two decimal places, and a non-breaking space follows the
/// currency symbol.
pub fn format_idr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("Rp\u{a0}{}", amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    // Rounding can turn a tiny negative amount into zero
    let sign = if amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };

    format!("{}Rp\u{a0}{},{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millions() {
        assert_eq!(format_idr(5_000_000.0), "Rp\u{a0}5.000.000,00");
        assert_eq!(format_idr(1_234_567_890.5), "Rp\u{a0}1.234.567.890,50");
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_idr(0.0), "Rp\u{a0}0,00");
        assert_eq!(format_idr(999.0), "Rp\u{a0}999,00");
        assert_eq!(format_idr(1000.0), "Rp\u{a0}1.000,00");
    }

    #[test]
    fn test_format_rounds_to_cents() {
        assert_eq!(format_idr(12.345_678), "Rp\u{a0}12,35");
        assert_eq!(format_idr(999_999.999), "Rp\u{a0}1.000.000,00");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_idr(-2500.0), "-Rp\u{a0}2.500,00");
        assert_eq!(format_idr(-0.001), "Rp\u{a0}0,00");
    }
}
