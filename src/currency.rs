//! Dollar display strings for fund goals and payment amounts.
//!
//! Fund goals are whole dollars held as `u64`; the form shows them as
//! `"$ 12,500"` and converts back right before submission.

use rust_decimal::Decimal;

const SYMBOL: &str = "$";
const SEPARATOR: char = ',';

/// Format raw user input as a currency string (e.g., "12500" -> "$ 12,500").
///
/// Every non-digit is dropped first, so the input may itself be an already
/// formatted string. Returns an empty string when no digits remain.
pub fn format(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    format!("{} {}", SYMBOL, group_thousands(&digits))
}

/// Parse a display string back into whole dollars. Returns 0 when nothing parses.
pub fn unformat(display: &str) -> u64 {
    let stripped: String = display
        .chars()
        .filter(|c| *c != SEPARATOR && !SYMBOL.contains(*c))
        .collect();
    let leading: String = stripped
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    leading.parse().unwrap_or(0)
}

/// Format a Decimal amount with the same grouping, truncated to whole dollars.
pub fn format_amount(amount: Decimal) -> String {
    let num = amount.trunc().to_string();
    let is_negative = amount.is_sign_negative() && !amount.trunc().is_zero();
    let formatted = format(&num);
    let formatted = if formatted.is_empty() {
        format!("{} 0", SYMBOL)
    } else {
        formatted
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(SEPARATOR);
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format("5"), "$ 5");
        assert_eq!(format("500"), "$ 500");
        assert_eq!(format("1000"), "$ 1,000");
        assert_eq!(format("1234567"), "$ 1,234,567");
    }

    #[test]
    fn test_format_strips_non_digits() {
        assert_eq!(format("$ 1,2a3"), "$ 123");
        assert_eq!(format("$ 1,000"), "$ 1,000");
    }

    #[test]
    fn test_format_without_digits_is_empty() {
        assert_eq!(format(""), "");
        assert_eq!(format("abc"), "");
        assert_eq!(format("$ ,"), "");
    }

    #[test]
    fn test_unformat() {
        assert_eq!(unformat("$ 500"), 500);
        assert_eq!(unformat("$ 1,234,567"), 1_234_567);
        assert_eq!(unformat(""), 0);
        assert_eq!(unformat("$ "), 0);
        assert_eq!(unformat("12abc"), 12);
        assert_eq!(unformat("abc"), 0);
    }

    #[test]
    fn test_unformat_overflow_is_zero() {
        assert_eq!(unformat("$ 99,999,999,999,999,999,999,999"), 0);
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            0u64,
            1,
            12,
            999,
            1_000,
            10_001,
            987_654_321,
            u64::MAX / 7,
            u64::MAX,
        ];
        for n in samples {
            assert_eq!(unformat(&format(&n.to_string())), n, "round trip of {n}");
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(0)), "$ 0");
        assert_eq!(format_amount(dec!(1250.75)), "$ 1,250");
        assert_eq!(format_amount(dec!(-3400)), "-$ 3,400");
        assert_eq!(format_amount(dec!(-0.5)), "$ 0");
    }
}
