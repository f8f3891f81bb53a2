//! G-code word formatting
//!
//! Numbers are written in their shortest decimal form, the way they were
//! entered: no fixed precision is imposed and nothing is rounded. Callers
//! round display values before they become part of a command.

use std::fmt::Display;

/// Format a number in its shortest round-trip decimal form
///
/// Integral values carry no fractional part (`12.0` → `"12"`) and
/// negative zero is written as `"0"`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Also catches -0.0, which would otherwise print as "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Format a single G-code word: an address letter followed by its value
pub fn format_word(letter: char, value: impl Display) -> String {
    format!("{}{}", letter, value)
}

/// Format the instruction head for a numeric G code (`6500.1` → `"G6500.1"`)
pub fn format_code(code: f64) -> String {
    format_word('G', format_number(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integral_numbers_have_no_fraction() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-35.0), "-35");
        assert_eq!(format_number(2.0), "2");
    }

    #[test]
    fn test_fractional_numbers_keep_full_precision() {
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(12.345), "12.345");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(5.0 * -1.0 + 5.0), "0");
    }

    #[test]
    fn test_format_code() {
        assert_eq!(format_code(6500.1), "G6500.1");
        assert_eq!(format_code(6520.1), "G6520.1");
        assert_eq!(format_code(54.0), "G54");
    }

    #[test]
    fn test_format_word() {
        assert_eq!(format_word('H', format_number(12.0)), "H12");
        assert_eq!(format_word('Q', 1), "Q1");
    }

    proptest! {
        #[test]
        fn prop_format_number_is_exact(value in -1.0e6f64..1.0e6f64) {
            let text = format_number(value);
            let parsed: f64 = text.parse().unwrap();
            prop_assert_eq!(parsed, if value == 0.0 { 0.0 } else { value });
            prop_assert!(!text.contains('e'));
        }
    }
}
