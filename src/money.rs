// 💶 Amount normalization
//
// All the numeric text handling lives here so it can be tested on its own:
// continental separators, thousands separators, half-up rounding and the
// reimbursement sign flip.

use crate::error::{ConvertError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Parse a plain decimal amount (`-12.34`, `1000`, `+5.5`).
///
/// `row` is only used to build the error message.
pub fn parse_amount(row: usize, raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .map_err(|e| ConvertError::parse(row, format!("invalid amount '{}': {}", raw, e)))
}

/// Convert a continental amount to the plain form.
///
/// `.` groups thousands and `,` marks decimals: `1.234,56` → `1234.56`.
pub fn normalize_continental(raw: &str) -> String {
    raw.trim().replace('.', "").replace(',', ".")
}

/// Drop `,` thousands separators: `1,234.56` → `1234.56`.
pub fn strip_thousands(raw: &str) -> String {
    raw.trim().replace(',', "")
}

/// Round to cents, ties away from zero, always with two decimals.
///
/// `0.125` → `0.13`, `-12.005` → `-12.01`, `3` → `3.00`.
pub fn round_half_up(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Negate, never producing `-0`.
pub fn negate(amount: Decimal) -> Decimal {
    let mut negated = -amount;
    if negated.is_zero() {
        negated.set_sign_positive(true);
    }
    negated
}

/// Apply reimbursement semantics to a signed amount.
///
/// Refunds (positive) are not reimbursable and yield `None`; spend is
/// returned as a positive claim rounded half-up to cents.
pub fn reimbursable(amount: Decimal) -> Option<Decimal> {
    if amount > Decimal::ZERO {
        None
    } else {
        Some(negate(round_half_up(amount)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(1, "-12.34").unwrap(), dec("-12.34"));
        assert_eq!(parse_amount(1, " 100 ").unwrap(), dec("100"));
        assert!(parse_amount(3, "12,34").is_err());
        assert!(parse_amount(3, "").is_err());
    }

    #[test]
    fn test_parse_amount_error_names_row() {
        let err = parse_amount(7, "abc").unwrap_err();
        assert!(matches!(err, ConvertError::Parse { row: 7, .. }));
    }

    #[test]
    fn test_normalize_continental() {
        assert_eq!(normalize_continental("1.234,56"), "1234.56");
        assert_eq!(normalize_continental("12,00"), "12.00");
        assert_eq!(normalize_continental("1.000.000,5"), "1000000.5");
        assert_eq!(normalize_continental(""), "");
    }

    #[test]
    fn test_strip_thousands() {
        assert_eq!(strip_thousands("1,234.56"), "1234.56");
        assert_eq!(strip_thousands("-50.00"), "-50.00");
    }

    #[test]
    fn test_round_half_up_boundaries() {
        assert_eq!(round_half_up(dec("0.125")).to_string(), "0.13");
        assert_eq!(round_half_up(dec("-0.125")).to_string(), "-0.13");
        assert_eq!(round_half_up(dec("-12.005")).to_string(), "-12.01");
        assert_eq!(round_half_up(dec("-12.345")).to_string(), "-12.35");
        assert_eq!(round_half_up(dec("1.004")).to_string(), "1.00");
        assert_eq!(round_half_up(dec("3")).to_string(), "3.00");
    }

    #[test]
    fn test_reimbursable() {
        assert_eq!(reimbursable(dec("-0.125")).unwrap().to_string(), "0.13");
        assert_eq!(reimbursable(dec("-12.005")).unwrap().to_string(), "12.01");
        assert_eq!(reimbursable(dec("-9.5")).unwrap().to_string(), "9.50");
        assert_eq!(reimbursable(dec("4.99")), None);
    }

    #[test]
    fn test_zero_is_never_negative() {
        assert_eq!(negate(dec("0.00")).to_string(), "0.00");
        assert_eq!(reimbursable(dec("0")).unwrap().to_string(), "0.00");
    }
}
