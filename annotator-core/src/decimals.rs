// Display conversion of integer token amounts.
// Floating point on purpose: this output is read by people, never by the ledger.

/// Decimals assumed for coin types without metadata (SUI uses 9).
pub const DEFAULT_DECIMALS: u8 = 9;

/// Fractional digits rendered by [`to_human_readable`].
pub const DISPLAY_FRACTION_DIGITS: usize = 6;

/// Parse a signed integer string. Anything that is not an optional sign followed by
/// ASCII digits is rejected.
pub fn parse_amount(amount: &str) -> Option<f64> {
    let trimmed = amount.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// Scale `amount` down by `10^decimals`, or `None` if `amount` is not an integer.
pub fn try_to_human_readable(amount: &str, decimals: u8) -> Option<String> {
    let value = parse_amount(amount)?;
    if decimals == 0 {
        return Some(amount.trim().to_string());
    }

    let scaled = value / 10f64.powi(i32::from(decimals));
    Some(format!("{scaled:.prec$}", prec = DISPLAY_FRACTION_DIGITS))
}

/// Like [`try_to_human_readable`] but renders malformed input as `NaN`.
pub fn to_human_readable(amount: &str, decimals: u8) -> String {
    try_to_human_readable(amount, decimals).unwrap_or_else(|| f64::NAN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_human_readable_scales_by_decimals() {
        assert_eq!(to_human_readable("1000000000", 9), "1.000000");
        assert_eq!(to_human_readable("1500000", 6), "1.500000");
        assert_eq!(to_human_readable("241000000", 9), "0.241000");
    }

    #[test]
    fn test_to_human_readable_zero_decimals_is_identity() {
        assert_eq!(to_human_readable("5", 0), "5");
        assert_eq!(to_human_readable("-42", 0), "-42");
    }

    #[test]
    fn test_to_human_readable_signed_deltas() {
        assert_eq!(to_human_readable("-1000000000", 9), "-1.000000");
        assert_eq!(to_human_readable("+2000000000", 9), "2.000000");
    }

    #[test]
    fn test_malformed_amounts() {
        assert_eq!(to_human_readable("abc", 9), "NaN");
        assert_eq!(try_to_human_readable("", 9), None);
        assert_eq!(try_to_human_readable("1.5", 9), None);
        assert_eq!(try_to_human_readable("-", 9), None);
        assert_eq!(try_to_human_readable("0", 9).as_deref(), Some("0.000000"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12 "), Some(12.0));
        assert_eq!(parse_amount("-7"), Some(-7.0));
        assert_eq!(parse_amount("1e9"), None);
        assert_eq!(parse_amount("0x10"), None);
    }
}
