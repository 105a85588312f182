//! Token amount representation and decimal string conversion
//!
//! Key design decisions:
//! - All amounts stored as u64 minor units to avoid f64 precision issues
//! - Decimal strings are the only display format; conversion is lossless
//!   in the minor-units -> string -> minor-units direction
//! - Parsing truncates (never rounds) excess fractional digits
//! - f64 conversion exists for display-time math only, never for values
//!   that are compared, summed, or persisted

/// Token amount in minor units.
pub type Amount = u64;

/// Implied decimal places in an [`Amount`].
pub const DECIMALS: usize = 6;

/// Minor units per whole token (10^DECIMALS).
pub const UNITS_PER_TOKEN: u64 = 1_000_000;

/// Format an amount as a decimal string, e.g. `1_500_000` -> `"1.5"`.
///
/// The fractional part is left-padded to [`DECIMALS`] digits and trailing
/// zeros are stripped; whole-token amounts render without a decimal point.
pub fn to_display_string(amount: Amount) -> String {
    let whole = amount / UNITS_PER_TOKEN;
    let frac = amount % UNITS_PER_TOKEN;

    if frac == 0 {
        return whole.to_string();
    }

    let frac_str = format!("{:0width$}", frac, width = DECIMALS);
    let frac_trimmed = frac_str.trim_end_matches('0');

    format!("{}.{}", whole, frac_trimmed)
}

/// Parse a decimal string into minor units, e.g. `"1.5"` -> `1_500_000`.
///
/// The whole part defaults to `0` when absent (`".5"` parses). Fractional
/// digits beyond [`DECIMALS`] are truncated, not rounded. Returns `None` for
/// any input that is not a plain non-negative decimal number, or that
/// overflows u64; callers treat that as a validation failure.
pub fn parse_display_string(s: &str) -> Option<Amount> {
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };

    let whole = if whole.is_empty() { "0" } else { whole };

    // Truncate to DECIMALS characters, then right-pad with zeros. A second
    // '.' or any other stray character survives into `frac` here and fails
    // the digit check below.
    let frac: String = frac.chars().take(DECIMALS).collect();
    let frac = format!("{:0<width$}", frac, width = DECIMALS);

    let digits = format!("{}{}", whole, frac);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u64>().ok()
}

/// Convert an amount to whole tokens as f64 (for display only).
pub fn to_f64(amount: Amount) -> f64 {
    amount as f64 / UNITS_PER_TOKEN as f64
}
