//! Fixed-decimal conversions between whole-token amounts and raw ledger units.
//!
//! The ledger stores every balance as raw `u128` units. A token with `decimals = 18`
//! has `10^18` raw units per whole token, so "100 MTX" is `100 * 10^18` raw.

use crate::error::TypesError;

/// Convert a whole-token amount to raw units. Returns `None` on overflow.
pub fn to_raw(whole: u128, decimals: u8) -> Option<u128> {
    10u128
        .checked_pow(u32::from(decimals))
        .and_then(|precision| whole.checked_mul(precision))
}

/// Parse a decimal string (`"100"`, `"0.25"`, `"1_000.5"`) into raw units.
pub fn parse_units(text: &str, decimals: u8) -> Result<u128, TypesError> {
    let invalid = |reason: &str| TypesError::InvalidUnits {
        input: text.to_string(),
        reason: reason.to_string(),
    };

    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(invalid("empty amount"));
    }

    let (int_part, frac_part) = match cleaned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (cleaned.as_str(), ""),
    };
    if int_part.is_empty() {
        return Err(invalid("missing integer part"));
    }
    if cleaned.contains('.') && frac_part.is_empty() {
        return Err(invalid("missing fractional digits after '.'"));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid("only digits, '.' and '_' are allowed"));
    }
    if frac_part.len() > usize::from(decimals) {
        return Err(invalid(&format!(
            "at most {decimals} fractional digits are allowed"
        )));
    }

    let whole = digits_to_u128(int_part).ok_or_else(|| invalid("amount overflows"))?;
    let whole_raw = to_raw(whole, decimals).ok_or_else(|| invalid("amount overflows"))?;

    let frac_raw = if frac_part.is_empty() {
        0
    } else {
        let padding = u32::from(decimals) - frac_part.len() as u32;
        digits_to_u128(frac_part)
            .and_then(|f| f.checked_mul(10u128.checked_pow(padding)?))
            .ok_or_else(|| invalid("amount overflows"))?
    };

    whole_raw
        .checked_add(frac_raw)
        .ok_or_else(|| invalid("amount overflows"))
}

/// Render raw units as a decimal string with trailing fractional zeros trimmed.
///
/// Defined for every `decimals`; past 38 places `10^decimals` exceeds any
/// `u128`, so the whole part is zero.
pub fn format_units(raw: u128, decimals: u8) -> String {
    let (whole, frac) = match 10u128.checked_pow(u32::from(decimals)) {
        Some(precision) => (raw / precision, raw % precision),
        None => (0, raw),
    };
    if frac == 0 {
        return whole.to_string();
    }
    let frac_str = format!("{:0width$}", frac, width = usize::from(decimals));
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

fn digits_to_u128(digits: &str) -> Option<u128> {
    digits.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
    })
}
