//! Conversions between display amounts and base units
//!
//! Balances live on the ledger in base units. Humans type and read decimal
//! strings like `"12.5"`; these helpers move between the two using the
//! token's `decimals`.

use crate::{types::Amount, Error, Result};

/// `10^decimals`, or `None` if it does not fit in 256 bits
pub fn unit(decimals: u8) -> Option<Amount> {
    Amount::from(10u64).checked_pow(Amount::from(decimals))
}

/// Multiply whole tokens by `10^decimals`
pub fn scale(whole: Amount, decimals: u8) -> Result<Amount> {
    unit(decimals)
        .and_then(|u| whole.checked_mul(u))
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{} tokens with {} decimals overflows 256 bits",
                whole, decimals
            ))
        })
}

/// Parse a decimal string into base units
///
/// Rejects empty input, signs, non-digits, more fractional digits than
/// `decimals`, and values that overflow.
pub fn parse_units(text: &str, decimals: u8) -> Result<Amount> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::InvalidArgument("empty amount".to_string()));
    }
    if text.starts_with('-') {
        return Err(Error::InvalidArgument(format!("negative amount '{}'", text)));
    }

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(Error::InvalidArgument(format!("malformed amount '{}'", text)));
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidArgument(format!(
            "amount '{}' has more than {} fractional digits",
            text, decimals
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(Amount::ZERO);
    }

    Amount::from_str_radix(digits, 10)
        .map_err(|_| Error::InvalidArgument(format!("amount '{}' overflows 256 bits", text)))
}

/// Render base units as a decimal string
///
/// Trailing fractional zeros are trimmed but one fractional digit is always
/// kept, so one whole token renders as `"1.0"`.
pub fn format_units(amount: Amount, decimals: u8) -> String {
    let raw = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return format!("{}.0", raw);
    }

    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - raw.len()), raw)
    } else {
        raw
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{}.{}", whole, fraction)
}
