//! XLM amount conversion.
//!
//! Amounts cross every public API as whole-XLM decimal strings ("12.5"),
//! exactly as a user types them and as Horizon reports balances. They are
//! converted to integer stroops only when a transaction is serialized.

use crate::error::BridgeError;
use crate::Result;

/// Stroops per XLM
pub const STROOPS_PER_XLM: i64 = 10_000_000;

/// Maximum fractional digits an XLM amount may carry
pub const MAX_DECIMALS: usize = 7;

/// Parse a non-negative decimal XLM amount into stroops, without floating point.
pub fn parse_xlm(amount: &str) -> Result<i64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(invalid(amount, "amount is empty"));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid(amount, "no digits"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(amount, "expected a non-negative decimal number"));
    }
    if fraction.len() > MAX_DECIMALS {
        return Err(invalid(amount, "more than 7 decimal places"));
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid(amount, "amount too large"))?
    };
    let fraction_value: i64 = if fraction.is_empty() {
        0
    } else {
        format!("{:0<width$}", fraction, width = MAX_DECIMALS)
            .parse()
            .map_err(|_| invalid(amount, "invalid fraction"))?
    };

    whole_value
        .checked_mul(STROOPS_PER_XLM)
        .and_then(|stroops| stroops.checked_add(fraction_value))
        .ok_or_else(|| invalid(amount, "amount too large"))
}

/// Render stroops as a Horizon-style 7-decimal XLM string ("12.5000000").
pub fn format_xlm(stroops: i64) -> String {
    let sign = if stroops < 0 { "-" } else { "" };
    let abs = stroops.unsigned_abs();
    let per = STROOPS_PER_XLM as u64;
    format!("{}{}.{:07}", sign, abs / per, abs % per)
}

fn invalid(amount: &str, reason: &str) -> BridgeError {
    BridgeError::InvalidPayment(format!("Invalid amount '{}': {}", amount, reason))
}
