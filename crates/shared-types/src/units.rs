//! # Ether Units
//!
//! Conversion between decimal ether strings and wei (`U256`).

use primitive_types::U256;
use thiserror::Error;

/// Decimal places between ether and wei.
pub const ETHER_DECIMALS: usize = 18;

/// 10^18 wei.
pub const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Errors converting ether strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnitsError {
    /// Empty input.
    #[error("empty amount")]
    Empty,

    /// Non-digit character in the amount.
    #[error("invalid digit in amount: {0}")]
    InvalidDigit(String),

    /// More than 18 fractional digits.
    #[error("too many decimals: {0} > 18")]
    TooManyDecimals(usize),

    /// Result exceeds 256 bits.
    #[error("amount overflows U256")]
    Overflow,
}

/// Parse a decimal ether amount (`"0.01"`, `"2"`, `".5"`) into wei.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(UnitsError::Empty);
    }
    if let Some(bad) = whole.chars().chain(frac.chars()).find(|c| !c.is_ascii_digit()) {
        return Err(UnitsError::InvalidDigit(bad.to_string()));
    }
    if frac.len() > ETHER_DECIMALS {
        return Err(UnitsError::TooManyDecimals(frac.len()));
    }

    let whole_wei = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole)
            .map_err(|_| UnitsError::Overflow)?
            .checked_mul(U256::from(WEI_PER_ETHER))
            .ok_or(UnitsError::Overflow)?
    };

    let frac_wei = if frac.is_empty() {
        U256::zero()
    } else {
        let padded = format!("{:0<width$}", frac, width = ETHER_DECIMALS);
        U256::from_dec_str(&padded).map_err(|_| UnitsError::Overflow)?
    };

    whole_wei.checked_add(frac_wei).ok_or(UnitsError::Overflow)
}

/// Format wei as a decimal ether string, trimming trailing zeros
/// (`10^16` → `"0.01"`, `10^18` → `"1.0"`).
#[must_use]
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_ETHER);
    let whole = wei / unit;
    let frac = (wei % unit).as_u64();

    let mut frac_str = format!("{:0width$}", frac, width = ETHER_DECIMALS);
    while frac_str.len() > 1 && frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{}.{}", whole, frac_str)
}
