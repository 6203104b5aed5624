//! Ether / wei conversion
//!
//! The contract speaks wei (`uint256`); people read and type ether.
//! Formatting follows the familiar `formatEther` shape: the fractional part
//! is trimmed of trailing zeros but always keeps at least one digit, so zero
//! renders as `"0.0"`.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::values::Wei;

/// Decimal places between wei and ether
pub const ETHER_DECIMALS: u32 = 18;

/// 1 ether in wei
pub const ONE_ETHER: Wei = Wei::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Smallest amount a new bid must exceed the current highest bid by (0.001 ether)
pub const MIN_BID_INCREMENT: Wei = Wei::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// Errors parsing a user-entered ether amount
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount cannot be negative: {0}")]
    Negative(String),

    #[error("Too many decimal places (max {ETHER_DECIMALS}): {0}")]
    TooManyDecimals(String),
}

/// Format a wei amount as an ether string (`1500000000000000000` -> `"1.5"`)
pub fn format_ether(value: Wei) -> String {
    let whole = value / ONE_ETHER;
    // Remainder is below 10^18 and therefore fits in the low limb
    let fraction = (value % ONE_ETHER).as_limbs()[0];

    let fraction = format!("{:018}", fraction);
    let trimmed = fraction.trim_end_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{}.{}", whole, trimmed)
}

/// Parse an ether string into wei (`"0.001"` -> `1000000000000000`)
pub fn parse_ether(input: &str) -> Result<Wei, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty);
    }

    let amount =
        Decimal::from_str(input).map_err(|_| UnitsError::Invalid(input.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitsError::Negative(input.to_string()));
    }
    if amount.scale() > ETHER_DECIMALS {
        return Err(UnitsError::TooManyDecimals(input.to_string()));
    }

    let mantissa = amount.mantissa().unsigned_abs();
    let shift = Wei::from(10u64).pow(Wei::from(ETHER_DECIMALS - amount.scale()));

    Ok(Wei::from(mantissa) * shift)
}

/// Convert a decimal ether amount (already validated) into wei
pub fn decimal_to_wei(amount: Decimal) -> Result<Wei, UnitsError> {
    parse_ether(&amount.to_string())
}
