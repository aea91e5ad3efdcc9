//! Pure conversion between human-denominated decimals and base units.
//!
//! Human prices (e.g. `0.001` ether per token) are `rust_decimal::Decimal`;
//! on-chain values are `U256`. All math is exact integer arithmetic.
//! No async, no network calls.

use std::fmt;

use alloy_primitives::U256;
use rust_decimal::Decimal;

/// Decimals of ether and of the ICO token.
pub const ETHER_DECIMALS: u8 = 18;

/// Errors that can occur during unit conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalingError {
    Negative(String),
    Overflow { context: String },
    FractionalAmount { value: String },
    InvalidDecimal { input: String, reason: String },
}

impl fmt::Display for ScalingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingError::Negative(v) => write!(f, "Amount must not be negative, got {}", v),
            ScalingError::Overflow { context } => write!(f, "Overflow: {}", context),
            ScalingError::FractionalAmount { value } => {
                write!(f, "Fractional base units not allowed: {}", value)
            }
            ScalingError::InvalidDecimal { input, reason } => {
                write!(f, "Invalid decimal '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for ScalingError {}

/// `10^decimals` as a `U256`.
pub fn pow10(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Convert a human-denominated decimal into base units.
///
/// ```text
/// base_units = value * 10^decimals
/// ```
///
/// Rejects negative values and values with more fractional digits than
/// `decimals` (no fractional base units).
pub fn parse_units(value: Decimal, decimals: u8) -> Result<U256, ScalingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ScalingError::Negative(value.to_string()));
    }

    let normalized = value.normalize();
    let scale = normalized.scale();
    let mantissa = U256::from(normalized.mantissa().unsigned_abs());

    if scale <= decimals as u32 {
        let multiplier = pow10(decimals - scale as u8);
        mantissa
            .checked_mul(multiplier)
            .ok_or_else(|| ScalingError::Overflow {
                context: format!("{} * 10^{}", value, decimals),
            })
    } else {
        Err(ScalingError::FractionalAmount {
            value: format!("{} has more than {} decimals", value, decimals),
        })
    }
}

/// Convert an ether-denominated decimal into wei.
pub fn parse_ether(value: Decimal) -> Result<U256, ScalingError> {
    parse_units(value, ETHER_DECIMALS)
}

/// Format base units as a decimal string.
///
/// Trailing fractional zeros are trimmed, but at least one fractional digit is
/// always kept: `0 -> "0.0"`, `1.5e18 -> "1.5"`, `10e18 -> "10.0"`.
pub fn format_units(value: U256, decimals: u8) -> String {
    let divisor = pow10(decimals);
    let integer = value / divisor;
    let fraction = value % divisor;

    let mut fraction_str = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    while fraction_str.len() > 1 && fraction_str.ends_with('0') {
        fraction_str.pop();
    }
    if fraction_str.is_empty() {
        fraction_str.push('0');
    }

    format!("{}.{}", integer, fraction_str)
}

/// Format wei as an ether-denominated decimal string.
pub fn format_ether(value: U256) -> String {
    format_units(value, ETHER_DECIMALS)
}

/// Native-currency payment attached to a `mint(amount)` call.
///
/// ```text
/// payment_wei = amount * price_per_token_wei
/// ```
pub fn mint_payment(amount: U256, price_per_token_wei: U256) -> Result<U256, ScalingError> {
    amount
        .checked_mul(price_per_token_wei)
        .ok_or_else(|| ScalingError::Overflow {
            context: format!("{} * {} wei", amount, price_per_token_wei),
        })
}
