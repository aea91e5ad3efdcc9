//! Shared newtypes and utilities used across all modules.
//!
//! Amount and id types are serialization-transparent: they serialize exactly
//! like the `U256` they wrap (a `0x`-prefixed JSON-RPC quantity), so they can be
//! used directly in wire types without conversion overhead.

pub mod units;

pub use units::{
    format_ether, format_units, mint_payment, parse_ether, parse_units, ScalingError,
    ETHER_DECIMALS,
};

pub use alloy_primitives::{Address, B256, U256};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// EIP-155 chain identifier.
pub type ChainId = u64;

/// Transaction hash.
pub type TxHash = B256;

// ─── TokenAmount ─────────────────────────────────────────────────────────────

/// Non-negative arbitrary-precision token amount in base units (wei).
///
/// The ICO token uses 18 decimals, so `1 token == 10^18` base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(U256);

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount(U256::ZERO);

    pub fn new(value: U256) -> Self {
        Self(value)
    }

    /// Whole tokens scaled to 18-decimal base units.
    pub fn from_tokens(tokens: u64) -> Self {
        Self(U256::from(tokens) * units::pow10(ETHER_DECIMALS))
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_add(other.0).map(TokenAmount)
    }

    pub fn checked_sub(self, other: TokenAmount) -> Option<TokenAmount> {
        self.0.checked_sub(other.0).map(TokenAmount)
    }

    /// Format as a decimal string with 18 decimals (e.g. `"12.5"`).
    pub fn format_ether(&self) -> String {
        format_ether(self.0)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<U256> for TokenAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<TokenAmount> for U256 {
    fn from(amount: TokenAmount) -> Self {
        amount.0
    }
}

impl FromStr for TokenAmount {
    type Err = ScalingError;

    /// Parse a plain integer string (decimal or `0x` hex), as typed into the
    /// mint input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        U256::from_str(trimmed)
            .map(TokenAmount)
            .map_err(|e| ScalingError::InvalidDecimal {
                input: trimmed.to_string(),
                reason: e.to_string(),
            })
    }
}

// ─── TokenId ─────────────────────────────────────────────────────────────────

/// ERC-721 token id of a position token (Crypto Devs NFT).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(U256);

impl TokenId {
    pub fn new(value: U256) -> Self {
        Self(value)
    }

    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for TokenId {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

// ─── ClaimableCount ──────────────────────────────────────────────────────────

/// Number of owned position tokens whose claim has not been consumed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimableCount(u64);

impl ClaimableCount {
    pub const ZERO: ClaimableCount = ClaimableCount(0);

    pub fn new(count: u64) -> Self {
        Self(count)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Tokens owed for this many unclaimed position tokens.
    pub fn tokens_owed(&self, tokens_per_claim: u64) -> U256 {
        U256::from(self.0) * U256::from(tokens_per_claim)
    }
}

impl std::fmt::Display for ClaimableCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ClaimableCount {
    fn from(count: u64) -> Self {
        Self(count)
    }
}

// ─── Utilities ───────────────────────────────────────────────────────────────

/// Parse a `0x`-prefixed JSON-RPC quantity into a `u64`.
pub fn parse_quantity_u64(s: &str) -> Result<u64, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| format!("quantity '{}' is missing 0x prefix", s))?;
    if digits.is_empty() {
        return Err(format!("quantity '{}' has no digits", s));
    }
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid quantity '{}': {}", s, e))
}

/// Format a `U256` as a `0x`-prefixed JSON-RPC quantity (no leading zeros).
pub fn to_quantity(value: U256) -> String {
    format!("0x{:x}", value)
}
