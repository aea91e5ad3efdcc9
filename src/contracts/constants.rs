//! Sale parameters of the Crypto Devs ICO contracts.
//!
//! Contract addresses are deployment-specific and have no default; see
//! [`crate::contracts::ContractAddresses`].

use alloy_primitives::U256;

/// Price of one token in wei (0.001 ether).
pub const TOKEN_PRICE_WEI: u64 = 1_000_000_000_000_000;

/// Tokens granted per unclaimed NFT.
pub const TOKENS_PER_NFT: u64 = 10;

/// Maximum total supply in whole tokens.
pub const MAX_TOTAL_SUPPLY: u64 = 10_000;

pub fn token_price_wei() -> U256 {
    U256::from(TOKEN_PRICE_WEI)
}
