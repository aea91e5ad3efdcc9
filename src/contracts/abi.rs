//! Solidity interfaces of the ICO contracts, plus hex helpers for call data.

use alloy_sol_types::{sol, SolCall};
use thiserror::Error;

sol! {
    /// Crypto Dev Token: ERC-20 sold for ether and claimable by NFT holders.
    #[derive(Debug, PartialEq, Eq)]
    interface ICryptoDevToken {
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function tokenIdsClaimed(uint256 tokenId) external view returns (bool);
        function mint(uint256 amount) external payable;
        function claim() external;
    }

    /// Crypto Devs NFT (ERC-721 Enumerable), the position token.
    #[derive(Debug, PartialEq, Eq)]
    interface ICryptoDevs {
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Cannot decode {function} output: {reason}")]
    Decode {
        function: &'static str,
        reason: String,
    },
}

/// Decode and validate the return data of `C`.
pub fn decode_returns<C: SolCall>(output: &[u8]) -> Result<C::Return, AbiError> {
    C::abi_decode_returns(output, true).map_err(|e| AbiError::Decode {
        function: C::SIGNATURE,
        reason: e.to_string(),
    })
}

/// `0x`-prefixed lowercase hex.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Parse `0x`-prefixed (or bare) hex into bytes.
pub fn from_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| AbiError::InvalidHex(e.to_string()))
}
