//! Call builders for the Crypto Devs NFT (ERC-721 Enumerable) contract.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::contracts::abi::ICryptoDevs;
use crate::contracts::CallRequest;

pub fn build_balance_of(nft: Address, owner: Address) -> CallRequest {
    CallRequest::new(nft, ICryptoDevs::balanceOfCall { owner }.abi_encode())
}

/// Build `tokenOfOwnerByIndex(owner, index)`.
pub fn build_token_of_owner_by_index(nft: Address, owner: Address, index: u64) -> CallRequest {
    CallRequest::new(
        nft,
        ICryptoDevs::tokenOfOwnerByIndexCall {
            owner,
            index: U256::from(index),
        }
        .abi_encode(),
    )
}
