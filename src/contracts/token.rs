//! Call builders for the Crypto Dev Token contract.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::contracts::abi::ICryptoDevToken;
use crate::contracts::CallRequest;
use crate::shared::{mint_payment, ScalingError, TokenId};

pub fn build_total_supply(token: Address) -> CallRequest {
    CallRequest::new(token, ICryptoDevToken::totalSupplyCall {}.abi_encode())
}

pub fn build_balance_of(token: Address, owner: Address) -> CallRequest {
    CallRequest::new(
        token,
        ICryptoDevToken::balanceOfCall { account: owner }.abi_encode(),
    )
}

pub fn build_token_ids_claimed(token: Address, token_id: TokenId) -> CallRequest {
    CallRequest::new(
        token,
        ICryptoDevToken::tokenIdsClaimedCall {
            tokenId: token_id.as_u256(),
        }
        .abi_encode(),
    )
}

/// Build `mint(amount)` with `amount * price_per_token_wei` attached as value.
///
/// `amount` is a whole-token count; the contract scales it to 18 decimals.
pub fn build_mint(
    token: Address,
    amount: U256,
    price_per_token_wei: U256,
) -> Result<CallRequest, ScalingError> {
    let value = mint_payment(amount, price_per_token_wei)?;
    Ok(
        CallRequest::new(token, ICryptoDevToken::mintCall { amount }.abi_encode())
            .with_value(value),
    )
}

pub fn build_claim(token: Address) -> CallRequest {
    CallRequest::new(token, ICryptoDevToken::claimCall {}.abi_encode())
}
