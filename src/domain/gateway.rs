//! Contract gateway: typed reads and writes against the ICO token and the
//! position-token (NFT) contracts, bound to one accessor.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::contracts::abi::{decode_returns, ICryptoDevToken, ICryptoDevs};
use crate::contracts::constants::token_price_wei;
use crate::contracts::{position, token, CallRequest, ContractAddresses};
use crate::error::IcoError;
use crate::shared::{TokenAmount, TokenId};
use crate::wallet::{ChainReader, PendingTransaction, Signer};

/// Binds [`ContractAddresses`] to an accessor.
///
/// Reads are available for any [`ChainReader`]; `mint` and `claim` only exist
/// on a gateway built over a [`Signer`].
#[derive(Clone)]
pub struct ContractGateway<A> {
    addresses: ContractAddresses,
    accessor: A,
    price_per_token_wei: U256,
}

impl<A> ContractGateway<A> {
    pub fn new(addresses: ContractAddresses, accessor: A) -> Self {
        Self {
            addresses,
            accessor,
            price_per_token_wei: token_price_wei(),
        }
    }

    pub fn with_price_per_token(mut self, price_per_token_wei: U256) -> Self {
        self.price_per_token_wei = price_per_token_wei;
        self
    }

    pub fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub fn price_per_token_wei(&self) -> U256 {
        self.price_per_token_wei
    }
}

impl<A: ChainReader> ContractGateway<A> {
    async fn read<C: SolCall>(&self, request: CallRequest) -> Result<C::Return, IcoError> {
        let output = self.accessor.call(&request).await?;
        decode_returns::<C>(&output).map_err(|e| IcoError::ReadFailure(e.to_string()))
    }

    /// `totalSupply()` of the ICO token, in base units.
    pub async fn read_total_minted(&self) -> Result<TokenAmount, IcoError> {
        let ret = self
            .read::<ICryptoDevToken::totalSupplyCall>(token::build_total_supply(self.addresses.token))
            .await?;
        Ok(TokenAmount::new(ret._0))
    }

    /// ICO token balance of `owner`, in base units.
    pub async fn read_balance(&self, owner: Address) -> Result<TokenAmount, IcoError> {
        let ret = self
            .read::<ICryptoDevToken::balanceOfCall>(token::build_balance_of(
                self.addresses.token,
                owner,
            ))
            .await?;
        Ok(TokenAmount::new(ret._0))
    }

    /// Number of position tokens held by `owner`.
    pub async fn read_position_balance(&self, owner: Address) -> Result<u64, IcoError> {
        let balance = self
            .read::<ICryptoDevs::balanceOfCall>(position::build_balance_of(
                self.addresses.position,
                owner,
            ))
            .await?
            ._0;
        u64::try_from(balance).map_err(|_| {
            IcoError::ReadFailure(format!("position balance {} out of range", balance))
        })
    }

    pub async fn read_position_token_id_at(
        &self,
        owner: Address,
        index: u64,
    ) -> Result<TokenId, IcoError> {
        let ret = self
            .read::<ICryptoDevs::tokenOfOwnerByIndexCall>(position::build_token_of_owner_by_index(
                self.addresses.position,
                owner,
                index,
            ))
            .await?;
        Ok(TokenId::new(ret._0))
    }

    /// Whether the claim attached to `token_id` has already been exercised.
    pub async fn read_claim_consumed(&self, token_id: TokenId) -> Result<bool, IcoError> {
        let ret = self
            .read::<ICryptoDevToken::tokenIdsClaimedCall>(token::build_token_ids_claimed(
                self.addresses.token,
                token_id,
            ))
            .await?;
        Ok(ret._0)
    }
}

impl ContractGateway<Signer> {
    /// Submit `mint(amount)` paying `amount * price_per_token` wei.
    ///
    /// `amount` is a whole-token count and must be positive.
    pub async fn mint(&self, amount: U256) -> Result<PendingTransaction, IcoError> {
        if amount.is_zero() {
            return Err(IcoError::Validation(
                "mint amount must be greater than zero".to_string(),
            ));
        }
        let request = token::build_mint(self.addresses.token, amount, self.price_per_token_wei)
            .map_err(|e| IcoError::Validation(e.to_string()))?;

        tracing::info!(
            %amount,
            value = ?request.value,
            from = %self.accessor.address(),
            "Minting Crypto Dev Tokens"
        );
        self.accessor.send_transaction(&request).await
    }

    /// Submit `claim()` for every unclaimed position token of the signer.
    pub async fn claim(&self) -> Result<PendingTransaction, IcoError> {
        tracing::info!(from = %self.accessor.address(), "Claiming Crypto Dev Tokens");
        self.accessor
            .send_transaction(&token::build_claim(self.addresses.token))
            .await
    }
}
