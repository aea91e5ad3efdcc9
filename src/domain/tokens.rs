//! Tokens sub-client: ICO token sale reads and `mint`.

use alloy_primitives::{Address, U256};

use crate::client::IcoClient;
use crate::error::IcoError;
use crate::shared::{mint_payment, TokenAmount};
use crate::wallet::PendingTransaction;

pub struct Tokens<'a> {
    pub(crate) client: &'a IcoClient,
}

impl<'a> Tokens<'a> {
    /// Total ICO tokens minted so far, in base units.
    pub async fn total_minted(&self) -> Result<TokenAmount, IcoError> {
        self.client.reader_gateway().await?.read_total_minted().await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<TokenAmount, IcoError> {
        self.client.reader_gateway().await?.read_balance(owner).await
    }

    /// Balance of the connected account.
    pub async fn my_balance(&self) -> Result<TokenAmount, IcoError> {
        let gateway = self.client.signer_gateway().await?;
        let owner = gateway.accessor().address();
        gateway.read_balance(owner).await
    }

    /// Wei attached to `mint(amount)`.
    pub fn price_for(&self, amount: U256) -> Result<U256, IcoError> {
        mint_payment(amount, self.client.price_per_token_wei)
            .map_err(|e| IcoError::Validation(e.to_string()))
    }

    /// Submit `mint(amount)` from the connected account.
    ///
    /// Returns once the wallet accepted the transaction; await
    /// [`PendingTransaction::wait`] for confirmation.
    pub async fn mint(&self, amount: U256) -> Result<PendingTransaction, IcoError> {
        self.client.signer_gateway().await?.mint(amount).await
    }
}
