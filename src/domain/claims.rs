//! Claims sub-client: position-token eligibility and `claim`.

use alloy_primitives::{Address, U256};

use crate::client::IcoClient;
use crate::domain::eligibility::{compute_claimable, try_compute_claimable};
use crate::error::IcoError;
use crate::shared::{ClaimableCount, TokenId};
use crate::wallet::PendingTransaction;

pub struct Claims<'a> {
    pub(crate) client: &'a IcoClient,
}

impl<'a> Claims<'a> {
    /// Unclaimed position tokens held by `owner`; zero if any read fails.
    pub async fn claimable(&self, owner: Address) -> Result<ClaimableCount, IcoError> {
        let gateway = self.client.reader_gateway().await?;
        Ok(compute_claimable(&gateway, owner, self.client.claim_scan).await)
    }

    /// Like [`Claims::claimable`] but surfaces the failing read.
    pub async fn try_claimable(&self, owner: Address) -> Result<ClaimableCount, IcoError> {
        let gateway = self.client.reader_gateway().await?;
        try_compute_claimable(&gateway, owner, self.client.claim_scan).await
    }

    /// Unclaimed position tokens held by the connected account.
    pub async fn mine(&self) -> Result<ClaimableCount, IcoError> {
        let gateway = self.client.signer_gateway().await?;
        let owner = gateway.accessor().address();
        Ok(compute_claimable(&gateway, owner, self.client.claim_scan).await)
    }

    pub async fn is_claimed(&self, token_id: TokenId) -> Result<bool, IcoError> {
        self.client
            .reader_gateway()
            .await?
            .read_claim_consumed(token_id)
            .await
    }

    /// ICO tokens a claim of `count` position tokens pays out (whole tokens).
    pub fn tokens_owed(&self, count: ClaimableCount) -> U256 {
        count.tokens_owed(self.client.view_config.tokens_per_claim)
    }

    /// Submit `claim()` from the connected account.
    pub async fn claim(&self) -> Result<PendingTransaction, IcoError> {
        self.client.signer_gateway().await?.claim().await
    }
}
