//! Eligibility calculator: how many held position tokens still have an
//! unexercised claim.

use alloy_primitives::Address;
use futures_util::stream::{self, StreamExt, TryStreamExt};

use crate::domain::gateway::ContractGateway;
use crate::error::IcoError;
use crate::shared::{ClaimableCount, TokenId};
use crate::wallet::{ChainReader, MaybeSendSync};

/// The two on-chain registries the calculator reads from: position-token
/// ownership and claim consumption.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ClaimRegistry: MaybeSendSync {
    async fn position_balance(&self, owner: Address) -> Result<u64, IcoError>;

    async fn position_token_id_at(&self, owner: Address, index: u64)
        -> Result<TokenId, IcoError>;

    async fn claim_consumed(&self, token_id: TokenId) -> Result<bool, IcoError>;
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<A: ChainReader> ClaimRegistry for ContractGateway<A> {
    async fn position_balance(&self, owner: Address) -> Result<u64, IcoError> {
        self.read_position_balance(owner).await
    }

    async fn position_token_id_at(
        &self,
        owner: Address,
        index: u64,
    ) -> Result<TokenId, IcoError> {
        self.read_position_token_id_at(owner, index).await
    }

    async fn claim_consumed(&self, token_id: TokenId) -> Result<bool, IcoError> {
        self.read_claim_consumed(token_id).await
    }
}

/// How the per-index reads are scheduled.
///
/// `concurrency == 1` walks indices strictly in order, one round-trip at a
/// time. Larger values keep up to that many indices in flight; the count is
/// the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimScan {
    pub concurrency: usize,
}

impl ClaimScan {
    pub fn sequential() -> Self {
        Self { concurrency: 1 }
    }

    pub fn concurrent(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }
}

impl Default for ClaimScan {
    fn default() -> Self {
        Self::sequential()
    }
}

async fn is_unclaimed<R: ClaimRegistry + ?Sized>(
    registry: &R,
    owner: Address,
    index: u64,
) -> Result<bool, IcoError> {
    let token_id = registry.position_token_id_at(owner, index).await?;
    Ok(!registry.claim_consumed(token_id).await?)
}

/// Count `owner`'s position tokens whose claim has not been consumed.
///
/// A zero position balance short-circuits without further reads. The first
/// failing read aborts the scan.
pub async fn try_compute_claimable<R: ClaimRegistry + ?Sized>(
    registry: &R,
    owner: Address,
    scan: ClaimScan,
) -> Result<ClaimableCount, IcoError> {
    let balance = registry.position_balance(owner).await?;
    if balance == 0 {
        return Ok(ClaimableCount::ZERO);
    }

    let unclaimed = if scan.concurrency <= 1 {
        let mut count = 0u64;
        for index in 0..balance {
            if is_unclaimed(registry, owner, index).await? {
                count += 1;
            }
        }
        count
    } else {
        stream::iter(0..balance)
            .map(|index| is_unclaimed(registry, owner, index))
            .buffer_unordered(scan.concurrency)
            .try_fold(0u64, |count, unclaimed| async move {
                Ok(count + u64::from(unclaimed))
            })
            .await?
    };

    tracing::debug!(%owner, balance, unclaimed, "Computed claimable position tokens");
    Ok(ClaimableCount::new(unclaimed))
}

/// [`try_compute_claimable`] with the fail-safe default: any read failure
/// reports zero claimable.
pub async fn compute_claimable<R: ClaimRegistry + ?Sized>(
    registry: &R,
    owner: Address,
    scan: ClaimScan,
) -> ClaimableCount {
    match try_compute_claimable(registry, owner, scan).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(%owner, error = %e, "Claimable scan failed; reporting zero");
            ClaimableCount::ZERO
        }
    }
}
