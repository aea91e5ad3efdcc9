//! Session state: the UI-observable snapshot and its single owner,
//! [`SessionStore`].
//!
//! ```text
//! Disconnected --connect_wallet--> Connecting --ok--> Connected
//!                                      |
//!                                      +--err--> Disconnected
//!
//! Connected/Idle --mint | claim--> Connected/Busy --confirmed | failed--> Connected/Idle
//! ```

pub mod store;

pub use store::{RefreshReport, SessionStore};

use alloy_primitives::Address;

use crate::shared::{ChainId, ClaimableCount, TokenAmount};
use crate::wallet::MaybeSendSync;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// A live, guarded wallet connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub chain_id: ChainId,
    pub address: Address,
}

/// Everything the view needs. Only [`SessionStore`] mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    status: SessionStatus,
    wallet_connected: bool,
    tokens_minted: TokenAmount,
    balance_of_tokens: TokenAmount,
    token_amount_input: TokenAmount,
    loading: bool,
    tokens_to_be_claimed: ClaimableCount,
}

impl UiState {
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn wallet_connected(&self) -> bool {
        self.wallet_connected
    }

    /// Total supply of the ICO token, in base units.
    pub fn tokens_minted(&self) -> TokenAmount {
        self.tokens_minted
    }

    /// The user's ICO token balance, in base units.
    pub fn balance_of_tokens(&self) -> TokenAmount {
        self.balance_of_tokens
    }

    /// Whole-token amount typed into the mint form.
    pub fn token_amount_input(&self) -> TokenAmount {
        self.token_amount_input
    }

    /// A mint or claim transaction is in flight.
    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn tokens_to_be_claimed(&self) -> ClaimableCount {
        self.tokens_to_be_claimed
    }
}

/// Receives a snapshot after every state transition.
pub trait StateObserver: MaybeSendSync {
    fn on_change(&self, state: &UiState);
}

impl<F> StateObserver for F
where
    F: Fn(&UiState) + MaybeSendSync,
{
    fn on_change(&self, state: &UiState) {
        self(state)
    }
}

#[cfg(test)]
impl UiState {
    pub(crate) fn connected() -> Self {
        Self {
            status: SessionStatus::Connected,
            wallet_connected: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub(crate) fn with_claimable(mut self, count: ClaimableCount) -> Self {
        self.tokens_to_be_claimed = count;
        self
    }

    pub(crate) fn with_input(mut self, amount: TokenAmount) -> Self {
        self.token_amount_input = amount;
        self
    }

    pub(crate) fn with_amounts(mut self, balance: TokenAmount, minted: TokenAmount) -> Self {
        self.balance_of_tokens = balance;
        self.tokens_minted = minted;
        self
    }
}
