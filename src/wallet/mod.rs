//! Wallet layer: provider selection, chain accessors, network guard.
//!
//! ## Model
//!
//! - [`Eip1193`] is the raw provider seam (`request(method, params)`): an
//!   injected browser wallet on WASM, [`crate::rpc::HttpProvider`] natively, or
//!   any test double.
//! - [`WalletConnector`] selects a provider and caches the connected session so
//!   repeated connects never re-prompt the user.
//! - [`Web3Provider`] wraps a raw provider into a read accessor;
//!   [`Signer`] is the write accessor bound to the user's address.
//! - [`ProviderResolver`] runs connector → wrap → [`NetworkGuard`] → (signer)
//!   for every operation.

pub mod connector;
pub mod guard;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod injected;
pub mod provider;
pub mod resolver;
pub mod wire;

pub use connector::{ConnectedWallet, ConnectorOptions, ProviderOption, WalletConnector};
pub use guard::NetworkGuard;
pub use provider::{Network, PendingTransaction, Signer, TransactionReceipt, Web3Provider};
pub use resolver::{Accessor, ProviderResolver};

use std::sync::Arc;

use crate::contracts::CallRequest;
use crate::error::{IcoError, ProviderError};

// ─── Platform bounds ─────────────────────────────────────────────────────────

/// `Send + Sync` on native targets, no bound on WASM (JS handles are `!Send`).
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T> MaybeSendSync for T {}

// ─── Provider seam ───────────────────────────────────────────────────────────

/// An EIP-1193 provider: a single JSON-RPC style `request` entry point.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait Eip1193: MaybeSendSync {
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// Shared handle to a raw provider.
pub type SharedProvider = Arc<dyn Eip1193>;

/// Anything that can execute a read-only contract call.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ChainReader: MaybeSendSync {
    /// Execute `eth_call` against the latest block and return the raw output.
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, IcoError>;
}
