//! # Crypto Devs ICO
//!
//! Client SDK for the Crypto Devs ICO: connect a wallet on the required
//! network, read the token sale state, mint tokens for ether and claim the
//! free tokens owed to Crypto Devs NFT holders. Works on native and WASM
//! targets.
//!
//! ## Architecture
//!
//! The SDK is organized in layers:
//!
//! 1. **Core** — Amounts, contract ABI plumbing and call builders, errors (always available, WASM-safe)
//! 2. **Wallet** — EIP-1193 provider seam, connector, accessors, network guard
//! 3. **JSON-RPC** — `HttpProvider` with per-method retry policies
//! 4. **Domain** — Contract gateway, eligibility scan, session store, view renderer
//! 5. **High-Level Client** — `IcoClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cryptodevs_ico::prelude::*;
//!
//! let client = IcoClient::builder()
//!     .token_address(token)
//!     .position_address(nft)
//!     .rpc_url("http://localhost:8545")
//!     .rpc_accounts(vec![my_address])
//!     .build()?;
//!
//! let session = client.session();
//! session.activate().await?;
//! session.mint(U256::from(5)).await?;
//!
//! let page = render(&session.state().await, client.view_config());
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes and unit conversion.
pub mod shared;

/// On-chain contract interaction: ABI, constants, call builders.
pub mod contracts;

/// Unified SDK error types.
pub mod error;

/// Network constants.
pub mod network;

// ── Layer 2: Wallet ──────────────────────────────────────────────────────────

/// Provider seam, connector, read/write accessors, network guard.
pub mod wallet;

// ── Layer 3: JSON-RPC ────────────────────────────────────────────────────────

/// JSON-RPC over HTTP with retry policies.
#[cfg(feature = "http")]
pub mod rpc;

// ── Layer 4: Domain ──────────────────────────────────────────────────────────

/// Gateway, eligibility, session state, view rendering.
pub mod domain;

// ── Layer 5: High-Level Client ───────────────────────────────────────────────

/// `IcoClient`, the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{
        format_ether, parse_ether, Address, ChainId, ClaimableCount, TokenAmount, TokenId,
        TxHash, U256,
    };

    // Contracts
    pub use crate::contracts::{CallRequest, ContractAddresses};

    // Wallet
    pub use crate::wallet::{
        Accessor, ConnectorOptions, Eip1193, NetworkGuard, PendingTransaction, ProviderOption,
        ProviderResolver, SharedProvider, Signer, TransactionReceipt, WalletConnector,
        Web3Provider,
    };

    // Domain
    pub use crate::domain::eligibility::{compute_claimable, ClaimRegistry, ClaimScan};
    pub use crate::domain::gateway::ContractGateway;
    pub use crate::domain::notice::{Notice, Notifier, TracingNotifier};
    pub use crate::domain::session::{
        RefreshReport, SessionStatus, SessionStore, StateObserver, UiState, WalletSession,
    };
    pub use crate::domain::view::{render, select_mode, PageBody, PageView, ViewConfig, ViewMode};

    // Client
    pub use crate::client::{IcoClient, IcoClientBuilder};

    // Errors
    pub use crate::error::{ErrorKind, IcoError, ProviderError};

    // RPC
    #[cfg(feature = "http")]
    pub use crate::rpc::{HttpProvider, RetryConfig, RetryPolicy};
}
