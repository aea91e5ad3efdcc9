//! Unified SDK error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::{ChainId, TxHash};

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum IcoError {
    #[error("Wrong network: expected chain {expected}, wallet is on chain {actual}")]
    WrongNetwork { expected: ChainId, actual: ChainId },

    #[error("Wallet connection rejected: {0}")]
    ConnectionRejected(String),

    #[error("Transaction rejected by user: {0}")]
    TransactionRejected(String),

    #[error("Transaction reverted: {reason}")]
    TransactionReverted {
        tx_hash: Option<TxHash>,
        reason: String,
    },

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Read failed: {0}")]
    ReadFailure(String),

    #[error("Another transaction is already in flight")]
    Busy,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`IcoError`], for notification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    WrongNetwork,
    ConnectionRejected,
    TransactionRejected,
    TransactionReverted,
    InsufficientFunds,
    ReadFailure,
    Busy,
    NotConnected,
    Validation,
    Transport,
    Other,
}

impl IcoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IcoError::WrongNetwork { .. } => ErrorKind::WrongNetwork,
            IcoError::ConnectionRejected(_) => ErrorKind::ConnectionRejected,
            IcoError::TransactionRejected(_) => ErrorKind::TransactionRejected,
            IcoError::TransactionReverted { .. } => ErrorKind::TransactionReverted,
            IcoError::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            IcoError::ReadFailure(_) => ErrorKind::ReadFailure,
            IcoError::Busy => ErrorKind::Busy,
            IcoError::NotConnected => ErrorKind::NotConnected,
            IcoError::Validation(_) => ErrorKind::Validation,
            IcoError::Provider(_) | IcoError::Rpc(_) => ErrorKind::Transport,
            IcoError::Serde(_) | IcoError::Other(_) => ErrorKind::Other,
        }
    }

    pub fn is_wrong_network(&self) -> bool {
        matches!(self, IcoError::WrongNetwork { .. })
    }

    /// Classify an error returned by `eth_sendTransaction`.
    pub(crate) fn from_send_error(err: ProviderError) -> Self {
        let message = err.message.to_lowercase();
        if err.code == ProviderError::USER_REJECTED {
            IcoError::TransactionRejected(err.message)
        } else if message.contains("insufficient funds") {
            IcoError::InsufficientFunds(err.message)
        } else if err.code == ProviderError::EXECUTION_REVERTED || message.contains("revert") {
            IcoError::TransactionReverted {
                tx_hash: None,
                reason: err.message,
            }
        } else {
            IcoError::Provider(err)
        }
    }
}

/// EIP-1193 provider error object (`{ code, message, data }`).
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProviderError {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested method and/or account has not been authorized by the user.
    pub const UNAUTHORIZED: i64 = 4100;
    /// The provider is disconnected from all chains.
    pub const DISCONNECTED: i64 = 4900;
    /// Geth-style `execution reverted` code for `eth_call`/`eth_estimateGas`.
    pub const EXECUTION_REVERTED: i64 = 3;
    /// JSON-RPC internal error.
    pub const INTERNAL: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::new(Self::USER_REJECTED, message)
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::new(Self::DISCONNECTED, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Self::USER_REJECTED
    }
}

/// HTTP transport errors for the JSON-RPC client.
#[derive(Error, Debug)]
pub enum RpcError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl From<RpcError> for ProviderError {
    fn from(err: RpcError) -> Self {
        ProviderError::disconnected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_classification() {
        let rejected = IcoError::from_send_error(ProviderError::user_rejected("User denied"));
        assert_eq!(rejected.kind(), ErrorKind::TransactionRejected);

        let funds = IcoError::from_send_error(ProviderError::new(
            -32000,
            "insufficient funds for gas * price + value",
        ));
        assert_eq!(funds.kind(), ErrorKind::InsufficientFunds);

        let reverted = IcoError::from_send_error(ProviderError::new(
            ProviderError::EXECUTION_REVERTED,
            "execution reverted: You dont own any Crypto Dev NFT's",
        ));
        assert_eq!(reverted.kind(), ErrorKind::TransactionReverted);

        let other = IcoError::from_send_error(ProviderError::new(-32601, "method not found"));
        assert_eq!(other.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_wrong_network_message() {
        let err = IcoError::WrongNetwork {
            expected: 5,
            actual: 1,
        };
        assert!(err.is_wrong_network());
        assert_eq!(
            err.to_string(),
            "Wrong network: expected chain 5, wallet is on chain 1"
        );
    }

    #[test]
    fn test_provider_error_deserializes_without_data() {
        let err: ProviderError =
            serde_json::from_str(r#"{"code":4001,"message":"User rejected the request."}"#)
                .unwrap();
        assert!(err.is_user_rejection());
        assert!(err.data.is_none());
    }
}
