//! Chain accessors: `Web3Provider` (reads) and `Signer` (writes).

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::contracts::abi::from_hex;
use crate::contracts::CallRequest;
use crate::error::{IcoError, ProviderError};
use crate::network::chain_name;
use crate::shared::{parse_quantity_u64, ChainId, TxHash};
use crate::wallet::wire::ReceiptResponse;
use crate::wallet::{ChainReader, SharedProvider};

/// Default interval between `eth_getTransactionReceipt` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Consecutive failed receipt polls tolerated before [`PendingTransaction::wait`] gives up.
pub const MAX_RECEIPT_POLL_FAILURES: u32 = 3;

/// Network the provider is currently connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    pub chain_id: ChainId,
    pub name: &'static str,
}

/// Mined transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
    pub gas_used: Option<U256>,
}

impl TryFrom<ReceiptResponse> for TransactionReceipt {
    type Error = IcoError;

    fn try_from(raw: ReceiptResponse) -> Result<Self, Self::Error> {
        let transaction_hash = TxHash::from_str(&raw.transaction_hash)
            .map_err(|e| IcoError::Other(format!("invalid transaction hash: {}", e)))?;
        let block_number = raw
            .block_number
            .as_deref()
            .map(parse_quantity_u64)
            .transpose()
            .map_err(IcoError::Other)?;
        // Pre-Byzantium receipts carry no status; treat as success.
        let success = match raw.status.as_deref() {
            Some(status) => parse_quantity_u64(status).map_err(IcoError::Other)? == 1,
            None => true,
        };
        let gas_used = raw
            .gas_used
            .as_deref()
            .map(U256::from_str)
            .transpose()
            .map_err(|e| IcoError::Other(format!("invalid gasUsed: {}", e)))?;

        Ok(Self {
            transaction_hash,
            block_number,
            success,
            gas_used,
        })
    }
}

// ─── Web3Provider ────────────────────────────────────────────────────────────

/// Read accessor wrapping a raw EIP-1193 provider.
#[derive(Clone)]
pub struct Web3Provider {
    raw: SharedProvider,
    poll_interval: Duration,
}

impl Web3Provider {
    pub fn new(raw: SharedProvider) -> Self {
        Self {
            raw,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn raw(&self) -> &SharedProvider {
        &self.raw
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Typed `request` helper.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ProviderError> {
        let value = self.raw.request(method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            ProviderError::new(
                ProviderError::INTERNAL,
                format!("unexpected {} result: {}", method, e),
            )
        })
    }

    /// Chain the wallet is currently on (`eth_chainId`).
    pub async fn get_network(&self) -> Result<Network, IcoError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        let chain_id = parse_quantity_u64(&raw).map_err(IcoError::Other)?;
        Ok(Network {
            chain_id,
            name: chain_name(chain_id),
        })
    }

    /// Accounts the user has authorized (`eth_accounts`).
    pub async fn list_accounts(&self) -> Result<Vec<Address>, IcoError> {
        let raw: Vec<String> = self.request("eth_accounts", json!([])).await?;
        raw.iter()
            .map(|a| {
                Address::from_str(a).map_err(|e| IcoError::Other(format!("invalid account: {}", e)))
            })
            .collect()
    }

    /// Write accessor for the first authorized account.
    pub async fn get_signer(&self) -> Result<Signer, IcoError> {
        let accounts = self.list_accounts().await?;
        let address = accounts
            .first()
            .copied()
            .ok_or_else(|| IcoError::ConnectionRejected("no authorized accounts".to_string()))?;
        Ok(Signer {
            provider: self.clone(),
            address,
        })
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<Option<TransactionReceipt>, IcoError> {
        let raw: Option<ReceiptResponse> = self
            .request("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;
        raw.map(TransactionReceipt::try_from).transpose()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl ChainReader for Web3Provider {
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, IcoError> {
        let raw: String = self
            .request("eth_call", json!([request.to_wire(None), "latest"]))
            .await
            .map_err(|e| IcoError::ReadFailure(e.to_string()))?;
        from_hex(&raw).map_err(|e| IcoError::ReadFailure(e.to_string()))
    }
}

// ─── Signer ──────────────────────────────────────────────────────────────────

/// Write accessor bound to the user's address.
#[derive(Clone)]
pub struct Signer {
    provider: Web3Provider,
    address: Address,
}

impl Signer {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &Web3Provider {
        &self.provider
    }

    /// Submit a transaction from this signer (`eth_sendTransaction`).
    ///
    /// The wallet prompts the user; the returned handle must be awaited with
    /// [`PendingTransaction::wait`] before dependent reads.
    pub async fn send_transaction(
        &self,
        request: &CallRequest,
    ) -> Result<PendingTransaction, IcoError> {
        let raw: String = self
            .provider
            .request(
                "eth_sendTransaction",
                json!([request.to_wire(Some(self.address))]),
            )
            .await
            .map_err(IcoError::from_send_error)?;
        let hash = TxHash::from_str(&raw)
            .map_err(|e| IcoError::Other(format!("invalid transaction hash: {}", e)))?;

        tracing::info!(tx = %hash, to = %request.to, "Transaction submitted");

        Ok(PendingTransaction {
            hash,
            provider: self.provider.clone(),
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl ChainReader for Signer {
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, IcoError> {
        self.provider.call(request).await
    }
}

// ─── PendingTransaction ──────────────────────────────────────────────────────

/// Handle to a submitted, not yet mined transaction.
pub struct PendingTransaction {
    hash: TxHash,
    provider: Web3Provider,
}

impl PendingTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Block until the transaction is mined.
    ///
    /// Polls `eth_getTransactionReceipt` every `poll_interval`. A receipt with
    /// status `0x0` fails with [`IcoError::TransactionReverted`]. A failed poll
    /// is retried on the next tick; after [`MAX_RECEIPT_POLL_FAILURES`] in a row
    /// the last error is returned. There is no timeout; the caller abandons the
    /// future to stop waiting.
    pub async fn wait(self) -> Result<TransactionReceipt, IcoError> {
        let mut failures = 0;
        loop {
            let polled = match self.provider.get_transaction_receipt(self.hash).await {
                Ok(polled) => {
                    failures = 0;
                    polled
                }
                Err(e) => {
                    failures += 1;
                    if failures >= MAX_RECEIPT_POLL_FAILURES {
                        tracing::warn!(tx = %self.hash, error = %e, "Giving up on receipt");
                        return Err(e);
                    }
                    tracing::warn!(tx = %self.hash, error = %e, failures, "Receipt poll failed");
                    None
                }
            };
            if let Some(receipt) = polled {
                if receipt.success {
                    tracing::info!(
                        tx = %self.hash,
                        block = ?receipt.block_number,
                        "Transaction confirmed"
                    );
                    return Ok(receipt);
                }
                tracing::warn!(tx = %self.hash, "Transaction reverted");
                return Err(IcoError::TransactionReverted {
                    tx_hash: Some(self.hash),
                    reason: "receipt status 0x0".to_string(),
                });
            }
            futures_timer::Delay::new(self.provider.poll_interval()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(status: Option<&str>) -> ReceiptResponse {
        ReceiptResponse {
            transaction_hash: format!("0x{}", "ab".repeat(32)),
            block_number: Some("0x10".to_string()),
            status: status.map(str::to_string),
            gas_used: Some("0x5208".to_string()),
        }
    }

    #[test]
    fn test_receipt_conversion_success() {
        let r = TransactionReceipt::try_from(receipt(Some("0x1"))).unwrap();
        assert!(r.success);
        assert_eq!(r.block_number, Some(16));
        assert_eq!(r.gas_used, Some(U256::from(21000u64)));
    }

    #[test]
    fn test_receipt_conversion_reverted() {
        let r = TransactionReceipt::try_from(receipt(Some("0x0"))).unwrap();
        assert!(!r.success);
    }

    #[test]
    fn test_receipt_without_status_is_success() {
        let r = TransactionReceipt::try_from(receipt(None)).unwrap();
        assert!(r.success);
    }

    #[test]
    fn test_receipt_wire_deserializes_camel_case() {
        let raw: ReceiptResponse = serde_json::from_value(serde_json::json!({
            "transactionHash": format!("0x{}", "01".repeat(32)),
            "blockNumber": "0x1",
            "status": "0x1",
            "logs": []
        }))
        .unwrap();
        assert_eq!(raw.status.as_deref(), Some("0x1"));
        assert!(raw.gas_used.is_none());
    }
}
