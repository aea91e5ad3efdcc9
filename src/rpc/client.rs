//! Low-level JSON-RPC client: `HttpProvider`.
//!
//! Speaks JSON-RPC 2.0 to an Ethereum node and exposes it as an [`Eip1193`]
//! provider. Reads are retried per [`RetryPolicy::Idempotent`]; methods that
//! may change chain state are sent exactly once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ProviderError, RpcError};
use crate::rpc::retry::RetryPolicy;
use crate::wallet::Eip1193;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ProviderError>,
}

/// Failure of a single round-trip: either the transport or the node said no.
#[derive(Debug)]
enum CallError {
    Transport(RpcError),
    Rpc(ProviderError),
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallError::Transport(e) => e.fmt(f),
            CallError::Rpc(e) => e.fmt(f),
        }
    }
}

impl From<RpcError> for CallError {
    fn from(err: RpcError) -> Self {
        CallError::Transport(err)
    }
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        CallError::Transport(RpcError::Reqwest(err))
    }
}

/// JSON-RPC provider for a node endpoint.
///
/// When constructed with [`HttpProvider::with_accounts`], `eth_accounts` and
/// `eth_requestAccounts` are answered locally and `eth_sendTransaction` relies
/// on the node to sign for those accounts (dev nodes, remote signers).
#[derive(Clone)]
pub struct HttpProvider {
    url: String,
    client: Client,
    next_id: Arc<AtomicU64>,
    accounts: Vec<Address>,
    read_policy: RetryPolicy,
}

impl HttpProvider {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(Duration::from_secs(30))
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client: builder.build()?,
            next_id: Arc::new(AtomicU64::new(1)),
            accounts: Vec::new(),
            read_policy: RetryPolicy::Idempotent,
        })
    }

    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Override the retry policy used for read methods.
    pub fn with_read_policy(mut self, policy: RetryPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request_with_retry(&self, method: &str, params: &Value) -> Result<Value, CallError> {
        let Some(config) = self.read_policy.config_for(method) else {
            return self.do_request(method, params).await;
        };

        let mut attempt = 0;
        loop {
            let err = match self.do_request(method, params).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            let retryable = match &err {
                CallError::Transport(e) => config.retries_transport(e),
                CallError::Rpc(e) => config.retries_rpc(e),
            };
            if !retryable {
                return Err(err);
            }
            if attempt >= config.max_retries {
                return Err(match err {
                    CallError::Rpc(e) => CallError::Rpc(e),
                    CallError::Transport(e) => CallError::Transport(RpcError::MaxRetriesExceeded {
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    }),
                });
            }

            // Honor the node's Retry-After when it sent one.
            let delay = match &err {
                CallError::Transport(RpcError::RateLimited {
                    retry_after_ms: Some(ms),
                }) => Duration::from_millis(*ms),
                _ => config.delay_for_attempt(attempt),
            };
            tracing::debug!(
                method,
                attempt = attempt + 1,
                max = config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying JSON-RPC request"
            );
            futures_timer::Delay::new(delay).await;
            attempt += 1;
        }
    }

    async fn do_request(&self, method: &str, params: &Value) -> Result<Value, CallError> {
        let body = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp = self.client.post(&self.url).json(&body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let status_code = status.as_u16();
            let body_text = resp.text().await.unwrap_or_default();
            return Err(match status_code {
                429 => RpcError::RateLimited {
                    retry_after_ms: None,
                },
                400..=499 => RpcError::BadRequest(body_text),
                _ => RpcError::ServerError {
                    status: status_code,
                    body: body_text,
                },
            }
            .into());
        }

        let parsed: JsonRpcResponse = resp.json().await?;
        match (parsed.result, parsed.error) {
            (_, Some(error)) => Err(CallError::Rpc(error)),
            (Some(result), None) => Ok(result),
            // `null` results (e.g. a pending receipt) deserialize as `None`.
            (None, None) => Ok(Value::Null),
        }
    }

    fn local_accounts(&self) -> Value {
        json!(self
            .accounts
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl Eip1193 for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        if !self.accounts.is_empty()
            && matches!(method, "eth_accounts" | "eth_requestAccounts")
        {
            return Ok(self.local_accounts());
        }

        // Plain nodes have no permission prompt; account discovery is `eth_accounts`.
        let method = if method == "eth_requestAccounts" {
            "eth_accounts"
        } else {
            method
        };

        tracing::debug!(method, "JSON-RPC request");
        match self.request_with_retry(method, &params).await {
            Ok(value) => Ok(value),
            Err(CallError::Rpc(e)) => Err(e),
            Err(CallError::Transport(e)) => Err(e.into()),
        }
    }
}
