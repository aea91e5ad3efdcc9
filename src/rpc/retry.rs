//! Retry policies for JSON-RPC requests.
//!
//! Whether a request may be retried depends first on the method (anything that
//! prompts the user or changes chain state is sent once), then on how it
//! failed: transport errors and HTTP statuses on one side, node-reported
//! JSON-RPC error codes on the other.

use std::time::Duration;

use rand::Rng;

use crate::error::{ProviderError, RpcError};

/// JSON-RPC `-32005`: request limit exceeded (Infura, Alchemy, Ankr).
pub const LIMIT_EXCEEDED: i64 = -32005;
/// JSON-RPC `-32603`: internal error, returned by overloaded nodes.
pub const INTERNAL_ERROR: i64 = -32603;

/// How a JSON-RPC method behaves with respect to retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    /// Pure reads (`eth_call`, `eth_chainId`, receipts).
    Read,
    /// Opens a wallet permission prompt.
    Prompt,
    /// Broadcasts or signs; a duplicate could be mined twice.
    StateChanging,
}

impl MethodClass {
    pub fn of(method: &str) -> MethodClass {
        match method {
            "eth_requestAccounts" | "wallet_requestPermissions" => MethodClass::Prompt,
            "eth_sendTransaction" | "eth_sendRawTransaction" | "eth_sign"
            | "personal_sign" | "eth_signTypedData_v4" => MethodClass::StateChanging,
            _ => MethodClass::Read,
        }
    }
}

/// Retry policy applied to read methods.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Every request is sent exactly once.
    #[default]
    None,
    /// [`RetryConfig::idempotent`].
    Idempotent,
    /// User-provided retry logic.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// The retry config for `method`, or `None` when it must be sent once.
    pub fn config_for(&self, method: &str) -> Option<RetryConfig> {
        if MethodClass::of(method) != MethodClass::Read {
            return None;
        }
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(config) => Some(config.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first request.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Scale each delay by a random factor in `[0.75, 1.25]`.
    pub jitter: bool,
    /// HTTP statuses worth another attempt.
    pub retryable_statuses: Vec<u16>,
    /// JSON-RPC error codes worth another attempt.
    pub retryable_codes: Vec<i64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
            retryable_codes: vec![LIMIT_EXCEEDED],
        }
    }
}

impl RetryConfig {
    /// Reads against public nodes: also retries rate limits and internal errors.
    pub fn idempotent() -> Self {
        Self {
            retryable_statuses: vec![429, 502, 503, 504],
            retryable_codes: vec![LIMIT_EXCEEDED, INTERNAL_ERROR],
            ..Self::default()
        }
    }

    pub fn retries_transport(&self, err: &RpcError) -> bool {
        match err {
            RpcError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            RpcError::RateLimited { .. } => self.retryable_statuses.contains(&429),
            RpcError::Timeout => true,
            RpcError::Reqwest(e) => {
                #[cfg(not(target_arch = "wasm32"))]
                let transient = e.is_connect() || e.is_timeout() || e.is_request();
                #[cfg(target_arch = "wasm32")]
                let transient = e.is_timeout() || e.is_request();
                transient
            }
            RpcError::BadRequest(_)
            | RpcError::MalformedResponse(_)
            | RpcError::MaxRetriesExceeded { .. } => false,
        }
    }

    /// Reverts and user rejections are final; only listed node codes retry.
    pub fn retries_rpc(&self, err: &ProviderError) -> bool {
        self.retryable_codes.contains(&err.code)
    }

    /// Backoff before retry number `attempt + 1`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self.backoff_factor.powi(attempt.min(16) as i32);
        let delay = self.initial_delay.mul_f64(exp).min(self.max_delay);
        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(0.75..=1.25))
        } else {
            delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            ..RetryConfig::default()
        }
    }

    #[test]
    fn test_method_classes() {
        assert_eq!(MethodClass::of("eth_call"), MethodClass::Read);
        assert_eq!(MethodClass::of("eth_getTransactionReceipt"), MethodClass::Read);
        assert_eq!(MethodClass::of("eth_requestAccounts"), MethodClass::Prompt);
        assert_eq!(
            MethodClass::of("eth_sendTransaction"),
            MethodClass::StateChanging
        );
    }

    #[test]
    fn test_only_reads_get_a_config() {
        let policy = RetryPolicy::Custom(RetryConfig::default());
        assert!(policy.config_for("eth_call").is_some());
        assert!(policy.config_for("eth_sendTransaction").is_none());
        assert!(policy.config_for("eth_requestAccounts").is_none());
        assert!(RetryPolicy::None.config_for("eth_call").is_none());
        assert!(RetryPolicy::default().config_for("eth_chainId").is_none());
    }

    #[test]
    fn test_node_error_codes() {
        let config = RetryConfig::idempotent();
        assert!(config.retries_rpc(&ProviderError::new(LIMIT_EXCEEDED, "daily request count exceeded")));
        assert!(config.retries_rpc(&ProviderError::new(INTERNAL_ERROR, "internal error")));
        assert!(!config.retries_rpc(&ProviderError::new(
            ProviderError::EXECUTION_REVERTED,
            "execution reverted"
        )));
        assert!(!config.retries_rpc(&ProviderError::user_rejected("denied")));

        // The plain default leaves internal errors alone.
        assert!(!RetryConfig::default().retries_rpc(&ProviderError::new(INTERNAL_ERROR, "x")));
    }

    #[test]
    fn test_transport_classification() {
        let config = RetryConfig::idempotent();
        assert!(config.retries_transport(&RpcError::RateLimited {
            retry_after_ms: None
        }));
        assert!(config.retries_transport(&RpcError::ServerError {
            status: 503,
            body: String::new()
        }));
        assert!(!config.retries_transport(&RpcError::ServerError {
            status: 500,
            body: String::new()
        }));
        assert!(!config.retries_transport(&RpcError::BadRequest("bad".to_string())));
        assert!(!RetryConfig::default().retries_transport(&RpcError::RateLimited {
            retry_after_ms: Some(10)
        }));
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = fixed(100, 1_000, 2.0);
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(10), Duration::from_millis(1_000));
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::from_millis(1_000));
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let config = RetryConfig {
            jitter: true,
            ..fixed(1_000, 10_000, 2.0)
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((750..=1250).contains(&ms), "delay {ms} out of range");
        }
    }
}
