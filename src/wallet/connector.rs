//! Wallet connector: provider selection with a cached session.
//!
//! Mirrors the usual browser "connect wallet" modal: an injected provider
//! (browser extension) is preferred unless disabled, otherwise the first of the
//! configured `provider_options` is used. The first successful `connect()`
//! prompts the user (`eth_requestAccounts`); later calls return the cached
//! provider without prompting again.

use std::sync::Arc;

use alloy_primitives::Address;
use async_lock::Mutex;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::str::FromStr;

use crate::error::{IcoError, ProviderError};
use crate::wallet::SharedProvider;

/// A named, externally connected provider.
#[derive(Clone)]
pub struct ProviderOption {
    pub name: String,
    pub provider: SharedProvider,
}

impl ProviderOption {
    pub fn new(name: impl Into<String>, provider: SharedProvider) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }
}

/// Connector configuration.
#[derive(Clone)]
pub struct ConnectorOptions {
    /// Target network name (informational; the guard enforces the chain id).
    pub network: String,
    pub provider_options: Vec<ProviderOption>,
    pub disable_injected_provider: bool,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self {
            network: crate::network::DEFAULT_NETWORK.to_string(),
            provider_options: Vec::new(),
            disable_injected_provider: false,
        }
    }
}

/// The wallet side of a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedWallet {
    pub provider_name: String,
    pub accounts: Vec<Address>,
    pub connected_at: DateTime<Utc>,
}

struct CachedConnection {
    provider: SharedProvider,
    wallet: ConnectedWallet,
}

/// Selects and connects a wallet provider; cheap to clone (shared cache).
#[derive(Clone)]
pub struct WalletConnector {
    options: ConnectorOptions,
    injected: Option<SharedProvider>,
    cached: Arc<Mutex<Option<CachedConnection>>>,
}

impl WalletConnector {
    pub fn new(options: ConnectorOptions) -> Self {
        Self {
            options,
            injected: None,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Register the injected (browser extension) provider.
    pub fn with_injected(mut self, provider: SharedProvider) -> Self {
        self.injected = Some(provider);
        self
    }

    pub fn options(&self) -> &ConnectorOptions {
        &self.options
    }

    fn select(&self) -> Option<(String, SharedProvider)> {
        if !self.options.disable_injected_provider {
            if let Some(injected) = &self.injected {
                return Some(("injected".to_string(), injected.clone()));
            }
        }
        self.options
            .provider_options
            .first()
            .map(|o| (o.name.clone(), o.provider.clone()))
    }

    /// Connect (or reuse the cached connection) and return the raw provider.
    ///
    /// Concurrent callers share a single prompt: the cache lock is held across
    /// the `eth_requestAccounts` round-trip.
    pub async fn connect(&self) -> Result<SharedProvider, IcoError> {
        let mut cached = self.cached.lock().await;
        if let Some(conn) = cached.as_ref() {
            return Ok(conn.provider.clone());
        }

        let (name, provider) = self.select().ok_or_else(|| {
            IcoError::ConnectionRejected("no wallet provider available".to_string())
        })?;

        tracing::debug!(provider = %name, network = %self.options.network, "Requesting wallet connection");

        let raw = provider
            .request("eth_requestAccounts", json!([]))
            .await
            .map_err(|e| {
                if e.code == ProviderError::USER_REJECTED {
                    IcoError::ConnectionRejected(e.message)
                } else {
                    IcoError::Provider(e)
                }
            })?;

        let accounts: Vec<Address> = serde_json::from_value::<Vec<String>>(raw)?
            .iter()
            .map(|a| {
                Address::from_str(a).map_err(|e| IcoError::Other(format!("invalid account: {}", e)))
            })
            .collect::<Result<_, _>>()?;

        if accounts.is_empty() {
            return Err(IcoError::ConnectionRejected(
                "wallet returned no accounts".to_string(),
            ));
        }

        let wallet = ConnectedWallet {
            provider_name: name,
            accounts,
            connected_at: Utc::now(),
        };
        tracing::info!(
            provider = %wallet.provider_name,
            account = %wallet.accounts[0],
            "Wallet connected"
        );

        *cached = Some(CachedConnection {
            provider: provider.clone(),
            wallet,
        });
        Ok(provider)
    }

    /// The currently connected wallet, if any.
    pub async fn connected(&self) -> Option<ConnectedWallet> {
        self.cached.lock().await.as_ref().map(|c| c.wallet.clone())
    }

    pub async fn is_connected(&self) -> bool {
        self.cached.lock().await.is_some()
    }

    /// Forget the cached connection; the next `connect()` prompts again.
    pub async fn clear_cached_provider(&self) {
        *self.cached.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Eip1193;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingWallet {
        prompts: AtomicUsize,
        reject: bool,
    }

    #[async_trait::async_trait]
    impl Eip1193 for CountingWallet {
        async fn request(
            &self,
            method: &str,
            _params: serde_json::Value,
        ) -> Result<serde_json::Value, ProviderError> {
            assert_eq!(method, "eth_requestAccounts");
            self.prompts.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(ProviderError::user_rejected("User rejected the request."));
            }
            Ok(json!(["0x00000000000000000000000000000000000000aa"]))
        }
    }

    fn wallet(reject: bool) -> Arc<CountingWallet> {
        Arc::new(CountingWallet {
            prompts: AtomicUsize::new(0),
            reject,
        })
    }

    #[tokio::test]
    async fn test_connect_is_cached() {
        let w = wallet(false);
        let connector = WalletConnector::new(ConnectorOptions::default()).with_injected(w.clone());
        connector.connect().await.unwrap();
        connector.connect().await.unwrap();
        assert_eq!(w.prompts.load(Ordering::SeqCst), 1);
        assert!(connector.is_connected().await);

        let connected = connector.connected().await.unwrap();
        assert_eq!(connected.provider_name, "injected");
        assert_eq!(connected.accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_connects_share_one_prompt() {
        let w = wallet(false);
        let connector = WalletConnector::new(ConnectorOptions::default()).with_injected(w.clone());
        let (a, b, c) = futures_util::join!(connector.connect(), connector.connect(), connector.connect());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(w.prompts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejection_maps_to_connection_rejected() {
        let connector =
            WalletConnector::new(ConnectorOptions::default()).with_injected(wallet(true));
        let err = connector.connect().await.err().unwrap();
        assert!(matches!(err, IcoError::ConnectionRejected(_)));
        assert!(!connector.is_connected().await);
    }

    #[tokio::test]
    async fn test_disable_injected_falls_back_to_options() {
        let injected = wallet(false);
        let external = wallet(false);
        let options = ConnectorOptions {
            provider_options: vec![ProviderOption::new("walletconnect", external.clone())],
            disable_injected_provider: true,
            ..ConnectorOptions::default()
        };
        let connector = WalletConnector::new(options).with_injected(injected.clone());
        connector.connect().await.unwrap();
        assert_eq!(injected.prompts.load(Ordering::SeqCst), 0);
        assert_eq!(external.prompts.load(Ordering::SeqCst), 1);
        assert_eq!(
            connector.connected().await.unwrap().provider_name,
            "walletconnect"
        );
    }

    #[tokio::test]
    async fn test_no_provider_available() {
        let connector = WalletConnector::new(ConnectorOptions::default());
        assert!(matches!(
            connector.connect().await,
            Err(IcoError::ConnectionRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_cached_provider_prompts_again() {
        let w = wallet(false);
        let connector = WalletConnector::new(ConnectorOptions::default()).with_injected(w.clone());
        connector.connect().await.unwrap();
        connector.clear_cached_provider().await;
        assert!(connector.connected().await.is_none());
        connector.connect().await.unwrap();
        assert_eq!(w.prompts.load(Ordering::SeqCst), 2);
    }
}
