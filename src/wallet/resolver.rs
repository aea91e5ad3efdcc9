//! Provider/signer resolver: connector → accessor → guard → (signer).

use std::time::Duration;

use crate::contracts::CallRequest;
use crate::error::IcoError;
use crate::wallet::provider::DEFAULT_POLL_INTERVAL;
use crate::wallet::{ChainReader, NetworkGuard, Signer, WalletConnector, Web3Provider};

/// Read or write accessor produced by [`ProviderResolver::resolve`].
#[derive(Clone)]
pub enum Accessor {
    Reader(Web3Provider),
    Signer(Signer),
}

impl Accessor {
    pub fn provider(&self) -> &Web3Provider {
        match self {
            Accessor::Reader(p) => p,
            Accessor::Signer(s) => s.provider(),
        }
    }

    pub fn as_signer(&self) -> Option<&Signer> {
        match self {
            Accessor::Signer(s) => Some(s),
            Accessor::Reader(_) => None,
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl ChainReader for Accessor {
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, IcoError> {
        self.provider().call(request).await
    }
}

/// Produces guarded accessors on demand. Safe to call repeatedly: the
/// connector's cached session prevents duplicate connection prompts.
#[derive(Clone)]
pub struct ProviderResolver {
    connector: WalletConnector,
    guard: NetworkGuard,
    poll_interval: Duration,
}

impl ProviderResolver {
    pub fn new(connector: WalletConnector, guard: NetworkGuard) -> Self {
        Self {
            connector,
            guard,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn connector(&self) -> &WalletConnector {
        &self.connector
    }

    pub fn guard(&self) -> &NetworkGuard {
        &self.guard
    }

    /// Guarded read accessor.
    pub async fn resolve_reader(&self) -> Result<Web3Provider, IcoError> {
        let raw = self.connector.connect().await?;
        let provider = Web3Provider::new(raw).with_poll_interval(self.poll_interval);
        self.guard.check(&provider).await?;
        Ok(provider)
    }

    /// Guarded write accessor bound to the user's address.
    pub async fn resolve_signer(&self) -> Result<Signer, IcoError> {
        self.resolve_reader().await?.get_signer().await
    }

    pub async fn resolve(&self, needs_signer: bool) -> Result<Accessor, IcoError> {
        if needs_signer {
            Ok(Accessor::Signer(self.resolve_signer().await?))
        } else {
            Ok(Accessor::Reader(self.resolve_reader().await?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::wallet::{ConnectorOptions, Eip1193};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    struct FakeWallet {
        chain_id: u64,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Eip1193 for FakeWallet {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
            self.calls.lock().unwrap().push(method.to_string());
            match method {
                "eth_chainId" => Ok(json!(format!("0x{:x}", self.chain_id))),
                _ => Ok(json!(["0x00000000000000000000000000000000000000aa"])),
            }
        }
    }

    fn resolver(chain_id: u64) -> (ProviderResolver, Arc<FakeWallet>) {
        let wallet = Arc::new(FakeWallet {
            chain_id,
            calls: Mutex::new(Vec::new()),
        });
        let connector = WalletConnector::new(ConnectorOptions::default()).with_injected(wallet.clone());
        (ProviderResolver::new(connector, NetworkGuard::default()), wallet)
    }

    #[tokio::test]
    async fn test_resolve_reader_and_signer() {
        let (resolver, wallet) = resolver(5);

        let reader = resolver.resolve(false).await.unwrap();
        assert!(reader.as_signer().is_none());

        let writer = resolver.resolve(true).await.unwrap();
        let signer = writer.as_signer().unwrap();
        assert_eq!(
            signer.address().to_string().to_lowercase(),
            "0x00000000000000000000000000000000000000aa"
        );

        let calls = wallet.calls.lock().unwrap().clone();
        assert_eq!(calls.iter().filter(|m| *m == "eth_requestAccounts").count(), 1);
    }

    #[tokio::test]
    async fn test_wrong_chain_stops_before_signer() {
        let (resolver, wallet) = resolver(1);

        let err = resolver.resolve_signer().await.err().unwrap();
        assert!(err.is_wrong_network());
        let calls = wallet.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["eth_requestAccounts", "eth_chainId"]);
    }
}
