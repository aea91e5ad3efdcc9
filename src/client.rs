//! High-level client: `IcoClient` with nested sub-client accessors.
//!
//! Sub-clients live in `domain/tokens.rs` and `domain/claims.rs`. This module
//! keeps the builder, the shared wallet resolver and the session factory.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

use crate::contracts::constants::token_price_wei;
use crate::contracts::ContractAddresses;
use crate::domain::claims::Claims;
use crate::domain::eligibility::ClaimScan;
use crate::domain::gateway::ContractGateway;
use crate::domain::notice::Notifier;
use crate::domain::session::SessionStore;
use crate::domain::tokens::Tokens;
use crate::domain::view::ViewConfig;
use crate::error::IcoError;
use crate::shared::{parse_ether, ChainId};
use crate::wallet::provider::DEFAULT_POLL_INTERVAL;
use crate::wallet::{
    ConnectorOptions, NetworkGuard, ProviderOption, ProviderResolver, SharedProvider, Signer,
    WalletConnector, Web3Provider,
};

// Re-export sub-client types for convenience.
pub use crate::domain::claims::Claims as ClaimsClient;
pub use crate::domain::tokens::Tokens as TokensClient;

/// Entry point for the Crypto Devs ICO.
///
/// `client.tokens()` and `client.claims()` are thin, notification-free
/// wrappers over the contract gateway. `client.session()` builds the
/// [`SessionStore`] a UI drives.
#[derive(Clone)]
pub struct IcoClient {
    pub(crate) resolver: ProviderResolver,
    pub(crate) addresses: ContractAddresses,
    pub(crate) price_per_token_wei: U256,
    pub(crate) claim_scan: ClaimScan,
    pub(crate) view_config: ViewConfig,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl IcoClient {
    pub fn builder() -> IcoClientBuilder {
        IcoClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn tokens(&self) -> Tokens<'_> {
        Tokens { client: self }
    }

    pub fn claims(&self) -> Claims<'_> {
        Claims { client: self }
    }

    /// A session store sharing this client's wallet connection.
    ///
    /// A page should hold one store for its lifetime.
    pub fn session(&self) -> SessionStore {
        SessionStore::new(self.resolver.clone())
            .with_addresses(self.addresses)
            .with_price_per_token(self.price_per_token_wei)
            .with_claim_scan(self.claim_scan)
            .with_notifier(self.notifier.clone())
    }

    pub fn resolver(&self) -> &ProviderResolver {
        &self.resolver
    }

    pub fn addresses(&self) -> &ContractAddresses {
        &self.addresses
    }

    pub fn price_per_token_wei(&self) -> U256 {
        self.price_per_token_wei
    }

    pub fn view_config(&self) -> &ViewConfig {
        &self.view_config
    }

    pub(crate) async fn reader_gateway(&self) -> Result<ContractGateway<Web3Provider>, IcoError> {
        let reader = self.resolver.resolve_reader().await?;
        Ok(ContractGateway::new(self.addresses, reader)
            .with_price_per_token(self.price_per_token_wei))
    }

    pub(crate) async fn signer_gateway(&self) -> Result<ContractGateway<Signer>, IcoError> {
        let signer = self.resolver.resolve_signer().await?;
        Ok(ContractGateway::new(self.addresses, signer)
            .with_price_per_token(self.price_per_token_wei))
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct IcoClientBuilder {
    connector_options: ConnectorOptions,
    injected: Option<SharedProvider>,
    #[cfg(feature = "http")]
    rpc_url: Option<String>,
    #[cfg(feature = "http")]
    rpc_accounts: Vec<Address>,
    required_chain_id: ChainId,
    addresses: ContractAddresses,
    price_per_token: Option<Decimal>,
    view_config: ViewConfig,
    poll_interval: Duration,
    claim_scan: ClaimScan,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Default for IcoClientBuilder {
    fn default() -> Self {
        Self {
            connector_options: ConnectorOptions::default(),
            injected: None,
            #[cfg(feature = "http")]
            rpc_url: None,
            #[cfg(feature = "http")]
            rpc_accounts: Vec::new(),
            required_chain_id: crate::network::REQUIRED_CHAIN_ID,
            addresses: ContractAddresses::default(),
            price_per_token: None,
            view_config: ViewConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            claim_scan: ClaimScan::default(),
            notifier: None,
        }
    }
}

impl IcoClientBuilder {
    /// Injected (browser extension) provider; preferred unless disabled.
    pub fn injected(mut self, provider: SharedProvider) -> Self {
        self.injected = Some(provider);
        self
    }

    /// Use `window.ethereum` when a wallet extension is installed.
    #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
    pub fn detect_injected(mut self) -> Self {
        if let Some(provider) = crate::wallet::injected::InjectedProvider::detect() {
            self.injected = Some(Arc::new(provider));
        }
        self
    }

    /// Add a named alternative provider.
    pub fn provider_option(mut self, name: &str, provider: SharedProvider) -> Self {
        self.connector_options
            .provider_options
            .push(ProviderOption::new(name, provider));
        self
    }

    pub fn disable_injected_provider(mut self, disable: bool) -> Self {
        self.connector_options.disable_injected_provider = disable;
        self
    }

    pub fn network(mut self, network: &str) -> Self {
        self.connector_options.network = network.to_string();
        self
    }

    /// Add a JSON-RPC node as a provider option.
    #[cfg(feature = "http")]
    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = Some(url.to_string());
        self
    }

    /// Use the public Goerli node as the RPC provider option.
    #[cfg(feature = "http")]
    pub fn public_rpc(self) -> Self {
        self.rpc_url(crate::network::DEFAULT_RPC_URL)
    }

    /// Accounts the RPC node signs for.
    #[cfg(feature = "http")]
    pub fn rpc_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.rpc_accounts = accounts;
        self
    }

    pub fn required_chain_id(mut self, chain_id: ChainId) -> Self {
        self.required_chain_id = chain_id;
        self
    }

    pub fn token_address(mut self, address: Address) -> Self {
        self.addresses.token = address;
        self
    }

    pub fn position_address(mut self, address: Address) -> Self {
        self.addresses.position = address;
        self
    }

    /// Mint price per whole token, in ether.
    pub fn price_per_token(mut self, ether: Decimal) -> Self {
        self.price_per_token = Some(ether);
        self
    }

    pub fn tokens_per_claim(mut self, tokens: u64) -> Self {
        self.view_config.tokens_per_claim = tokens;
        self
    }

    pub fn max_supply(mut self, max_supply: u64) -> Self {
        self.view_config.max_supply = max_supply;
        self
    }

    /// Interval between receipt polls while waiting for confirmation.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn claim_scan(mut self, scan: ClaimScan) -> Self {
        self.claim_scan = scan;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    fn default_notifier() -> Arc<dyn Notifier> {
        #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
        {
            Arc::new(crate::domain::notice::AlertNotifier)
        }
        #[cfg(not(all(feature = "wasm", target_arch = "wasm32")))]
        {
            Arc::new(crate::domain::notice::TracingNotifier)
        }
    }

    /// Fails with [`IcoError::Validation`] unless both contract addresses are set.
    pub fn build(self) -> Result<IcoClient, IcoError> {
        self.addresses.validate()?;
        let price_per_token_wei = match self.price_per_token {
            Some(ether) => parse_ether(ether).map_err(|e| IcoError::Validation(e.to_string()))?,
            None => token_price_wei(),
        };

        #[allow(unused_mut)]
        let mut options = self.connector_options;

        #[cfg(feature = "http")]
        {
            if let Some(url) = &self.rpc_url {
                let provider =
                    crate::rpc::HttpProvider::new(url)?.with_accounts(self.rpc_accounts.clone());
                options
                    .provider_options
                    .push(ProviderOption::new("rpc", Arc::new(provider)));
            }
        }

        let mut connector = WalletConnector::new(options);
        if let Some(injected) = self.injected {
            connector = connector.with_injected(injected);
        }

        let resolver = ProviderResolver::new(connector, NetworkGuard::new(self.required_chain_id))
            .with_poll_interval(self.poll_interval);

        Ok(IcoClient {
            resolver,
            addresses: self.addresses,
            price_per_token_wei,
            claim_scan: self.claim_scan,
            view_config: self.view_config,
            notifier: self.notifier.unwrap_or_else(Self::default_notifier),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn token() -> Address {
        Address::from_str("0x00000000000000000000000000000000000000cc").unwrap()
    }

    fn position() -> Address {
        Address::from_str("0x00000000000000000000000000000000000000dd").unwrap()
    }

    fn builder() -> IcoClientBuilder {
        IcoClient::builder()
            .token_address(token())
            .position_address(position())
    }

    #[test]
    fn test_builder_defaults() {
        let client = builder().build().unwrap();
        assert_eq!(client.resolver().guard().required_chain_id(), 5);
        assert_eq!(client.price_per_token_wei(), token_price_wei());
        assert_eq!(*client.addresses(), ContractAddresses::new(token(), position()));
        assert_eq!(client.view_config().max_supply, 10_000);
        assert_eq!(client.resolver().connector().options().network, "goerli");
    }

    #[test]
    fn test_builder_requires_contract_addresses() {
        let err = IcoClient::builder().build().err().unwrap();
        assert!(matches!(err, IcoError::Validation(_)));

        let err = IcoClient::builder()
            .token_address(token())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, IcoError::Validation(msg) if msg.contains("NFT")));

        let err = IcoClient::builder()
            .position_address(position())
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, IcoError::Validation(msg) if msg.contains("token")));
    }

    #[test]
    fn test_builder_price_in_ether() {
        let client = builder()
            .price_per_token(Decimal::from_str("0.002").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            client.price_per_token_wei(),
            U256::from(2_000_000_000_000_000u64)
        );
        assert_eq!(
            client.tokens().price_for(U256::from(5u64)).unwrap(),
            U256::from(10_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_builder_rejects_sub_wei_price() {
        let result = builder()
            .price_per_token(Decimal::from_str("0.0000000000000000001").unwrap())
            .build();
        assert!(matches!(result, Err(IcoError::Validation(_))));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_public_rpc_becomes_provider_option() {
        let client = builder().public_rpc().build().unwrap();
        let options = client.resolver().connector().options();
        assert_eq!(options.provider_options.len(), 1);
        assert_eq!(options.provider_options[0].name, "rpc");
    }

    #[test]
    fn test_claims_tokens_owed_uses_configured_rate() {
        let client = builder().tokens_per_claim(25).build().unwrap();
        assert_eq!(
            client.claims().tokens_owed(crate::shared::ClaimableCount::new(2)),
            U256::from(50u64)
        );
    }
}
