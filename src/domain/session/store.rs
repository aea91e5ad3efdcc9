//! `SessionStore`: single owner of [`UiState`].
//!
//! Every mutation goes through one of the named transitions below. Each
//! transition is also the catch boundary for its own failures: errors are
//! logged, a wrong-network notice is sent at most once per action, and the
//! error is returned to the caller for inspection.

use std::sync::Arc;

use alloy_primitives::U256;
use async_lock::Mutex;

use crate::contracts::constants::token_price_wei;
use crate::contracts::ContractAddresses;
use crate::domain::eligibility::{try_compute_claimable, ClaimScan};
use crate::domain::gateway::ContractGateway;
use crate::domain::notice::{Notice, Notifier, TracingNotifier};
use crate::domain::session::{SessionStatus, StateObserver, UiState, WalletSession};
use crate::error::{ErrorKind, IcoError};
use crate::shared::{ClaimableCount, TokenAmount, TxHash};
use crate::wallet::{ProviderResolver, TransactionReceipt};

/// Outcome of [`SessionStore::refresh_all`]: one slot per refresh, `None` on success.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub balance: Option<IcoError>,
    pub total_minted: Option<IcoError>,
    pub claimable: Option<IcoError>,
}

impl RefreshReport {
    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &IcoError> + '_ {
        [&self.balance, &self.total_minted, &self.claimable]
            .into_iter()
            .flatten()
    }
}

#[derive(Default)]
struct Inner {
    ui: UiState,
    session: Option<WalletSession>,
    activated: bool,
    /// Bumped on every disconnect; reads started before it are discarded.
    epoch: u64,
    observers: Vec<Arc<dyn StateObserver>>,
}

/// Apply a refresh result to its field.
///
/// Read failures reset the field to zero; a wrong network leaves it untouched
/// since the guard aborted before anything was read.
fn settle<T: Copy + Default>(result: &Result<T, IcoError>, field: &mut T) {
    match result {
        Ok(value) => *field = *value,
        Err(e) if e.is_wrong_network() => {}
        Err(_) => *field = T::default(),
    }
}

/// The claimable count reports zero on any failure, wrong network included.
fn settle_claimable(result: &Result<ClaimableCount, IcoError>, field: &mut ClaimableCount) {
    *field = result.as_ref().ok().copied().unwrap_or_default();
}

#[derive(Clone)]
pub struct SessionStore {
    resolver: ProviderResolver,
    addresses: ContractAddresses,
    price_per_token_wei: U256,
    scan: ClaimScan,
    notifier: Arc<dyn Notifier>,
    inner: Arc<Mutex<Inner>>,
}

impl SessionStore {
    pub fn new(resolver: ProviderResolver) -> Self {
        Self {
            resolver,
            addresses: ContractAddresses::default(),
            price_per_token_wei: token_price_wei(),
            scan: ClaimScan::default(),
            notifier: Arc::new(TracingNotifier),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    pub fn with_addresses(mut self, addresses: ContractAddresses) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_price_per_token(mut self, price_per_token_wei: U256) -> Self {
        self.price_per_token_wei = price_per_token_wei;
        self
    }

    pub fn with_claim_scan(mut self, scan: ClaimScan) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn resolver(&self) -> &ProviderResolver {
        &self.resolver
    }

    /// Current snapshot.
    pub async fn state(&self) -> UiState {
        self.inner.lock().await.ui.clone()
    }

    pub async fn session(&self) -> Option<WalletSession> {
        self.inner.lock().await.session
    }

    /// Register an observer; it is called after every transition.
    pub async fn subscribe(&self, observer: impl StateObserver + 'static) {
        self.inner.lock().await.observers.push(Arc::new(observer));
    }

    async fn update<R>(&self, mutate: impl FnOnce(&mut Inner) -> R) -> R {
        let (result, snapshot, observers) = {
            let mut inner = self.inner.lock().await;
            let result = mutate(&mut *inner);
            (result, inner.ui.clone(), inner.observers.clone())
        };
        for observer in &observers {
            observer.on_change(&snapshot);
        }
        result
    }

    fn gateway<A>(&self, accessor: A) -> ContractGateway<A> {
        ContractGateway::new(self.addresses, accessor).with_price_per_token(self.price_per_token_wei)
    }

    fn log_failure(&self, action: &str, err: &IcoError) {
        match err.kind() {
            ErrorKind::ConnectionRejected | ErrorKind::TransactionRejected => {
                tracing::info!(action, error = %err, "Action declined by user")
            }
            _ => tracing::warn!(action, error = %err, "Action failed"),
        }
    }

    fn notify_wrong_network(&self, err: &IcoError) {
        if let IcoError::WrongNetwork { expected, actual } = err {
            self.notifier.notify(&Notice::WrongNetwork {
                expected: *expected,
                actual: *actual,
            });
        }
    }

    fn report(&self, action: &str, err: &IcoError) {
        self.notify_wrong_network(err);
        self.log_failure(action, err);
    }

    // ── Connection ───────────────────────────────────────────────────────

    /// Connect once per store lifetime; later calls are no-ops.
    pub async fn activate(&self) -> Result<(), IcoError> {
        {
            let mut inner = self.inner.lock().await;
            if inner.activated {
                return Ok(());
            }
            inner.activated = true;
        }
        self.connect_wallet().await.map(|_| ())
    }

    /// Connect the wallet, pass the network guard, then refresh everything.
    ///
    /// On failure the store is left `Disconnected` and no contract is read.
    pub async fn connect_wallet(&self) -> Result<WalletSession, IcoError> {
        self.update(|inner| inner.ui.status = SessionStatus::Connecting)
            .await;

        let signer = match self.resolver.resolve_signer().await {
            Ok(signer) => signer,
            Err(e) => {
                self.update(|inner| {
                    inner.session = None;
                    inner.ui.status = SessionStatus::Disconnected;
                    inner.ui.wallet_connected = false;
                })
                .await;
                self.report("connect_wallet", &e);
                return Err(e);
            }
        };

        let session = WalletSession {
            connected: true,
            chain_id: self.resolver.guard().required_chain_id(),
            address: signer.address(),
        };
        self.update(|inner| {
            inner.session = Some(session);
            inner.ui.status = SessionStatus::Connected;
            inner.ui.wallet_connected = true;
        })
        .await;
        tracing::info!(address = %session.address, chain_id = session.chain_id, "Session connected");

        self.refresh_all().await;
        Ok(session)
    }

    /// Drop the wallet session and reset the view state.
    ///
    /// An in-flight transaction keeps the busy flag until it settles.
    pub async fn disconnect(&self) {
        self.resolver.connector().clear_cached_provider().await;
        self.update(|inner| {
            inner.session = None;
            inner.epoch += 1;
            inner.ui = UiState {
                loading: inner.ui.loading,
                ..UiState::default()
            };
        })
        .await;
        tracing::info!("Session disconnected");
    }

    pub async fn set_token_amount_input(&self, amount: TokenAmount) {
        self.update(|inner| inner.ui.token_amount_input = amount)
            .await;
    }

    // ── Refreshes ────────────────────────────────────────────────────────

    async fn fetch_balance(&self) -> Result<TokenAmount, IcoError> {
        let signer = self.resolver.resolve_signer().await?;
        let owner = signer.address();
        self.gateway(signer).read_balance(owner).await
    }

    async fn fetch_total_minted(&self) -> Result<TokenAmount, IcoError> {
        let reader = self.resolver.resolve_reader().await?;
        self.gateway(reader).read_total_minted().await
    }

    async fn fetch_claimable(&self) -> Result<ClaimableCount, IcoError> {
        let signer = self.resolver.resolve_signer().await?;
        let owner = signer.address();
        try_compute_claimable(&self.gateway(signer), owner, self.scan).await
    }

    async fn epoch(&self) -> u64 {
        self.inner.lock().await.epoch
    }

    pub async fn refresh_balance(&self) -> Result<TokenAmount, IcoError> {
        let epoch = self.epoch().await;
        let result = self.fetch_balance().await;
        self.update(|inner| {
            if inner.epoch == epoch {
                settle(&result, &mut inner.ui.balance_of_tokens);
            }
        })
        .await;
        if let Err(e) = &result {
            self.report("refresh_balance", e);
        }
        result
    }

    pub async fn refresh_total_minted(&self) -> Result<TokenAmount, IcoError> {
        let epoch = self.epoch().await;
        let result = self.fetch_total_minted().await;
        self.update(|inner| {
            if inner.epoch == epoch {
                settle(&result, &mut inner.ui.tokens_minted);
            }
        })
        .await;
        if let Err(e) = &result {
            self.report("refresh_total_minted", e);
        }
        result
    }

    /// Recompute the claimable count; any failure reports zero.
    pub async fn refresh_claimable(&self) -> Result<ClaimableCount, IcoError> {
        let epoch = self.epoch().await;
        let result = self.fetch_claimable().await;
        self.update(|inner| {
            if inner.epoch == epoch {
                settle_claimable(&result, &mut inner.ui.tokens_to_be_claimed);
            }
        })
        .await;
        if let Err(e) = &result {
            self.report("refresh_claimable", e);
        }
        result
    }

    /// Run the three refreshes concurrently and apply their results together.
    ///
    /// Each result is applied independently: one failing read never blocks the
    /// others. Results are dropped if the session was disconnected meanwhile.
    pub async fn refresh_all(&self) -> RefreshReport {
        let epoch = self.epoch().await;
        let (balance, total_minted, claimable) = futures_util::join!(
            self.fetch_balance(),
            self.fetch_total_minted(),
            self.fetch_claimable()
        );

        let applied = self
            .update(|inner| {
                if inner.epoch != epoch {
                    return false;
                }
                settle(&balance, &mut inner.ui.balance_of_tokens);
                settle(&total_minted, &mut inner.ui.tokens_minted);
                settle_claimable(&claimable, &mut inner.ui.tokens_to_be_claimed);
                true
            })
            .await;
        if !applied {
            tracing::debug!("Session disconnected during refresh, results dropped");
        }

        let report = RefreshReport {
            balance: balance.err(),
            total_minted: total_minted.err(),
            claimable: claimable.err(),
        };

        if let Some(wrong) = report.errors().find(|e| e.is_wrong_network()) {
            self.notify_wrong_network(wrong);
        }
        for err in report.errors() {
            self.log_failure("refresh", err);
        }
        report
    }

    // ── Transactions ─────────────────────────────────────────────────────

    /// Fails with `NotConnected` without a session, `Busy` while another
    /// transaction is in flight.
    async fn begin_busy(&self) -> Result<(), IcoError> {
        self.update(|inner| {
            if inner.session.is_none() {
                return Err(IcoError::NotConnected);
            }
            if inner.ui.loading {
                return Err(IcoError::Busy);
            }
            inner.ui.loading = true;
            Ok(())
        })
        .await
    }

    async fn end_busy(&self) {
        self.update(|inner| inner.ui.loading = false).await;
    }

    async fn finish(
        &self,
        action: &str,
        outcome: Result<TransactionReceipt, IcoError>,
        notice: impl FnOnce(TxHash) -> Notice,
    ) -> Result<TransactionReceipt, IcoError> {
        match outcome {
            Ok(receipt) => {
                self.notifier.notify(&notice(receipt.transaction_hash));
                // A disconnect while the transaction was pending must not reconnect.
                let connected = self.inner.lock().await.session.is_some();
                if connected {
                    self.refresh_all().await;
                }
                Ok(receipt)
            }
            Err(e) => {
                self.report(action, &e);
                Err(e)
            }
        }
    }

    async fn submit_mint(&self, amount: U256) -> Result<TransactionReceipt, IcoError> {
        let signer = self.resolver.resolve_signer().await?;
        let pending = self.gateway(signer).mint(amount).await?;
        pending.wait().await
    }

    async fn submit_claim(&self) -> Result<TransactionReceipt, IcoError> {
        let signer = self.resolver.resolve_signer().await?;
        let pending = self.gateway(signer).claim().await?;
        pending.wait().await
    }

    /// Mint `amount` whole tokens and wait for confirmation.
    ///
    /// Requires a connected session. `loading` is true from invocation until
    /// the transaction confirms or fails. On success a notice is sent and all
    /// state is refreshed.
    pub async fn mint(&self, amount: U256) -> Result<TransactionReceipt, IcoError> {
        if amount.is_zero() {
            return Err(IcoError::Validation(
                "mint amount must be greater than zero".to_string(),
            ));
        }
        self.begin_busy().await?;
        let outcome = self.submit_mint(amount).await;
        self.end_busy().await;
        self.finish("mint", outcome, |tx| Notice::MintConfirmed { tx })
            .await
    }

    /// Claim the tokens owed for held position tokens.
    pub async fn claim(&self) -> Result<TransactionReceipt, IcoError> {
        self.begin_busy().await?;
        let outcome = self.submit_claim().await;
        self.end_busy().await;
        self.finish("claim", outcome, |tx| Notice::ClaimConfirmed { tx })
            .await
    }
}
