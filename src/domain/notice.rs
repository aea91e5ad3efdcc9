//! User-facing notifications emitted by the session store.

use crate::network::chain_name;
use crate::shared::{ChainId, TxHash};
use crate::wallet::MaybeSendSync;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The wallet is on the wrong chain; the action was aborted.
    WrongNetwork { expected: ChainId, actual: ChainId },
    MintConfirmed { tx: TxHash },
    ClaimConfirmed { tx: TxHash },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::WrongNetwork { expected, .. } => {
                format!("Change Network to {}", chain_name(*expected))
            }
            Notice::MintConfirmed { .. } => "Successfully minted Crypto Dev Token".to_string(),
            Notice::ClaimConfirmed { .. } => "Successfully claimed Crypto Dev Tokens".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Notice::MintConfirmed { .. } | Notice::ClaimConfirmed { .. }
        )
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

/// Delivers notices to the user. Called synchronously before the triggering
/// action returns.
pub trait Notifier: MaybeSendSync {
    fn notify(&self, notice: &Notice);
}

/// Logs notices through `tracing`. Default for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::WrongNetwork { expected, actual } => {
                tracing::warn!(expected, actual, "{}", notice.message())
            }
            Notice::MintConfirmed { tx } | Notice::ClaimConfirmed { tx } => {
                tracing::info!(tx = %tx, "{}", notice.message())
            }
        }
    }
}

/// Blocking `window.alert` in the browser.
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
impl Notifier for AlertNotifier {
    fn notify(&self, notice: &Notice) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("No window to alert: {}", notice.message());
            return;
        };
        if let Err(e) = window.alert_with_message(&notice.message()) {
            tracing::warn!(error = ?e, "window.alert failed");
        }
    }
}
