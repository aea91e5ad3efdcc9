//! View renderer: pure mapping from [`UiState`] to a page description.

use crate::contracts::constants::{MAX_TOTAL_SUPPLY, TOKENS_PER_NFT};
use crate::domain::session::UiState;
use crate::shared::ClaimableCount;

pub const TITLE: &str = "Welcome to Crypto Devs ICO";
pub const DESCRIPTION: &str = "You can claim or mint Crypto Dev tokens here";
pub const CONNECT_LABEL: &str = "Connect your wallet";
pub const LOADING_LABEL: &str = "Loading...";
pub const CLAIM_LABEL: &str = "Claim Tokens";
pub const MINT_LABEL: &str = "Mint Tokens";
pub const MINT_PLACEHOLDER: &str = "Amount of Tokens";

/// The three mutually exclusive action modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Loading,
    Claim { claimable: ClaimableCount },
    Mint { mint_enabled: bool },
}

/// Deployment-chosen presentation constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewConfig {
    /// ICO tokens owed per unclaimed position token.
    pub tokens_per_claim: u64,
    /// Supply cap shown in the "Overall" line.
    pub max_supply: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tokens_per_claim: TOKENS_PER_NFT,
            max_supply: MAX_TOTAL_SUPPLY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionView {
    Loading {
        label: &'static str,
    },
    Claim {
        description: String,
        button: &'static str,
    },
    Mint {
        placeholder: &'static str,
        button: &'static str,
        enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageBody {
    ConnectPrompt {
        button: &'static str,
    },
    Dashboard {
        balance_line: String,
        supply_line: String,
        action: ActionView,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub title: &'static str,
    pub description: &'static str,
    pub body: PageBody,
}

/// Busy wins, then a pending claim, else the mint form.
pub fn select_mode(state: &UiState) -> ViewMode {
    if state.loading() {
        ViewMode::Loading
    } else if !state.tokens_to_be_claimed().is_zero() {
        ViewMode::Claim {
            claimable: state.tokens_to_be_claimed(),
        }
    } else {
        ViewMode::Mint {
            mint_enabled: !state.token_amount_input().is_zero(),
        }
    }
}

fn render_action(mode: ViewMode, config: &ViewConfig) -> ActionView {
    match mode {
        ViewMode::Loading => ActionView::Loading {
            label: LOADING_LABEL,
        },
        ViewMode::Claim { claimable } => ActionView::Claim {
            description: format!(
                "{} Tokens can be claimed!",
                claimable.tokens_owed(config.tokens_per_claim)
            ),
            button: CLAIM_LABEL,
        },
        ViewMode::Mint { mint_enabled } => ActionView::Mint {
            placeholder: MINT_PLACEHOLDER,
            button: MINT_LABEL,
            enabled: mint_enabled,
        },
    }
}

pub fn render(state: &UiState, config: &ViewConfig) -> PageView {
    let body = if state.wallet_connected() {
        PageBody::Dashboard {
            balance_line: format!(
                "You have minted {} Crypto Dev Tokens",
                state.balance_of_tokens().format_ether()
            ),
            supply_line: format!(
                "Overall {} / {} have been minted",
                state.tokens_minted().format_ether(),
                config.max_supply
            ),
            action: render_action(select_mode(state), config),
        }
    } else {
        PageBody::ConnectPrompt {
            button: CONNECT_LABEL,
        }
    };

    PageView {
        title: TITLE,
        description: DESCRIPTION,
        body,
    }
}
