//! Network constants for the Crypto Devs ICO deployment.

use crate::shared::ChainId;

/// Chain the ICO contracts are deployed on (Goerli).
pub const REQUIRED_CHAIN_ID: ChainId = 5;

/// Network name handed to the wallet connector.
pub const DEFAULT_NETWORK: &str = "goerli";

/// Default JSON-RPC endpoint for the HTTP provider.
pub const DEFAULT_RPC_URL: &str = "https://rpc.ankr.com/eth_goerli";

/// Human-readable name for a chain id, used in wrong-network notices.
pub fn chain_name(chain_id: ChainId) -> &'static str {
    match chain_id {
        1 => "Ethereum Mainnet",
        5 => "Goerli",
        10 => "Optimism",
        137 => "Polygon",
        8453 => "Base",
        42161 => "Arbitrum One",
        11155111 => "Sepolia",
        31337 => "Localhost",
        _ => "Unknown network",
    }
}
