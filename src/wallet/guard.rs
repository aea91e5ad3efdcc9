//! Network guard: every accessor must be on the required chain.

use crate::error::IcoError;
use crate::network::chain_name;
use crate::shared::ChainId;
use crate::wallet::Web3Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkGuard {
    required_chain_id: ChainId,
}

impl NetworkGuard {
    pub fn new(required_chain_id: ChainId) -> Self {
        Self { required_chain_id }
    }

    pub fn required_chain_id(&self) -> ChainId {
        self.required_chain_id
    }

    /// Read the provider's chain id and reject anything but the required one.
    pub async fn check(&self, provider: &Web3Provider) -> Result<ChainId, IcoError> {
        let network = provider.get_network().await?;
        self.verify(network.chain_id)
    }

    pub fn verify(&self, chain_id: ChainId) -> Result<ChainId, IcoError> {
        if chain_id != self.required_chain_id {
            tracing::warn!(
                expected = self.required_chain_id,
                actual = chain_id,
                "Change the network to {}",
                chain_name(self.required_chain_id)
            );
            return Err(IcoError::WrongNetwork {
                expected: self.required_chain_id,
                actual: chain_id,
            });
        }
        Ok(chain_id)
    }
}

impl Default for NetworkGuard {
    fn default() -> Self {
        Self::new(crate::network::REQUIRED_CHAIN_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_required_chain() {
        assert_eq!(NetworkGuard::new(5).verify(5).unwrap(), 5);
    }

    #[test]
    fn test_verify_rejects_other_chain() {
        let err = NetworkGuard::new(5).verify(1).unwrap_err();
        assert!(matches!(
            err,
            IcoError::WrongNetwork {
                expected: 5,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_default_is_goerli() {
        assert_eq!(NetworkGuard::default().required_chain_id(), 5);
    }
}
