//! On-chain contract interaction: Solidity interfaces, sale constants and call
//! builders for the token and position-token (NFT) contracts.
//!
//! Builders are pure: they produce a [`CallRequest`] that an accessor executes
//! either as an `eth_call` (reads) or an `eth_sendTransaction` (writes).

pub mod abi;
pub mod constants;
pub mod position;
pub mod token;

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::error::IcoError;
use crate::shared::to_quantity;

/// A contract call: target, call data and optional native value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub to: Address,
    pub data: Vec<u8>,
    pub value: Option<U256>,
}

impl CallRequest {
    pub fn new(to: Address, data: Vec<u8>) -> Self {
        Self {
            to,
            data,
            value: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// JSON-RPC transaction object, optionally with a `from` account.
    pub fn to_wire(&self, from: Option<Address>) -> TransactionObject {
        TransactionObject {
            from: from.map(|a| a.to_string()),
            to: self.to.to_string(),
            data: abi::to_hex(&self.data),
            value: self.value.map(to_quantity),
        }
    }
}

/// Wire form of a call / transaction for `eth_call` and `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Addresses of the two contracts the ICO talks to.
///
/// The default is unset (both zero) and fails [`ContractAddresses::validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    pub token: Address,
    pub position: Address,
}

impl ContractAddresses {
    pub fn new(token: Address, position: Address) -> Self {
        Self { token, position }
    }

    pub fn validate(&self) -> Result<(), IcoError> {
        if self.token.is_zero() {
            return Err(IcoError::Validation("token contract address not set".to_string()));
        }
        if self.position.is_zero() {
            return Err(IcoError::Validation("NFT contract address not set".to_string()));
        }
        if self.token == self.position {
            return Err(IcoError::Validation(
                "token and NFT contract addresses must differ".to_string(),
            ));
        }
        Ok(())
    }
}
