//! In-memory EIP-1193 chain running the ICO token and NFT contracts.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_sol_types::{SolInterface, SolValue};
use serde_json::{json, Value};

use cryptodevs_ico::contracts::abi::{
    from_hex, to_hex, ICryptoDevToken::ICryptoDevTokenCalls, ICryptoDevs::ICryptoDevsCalls,
};
use cryptodevs_ico::contracts::constants::{token_price_wei, MAX_TOTAL_SUPPLY, TOKENS_PER_NFT};
use cryptodevs_ico::domain::notice::{Notice, Notifier};
use cryptodevs_ico::prelude::*;
use cryptodevs_ico::shared::units::pow10;

pub fn user() -> Address {
    Address::from_str("0x00000000000000000000000000000000000000aa").unwrap()
}

pub fn token_address() -> Address {
    Address::from_str("0x00000000000000000000000000000000000000cc").unwrap()
}

pub fn nft_address() -> Address {
    Address::from_str("0x00000000000000000000000000000000000000dd").unwrap()
}

pub fn one_ether() -> U256 {
    pow10(18)
}

pub struct ChainState {
    pub chain_id: ChainId,
    pub accounts: Vec<Address>,
    pub addresses: ContractAddresses,
    pub total_supply: U256,
    pub token_balances: HashMap<Address, U256>,
    pub nfts: HashMap<Address, Vec<U256>>,
    pub claimed: HashSet<U256>,
    pub eth_balances: HashMap<Address, U256>,
    /// `eth_requestAccounts` fails with 4001.
    pub reject_connect: bool,
    /// `eth_sendTransaction` fails with 4001.
    pub reject_transactions: bool,
    /// Transactions are accepted but mine with status `0x0`.
    pub revert_on_mine: bool,
    /// Receipts stay `null` while set.
    pub hold_receipts: bool,
    /// `eth_call` to this selector fails.
    pub failing_selector: Option<[u8; 4]>,
    /// The next this many receipt polls fail.
    pub failing_receipts: usize,
    pub methods: Vec<String>,
    pub sent: Vec<Value>,
    receipts: HashMap<String, bool>,
}

impl Default for ChainState {
    fn default() -> Self {
        let user = user();
        Self {
            chain_id: 5,
            accounts: vec![user],
            addresses: ContractAddresses::new(token_address(), nft_address()),
            total_supply: U256::ZERO,
            token_balances: HashMap::new(),
            nfts: HashMap::new(),
            claimed: HashSet::new(),
            eth_balances: HashMap::from([(user, one_ether())]),
            reject_connect: false,
            reject_transactions: false,
            revert_on_mine: false,
            hold_receipts: false,
            failing_selector: None,
            failing_receipts: 0,
            methods: Vec::new(),
            sent: Vec::new(),
            receipts: HashMap::new(),
        }
    }
}

fn revert(reason: &str) -> ProviderError {
    ProviderError::new(
        ProviderError::EXECUTION_REVERTED,
        format!("execution reverted: {}", reason),
    )
}

fn word<T: SolValue>(value: T) -> Value {
    json!(to_hex(&value.abi_encode()))
}

impl ChainState {
    fn eth_call(&self, tx: &Value) -> Result<Value, ProviderError> {
        let to = Address::from_str(tx["to"].as_str().unwrap_or_default()).unwrap();
        let data = from_hex(tx["data"].as_str().unwrap_or_default()).unwrap();

        if let Some(sel) = self.failing_selector {
            if data.starts_with(&sel) {
                return Err(ProviderError::new(-32000, "header not found"));
            }
        }

        if to == self.addresses.token {
            match ICryptoDevTokenCalls::abi_decode(&data, true) {
                Ok(ICryptoDevTokenCalls::totalSupply(_)) => Ok(word(self.total_supply)),
                Ok(ICryptoDevTokenCalls::balanceOf(call)) => Ok(word(
                    self.token_balances
                        .get(&call.account)
                        .copied()
                        .unwrap_or_default(),
                )),
                Ok(ICryptoDevTokenCalls::tokenIdsClaimed(call)) => {
                    Ok(word(self.claimed.contains(&call.tokenId)))
                }
                _ => Err(revert("unknown function")),
            }
        } else if to == self.addresses.position {
            match ICryptoDevsCalls::abi_decode(&data, true) {
                Ok(ICryptoDevsCalls::balanceOf(call)) => {
                    let held = self.nfts.get(&call.owner).map(Vec::len).unwrap_or(0);
                    Ok(word(U256::from(held as u64)))
                }
                Ok(ICryptoDevsCalls::tokenOfOwnerByIndex(call)) => self
                    .nfts
                    .get(&call.owner)
                    .and_then(|ids| ids.get(call.index.to::<usize>()))
                    .map(|id| word(*id))
                    .ok_or_else(|| revert("ERC721Enumerable: owner index out of bounds")),
                Err(_) => Err(revert("unknown function")),
            }
        } else {
            // No code at the address.
            Ok(json!("0x"))
        }
    }

    fn send_transaction(&mut self, tx: &Value) -> Result<Value, ProviderError> {
        if self.reject_transactions {
            return Err(ProviderError::user_rejected(
                "MetaMask Tx Signature: User denied transaction signature.",
            ));
        }
        self.sent.push(tx.clone());

        let from = Address::from_str(tx["from"].as_str().unwrap_or_default()).unwrap();
        let to = Address::from_str(tx["to"].as_str().unwrap_or_default()).unwrap();
        let data = from_hex(tx["data"].as_str().unwrap_or_default()).unwrap();
        let value = tx["value"]
            .as_str()
            .map(|v| U256::from_str(v).unwrap())
            .unwrap_or_default();
        if to != self.addresses.token {
            return Err(revert("unknown function"));
        }
        let call = ICryptoDevTokenCalls::abi_decode(&data, true)
            .map_err(|_| revert("unknown function"))?;

        let eth = self.eth_balances.get(&from).copied().unwrap_or_default();
        if value > eth {
            return Err(ProviderError::new(
                -32000,
                "insufficient funds for gas * price + value",
            ));
        }

        let mut newly_claimed = Vec::new();
        let minted = match call {
            ICryptoDevTokenCalls::mint(mint) => {
                let amount = mint.amount;
                if value < amount * token_price_wei() {
                    return Err(revert("Ether sent is incorrect"));
                }
                let minted = amount * one_ether();
                if self.total_supply + minted > U256::from(MAX_TOTAL_SUPPLY) * one_ether() {
                    return Err(revert("Exceeds the max total supply available."));
                }
                minted
            }
            ICryptoDevTokenCalls::claim(_) => {
                let owned = self.nfts.get(&from).cloned().unwrap_or_default();
                if owned.is_empty() {
                    return Err(revert("You dont own any Crypto Dev NFT's"));
                }
                let unclaimed: Vec<U256> = owned
                    .into_iter()
                    .filter(|id| !self.claimed.contains(id))
                    .collect();
                if unclaimed.is_empty() {
                    return Err(revert("You have already claimed all the tokens"));
                }
                let count = unclaimed.len() as u64;
                newly_claimed = unclaimed;
                U256::from(count * TOKENS_PER_NFT) * one_ether()
            }
            _ => return Err(revert("unknown function")),
        };

        let hash = format!("0x{:064x}", self.sent.len());
        let success = !self.revert_on_mine;
        if success {
            *self.eth_balances.entry(from).or_default() -= value;
            *self.token_balances.entry(from).or_default() += minted;
            self.total_supply += minted;
            self.claimed.extend(newly_claimed);
        }
        self.receipts.insert(hash.clone(), success);
        Ok(json!(hash))
    }

    fn receipt(&mut self, hash: &str) -> Result<Value, ProviderError> {
        if self.failing_receipts > 0 {
            self.failing_receipts -= 1;
            return Err(ProviderError::new(-32000, "header not found"));
        }
        if self.hold_receipts {
            return Ok(Value::Null);
        }
        Ok(match self.receipts.get(hash) {
            Some(success) => json!({
                "transactionHash": hash,
                "blockNumber": "0x1",
                "status": if *success { "0x1" } else { "0x0" },
                "gasUsed": "0x5208",
                "logs": []
            }),
            None => Value::Null,
        })
    }
}

#[derive(Default)]
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_state(f: impl FnOnce(&mut ChainState)) -> Arc<Self> {
        let chain = Self::default();
        f(&mut *chain.state.lock().unwrap());
        Arc::new(chain)
    }

    pub fn update(&self, f: impl FnOnce(&mut ChainState)) {
        f(&mut *self.state.lock().unwrap());
    }

    pub fn read<R>(&self, f: impl FnOnce(&ChainState) -> R) -> R {
        f(&*self.state.lock().unwrap())
    }

    pub fn count(&self, method: &str) -> usize {
        self.read(|s| s.methods.iter().filter(|m| *m == method).count())
    }

    pub fn total_requests(&self) -> usize {
        self.read(|s| s.methods.len())
    }

    pub fn sent(&self) -> Vec<Value> {
        self.read(|s| s.sent.clone())
    }
}

#[async_trait::async_trait]
impl Eip1193 for MockChain {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.methods.push(method.to_string());
        match method {
            "eth_chainId" => Ok(json!(format!("0x{:x}", state.chain_id))),
            "eth_requestAccounts" if state.reject_connect => {
                Err(ProviderError::user_rejected("User rejected the request."))
            }
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(state
                .accounts
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>())),
            "eth_call" => state.eth_call(&params[0]),
            "eth_sendTransaction" => state.send_transaction(&params[0]),
            "eth_getTransactionReceipt" => state.receipt(params[0].as_str().unwrap_or_default()),
            other => Err(ProviderError::new(
                -32601,
                format!("method {} not supported", other),
            )),
        }
    }
}

/// Records every notice it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

pub struct Harness {
    pub chain: Arc<MockChain>,
    pub notifier: Arc<RecordingNotifier>,
    pub client: IcoClient,
}

/// Builder wired to `chain` with its contract addresses and a fast poll interval.
pub fn client_builder(chain: Arc<MockChain>) -> IcoClientBuilder {
    let addresses = chain.read(|s| s.addresses);
    IcoClient::builder()
        .injected(chain)
        .token_address(addresses.token)
        .position_address(addresses.position)
        .poll_interval(Duration::from_millis(5))
}

pub fn harness(chain: Arc<MockChain>) -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let client = client_builder(chain.clone())
        .notifier(notifier.clone())
        .build()
        .unwrap();
    Harness {
        chain,
        notifier,
        client,
    }
}
