pub mod classifier;
pub mod decoded;
pub mod error;
pub mod logging;
pub mod ownership;
pub mod types;

use std::collections::HashMap;

use chain_ada::{Address, AddressKind};
use error::WalletError;
use ownership::{DerivationLabel, OwnershipIndex};
use types::{TokenEntry, Transaction, TransactionDirection, TxIo};

uniffi::setup_scaffolding!();

// ─── UniFFI-exported types ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AddressType {
    Legacy,
    Base,
    Pointer,
    Enterprise,
    Reward,
}

impl From<AddressKind> for AddressType {
    fn from(kind: AddressKind) -> Self {
        match kind {
            AddressKind::Legacy => AddressType::Legacy,
            AddressKind::Base => AddressType::Base,
            AddressKind::Pointer => AddressType::Pointer,
            AddressKind::Enterprise => AddressType::Enterprise,
            AddressKind::Reward => AddressType::Reward,
        }
    }
}

/// Spending/staking key hashes, 64 lowercase hex chars each
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct KeyHashes {
    pub spending: String,
    pub staking: String,
}

impl From<&chain_ada::KeyHashPair> for KeyHashes {
    fn from(pair: &chain_ada::KeyHashPair) -> Self {
        Self {
            spending: pair.spending.clone(),
            staking: pair.staking.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct AddressInfo {
    pub address: String,
    pub address_type: AddressType,
    /// "mainnet" / "testnet"; absent for legacy addresses
    pub network: Option<String>,
    pub key_hashes: Option<KeyHashes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TxDirection {
    Sent,
    Received,
    Intrawallet,
    Multi,
}

impl From<TxDirection> for TransactionDirection {
    fn from(d: TxDirection) -> Self {
        match d {
            TxDirection::Sent => TransactionDirection::Sent,
            TxDirection::Received => TransactionDirection::Received,
            TxDirection::Intrawallet => TransactionDirection::Intrawallet,
            TxDirection::Multi => TransactionDirection::Multi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TokenData {
    pub identifier: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TxIoData {
    pub address: String,
    pub assets: Vec<TokenData>,
}

/// Transaction passed from Swift for the details screen
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TransactionData {
    pub id: String,
    pub direction: TxDirection,
    pub inputs: Vec<TxIoData>,
    pub outputs: Vec<TxIoData>,
    pub amount: Vec<TokenData>,
    pub fee: Option<Vec<TokenData>>,
    pub confirmations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AddressLabel {
    Receive { index: u32 },
    Change { index: u32 },
    NotMine,
}

impl From<DerivationLabel> for AddressLabel {
    fn from(label: DerivationLabel) -> Self {
        match label {
            DerivationLabel::Receive(index) => AddressLabel::Receive { index },
            DerivationLabel::Change(index) => AddressLabel::Change { index },
            DerivationLabel::NotMine => AddressLabel::NotMine,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ParticipantData {
    pub address: String,
    pub label: AddressLabel,
    pub is_highlighted: bool,
    pub assets: Vec<TokenData>,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ParticipantsView {
    pub from_entries: Vec<ParticipantData>,
    pub from_omitted: u32,
    pub to_entries: Vec<ParticipantData>,
    pub to_omitted: u32,
    pub anomalies: Vec<String>,
}

// ─── UniFFI-exported functions ───────────────────────────────────────
// UniFFI passes owned String/Vec/HashMap across FFI, so all functions
// accept owned types.

/// Install the Rust-side log subscriber
#[uniffi::export]
pub fn init_logging(json: bool) {
    logging::init_logging(json)
}

/// Decode an address string and report its type, network and key hashes
#[uniffi::export]
pub fn decode_address(address: String) -> Result<AddressInfo, WalletError> {
    let raw = Address::parse(&address).map_err(|e| WalletError::decode(&address, e))?;
    let variant = chain_ada::decode(&raw).map_err(|e| WalletError::decode(&address, e))?;
    Ok(AddressInfo {
        address_type: variant.kind().into(),
        network: variant.network_id().map(|n| n.to_string()),
        key_hashes: chain_ada::extract_key_hashes(&variant).as_ref().map(KeyHashes::from),
        address,
    })
}

/// Key hashes of a base address; `None` for every other address shape
#[uniffi::export]
pub async fn get_key_hashes(address: String) -> Result<Option<KeyHashes>, WalletError> {
    let decoded =
        decoded::DecodedAddress::parse(&address).map_err(|e| WalletError::decode(&address, e))?;
    let pair = decoded
        .key_hashes()
        .await
        .map_err(|e| WalletError::decode(&address, e))?;
    Ok(pair.map(KeyHashes::from))
}

/// Build the from/to address lists for the transaction details screen
#[uniffi::export]
pub fn classify_participants(
    transaction: TransactionData,
    receive_index: HashMap<String, u32>,
    change_index: HashMap<String, u32>,
) -> ParticipantsView {
    let index = OwnershipIndex::new(address_map(receive_index), address_map(change_index));
    let tx = Transaction {
        id: transaction.id,
        direction: transaction.direction.into(),
        inputs: transaction.inputs.into_iter().map(tx_io).collect(),
        outputs: transaction.outputs.into_iter().map(tx_io).collect(),
        amount: transaction.amount.into_iter().map(token).collect(),
        fee: transaction
            .fee
            .map(|fee| fee.into_iter().map(token).collect()),
        confirmations: transaction.confirmations,
    };

    let result = classifier::classify(&tx, &index);
    ParticipantsView {
        from_entries: result.from_entries.into_iter().map(participant).collect(),
        from_omitted: count(result.from_omitted_count),
        to_entries: result.to_entries.into_iter().map(participant).collect(),
        to_omitted: count(result.to_omitted_count),
        anomalies: result.anomalies.iter().map(|a| a.to_string()).collect(),
    }
}

// ─── FFI conversions ─────────────────────────────────────────────────

/// Strings that are not bech32/base58 still take part in matching,
/// identified by their text.
fn ffi_address(text: &str) -> Address {
    Address::parse(text).unwrap_or_else(|e| {
        tracing::debug!(address = text, error = %e, "keeping unparsed address");
        Address::unparsed(text)
    })
}

fn address_map(map: HashMap<String, u32>) -> HashMap<Address, u32> {
    map.into_iter()
        .map(|(text, index)| (ffi_address(&text), index))
        .collect()
}

fn token(t: TokenData) -> TokenEntry {
    TokenEntry {
        identifier: t.identifier,
        amount: t.amount,
    }
}

fn token_data(t: TokenEntry) -> TokenData {
    TokenData {
        identifier: t.identifier,
        amount: t.amount,
    }
}

fn tx_io(io: TxIoData) -> TxIo {
    TxIo {
        address: ffi_address(&io.address),
        assets: io.assets.into_iter().map(token).collect(),
    }
}

fn participant(entry: classifier::ParticipantEntry) -> ParticipantData {
    ParticipantData {
        address: entry.address.to_string(),
        label: entry.derivation_label.into(),
        is_highlighted: entry.is_highlighted,
        assets: entry.assets.into_iter().map(token_data).collect(),
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
