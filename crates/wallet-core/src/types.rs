use chain_ada::Address;
use serde::{Deserialize, Serialize};

/// How a transaction relates to this wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionDirection {
    /// Funds left the wallet.
    Sent,
    /// Funds arrived from outside.
    Received,
    /// Every participant belongs to this wallet.
    #[serde(rename = "SELF")]
    Intrawallet,
    /// Inputs from this wallet and from others.
    Multi,
}

impl TransactionDirection {
    pub fn display_name(&self) -> &'static str {
        match self {
            TransactionDirection::Sent => "Sent funds",
            TransactionDirection::Received => "Received funds",
            TransactionDirection::Intrawallet => "Intrawallet transaction",
            TransactionDirection::Multi => "Multi-party transaction",
        }
    }
}

/// One token amount. Carried through untouched; arithmetic happens in the
/// app's multi-asset layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    pub identifier: String,
    pub amount: String,
}

/// A transaction input or output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIo {
    pub address: Address,
    #[serde(default)]
    pub assets: Vec<TokenEntry>,
}

/// A transaction as fetched from the backend, already tagged with its
/// direction relative to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub direction: TransactionDirection,
    #[serde(default)]
    pub inputs: Vec<TxIo>,
    #[serde(default)]
    pub outputs: Vec<TxIo>,
    #[serde(default)]
    pub amount: Vec<TokenEntry>,
    #[serde(default)]
    pub fee: Option<Vec<TokenEntry>>,
    pub confirmations: u32,
}
