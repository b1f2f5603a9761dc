//! Cardano address support for the crypto-wallet.
//!
//! Decodes raw or textual addresses into one of the five address variants
//! (legacy, base, pointer, enterprise, reward), extracts credentials and
//! key hashes, and encodes variants back to bytes and bech32/base58 text.

pub mod address;
pub mod byron;
pub mod credential;
pub mod error;
pub mod key_hash;
pub mod network;
pub mod pointer;

pub use address::{decode, decode_bytes, decode_str, Address, AddressKind, AddressVariant};
pub use credential::{Credential, KeyHash, ScriptHash};
pub use error::{AdaError, DecodeError};
pub use key_hash::{extract_key_hashes, KeyHashPair};
pub use network::NetworkId;
pub use pointer::ChainPointer;
