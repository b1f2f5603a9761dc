//! Payment and staking credentials.
//!
//! A credential names whoever controls an address: either the hash of a
//! public key, or the hash of a script. Both hashes are 32 bytes.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};

use crate::error::AdaError;

/// Length in bytes of every credential hash.
pub const HASH_LEN: usize = 32;

/// Blake2b-256 hash of an Ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyHash(pub [u8; HASH_LEN]);

/// Hash of a script. Carried opaquely; never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptHash(pub [u8; HASH_LEN]);

impl KeyHash {
    /// Hash a verifying key into its credential form.
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        Self(blake2b_256(key.as_bytes()))
    }

    /// Hash raw public key bytes, rejecting bytes that are not a valid
    /// Ed25519 point.
    pub fn from_public_key_bytes(bytes: &[u8; 32]) -> Result<Self, AdaError> {
        let key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| AdaError::InvalidPublicKey(format!("ed25519: {e}")))?;
        Ok(Self::from_public_key(&key))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl ScriptHash {
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

/// Either a key hash or a script hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Credential {
    KeyHash(KeyHash),
    Script(ScriptHash),
}

impl Credential {
    /// Build a credential from 32 hash bytes; `is_script` comes from the
    /// address header.
    pub(crate) fn from_hash(bytes: &[u8], is_script: bool) -> Option<Self> {
        let hash: [u8; HASH_LEN] = bytes.try_into().ok()?;
        Some(if is_script {
            Credential::Script(ScriptHash(hash))
        } else {
            Credential::KeyHash(KeyHash(hash))
        })
    }

    /// The key hash, if this credential is one.
    pub fn to_keyhash(&self) -> Option<&KeyHash> {
        match self {
            Credential::KeyHash(hash) => Some(hash),
            Credential::Script(_) => None,
        }
    }

    pub fn is_script(&self) -> bool {
        matches!(self, Credential::Script(_))
    }

    pub fn hash_bytes(&self) -> &[u8; HASH_LEN] {
        match self {
            Credential::KeyHash(hash) => hash.as_bytes(),
            Credential::Script(hash) => hash.as_bytes(),
        }
    }
}

fn blake2b_256(data: &[u8]) -> [u8; HASH_LEN] {
    let hash = blake2b_simd::Params::new().hash_length(HASH_LEN).hash(data);
    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(hash.as_bytes());
    out
}
