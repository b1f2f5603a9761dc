use serde::{Deserialize, Serialize};

use crate::error::AdaError;

/// Human-readable part for mainnet payment addresses.
pub const MAINNET_ADDR_HRP: &str = "addr";

/// Human-readable part for testnet payment addresses.
pub const TESTNET_ADDR_HRP: &str = "addr_test";

/// Human-readable part for mainnet reward (stake) addresses.
pub const MAINNET_STAKE_HRP: &str = "stake";

/// Human-readable part for testnet reward (stake) addresses.
pub const TESTNET_STAKE_HRP: &str = "stake_test";

/// Network a Shelley-era address is bound to.
///
/// The id lives in the low nibble of the address header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkId {
    Testnet,
    Mainnet,
}

impl NetworkId {
    /// Header nibble value for this network.
    pub fn header_bits(self) -> u8 {
        match self {
            NetworkId::Testnet => 0,
            NetworkId::Mainnet => 1,
        }
    }

    /// Map a header nibble back to a network.
    pub fn from_header_bits(bits: u8) -> Result<Self, AdaError> {
        match bits & 0x0F {
            0 => Ok(NetworkId::Testnet),
            1 => Ok(NetworkId::Mainnet),
            other => Err(AdaError::InvalidNetwork(format!(
                "unsupported network id {other}"
            ))),
        }
    }

    /// Bech32 prefix for base, pointer and enterprise addresses.
    pub fn address_hrp(self) -> &'static str {
        match self {
            NetworkId::Mainnet => MAINNET_ADDR_HRP,
            NetworkId::Testnet => TESTNET_ADDR_HRP,
        }
    }

    /// Bech32 prefix for reward addresses.
    pub fn stake_hrp(self) -> &'static str {
        match self {
            NetworkId::Mainnet => MAINNET_STAKE_HRP,
            NetworkId::Testnet => TESTNET_STAKE_HRP,
        }
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkId::Mainnet => write!(f, "mainnet"),
            NetworkId::Testnet => write!(f, "testnet"),
        }
    }
}
