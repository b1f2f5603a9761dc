use chain_ada::{AdaError, DecodeError};
use thiserror::Error;

#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum WalletError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown address format: {0}")]
    UnknownAddressFormat(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WalletError {
    pub(crate) fn decode(address: &str, e: DecodeError) -> Self {
        match e {
            DecodeError::UnknownFormat => WalletError::UnknownAddressFormat(address.to_owned()),
            DecodeError::InvalidEncoding(_) | DecodeError::PrefixMismatch { .. } => {
                WalletError::InvalidAddress(format!("{address}: {e}"))
            }
        }
    }
}

impl From<DecodeError> for WalletError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::UnknownFormat => {
                WalletError::UnknownAddressFormat(DecodeError::UnknownFormat.to_string())
            }
            DecodeError::InvalidEncoding(msg) => WalletError::InvalidAddress(msg),
            mismatch @ DecodeError::PrefixMismatch { .. } => {
                WalletError::InvalidAddress(mismatch.to_string())
            }
        }
    }
}

impl From<AdaError> for WalletError {
    fn from(e: AdaError) -> Self {
        WalletError::Internal(format!("ADA: {e}"))
    }
}
