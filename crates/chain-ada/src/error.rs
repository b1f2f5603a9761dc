use thiserror::Error;

/// Failure to turn raw address bytes or text into an address variant.
///
/// A missing key-hash pair is not represented here: that is a normal
/// `None` from [`crate::key_hash::extract_key_hashes`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown address format")]
    UnknownFormat,

    #[error("invalid address encoding: {0}")]
    InvalidEncoding(String),

    /// The bytes decode, but the text carried the wrong prefix (or base58
    /// where bech32 belongs, and vice versa).
    #[error("address prefix {found} does not match a {expected} address")]
    PrefixMismatch { expected: String, found: String },
}

/// Cardano address construction errors.
#[derive(Debug, Error)]
pub enum AdaError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_format() {
        assert_eq!(DecodeError::UnknownFormat.to_string(), "unknown address format");
    }

    #[test]
    fn display_invalid_encoding() {
        let err = DecodeError::InvalidEncoding("bad checksum".into());
        assert_eq!(err.to_string(), "invalid address encoding: bad checksum");
    }

    #[test]
    fn display_prefix_mismatch() {
        let err = DecodeError::PrefixMismatch {
            expected: "addr".into(),
            found: "stake".into(),
        };
        assert_eq!(err.to_string(), "address prefix stake does not match a addr address");
    }

    #[test]
    fn display_invalid_public_key() {
        let err = AdaError::InvalidPublicKey("not on curve".into());
        assert_eq!(err.to_string(), "invalid public key: not on curve");
    }

    #[test]
    fn display_invalid_network() {
        let err = AdaError::InvalidNetwork("id 9".into());
        assert_eq!(err.to_string(), "invalid network: id 9");
    }

    #[test]
    fn decode_error_is_cloneable() {
        let err = DecodeError::InvalidEncoding("x".into());
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(AdaError::EncodingError("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
