//! Address bytes, their string forms, and decoding into typed variants.
//!
//! Shelley header byte layout: high nibble is the address type, low nibble
//! the network id.
//!
//! | type      | variant    |
//! |-----------|------------|
//! | 0x0..0x3  | Base       |
//! | 0x4, 0x5  | Pointer    |
//! | 0x6, 0x7  | Enterprise |
//! | 0xE, 0xF  | Reward     |
//!
//! Within the type nibble, bit 0 flags a script payment credential
//! (staking credential for Reward) and bit 1 a script staking credential
//! on Base.

use bech32::{Bech32, Hrp};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::byron::ByronAddress;
use crate::credential::{Credential, KeyHash, HASH_LEN};
use crate::error::{AdaError, DecodeError};
use crate::network::NetworkId;
use crate::pointer::ChainPointer;

const PAYMENT_SCRIPT_FLAG: u8 = 0x1;
const STAKING_SCRIPT_FLAG: u8 = 0x2;

const TYPE_POINTER: u8 = 0x4;
const TYPE_ENTERPRISE: u8 = 0x6;
const TYPE_REWARD: u8 = 0xE;

/// Raw address bytes plus the text the address arrived as, if any.
///
/// Two addresses are equal when their bytes are equal; the text form is
/// presentation only.
#[derive(Debug, Clone)]
pub struct Address {
    bytes: Vec<u8>,
    text: Option<String>,
    form: TextForm,
}

/// How the bytes of an [`Address`] were obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TextForm {
    /// Bytes handed over directly.
    Raw,
    /// bech32 data part; holds the lowercased prefix.
    Bech32(String),
    Base58,
    /// Text kept verbatim; the bytes are its UTF-8, not address bytes.
    Opaque,
}

impl Address {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            text: None,
            form: TextForm::Raw,
        }
    }

    /// Parse a bech32 (Shelley) or base58 (legacy) address string.
    ///
    /// Only the text encoding is checked here; use [`decode`] to learn
    /// whether the bytes are a known address format.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let (bytes, form) = match bech32::decode(text) {
            Ok((hrp, data)) => (data, TextForm::Bech32(hrp.as_str().to_ascii_lowercase())),
            Err(bech_err) => {
                let data = bs58::decode(text).into_vec().map_err(|b58_err| {
                    DecodeError::InvalidEncoding(format!(
                        "not bech32 ({bech_err}) nor base58 ({b58_err})"
                    ))
                })?;
                (data, TextForm::Base58)
            }
        };
        if bytes.is_empty() {
            return Err(DecodeError::InvalidEncoding("empty address".into()));
        }
        Ok(Self {
            bytes,
            text: Some(text.to_owned()),
            form,
        })
    }

    /// Keep text that is neither bech32 nor base58, identified by its
    /// UTF-8 bytes. [`decode`] rejects such an address as
    /// [`DecodeError::UnknownFormat`] whatever those bytes look like.
    pub fn unparsed(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            text: Some(text.to_owned()),
            form: TextForm::Opaque,
        }
    }

    /// True for addresses built with [`Address::unparsed`].
    pub fn is_unparsed(&self) -> bool {
        self.form == TextForm::Opaque
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The string form the address was parsed from or encoded to.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Address {}

impl std::hash::Hash for Address {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => f.write_str(&self.to_hex()),
        }
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Discriminant of [`AddressVariant`], in decode priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    Legacy,
    Base,
    Pointer,
    Enterprise,
    Reward,
}

/// A decoded address. Exactly one variant matches any valid address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressVariant {
    Legacy(ByronAddress),
    Base {
        network: NetworkId,
        payment: Credential,
        staking: Credential,
    },
    Pointer {
        network: NetworkId,
        payment: Credential,
        pointer: ChainPointer,
    },
    Enterprise {
        network: NetworkId,
        payment: Credential,
    },
    Reward {
        network: NetworkId,
        staking: Credential,
    },
}

impl AddressVariant {
    pub fn kind(&self) -> AddressKind {
        match self {
            AddressVariant::Legacy(_) => AddressKind::Legacy,
            AddressVariant::Base { .. } => AddressKind::Base,
            AddressVariant::Pointer { .. } => AddressKind::Pointer,
            AddressVariant::Enterprise { .. } => AddressKind::Enterprise,
            AddressVariant::Reward { .. } => AddressKind::Reward,
        }
    }

    /// Network id from the header; legacy addresses have none.
    pub fn network_id(&self) -> Option<NetworkId> {
        match self {
            AddressVariant::Legacy(_) => None,
            AddressVariant::Base { network, .. }
            | AddressVariant::Pointer { network, .. }
            | AddressVariant::Enterprise { network, .. }
            | AddressVariant::Reward { network, .. } => Some(*network),
        }
    }

    pub fn payment_credential(&self) -> Option<&Credential> {
        match self {
            AddressVariant::Base { payment, .. }
            | AddressVariant::Pointer { payment, .. }
            | AddressVariant::Enterprise { payment, .. } => Some(payment),
            AddressVariant::Legacy(_) | AddressVariant::Reward { .. } => None,
        }
    }

    /// Inline staking credential. Pointer addresses reference theirs
    /// indirectly and report `None`.
    pub fn staking_credential(&self) -> Option<&Credential> {
        match self {
            AddressVariant::Base { staking, .. } | AddressVariant::Reward { staking, .. } => {
                Some(staking)
            }
            _ => None,
        }
    }

    /// Base address whose payment and staking credentials are the hashes
    /// of two Ed25519 keys.
    pub fn base_from_keys(
        network: NetworkId,
        payment_key: &VerifyingKey,
        staking_key: &VerifyingKey,
    ) -> Self {
        AddressVariant::Base {
            network,
            payment: Credential::KeyHash(KeyHash::from_public_key(payment_key)),
            staking: Credential::KeyHash(KeyHash::from_public_key(staking_key)),
        }
    }

    pub fn enterprise_from_key(network: NetworkId, payment_key: &VerifyingKey) -> Self {
        AddressVariant::Enterprise {
            network,
            payment: Credential::KeyHash(KeyHash::from_public_key(payment_key)),
        }
    }

    pub fn reward_from_key(network: NetworkId, staking_key: &VerifyingKey) -> Self {
        AddressVariant::Reward {
            network,
            staking: Credential::KeyHash(KeyHash::from_public_key(staking_key)),
        }
    }

    /// Serialize back to raw address bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (address_type, network) = match self {
            AddressVariant::Legacy(byron) => return byron.to_bytes(),
            AddressVariant::Base {
                network,
                payment,
                staking,
            } => {
                let mut t = script_bit(payment);
                if staking.is_script() {
                    t |= STAKING_SCRIPT_FLAG;
                }
                (t, network)
            }
            AddressVariant::Pointer {
                network, payment, ..
            } => (TYPE_POINTER | script_bit(payment), network),
            AddressVariant::Enterprise { network, payment } => {
                (TYPE_ENTERPRISE | script_bit(payment), network)
            }
            AddressVariant::Reward { network, staking } => {
                (TYPE_REWARD | script_bit(staking), network)
            }
        };

        let mut out = Vec::with_capacity(1 + 2 * HASH_LEN);
        out.push((address_type << 4) | network.header_bits());
        match self {
            AddressVariant::Base {
                payment, staking, ..
            } => {
                out.extend_from_slice(payment.hash_bytes());
                out.extend_from_slice(staking.hash_bytes());
            }
            AddressVariant::Pointer {
                payment, pointer, ..
            } => {
                out.extend_from_slice(payment.hash_bytes());
                pointer.write_to(&mut out);
            }
            AddressVariant::Enterprise { payment, .. } => {
                out.extend_from_slice(payment.hash_bytes());
            }
            AddressVariant::Reward { staking, .. } => {
                out.extend_from_slice(staking.hash_bytes());
            }
            AddressVariant::Legacy(_) => {}
        }
        out
    }

    /// Encode as an [`Address`] carrying its canonical string form:
    /// base58 for legacy, bech32 otherwise.
    pub fn to_address(&self) -> Result<Address, AdaError> {
        let bytes = self.to_bytes();
        let (text, form) = match self.bech32_hrp() {
            None => (bs58::encode(&bytes).into_string(), TextForm::Base58),
            Some(hrp) => (bech32_encode(hrp, &bytes)?, TextForm::Bech32(hrp.to_owned())),
        };
        Ok(Address {
            bytes,
            text: Some(text),
            form,
        })
    }

    /// The bech32 prefix this variant is written with; `None` for legacy,
    /// which is base58.
    pub fn bech32_hrp(&self) -> Option<&'static str> {
        match self {
            AddressVariant::Legacy(_) => None,
            AddressVariant::Reward { network, .. } => Some(network.stake_hrp()),
            AddressVariant::Base { network, .. }
            | AddressVariant::Pointer { network, .. }
            | AddressVariant::Enterprise { network, .. } => Some(network.address_hrp()),
        }
    }
}

fn script_bit(cred: &Credential) -> u8 {
    if cred.is_script() {
        PAYMENT_SCRIPT_FLAG
    } else {
        0
    }
}

fn bech32_encode(hrp: &str, bytes: &[u8]) -> Result<String, AdaError> {
    let hrp = Hrp::parse(hrp).map_err(|e| AdaError::EncodingError(format!("hrp: {e}")))?;
    bech32::encode::<Bech32>(hrp, bytes)
        .map_err(|e| AdaError::EncodingError(format!("bech32: {e}")))
}

type Parser = fn(&[u8]) -> Option<AddressVariant>;

/// Parsers in the order they are tried. Legacy must come first: its
/// envelope byte overlaps the Shelley header space.
const PARSERS: [(AddressKind, Parser); 5] = [
    (AddressKind::Legacy, parse_legacy),
    (AddressKind::Base, parse_base),
    (AddressKind::Pointer, parse_pointer),
    (AddressKind::Enterprise, parse_enterprise),
    (AddressKind::Reward, parse_reward),
];

/// Decode an address into its variant.
///
/// The first parser that accepts the whole input wins. Bytes no parser
/// accepts, and [`Address::unparsed`] text, are
/// [`DecodeError::UnknownFormat`]. An address parsed from text must also
/// carry the string form its variant is written with.
pub fn decode(raw: &Address) -> Result<AddressVariant, DecodeError> {
    if raw.is_unparsed() {
        return Err(DecodeError::UnknownFormat);
    }
    let variant = decode_bytes(raw.as_bytes())?;
    check_text_form(&raw.form, &variant)?;
    Ok(variant)
}

fn check_text_form(form: &TextForm, variant: &AddressVariant) -> Result<(), DecodeError> {
    let expected = variant.bech32_hrp();
    let found = match form {
        TextForm::Raw | TextForm::Opaque => return Ok(()),
        TextForm::Bech32(hrp) if expected == Some(hrp.as_str()) => return Ok(()),
        TextForm::Base58 if expected.is_none() => return Ok(()),
        TextForm::Bech32(hrp) => hrp.as_str(),
        TextForm::Base58 => "base58",
    };
    tracing::debug!(kind = ?variant.kind(), found, "address text form does not match its bytes");
    Err(DecodeError::PrefixMismatch {
        expected: expected.unwrap_or("base58").to_owned(),
        found: found.to_owned(),
    })
}

/// [`decode`] over a bare byte slice.
pub fn decode_bytes(bytes: &[u8]) -> Result<AddressVariant, DecodeError> {
    for (kind, parser) in PARSERS {
        if let Some(variant) = parser(bytes) {
            tracing::debug!(?kind, len = bytes.len(), "decoded address");
            return Ok(variant);
        }
    }
    tracing::debug!(len = bytes.len(), "address matched no known format");
    Err(DecodeError::UnknownFormat)
}

/// Parse a string form and decode it in one step.
pub fn decode_str(text: &str) -> Result<AddressVariant, DecodeError> {
    decode(&Address::parse(text)?)
}

fn split_header(bytes: &[u8]) -> Option<(u8, NetworkId, &[u8])> {
    let (&header, rest) = bytes.split_first()?;
    let network = NetworkId::from_header_bits(header).ok()?;
    Some((header >> 4, network, rest))
}

fn parse_legacy(bytes: &[u8]) -> Option<AddressVariant> {
    ByronAddress::parse(bytes).map(AddressVariant::Legacy)
}

fn parse_base(bytes: &[u8]) -> Option<AddressVariant> {
    let (address_type, network, rest) = split_header(bytes)?;
    if address_type > 0x3 || rest.len() != 2 * HASH_LEN {
        return None;
    }
    let payment = Credential::from_hash(&rest[..HASH_LEN], address_type & PAYMENT_SCRIPT_FLAG != 0)?;
    let staking = Credential::from_hash(&rest[HASH_LEN..], address_type & STAKING_SCRIPT_FLAG != 0)?;
    Some(AddressVariant::Base {
        network,
        payment,
        staking,
    })
}

fn parse_pointer(bytes: &[u8]) -> Option<AddressVariant> {
    let (address_type, network, rest) = split_header(bytes)?;
    if address_type & !PAYMENT_SCRIPT_FLAG != TYPE_POINTER || rest.len() <= HASH_LEN {
        return None;
    }
    let payment = Credential::from_hash(&rest[..HASH_LEN], address_type & PAYMENT_SCRIPT_FLAG != 0)?;
    let pointer = ChainPointer::read_exact(&rest[HASH_LEN..])?;
    Some(AddressVariant::Pointer {
        network,
        payment,
        pointer,
    })
}

fn parse_enterprise(bytes: &[u8]) -> Option<AddressVariant> {
    let (address_type, network, rest) = split_header(bytes)?;
    if address_type & !PAYMENT_SCRIPT_FLAG != TYPE_ENTERPRISE {
        return None;
    }
    let payment = Credential::from_hash(rest, address_type & PAYMENT_SCRIPT_FLAG != 0)?;
    Some(AddressVariant::Enterprise { network, payment })
}

fn parse_reward(bytes: &[u8]) -> Option<AddressVariant> {
    let (address_type, network, rest) = split_header(bytes)?;
    if address_type & !PAYMENT_SCRIPT_FLAG != TYPE_REWARD {
        return None;
    }
    let staking = Credential::from_hash(rest, address_type & PAYMENT_SCRIPT_FLAG != 0)?;
    Some(AddressVariant::Reward { network, staking })
}
