//! Legacy (Byron-era) address envelope.
//!
//! On the wire a legacy address is the CBOR value
//! `[ #6.24(bytes payload), uint crc32(payload) ]`. The payload itself
//! (address root, attributes, type) is carried opaquely. The leading
//! array byte `0x82` collides with the Shelley header space, so this
//! parser always runs before the Shelley ones.

const CBOR_ARRAY_2: u8 = 0x82;
const CBOR_TAG_24: [u8; 2] = [0xD8, 0x18];
const MAJOR_UINT: u8 = 0x00;
const MAJOR_BYTES: u8 = 0x40;

/// A decoded legacy address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByronAddress {
    payload: Vec<u8>,
    crc: u32,
}

impl ByronAddress {
    /// Wrap a payload in the CBOR envelope, computing its checksum.
    pub fn new(payload: Vec<u8>) -> Self {
        let crc = crc32(&payload);
        Self { payload, crc }
    }

    /// Parse the envelope; the whole input must be consumed and the
    /// checksum must match.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let rest = bytes.strip_prefix(&[CBOR_ARRAY_2])?;
        let rest = rest.strip_prefix(&CBOR_TAG_24)?;
        let (len, rest) = read_head(rest, MAJOR_BYTES)?;
        let len = usize::try_from(len).ok()?;
        if len == 0 || rest.len() < len {
            return None;
        }
        let (payload, rest) = rest.split_at(len);
        let (crc, rest) = read_head(rest, MAJOR_UINT)?;
        if !rest.is_empty() {
            return None;
        }
        let crc = u32::try_from(crc).ok()?;
        if crc != crc32(payload) {
            return None;
        }
        Some(Self {
            payload: payload.to_vec(),
            crc,
        })
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload.len() + 12);
        out.push(CBOR_ARRAY_2);
        out.extend_from_slice(&CBOR_TAG_24);
        write_head(MAJOR_BYTES, self.payload.len() as u64, &mut out);
        out.extend_from_slice(&self.payload);
        write_head(MAJOR_UINT, u64::from(self.crc), &mut out);
        out
    }
}

/// Read a CBOR item head of the given major type, returning its argument.
fn read_head(bytes: &[u8], major: u8) -> Option<(u64, &[u8])> {
    let (&first, rest) = bytes.split_first()?;
    if first & 0xE0 != major {
        return None;
    }
    let width = match first & 0x1F {
        n @ 0..=23 => return Some((u64::from(n), rest)),
        24 => 1,
        25 => 2,
        26 => 4,
        27 => 8,
        _ => return None,
    };
    if rest.len() < width {
        return None;
    }
    let (arg, rest) = rest.split_at(width);
    let value = arg.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Some((value, rest))
}

fn write_head(major: u8, value: u64, out: &mut Vec<u8>) {
    match value {
        0..=23 => out.push(major | value as u8),
        24..=0xFF => {
            out.push(major | 24);
            out.push(value as u8);
        }
        0x100..=0xFFFF => {
            out.push(major | 25);
            out.extend_from_slice(&(value as u16).to_be_bytes());
        }
        0x1_0000..=0xFFFF_FFFF => {
            out.push(major | 26);
            out.extend_from_slice(&(value as u32).to_be_bytes());
        }
        _ => {
            out.push(major | 27);
            out.extend_from_slice(&value.to_be_bytes());
        }
    }
}

/// CRC-32 (IEEE 802.3, reflected, polynomial 0xEDB88320).
fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        // [root (28 bytes), {}, 0]
        let mut p = vec![0x83, 0x58, 0x1C];
        p.extend_from_slice(&[0xAB; 28]);
        p.extend_from_slice(&[0xA0, 0x00]);
        p
    }

    #[test]
    fn crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn envelope_roundtrip() {
        let addr = ByronAddress::new(sample_payload());
        let bytes = addr.to_bytes();
        assert_eq!(bytes[0], 0x82);
        assert_eq!(&bytes[1..3], &[0xD8, 0x18]);
        assert_eq!(ByronAddress::parse(&bytes), Some(addr));
    }

    #[test]
    fn bad_checksum_rejected() {
        let mut bytes = ByronAddress::new(sample_payload()).to_bytes();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert_eq!(ByronAddress::parse(&bytes), None);
    }

    #[test]
    fn corrupted_payload_rejected() {
        let mut bytes = ByronAddress::new(sample_payload()).to_bytes();
        bytes[10] ^= 0xFF;
        assert_eq!(ByronAddress::parse(&bytes), None);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = ByronAddress::new(sample_payload()).to_bytes();
        bytes.push(0);
        assert_eq!(ByronAddress::parse(&bytes), None);
    }

    #[test]
    fn truncated_input_rejected() {
        let bytes = ByronAddress::new(sample_payload()).to_bytes();
        assert_eq!(ByronAddress::parse(&bytes[..bytes.len() / 2]), None);
        assert_eq!(ByronAddress::parse(&[]), None);
        assert_eq!(ByronAddress::parse(&[0x82]), None);
    }

    #[test]
    fn shelley_like_header_with_0x82_rejected() {
        // A Byron-shaped first byte followed by 64 bytes of credential data.
        let mut bytes = vec![0x82];
        bytes.extend_from_slice(&[0x11; 64]);
        assert_eq!(ByronAddress::parse(&bytes), None);
    }

    #[test]
    fn long_payload_uses_two_byte_length() {
        let addr = ByronAddress::new(vec![0x55; 300]);
        let bytes = addr.to_bytes();
        assert_eq!(bytes[3], 0x59);
        assert_eq!(ByronAddress::parse(&bytes).unwrap().payload().len(), 300);
    }
}
