use serde::{Deserialize, Serialize};

/// Reference to a stake registration certificate elsewhere on chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainPointer {
    pub slot: u64,
    pub tx_index: u64,
    pub cert_index: u64,
}

impl ChainPointer {
    pub fn new(slot: u64, tx_index: u64, cert_index: u64) -> Self {
        Self {
            slot,
            tx_index,
            cert_index,
        }
    }

    /// Append the three fields as variable-length naturals.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_natural(self.slot, out);
        write_natural(self.tx_index, out);
        write_natural(self.cert_index, out);
    }

    /// Parse a pointer that must occupy `bytes` exactly.
    pub fn read_exact(bytes: &[u8]) -> Option<Self> {
        let (slot, rest) = read_natural(bytes)?;
        let (tx_index, rest) = read_natural(rest)?;
        let (cert_index, rest) = read_natural(rest)?;
        if !rest.is_empty() {
            return None;
        }
        Some(Self::new(slot, tx_index, cert_index))
    }
}

/// Big-endian base-128; the high bit marks that another group follows.
fn write_natural(value: u64, out: &mut Vec<u8>) {
    let mut groups = [0u8; 10];
    let mut n = 0;
    let mut v = value;
    loop {
        groups[n] = (v & 0x7F) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i > 0 { 0x80 } else { 0 };
        out.push(groups[i] | continuation);
    }
}

fn read_natural(bytes: &[u8]) -> Option<(u64, &[u8])> {
    let mut value: u64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        if value > (u64::MAX >> 7) {
            return None;
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Some((value, &bytes[i + 1..]));
        }
    }
    None
}
