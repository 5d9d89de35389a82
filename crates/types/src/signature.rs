use std::fmt;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::hexutil::{decode_hex, to_hex, to_minimal_bytes, trim_leading_zeros};
use crate::TxError;

/// `v` of the placeholder signature carried by unsigned transactions.
pub const EMPTY_SIGNATURE_V: u8 = 0x01;

/// One `(v, r, s)` signature share.
///
/// Each component is kept as minimal big-endian bytes; zero is the empty
/// string. Equality is structural.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SignatureData {
    v: Vec<u8>,
    r: Vec<u8>,
    s: Vec<u8>,
}

impl SignatureData {
    pub fn new(v: impl AsRef<[u8]>, r: impl AsRef<[u8]>, s: impl AsRef<[u8]>) -> Self {
        Self {
            v: trim_leading_zeros(v.as_ref()).to_vec(),
            r: trim_leading_zeros(r.as_ref()).to_vec(),
            s: trim_leading_zeros(s.as_ref()).to_vec(),
        }
    }

    pub fn from_hex(v: &str, r: &str, s: &str) -> Result<Self, TxError> {
        let parse = |c: &str| decode_hex(c).ok_or_else(|| TxError::invalid("signature"));
        Ok(Self::new(parse(v)?, parse(r)?, parse(s)?))
    }

    /// Builds a chain-bound signature: `v = 2 * chain_id + 35 + recovery_id`.
    pub fn from_recoverable(r: &[u8], s: &[u8], recovery_id: u8, chain_id: &BigUint) -> Self {
        let v = chain_id * 2u32 + 35u32 + u32::from(recovery_id);
        Self::new(to_minimal_bytes(&v), r, s)
    }

    /// The placeholder occupying the signature slot of an unsigned transaction.
    pub fn empty() -> Self {
        Self {
            v: vec![EMPTY_SIGNATURE_V],
            r: Vec::new(),
            s: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.v == [EMPTY_SIGNATURE_V] && self.r.is_empty() && self.s.is_empty()
    }

    pub fn v(&self) -> &[u8] {
        &self.v
    }

    pub fn r(&self) -> &[u8] {
        &self.r
    }

    pub fn s(&self) -> &[u8] {
        &self.s
    }

    pub fn v_hex(&self) -> String {
        to_hex(&self.v)
    }

    pub fn r_hex(&self) -> String {
        to_hex(&self.r)
    }

    pub fn s_hex(&self) -> String {
        to_hex(&self.s)
    }

    fn v_value(&self) -> BigUint {
        BigUint::from_bytes_be(&self.v)
    }

    /// Recovery id (y parity) encoded in `v`.
    ///
    /// Accepts raw parity (`0`/`1`), the pre-replay-protection form
    /// (`27`/`28`) and the chain-bound form (`>= 35`).
    pub fn recovery_id(&self) -> Option<u8> {
        let v = self.v_value();
        match v.to_u64() {
            Some(p @ (0 | 1)) => Some(p as u8),
            Some(27) => Some(0),
            Some(28) => Some(1),
            Some(x) if x < 35 => None,
            _ => {
                let parity = (v - 35u32) % 2u32;
                Some(if parity == BigUint::from(0u32) { 0 } else { 1 })
            }
        }
    }

    /// Chain id bound into a `v >= 35` signature.
    pub fn chain_id(&self) -> Option<BigUint> {
        let v = self.v_value();
        if v < BigUint::from(35u32) {
            return None;
        }
        let parity = self.recovery_id()?;
        Some((v - 35u32 - u32::from(parity)) >> 1)
    }
}

impl fmt::Debug for SignatureData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureData")
            .field("v", &self.v_hex())
            .field("r", &self.r_hex())
            .field("s", &self.s_hex())
            .finish()
    }
}

/// The signature list of a transaction.
///
/// `Unsigned` stands in for the single placeholder entry the wire format
/// requires; `Signed` is never empty and never holds the placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Signatures {
    #[default]
    Unsigned,
    Signed(Vec<SignatureData>),
}

impl Signatures {
    /// Interpret a decoded wire list. Placeholder entries are dropped.
    pub fn from_wire(list: Vec<SignatureData>) -> Self {
        let real: Vec<_> = list.into_iter().filter(|s| !s.is_empty()).collect();
        if real.is_empty() {
            Signatures::Unsigned
        } else {
            Signatures::Signed(real)
        }
    }

    /// Like [`Signatures::from_wire`] but also removes duplicates, keeping
    /// the first occurrence.
    pub fn refined(list: Vec<SignatureData>) -> Self {
        let mut out: Vec<SignatureData> = Vec::with_capacity(list.len());
        for sig in list {
            if !sig.is_empty() && !out.contains(&sig) {
                out.push(sig);
            }
        }
        Self::from_wire(out)
    }

    /// Replace the placeholder, or append after the existing entries.
    /// Relative order of both the existing and the incoming entries is kept.
    pub fn append(&mut self, incoming: impl IntoIterator<Item = SignatureData>) {
        let incoming = incoming.into_iter().filter(|s| !s.is_empty());
        match self {
            Signatures::Signed(list) => list.extend(incoming),
            Signatures::Unsigned => {
                let list: Vec<_> = incoming.collect();
                if !list.is_empty() {
                    *self = Signatures::Signed(list);
                }
            }
        }
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, Signatures::Unsigned)
    }

    /// Real signatures only; empty when unsigned.
    pub fn as_slice(&self) -> &[SignatureData] {
        match self {
            Signatures::Unsigned => &[],
            Signatures::Signed(list) => list,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Entries as they appear on the wire: `[empty]` when unsigned.
    pub fn to_wire(&self) -> Vec<SignatureData> {
        match self {
            Signatures::Unsigned => vec![SignatureData::empty()],
            Signatures::Signed(list) => list.clone(),
        }
    }
}
