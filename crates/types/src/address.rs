use std::fmt;
use std::str::FromStr;

use crate::hexutil::strip_hex_prefix;
use crate::TxError;

pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
///
/// Parsing accepts an optional `0x`/`0X` prefix. All-lowercase and
/// all-uppercase strings are taken as-is; mixed case must carry a valid
/// EIP-55 checksum.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(alloy_primitives::Address);

impl Address {
    pub const ZERO: Address = Address(alloy_primitives::Address::ZERO);

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != ADDRESS_LEN {
            return None;
        }
        Some(Address(alloy_primitives::Address::from_slice(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0 .0 .0
    }

    /// Mixed-case EIP-55 form, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl FromStr for Address {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = strip_hex_prefix(s);
        if body.len() != ADDRESS_LEN * 2 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TxError::invalid("address"));
        }

        let all_lower = !body.bytes().any(|b| b.is_ascii_uppercase());
        let all_upper = !body.bytes().any(|b| b.is_ascii_lowercase());
        let parsed = if all_lower || all_upper {
            alloy_primitives::Address::from_str(body).ok()
        } else {
            alloy_primitives::Address::parse_checksummed(format!("0x{body}"), None).ok()
        };

        parsed.map(Address).ok_or_else(|| TxError::invalid("address"))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(alloy_primitives::Address::from(bytes))
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(address: alloy_primitives::Address) -> Self {
        Address(address)
    }
}

impl From<Address> for alloy_primitives::Address {
    fn from(address: Address) -> Self {
        address.0
    }
}
