//! Key bundles: the keys an account signs with, grouped by role.

use klay_types::hexutil::strip_hex_prefix;
use klay_types::{Address, BigUint, SignatureData};

use crate::{CryptoError, PrivateKey};

/// Number of role groups an account key can carry.
pub const ROLE_GROUP_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Transaction = 0,
    AccountUpdate = 1,
    FeePayer = 2,
}

impl Role {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, CryptoError> {
        match index {
            0 => Ok(Role::Transaction),
            1 => Ok(Role::AccountUpdate),
            2 => Ok(Role::FeePayer),
            other => Err(CryptoError::InvalidRole(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySet {
    Single(PrivateKey),
    Multiple(Vec<PrivateKey>),
    /// Always exactly [`ROLE_GROUP_COUNT`] groups; missing ones are empty.
    RoleBased(Vec<Vec<PrivateKey>>),
}

/// An account address together with the keys that sign for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keyring {
    address: Address,
    keys: KeySet,
}

impl Keyring {
    /// Coupled single-key keyring: the address is derived from the key.
    pub fn from_private_key(key: PrivateKey) -> Self {
        Self {
            address: key.derived_address(),
            keys: KeySet::Single(key),
        }
    }

    pub fn single(address: Address, key: PrivateKey) -> Self {
        Self {
            address,
            keys: KeySet::Single(key),
        }
    }

    pub fn multiple(address: Address, keys: Vec<PrivateKey>) -> Self {
        Self {
            address,
            keys: KeySet::Multiple(keys),
        }
    }

    /// Up to [`ROLE_GROUP_COUNT`] groups in role order.
    pub fn role_based(
        address: Address,
        mut groups: Vec<Vec<PrivateKey>>,
    ) -> Result<Self, CryptoError> {
        if groups.len() > ROLE_GROUP_COUNT {
            return Err(CryptoError::TooManyRoleGroups(groups.len()));
        }
        groups.resize_with(ROLE_GROUP_COUNT, Vec::new);
        Ok(Self {
            address,
            keys: KeySet::RoleBased(groups),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }

    /// Keys for `role`.
    ///
    /// Single and multiple bundles answer every valid role with their keys.
    /// A role-based bundle falls back to the transaction group when the
    /// requested group is empty.
    pub fn keys_by_role(&self, role: usize) -> Result<&[PrivateKey], CryptoError> {
        let role = Role::from_index(role)?;
        let keys: &[PrivateKey] = match &self.keys {
            KeySet::Single(key) => std::slice::from_ref(key),
            KeySet::Multiple(keys) => keys,
            KeySet::RoleBased(groups) => {
                let group = &groups[role.index()];
                if group.is_empty() {
                    &groups[Role::Transaction.index()]
                } else {
                    group
                }
            }
        };
        if keys.is_empty() {
            return Err(CryptoError::EmptyRole);
        }
        Ok(keys)
    }

    /// True when the address is not the one derived from the key.
    /// Multi-key bundles are always decoupled.
    pub fn is_decoupled(&self) -> bool {
        match &self.keys {
            KeySet::Single(key) => key.derived_address() != self.address,
            KeySet::Multiple(_) | KeySet::RoleBased(_) => true,
        }
    }

    /// Signs `digest` with the keys of `role`: all of them in order, or only
    /// the one at `index`.
    pub fn sign_digest(
        &self,
        digest: &[u8; 32],
        chain_id: &BigUint,
        role: usize,
        index: Option<usize>,
    ) -> Result<Vec<SignatureData>, CryptoError> {
        let keys = self.keys_by_role(role)?;
        match index {
            Some(index) => {
                let key = keys.get(index).ok_or(CryptoError::IndexOutOfRange {
                    index,
                    len: keys.len(),
                })?;
                Ok(vec![key.sign(digest, chain_id)?])
            }
            None => keys.iter().map(|k| k.sign(digest, chain_id)).collect(),
        }
    }

    /// `0x{key}0x00{address}` export of a single-key bundle.
    pub fn to_wallet_key(&self) -> Result<String, CryptoError> {
        match &self.keys {
            KeySet::Single(key) => Ok(format!("{}0x00{}", key.to_hex(), self.address)),
            KeySet::Multiple(_) | KeySet::RoleBased(_) => Err(CryptoError::InvalidWalletKey),
        }
    }

    /// Parses `0x{key}0x00{address}`. The address may differ from the
    /// key-derived one, giving a decoupled keyring.
    pub fn from_wallet_key(wallet_key: &str) -> Result<Self, CryptoError> {
        let body = strip_hex_prefix(wallet_key);
        if body.len() != 110 {
            return Err(CryptoError::InvalidWalletKey);
        }
        let parts: Vec<&str> = body.split("0x").collect();
        let [key, kind, address] = parts.as_slice() else {
            return Err(CryptoError::InvalidWalletKey);
        };
        if *kind != "00" {
            return Err(CryptoError::InvalidWalletKey);
        }
        let address: Address = address.parse().map_err(|_| CryptoError::InvalidWalletKey)?;
        let key = PrivateKey::from_hex(key).map_err(|_| CryptoError::InvalidWalletKey)?;
        Ok(Self::single(address, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8";

    fn test_key() -> PrivateKey {
        PrivateKey::from_hex(TEST_KEY).unwrap()
    }

    fn other_address() -> Address {
        "0x7b65b75d204abed71587c9e519a89277766ee1d0".parse().unwrap()
    }

    #[test]
    fn coupled_and_decoupled() {
        assert!(!Keyring::from_private_key(test_key()).is_decoupled());
        assert!(Keyring::single(other_address(), test_key()).is_decoupled());
        assert!(Keyring::multiple(test_key().derived_address(), vec![test_key()]).is_decoupled());
    }

    #[test]
    fn single_and_multiple_answer_every_role() {
        let single = Keyring::from_private_key(test_key());
        for role in 0..ROLE_GROUP_COUNT {
            assert_eq!(single.keys_by_role(role).unwrap().len(), 1);
        }

        let keys = vec![PrivateKey::generate(), PrivateKey::generate()];
        let multi = Keyring::multiple(other_address(), keys.clone());
        assert_eq!(multi.keys_by_role(Role::FeePayer.index()).unwrap(), &keys[..]);

        assert_eq!(single.keys_by_role(3), Err(CryptoError::InvalidRole(3)));
    }

    #[test]
    fn role_based_falls_back_to_transaction_group() {
        let tx_keys = vec![PrivateKey::generate(), PrivateKey::generate()];
        let update_keys = vec![PrivateKey::generate()];
        let groups = vec![tx_keys.clone(), update_keys.clone()];
        let ring = Keyring::role_based(other_address(), groups).unwrap();

        assert_eq!(ring.keys_by_role(0).unwrap(), &tx_keys[..]);
        assert_eq!(ring.keys_by_role(1).unwrap(), &update_keys[..]);
        assert_eq!(ring.keys_by_role(2).unwrap(), &tx_keys[..]);
        assert_eq!(ring.keys_by_role(5), Err(CryptoError::InvalidRole(5)));
    }

    #[test]
    fn role_based_empty_groups() {
        let groups = vec![vec![], vec![], vec![PrivateKey::generate()]];
        let ring = Keyring::role_based(other_address(), groups).unwrap();
        assert_eq!(ring.keys_by_role(1), Err(CryptoError::EmptyRole));
        assert_eq!(ring.keys_by_role(2).unwrap().len(), 1);

        let too_many = vec![vec![]; 4];
        assert_eq!(
            Keyring::role_based(other_address(), too_many),
            Err(CryptoError::TooManyRoleGroups(4))
        );
    }

    #[test]
    fn sign_digest_by_index() {
        let keys = vec![PrivateKey::generate(), PrivateKey::generate(), PrivateKey::generate()];
        let ring = Keyring::multiple(other_address(), keys);
        let chain_id = BigUint::from(1u32);

        let all = ring.sign_digest(&[7u8; 32], &chain_id, 0, None).unwrap();
        assert_eq!(all.len(), 3);

        let one = ring.sign_digest(&[7u8; 32], &chain_id, 0, Some(1)).unwrap();
        assert_eq!(one, vec![all[1].clone()]);

        let err = ring.sign_digest(&[7u8; 32], &chain_id, 0, Some(3)).unwrap_err();
        assert_eq!(err, CryptoError::IndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn wallet_key_round_trip() {
        let ring = Keyring::from_private_key(test_key());
        let exported = ring.to_wallet_key().unwrap();
        assert_eq!(
            exported,
            "0x45a915e4d060149eb4365960e6a7a45f334393093061116b197e3240065ff2d8\
             0x000xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"
        );
        assert_eq!(Keyring::from_wallet_key(&exported).unwrap(), ring);

        let decoupled = Keyring::single(other_address(), test_key());
        let back = Keyring::from_wallet_key(&decoupled.to_wallet_key().unwrap()).unwrap();
        assert!(back.is_decoupled());
        assert_eq!(back.address(), &other_address());
    }

    #[test]
    fn wallet_key_rejects_malformed() {
        let good = Keyring::from_private_key(test_key()).to_wallet_key().unwrap();
        let bad_kind = good.replace("0x000x", "0x010x");
        assert_eq!(Keyring::from_wallet_key(&bad_kind), Err(CryptoError::InvalidWalletKey));
        assert_eq!(Keyring::from_wallet_key(TEST_KEY), Err(CryptoError::InvalidWalletKey));

        let multi = Keyring::multiple(other_address(), vec![test_key()]);
        assert_eq!(multi.to_wallet_key(), Err(CryptoError::InvalidWalletKey));
    }
}
