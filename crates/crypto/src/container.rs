use std::collections::HashMap;

use klay_types::{Address, Transaction};

use crate::{CryptoError, KeccakSigHasher, Keyring, PrivateKey, SigHasher, Signer};

/// In-memory keyrings keyed by account address.
///
/// Notes:
/// - One keyring per address; `add()` rejects duplicates, `update()` replaces.
/// - Nothing is persisted.
#[derive(Clone, Debug, Default)]
pub struct KeyringContainer {
    by_address: HashMap<Address, Keyring>,
}

impl KeyringContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a container from `keyrings`. Rejects duplicate addresses.
    pub fn from_keyrings(keyrings: impl IntoIterator<Item = Keyring>) -> Result<Self, CryptoError> {
        let mut container = Self::new();
        for keyring in keyrings {
            container.add(keyring)?;
        }
        Ok(container)
    }

    /// Add `count` freshly generated coupled keyrings, returning their addresses.
    pub fn generate(&mut self, count: usize) -> Vec<Address> {
        let mut added = Vec::with_capacity(count);
        while added.len() < count {
            let keyring = Keyring::from_private_key(PrivateKey::generate());
            let address = *keyring.address();
            if self.add(keyring).is_ok() {
                added.push(address);
            }
        }
        added
    }

    /// Insert a keyring. Rejects an address that is already present.
    pub fn add(&mut self, keyring: Keyring) -> Result<&Keyring, CryptoError> {
        let address = *keyring.address();
        if self.by_address.contains_key(&address) {
            return Err(CryptoError::DuplicateKeyring(address));
        }
        Ok(self.by_address.entry(address).or_insert(keyring))
    }

    /// Replace the keyring stored for `keyring.address()`, returning the old one.
    pub fn update(&mut self, keyring: Keyring) -> Result<Keyring, CryptoError> {
        let address = *keyring.address();
        match self.by_address.get_mut(&address) {
            Some(slot) => Ok(std::mem::replace(slot, keyring)),
            None => Err(CryptoError::KeyringNotFound(address)),
        }
    }

    pub fn remove(&mut self, address: &Address) -> Option<Keyring> {
        self.by_address.remove(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.by_address.contains_key(address)
    }

    pub fn get(&self, address: &Address) -> Option<&Keyring> {
        self.by_address.get(address)
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    /// Sign `tx` with the keyring stored for `address`.
    pub fn sign(
        &self,
        address: &Address,
        tx: &mut Transaction,
        index: Option<usize>,
    ) -> Result<(), CryptoError> {
        self.sign_with(&Signer::<KeccakSigHasher>::new(), address, tx, index)
    }

    /// Like [`KeyringContainer::sign`] with a caller-chosen signer.
    pub fn sign_with<H: SigHasher>(
        &self,
        signer: &Signer<H>,
        address: &Address,
        tx: &mut Transaction,
        index: Option<usize>,
    ) -> Result<(), CryptoError> {
        let keyring = self
            .get(address)
            .ok_or(CryptoError::KeyringNotFound(*address))?;
        signer.sign(tx, keyring, index)
    }
}
