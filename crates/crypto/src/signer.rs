use tracing::debug;

use klay_types::{Address, Transaction};

use crate::{recover_address, CryptoError, Keyring, Role};

/// Produces the digest a transaction is signed over.
pub trait SigHasher {
    fn hash(&self, tx: &Transaction) -> Result<[u8; 32], CryptoError>;
}

/// keccak256 of the canonical signing preimage.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeccakSigHasher;

impl SigHasher for KeccakSigHasher {
    fn hash(&self, tx: &Transaction) -> Result<[u8; 32], CryptoError> {
        Ok(klay_codec::hash_for_signature(tx)?)
    }
}

impl<F> SigHasher for F
where
    F: Fn(&Transaction) -> Result<[u8; 32], CryptoError>,
{
    fn hash(&self, tx: &Transaction) -> Result<[u8; 32], CryptoError> {
        self(tx)
    }
}

/// Signs transactions with the transaction-role keys of a [`Keyring`].
#[derive(Clone, Debug, Default)]
pub struct Signer<H = KeccakSigHasher> {
    hasher: H,
}

impl Signer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: SigHasher> Signer<H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }

    /// Signs `tx` with every transaction-role key, or only the key at `index`.
    ///
    /// New signatures are appended in key order, replacing the unsigned
    /// placeholder. On error `tx` is left untouched.
    pub fn sign(
        &self,
        tx: &mut Transaction,
        keyring: &Keyring,
        index: Option<usize>,
    ) -> Result<(), CryptoError> {
        if keyring.address() != tx.from() {
            return Err(CryptoError::AddressMismatch);
        }
        let digest = self.hasher.hash(tx)?;
        let chain_id = tx.require_chain_id()?;
        let sigs = keyring.sign_digest(&digest, chain_id, Role::Transaction.index(), index)?;

        debug!(
            from = %tx.from(),
            tx_type = %tx.tx_type(),
            signatures = sigs.len(),
            index = ?index,
            "signed transaction"
        );
        tx.append_signatures(sigs);
        Ok(())
    }
}

/// Signs with every transaction-role key and the default hasher.
pub fn sign_transaction(tx: &mut Transaction, keyring: &Keyring) -> Result<(), CryptoError> {
    Signer::new().sign(tx, keyring, None)
}

/// Address behind each signature of `tx`, in list order.
///
/// The digest is recomputed from `tx`, so it needs a chain id. A signature
/// made for another chain recovers to an unrelated address.
pub fn recover_signers(tx: &Transaction) -> Result<Vec<Address>, CryptoError> {
    let digest = klay_codec::hash_for_signature(tx)?;
    tx.signatures()
        .as_slice()
        .iter()
        .map(|sig| recover_address(&digest, sig))
        .collect()
}
