//! secp256k1 keys, key bundles and transaction signing.

mod container;
mod key;
mod keyring;
mod signer;

pub use container::KeyringContainer;
pub use key::{recover_address, PrivateKey, PRIVATE_KEY_LEN};
pub use keyring::{KeySet, Keyring, Role, ROLE_GROUP_COUNT};
pub use signer::{recover_signers, sign_transaction, KeccakSigHasher, SigHasher, Signer};

use klay_codec::CodecError;
use klay_types::{Address, TxError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid private key")]
    InvalidPrivateKey,
    #[error("invalid wallet key")]
    InvalidWalletKey,
    #[error("invalid role index: {0}")]
    InvalidRole(usize),
    #[error("{0} role groups given, at most 3 are allowed")]
    TooManyRoleGroups(usize),
    #[error("no key in the requested role group, and the transaction role group is also empty")]
    EmptyRole,
    #[error("the keyring address does not match the transaction's from address")]
    AddressMismatch,
    #[error("key index {index} out of range for {len} keys")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("signing failed")]
    Signing,
    #[error("signature does not recover to a public key")]
    InvalidSignature,
    #[error("no keyring for {0} in the container")]
    KeyringNotFound(Address),
    #[error("a keyring for {0} is already in the container")]
    DuplicateKeyring(Address),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Tx(#[from] TxError),
}
