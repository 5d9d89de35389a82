//! Transaction model shared by the codec, signer and combiner crates.

mod address;
mod error;
mod fill;
pub mod hexutil;
mod kind;
mod signature;
mod transaction;

pub use address::{Address, ADDRESS_LEN};
pub use error::TxError;
pub use fill::ChainRpc;
pub use hexutil::FieldInput;
pub use kind::{TxField, TxType};
pub use num_bigint::BigUint;
pub use signature::{SignatureData, Signatures, EMPTY_SIGNATURE_V};
pub use transaction::{
    AddressInput, DataInput, FieldValue, Transaction, TransactionBuilder, TxBody,
};
