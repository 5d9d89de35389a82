//! Canonical wire encoding of transactions.
//!
//! Two byte forms exist per transaction:
//! - the signing preimage `rlp([rlp([tag, nonce, gasPrice, gas, ...]), chainId, 0, 0])`
//! - the final form `tag || rlp([nonce, gasPrice, gas, ..., [[v, r, s], ...]])`
//!
//! Field order is WIRE-RELEVANT and comes from [`TxType::fields`].

pub mod rlp;

use klay_types::hexutil::to_hex;
use klay_types::{
    Address, AddressInput, DataInput, FieldInput, FieldValue, SignatureData, Transaction,
    TxError, TxField, TxType,
};
use sha3::{Digest, Keccak256};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("rlp: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    #[error("trailing bytes after transaction")]
    TrailingBytes,
    #[error("expected {expected} list items, found {actual}")]
    FieldCount { expected: usize, actual: usize },
    #[error("address must be 20 bytes, found {0}")]
    InvalidAddressLength(usize),
    #[error("malformed signature entry")]
    MalformedSignature,
    #[error("unknown transaction type tag 0x{0:02x}")]
    UnknownTxType(u8),
    #[error("expected {expected}, found {actual}")]
    TxTypeMismatch { expected: TxType, actual: TxType },
    #[error("invalid hex input")]
    InvalidHex,
    #[error("empty input")]
    EmptyInput,
    #[error(transparent)]
    Tx(#[from] TxError),
}

pub fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Keccak256::digest(bytes).into()
}

fn write_field(out: &mut Vec<u8>, value: FieldValue<'_>) {
    match value {
        FieldValue::Quantity(v) => rlp::write_uint(out, v),
        FieldValue::Address(a) => rlp::write_bytes(out, a.as_bytes()),
        FieldValue::Bytes(b) => rlp::write_bytes(out, b),
    }
}

fn write_fields(out: &mut Vec<u8>, tx: &Transaction) -> Result<(), CodecError> {
    for field in tx.tx_type().fields() {
        write_field(out, tx.field(*field)?);
    }
    Ok(())
}

fn write_signature(out: &mut Vec<u8>, sig: &SignatureData) {
    let mut payload = Vec::new();
    rlp::write_bytes(&mut payload, sig.v());
    rlp::write_bytes(&mut payload, sig.r());
    rlp::write_bytes(&mut payload, sig.s());
    rlp::write_list(out, &payload);
}

/// `rlp([tag, nonce, gasPrice, gas, ...fields])`, the inner part of the
/// signing preimage. Needs nonce and gasPrice.
pub fn encode_common_for_signature(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    tx.ensure_filled(false)?;
    let mut payload = Vec::new();
    rlp::write_bytes(&mut payload, &[tx.tx_type().tag()]);
    write_fields(&mut payload, tx)?;

    let mut out = Vec::new();
    rlp::write_list(&mut out, &payload);
    Ok(out)
}

/// Full signing preimage. Needs nonce, gasPrice and chainId.
pub fn encode_for_signature(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    tx.ensure_filled(true)?;
    let common = encode_common_for_signature(tx)?;

    let mut payload = Vec::new();
    rlp::write_bytes(&mut payload, &common);
    rlp::write_uint(&mut payload, tx.require_chain_id()?);
    rlp::write_bytes(&mut payload, &[]);
    rlp::write_bytes(&mut payload, &[]);

    let mut out = Vec::new();
    rlp::write_list(&mut out, &payload);
    Ok(out)
}

/// Digest every signer signs.
pub fn hash_for_signature(tx: &Transaction) -> Result<[u8; 32], CodecError> {
    Ok(keccak256(&encode_for_signature(tx)?))
}

/// Final form including the current signature list. An unsigned
/// transaction carries the single placeholder entry.
pub fn encode_signed(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    tx.ensure_filled(false)?;
    let mut payload = Vec::new();
    write_fields(&mut payload, tx)?;

    let mut sigs = Vec::new();
    for sig in tx.signatures().to_wire() {
        write_signature(&mut sigs, &sig);
    }
    rlp::write_list(&mut payload, &sigs);

    let mut out = vec![tx.tx_type().tag()];
    rlp::write_list(&mut out, &payload);
    Ok(out)
}

pub fn transaction_hash(tx: &Transaction) -> Result<[u8; 32], CodecError> {
    Ok(keccak256(&encode_signed(tx)?))
}

/// Same as [`transaction_hash`]: none of these kinds carries a fee-payer section.
pub fn sender_tx_hash(tx: &Transaction) -> Result<[u8; 32], CodecError> {
    transaction_hash(tx)
}

pub fn encode_common_for_signature_hex(tx: &Transaction) -> Result<String, CodecError> {
    Ok(to_hex(&encode_common_for_signature(tx)?))
}

pub fn encode_for_signature_hex(tx: &Transaction) -> Result<String, CodecError> {
    Ok(to_hex(&encode_for_signature(tx)?))
}

pub fn encode_signed_hex(tx: &Transaction) -> Result<String, CodecError> {
    Ok(to_hex(&encode_signed(tx)?))
}

pub fn transaction_hash_hex(tx: &Transaction) -> Result<String, CodecError> {
    Ok(to_hex(&transaction_hash(tx)?))
}

pub fn sender_tx_hash_hex(tx: &Transaction) -> Result<String, CodecError> {
    Ok(to_hex(&sender_tx_hash(tx)?))
}

/// Strict hex: optional `0x`/`0X` prefix, even length.
pub fn decode_hex_input(raw: &str) -> Result<Vec<u8>, CodecError> {
    let body = klay_types::hexutil::strip_hex_prefix(raw.trim());
    hex::decode(body).map_err(|_| CodecError::InvalidHex)
}

/// `v`, `r` and `s` are integers on the wire, so the leading-zero rule
/// applies to them as well. Otherwise a re-encode would differ from the input.
fn read_signature(item: rlp::Item<'_>) -> Result<SignatureData, CodecError> {
    let rlp::Item::List(payload) = item else {
        return Err(CodecError::MalformedSignature);
    };
    let parts = rlp::read_items(payload).map_err(|_| CodecError::MalformedSignature)?;
    match parts.as_slice() {
        [rlp::Item::Bytes(v), rlp::Item::Bytes(r), rlp::Item::Bytes(s)] => Ok(SignatureData::new(
            rlp::check_uint(v)?,
            rlp::check_uint(r)?,
            rlp::check_uint(s)?,
        )),
        _ => Err(CodecError::MalformedSignature),
    }
}

fn expect_bytes<'a>(item: rlp::Item<'a>) -> Result<&'a [u8], CodecError> {
    match item {
        rlp::Item::Bytes(b) => Ok(b),
        rlp::Item::List(_) => Err(alloy_rlp::Error::UnexpectedList.into()),
    }
}

fn expect_uint(item: rlp::Item<'_>) -> Result<FieldInput, CodecError> {
    let b = rlp::check_uint(expect_bytes(item)?)?;
    Ok(FieldInput::Int(klay_types::BigUint::from_bytes_be(b)))
}

fn expect_address(item: rlp::Item<'_>) -> Result<AddressInput, CodecError> {
    let b = expect_bytes(item)?;
    let address = Address::from_slice(b).ok_or(CodecError::InvalidAddressLength(b.len()))?;
    Ok(AddressInput::Addr(address))
}

/// Decode a final-form transaction of any supported kind.
///
/// Placeholder signatures are dropped; a decoded transaction has no chain id.
pub fn decode(bytes: &[u8]) -> Result<Transaction, CodecError> {
    let (&tag, mut rest) = bytes.split_first().ok_or(CodecError::EmptyInput)?;
    let tx_type = TxType::from_tag(tag).ok_or(CodecError::UnknownTxType(tag))?;

    let payload = rlp::read_list(&mut rest)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes);
    }

    let fields = tx_type.fields();
    let items = rlp::read_items(payload)?;
    if items.len() != fields.len() + 1 {
        return Err(CodecError::FieldCount {
            expected: fields.len() + 1,
            actual: items.len(),
        });
    }

    let mut builder = Transaction::builder(tx_type);
    for (field, item) in fields.iter().zip(items.iter().copied()) {
        builder = match field {
            TxField::Nonce => builder.nonce(expect_uint(item)?),
            TxField::GasPrice => builder.gas_price(expect_uint(item)?),
            TxField::Gas => builder.gas(expect_uint(item)?),
            TxField::Value => builder.value(expect_uint(item)?),
            TxField::To => builder.to(expect_address(item)?),
            TxField::From => builder.from(expect_address(item)?),
            TxField::Input => builder.input(DataInput::Bytes(expect_bytes(item)?.to_vec())),
        };
    }

    let rlp::Item::List(sig_payload) = items[fields.len()] else {
        return Err(CodecError::MalformedSignature);
    };
    let sigs = rlp::read_items(sig_payload)
        .map_err(|_| CodecError::MalformedSignature)?
        .into_iter()
        .map(read_signature)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(builder.signatures(sigs).build()?)
}

/// Decode and require a specific kind.
pub fn decode_as(expected: TxType, bytes: &[u8]) -> Result<Transaction, CodecError> {
    if let Some(&tag) = bytes.first() {
        match TxType::from_tag(tag) {
            Some(actual) if actual != expected => {
                return Err(CodecError::TxTypeMismatch { expected, actual })
            }
            None => return Err(CodecError::UnknownTxType(tag)),
            Some(_) => {}
        }
    }
    decode(bytes)
}

pub fn decode_hex(raw: &str) -> Result<Transaction, CodecError> {
    decode(&decode_hex_input(raw)?)
}

pub fn decode_as_hex(expected: TxType, raw: &str) -> Result<Transaction, CodecError> {
    decode_as(expected, &decode_hex_input(raw)?)
}
