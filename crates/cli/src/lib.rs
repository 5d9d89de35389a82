//! Command implementations behind the `klay-tx` binary.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tracing::info;

use klay_codec::{decode_hex, encode_signed_hex, transaction_hash_hex};
use klay_crypto::{Keyring, PrivateKey, Signer};
use klay_multisig::combine_signed_raw_transactions_hex;
use klay_types::hexutil::{quantity_to_hex, to_hex};
use klay_types::{Transaction, TxType};

/// Plaintext fields supplied on the command line for `sign`.
#[derive(Clone, Debug)]
pub struct SignRequest {
    pub kind: TxType,
    pub key: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub input: Option<String>,
    pub nonce: Option<String>,
    pub gas: String,
    pub gas_price: Option<String>,
    pub chain_id: Option<String>,
    pub index: Option<usize>,
}

/// JSON view of a transaction, including its hash.
pub fn transaction_view(tx: &Transaction) -> Result<Value> {
    let mut view = Map::new();
    view.insert("type".into(), json!(tx.tx_type().name()));
    view.insert("typeTag".into(), json!(format!("0x{:02x}", tx.tx_type().tag())));
    if let Some(nonce) = tx.nonce() {
        view.insert("nonce".into(), json!(quantity_to_hex(nonce)));
    }
    if let Some(gas_price) = tx.gas_price() {
        view.insert("gasPrice".into(), json!(quantity_to_hex(gas_price)));
    }
    view.insert("gas".into(), json!(quantity_to_hex(tx.gas())));
    if let Some(to) = tx.to() {
        view.insert("to".into(), json!(to.to_string()));
    }
    if let Some(value) = tx.value() {
        view.insert("value".into(), json!(quantity_to_hex(value)));
    }
    view.insert("from".into(), json!(tx.from().to_string()));
    if let Some(input) = tx.input() {
        view.insert("input".into(), json!(to_hex(input)));
    }
    if let Some(chain_id) = tx.chain_id() {
        view.insert("chainId".into(), json!(quantity_to_hex(chain_id)));
    }
    let signatures: Vec<Value> = tx
        .signatures()
        .to_wire()
        .iter()
        .map(|sig| json!([sig.v_hex(), sig.r_hex(), sig.s_hex()]))
        .collect();
    view.insert("signatures".into(), Value::Array(signatures));
    view.insert("transactionHash".into(), json!(transaction_hash_hex(tx)?));
    Ok(Value::Object(view))
}

pub fn decode_command(raw: &str) -> Result<Value> {
    let tx = decode_hex(raw).context("decoding raw transaction")?;
    transaction_view(&tx)
}

pub fn hash_command(raw: &str) -> Result<String> {
    let tx = decode_hex(raw).context("decoding raw transaction")?;
    Ok(transaction_hash_hex(&tx)?)
}

/// Accepts a bare private key or a wallet key (`0x{key}0x00{address}`).
pub fn parse_keyring(key: &str) -> Result<Keyring> {
    if let Ok(ring) = Keyring::from_wallet_key(key) {
        return Ok(ring);
    }
    let key = PrivateKey::from_hex(key).context("parsing private key")?;
    Ok(Keyring::from_private_key(key))
}

/// Builds, signs and encodes a transaction. Returns the raw hex.
pub fn sign_command(req: &SignRequest) -> Result<Value> {
    let ring = parse_keyring(&req.key)?;
    let mut builder = Transaction::builder(req.kind)
        .from(req.from.clone().unwrap_or_else(|| ring.address().to_string()))
        .gas(req.gas.as_str());
    if let Some(to) = &req.to {
        builder = builder.to(to.as_str());
    }
    if let Some(value) = &req.value {
        builder = builder.value(value.as_str());
    }
    if let Some(input) = &req.input {
        builder = builder.input(input.as_str());
    }
    if let Some(nonce) = &req.nonce {
        builder = builder.nonce(nonce.as_str());
    }
    if let Some(gas_price) = &req.gas_price {
        builder = builder.gas_price(gas_price.as_str());
    }
    if let Some(chain_id) = &req.chain_id {
        builder = builder.chain_id(chain_id.as_str());
    }
    let mut tx = builder.build()?;

    Signer::new().sign(&mut tx, &ring, req.index)?;
    info!(from = %tx.from(), signatures = tx.signatures().len(), "transaction signed");

    Ok(json!({
        "rawTransaction": encode_signed_hex(&tx)?,
        "transactionHash": transaction_hash_hex(&tx)?,
    }))
}

/// Combines the signatures of every raw transaction into the first one.
pub fn combine_command(raws: &[String]) -> Result<Value> {
    let (first, rest) = raws
        .split_first()
        .context("at least one raw transaction is required")?;
    let mut tx = decode_hex(first).context("decoding first raw transaction")?;
    let raw = combine_signed_raw_transactions_hex(&mut tx, rest)?;
    Ok(json!({
        "rawTransaction": raw,
        "transactionHash": transaction_hash_hex(&tx)?,
        "signatures": tx.signatures().len(),
    }))
}
