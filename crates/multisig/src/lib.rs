//! Merging signatures collected by independent signers.
//!
//! Each party signs its own copy of a transaction and ships the final
//! encoding; [`combine_signed_raw_transactions`] folds those encodings back
//! into one transaction carrying every signature.

use tracing::{debug, warn};

use klay_codec::CodecError;
use klay_types::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombineError {
    #[error("Transactions containing different information cannot be combined.")]
    InconsistentTransactions,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Appends the signatures of every encoded transaction in `raws` to `tx`
/// and returns the resulting final encoding.
///
/// Every input must be the same kind as `tx` and agree with it on all
/// plaintext fields; chain ids are not compared. When `tx` is unsigned, an
/// unset nonce or gasPrice is first taken from the first input.
///
/// Either all inputs are merged or `tx` is left unchanged.
pub fn combine_signed_raw_transactions<B: AsRef<[u8]>>(
    tx: &mut Transaction,
    raws: &[B],
) -> Result<Vec<u8>, CombineError> {
    let decoded = raws
        .iter()
        .map(|raw| klay_codec::decode(raw.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = tx.clone();
    if merged.signatures().is_unsigned() {
        if let Some(first) = decoded.first() {
            fill_from(&mut merged, first)?;
        }
    }

    for other in &decoded {
        if other.tx_type() != merged.tx_type() || !merged.same_fields(other) {
            return Err(CombineError::InconsistentTransactions);
        }
        warn_on_foreign_chain(&merged, other);
        merged.append_signatures(other.signatures().as_slice().iter().cloned());
    }

    let encoded = klay_codec::encode_signed(&merged)?;
    debug!(
        inputs = raws.len(),
        signatures = merged.signatures().len(),
        "combined signed transactions"
    );
    *tx = merged;
    Ok(encoded)
}

/// Hex-in, hex-out form of [`combine_signed_raw_transactions`].
pub fn combine_signed_raw_transactions_hex<S: AsRef<str>>(
    tx: &mut Transaction,
    raws: &[S],
) -> Result<String, CombineError> {
    let raws = raws
        .iter()
        .map(|raw| klay_codec::decode_hex_input(raw.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let encoded = combine_signed_raw_transactions(tx, &raws)?;
    Ok(klay_types::hexutil::to_hex(&encoded))
}

fn fill_from(tx: &mut Transaction, source: &Transaction) -> Result<(), CombineError> {
    if tx.nonce().is_none() {
        if let Some(nonce) = source.nonce() {
            tx.set_nonce(nonce).map_err(CodecError::from)?;
        }
    }
    if tx.gas_price().is_none() {
        if let Some(gas_price) = source.gas_price() {
            tx.set_gas_price(gas_price).map_err(CodecError::from)?;
        }
    }
    Ok(())
}

fn warn_on_foreign_chain(tx: &Transaction, other: &Transaction) {
    let Some(own) = tx.chain_id() else {
        return;
    };
    for sig in other.signatures().as_slice() {
        if let Some(signed_for) = sig.chain_id() {
            if &signed_for != own {
                warn!(
                    expected = %own,
                    found = %signed_for,
                    v = %sig.v_hex(),
                    "combined signature is bound to a different chain id"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use klay_types::{SignatureData, TxType};

    fn cancel(nonce: &str) -> Transaction {
        Transaction::builder(TxType::Cancel)
            .from("0x504a835246e030d70ded9027f9f5a0aefcd45143")
            .nonce(nonce)
            .gas("0xdbba0")
            .gas_price("0x5d21dba00")
            .chain_id("0x7e3")
            .build()
            .unwrap()
    }

    fn signed(nonce: &str, r: u8) -> Vec<u8> {
        let mut tx = cancel(nonce);
        tx.append_signatures([SignatureData::new([0x0f, 0xea], [r; 32], [r; 32])]);
        klay_codec::encode_signed(&tx).unwrap()
    }

    #[test]
    fn merges_in_input_order() {
        let mut tx = cancel("0x1");
        let out = combine_signed_raw_transactions(&mut tx, &[signed("0x1", 1), signed("0x1", 2)])
            .unwrap();
        let rs: Vec<_> = tx.signatures().as_slice().iter().map(|s| s.r()[0]).collect();
        assert_eq!(rs, vec![1, 2]);
        assert_eq!(klay_codec::encode_signed(&tx).unwrap(), out);
    }

    #[test]
    fn mismatch_aborts_without_mutation() {
        let mut tx = cancel("0x1");
        tx.append_signatures([SignatureData::new([0x0f, 0xea], [9; 32], [9; 32])]);
        let before = tx.clone();

        let err = combine_signed_raw_transactions(&mut tx, &[signed("0x1", 1), signed("0x2", 2)])
            .unwrap_err();
        assert_eq!(err, CombineError::InconsistentTransactions);
        assert_eq!(tx, before);
    }

    #[test]
    fn unsigned_self_takes_missing_fields_from_first_input() {
        let mut tx = cancel("0x");
        assert_eq!(tx.nonce(), None);
        combine_signed_raw_transactions(&mut tx, &[signed("0x5", 1)]).unwrap();
        assert_eq!(tx.nonce().map(|n| n.to_string()), Some("5".to_string()));
    }

    #[test]
    fn no_inputs_re_encodes_self() {
        let mut tx = cancel("0x1");
        let none: [Vec<u8>; 0] = [];
        let out = combine_signed_raw_transactions(&mut tx, &none).unwrap();
        assert_eq!(out, klay_codec::encode_signed(&cancel("0x1")).unwrap());
    }

    #[test]
    fn undecodable_input_is_a_codec_error() {
        let mut tx = cancel("0x1");
        let err = combine_signed_raw_transactions_hex(&mut tx, &["0x38c0"]).unwrap_err();
        assert!(matches!(err, CombineError::Codec(_)));
        assert!(tx.signatures().is_unsigned());
    }
}
