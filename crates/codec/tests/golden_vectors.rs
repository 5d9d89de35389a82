use std::fs;
use std::path::{Path, PathBuf};

use klay_codec::{
    decode_as_hex, decode_hex, encode_for_signature_hex, encode_signed_hex, hash_for_signature,
    sender_tx_hash_hex, transaction_hash_hex,
};
use klay_types::{SignatureData, Transaction, TransactionBuilder, TxField, TxType};

const FROM: &str = "0xa94f5374Fce5edBC8E2a8697C15331677e6EbF0B";
const TO: &str = "0x7b65B75d204aBed71587c9E519a89277766EE1d0";

fn write_or_compare(path: &Path, actual: &str) {
    let update = std::env::var("UPDATE_VECTORS").ok().as_deref() == Some("1");

    if update {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create vectors dir");
        }
        fs::write(path, actual).expect("write vector file");
        return;
    }

    let expected = fs::read_to_string(path).unwrap_or_else(|_| {
        panic!("missing vector file: {path:?}. Run with UPDATE_VECTORS=1 to generate.")
    });

    assert_eq!(
        expected.trim(),
        actual,
        "golden vector mismatch for {path:?} (encoding drift?)"
    );
}

fn vector(name: &str, part: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/vectors")
        .join(format!("{name}.{part}.hex"))
}

fn common(tx_type: TxType) -> TransactionBuilder {
    Transaction::builder(tx_type)
        .from(FROM)
        .nonce("0x4d2")
        .gas("0xf4240")
        .gas_price("0x19")
        .chain_id("0x1")
}

/// One sample per kind, each carrying the signature produced by the
/// well-known test key `0x45a9...f2d8` on chain 1.
fn samples() -> Vec<(&'static str, Transaction)> {
    let sig = |v: &str, r: &str, s: &str| SignatureData::from_hex(v, r, s).unwrap();
    vec![
        (
            "value_transfer",
            common(TxType::ValueTransfer)
                .to(TO)
                .value("0xa")
                .signature(sig(
                    "0x25",
                    "0xf3d0cd43661cabf53425535817c5058c27781f478cb5459874feaa462ed3a29a",
                    "0x6748abe186269ff10b8100a4b7d7fea274b53ea2905acbf498dc8b5ab1bf4fbc",
                ))
                .build()
                .unwrap(),
        ),
        (
            "value_transfer_memo",
            common(TxType::ValueTransferMemo)
                .to(TO)
                .value("0xa")
                .input("0x68656c6c6f")
                .signature(sig(
                    "0x25",
                    "0x7d2b0c89ee8afa502b3186413983bfe9a31c5776f4f820210cffe44a7d568d1c",
                    "0x2b1cbd587c73b0f54969f6b76ef2fd95cea0c1bb79256a75df9da696278509f3",
                ))
                .build()
                .unwrap(),
        ),
        (
            "smart_contract_execution",
            common(TxType::SmartContractExecution)
                .to(TO)
                .value("0xa")
                .input("0x6353586b000000000000000000000000bc5951f055a85f41a3b62fd6f68ab7de76d299b2")
                .signature(sig(
                    "0x26",
                    "0xe4276df1a779274fbb04bc18a0184809eec1ce9770527cebb3d64f926dc1810b",
                    "0x4103b828a0671a48d64fe1a3879eae229699f05a684d9c5fd939015dcdd9709b",
                ))
                .build()
                .unwrap(),
        ),
        (
            "cancel",
            common(TxType::Cancel)
                .signature(sig(
                    "0x25",
                    "0xfb2c3d53d2f6b7bb1deb5a09f80366a5a45429cc1e3956687b075a9dcad20434",
                    "0x5c6187822ee23b1001e9613d29a5d6002f990498d2902904f7f259ab3358216e",
                ))
                .build()
                .unwrap(),
        ),
        (
            "chain_data_anchoring",
            common(TxType::ChainDataAnchoring)
                .input(anchored_data())
                .signature(sig(
                    "0x25",
                    "0xe58b9abf9f33a066b998fccaca711553fb4df425c9234bbb3577f9d9775bb124",
                    "0x2c409a6c5d92277c0a812dd0cc553d7fe1d652a807274c3786df3292cd473e09",
                ))
                .build()
                .unwrap(),
        ),
    ]
}

/// RLP list of five 32-byte words `0..=4` followed by the byte `0x05`.
fn anchored_data() -> Vec<u8> {
    let mut out = vec![0xf8, 0xa6];
    for i in 0u8..5 {
        out.push(0xa0);
        let mut word = [0u8; 32];
        word[31] = i;
        out.extend_from_slice(&word);
    }
    out.push(0x05);
    out
}

#[test]
fn golden_vectors_every_kind() {
    for (name, tx) in samples() {
        let preimage = encode_for_signature_hex(&tx).expect("encode preimage");
        let signed = encode_signed_hex(&tx).expect("encode signed");
        let hash = transaction_hash_hex(&tx).expect("hash");

        assert_eq!(hash, sender_tx_hash_hex(&tx).unwrap());

        // --- Decode checks ---
        let decoded = decode_hex(&signed).expect("decode signed");
        assert_eq!(decoded.tx_type(), tx.tx_type());
        assert!(decoded.same_fields(&tx), "{name}: fields differ after decode");
        assert_eq!(decoded.signatures(), tx.signatures());
        assert_eq!(decoded.chain_id(), None);
        assert_eq!(encode_signed_hex(&decoded).unwrap(), signed);

        let decoded = decode_as_hex(tx.tx_type(), &signed).expect("decode as kind");
        assert!(decoded.same_fields(&tx));

        // --- Compare (or generate) ---
        write_or_compare(&vector(name, "sig"), &preimage);
        write_or_compare(&vector(name, "signed"), &signed);
        write_or_compare(&vector(name, "hash"), &hash);
    }
}

#[test]
fn value_transfer_hash_matches_known_vector() {
    let (_, tx) = samples().remove(0);
    assert_eq!(
        transaction_hash_hex(&tx).unwrap(),
        "0x762f130342569e9669a4d8547f1248bd2554fbbf3062d63a97ce28bfa97aa9d7"
    );
}

/// Unsigned `kind` with sample values, except `changed` which gets another value.
fn variant(kind: TxType, changed: Option<TxField>) -> Transaction {
    let pick = |field: TxField, base: &'static str, other: &'static str| -> &'static str {
        if changed == Some(field) {
            other
        } else {
            base
        }
    };
    let mut b = Transaction::builder(kind)
        .from(pick(TxField::From, FROM, TO))
        .nonce(pick(TxField::Nonce, "0x4d2", "0x4d3"))
        .gas(pick(TxField::Gas, "0xf4240", "0xf4241"))
        .gas_price(pick(TxField::GasPrice, "0x19", "0x1a"))
        .chain_id("0x1");
    if kind.has_field(TxField::To) {
        b = b.to(pick(TxField::To, TO, FROM));
    }
    if kind.has_field(TxField::Value) {
        b = b.value(pick(TxField::Value, "0xa", "0xb"));
    }
    if kind.has_field(TxField::Input) {
        b = b.input(pick(TxField::Input, "0x31323334", "0x3132333435"));
    }
    b.build().unwrap()
}

#[test]
fn every_field_feeds_both_hashes() {
    for kind in TxType::ALL {
        let base = variant(kind, None);
        let base_hash = transaction_hash_hex(&base).unwrap();
        let base_digest = hash_for_signature(&base).unwrap();

        for &field in kind.fields() {
            let changed = variant(kind, Some(field));
            assert_ne!(
                transaction_hash_hex(&changed).unwrap(),
                base_hash,
                "{kind} {field:?}"
            );
            assert_ne!(
                hash_for_signature(&changed).unwrap(),
                base_digest,
                "{kind} {field:?}"
            );
        }
    }
}
