use std::fmt;

use TxField as F;

/// Transaction kinds handled by this SDK, keyed by their one-byte type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxType {
    ValueTransfer = 0x08,
    ValueTransferMemo = 0x10,
    SmartContractExecution = 0x30,
    Cancel = 0x38,
    ChainDataAnchoring = 0x48,
}

/// A plaintext (non-signature) field of a transaction body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxField {
    Nonce,
    GasPrice,
    Gas,
    To,
    Value,
    From,
    Input,
}

impl TxField {
    pub fn name(self) -> &'static str {
        match self {
            TxField::Nonce => "nonce",
            TxField::GasPrice => "gasPrice",
            TxField::Gas => "gas",
            TxField::To => "to",
            TxField::Value => "value",
            TxField::From => "from",
            TxField::Input => "input",
        }
    }
}

// Field order is wire-relevant; changing any row breaks every encoding of that kind.
const VALUE_TRANSFER: &[TxField] = &[F::Nonce, F::GasPrice, F::Gas, F::To, F::Value, F::From];
const VALUE_TRANSFER_MEMO: &[TxField] = &[
    F::Nonce,
    F::GasPrice,
    F::Gas,
    F::To,
    F::Value,
    F::From,
    F::Input,
];
const SMART_CONTRACT_EXECUTION: &[TxField] = &[
    F::Nonce,
    F::GasPrice,
    F::Gas,
    F::To,
    F::Value,
    F::From,
    F::Input,
];
const CANCEL: &[TxField] = &[F::Nonce, F::GasPrice, F::Gas, F::From];
const CHAIN_DATA_ANCHORING: &[TxField] = &[F::Nonce, F::GasPrice, F::Gas, F::From, F::Input];

impl TxType {
    pub const ALL: [TxType; 5] = [
        TxType::ValueTransfer,
        TxType::ValueTransferMemo,
        TxType::SmartContractExecution,
        TxType::Cancel,
        TxType::ChainDataAnchoring,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Ordered plaintext fields, as they appear in both the signing preimage
    /// and the final encoding.
    pub fn fields(self) -> &'static [TxField] {
        match self {
            TxType::ValueTransfer => VALUE_TRANSFER,
            TxType::ValueTransferMemo => VALUE_TRANSFER_MEMO,
            TxType::SmartContractExecution => SMART_CONTRACT_EXECUTION,
            TxType::Cancel => CANCEL,
            TxType::ChainDataAnchoring => CHAIN_DATA_ANCHORING,
        }
    }

    pub fn has_field(self, field: TxField) -> bool {
        self.fields().contains(&field)
    }

    pub fn name(self) -> &'static str {
        match self {
            TxType::ValueTransfer => "TxTypeValueTransfer",
            TxType::ValueTransferMemo => "TxTypeValueTransferMemo",
            TxType::SmartContractExecution => "TxTypeSmartContractExecution",
            TxType::Cancel => "TxTypeCancel",
            TxType::ChainDataAnchoring => "TxTypeChainDataAnchoring",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
