use num_bigint::BigUint;

use crate::hexutil::{parse_data, parse_optional_quantity, parse_quantity, FieldInput};
use crate::{Address, SignatureData, Signatures, TxError, TxField, TxType};

/// Raw input for an address field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressInput {
    Str(String),
    Addr(Address),
}

impl From<&str> for AddressInput {
    fn from(s: &str) -> Self {
        AddressInput::Str(s.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(s: String) -> Self {
        AddressInput::Str(s)
    }
}

impl From<Address> for AddressInput {
    fn from(a: Address) -> Self {
        AddressInput::Addr(a)
    }
}

impl AddressInput {
    fn resolve(self) -> Result<Address, TxError> {
        match self {
            AddressInput::Addr(a) => Ok(a),
            AddressInput::Str(s) => s.parse(),
        }
    }
}

/// Raw input for a byte-string field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataInput {
    Hex(String),
    Bytes(Vec<u8>),
}

impl From<&str> for DataInput {
    fn from(s: &str) -> Self {
        DataInput::Hex(s.to_string())
    }
}

impl From<String> for DataInput {
    fn from(s: String) -> Self {
        DataInput::Hex(s)
    }
}

impl From<Vec<u8>> for DataInput {
    fn from(b: Vec<u8>) -> Self {
        DataInput::Bytes(b)
    }
}

impl From<&[u8]> for DataInput {
    fn from(b: &[u8]) -> Self {
        DataInput::Bytes(b.to_vec())
    }
}

impl DataInput {
    fn resolve(self, field: &str) -> Result<Vec<u8>, TxError> {
        match self {
            DataInput::Bytes(b) => Ok(b),
            DataInput::Hex(s) => parse_data(field, &s),
        }
    }
}

/// Kind-specific part of a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxBody {
    ValueTransfer {
        to: Address,
        value: BigUint,
    },
    ValueTransferMemo {
        to: Address,
        value: BigUint,
        input: Vec<u8>,
    },
    SmartContractExecution {
        to: Address,
        value: BigUint,
        input: Vec<u8>,
    },
    Cancel,
    ChainDataAnchoring {
        input: Vec<u8>,
    },
}

impl TxBody {
    pub fn tx_type(&self) -> TxType {
        match self {
            TxBody::ValueTransfer { .. } => TxType::ValueTransfer,
            TxBody::ValueTransferMemo { .. } => TxType::ValueTransferMemo,
            TxBody::SmartContractExecution { .. } => TxType::SmartContractExecution,
            TxBody::Cancel => TxType::Cancel,
            TxBody::ChainDataAnchoring { .. } => TxType::ChainDataAnchoring,
        }
    }

    pub fn to(&self) -> Option<&Address> {
        match self {
            TxBody::ValueTransfer { to, .. }
            | TxBody::ValueTransferMemo { to, .. }
            | TxBody::SmartContractExecution { to, .. } => Some(to),
            TxBody::Cancel | TxBody::ChainDataAnchoring { .. } => None,
        }
    }

    pub fn value(&self) -> Option<&BigUint> {
        match self {
            TxBody::ValueTransfer { value, .. }
            | TxBody::ValueTransferMemo { value, .. }
            | TxBody::SmartContractExecution { value, .. } => Some(value),
            TxBody::Cancel | TxBody::ChainDataAnchoring { .. } => None,
        }
    }

    pub fn input(&self) -> Option<&[u8]> {
        match self {
            TxBody::ValueTransferMemo { input, .. }
            | TxBody::SmartContractExecution { input, .. }
            | TxBody::ChainDataAnchoring { input } => Some(input),
            TxBody::ValueTransfer { .. } | TxBody::Cancel => None,
        }
    }
}

/// A borrowed plaintext field value, as the codec serializes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Quantity(&'a BigUint),
    Address(&'a Address),
    Bytes(&'a [u8]),
}

/// A transaction of one of the supported kinds.
///
/// `nonce`, `gas_price` and `chain_id` may stay unset after construction;
/// they are only required once the transaction is encoded, hashed or signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    from: Address,
    gas: BigUint,
    nonce: Option<BigUint>,
    gas_price: Option<BigUint>,
    chain_id: Option<BigUint>,
    body: TxBody,
    signatures: Signatures,
}

impl Transaction {
    pub fn builder(tx_type: TxType) -> TransactionBuilder {
        TransactionBuilder::new(tx_type)
    }

    pub fn tx_type(&self) -> TxType {
        self.body.tx_type()
    }

    pub fn from(&self) -> &Address {
        &self.from
    }

    pub fn gas(&self) -> &BigUint {
        &self.gas
    }

    pub fn nonce(&self) -> Option<&BigUint> {
        self.nonce.as_ref()
    }

    pub fn gas_price(&self) -> Option<&BigUint> {
        self.gas_price.as_ref()
    }

    pub fn chain_id(&self) -> Option<&BigUint> {
        self.chain_id.as_ref()
    }

    pub fn body(&self) -> &TxBody {
        &self.body
    }

    pub fn to(&self) -> Option<&Address> {
        self.body.to()
    }

    pub fn value(&self) -> Option<&BigUint> {
        self.body.value()
    }

    pub fn input(&self) -> Option<&[u8]> {
        self.body.input()
    }

    pub fn signatures(&self) -> &Signatures {
        &self.signatures
    }

    pub fn require_nonce(&self) -> Result<&BigUint, TxError> {
        self.nonce.as_ref().ok_or(TxError::FieldUndefined("nonce"))
    }

    pub fn require_gas_price(&self) -> Result<&BigUint, TxError> {
        self.gas_price
            .as_ref()
            .ok_or(TxError::FieldUndefined("gasPrice"))
    }

    pub fn require_chain_id(&self) -> Result<&BigUint, TxError> {
        self.chain_id
            .as_ref()
            .ok_or(TxError::FieldUndefined("chainId"))
    }

    /// Checks that the auto-fillable fields needed for encoding are present,
    /// in the order nonce, gasPrice, chainId. The chain id is only needed by
    /// the signing preimage.
    pub fn ensure_filled(&self, with_chain_id: bool) -> Result<(), TxError> {
        self.require_nonce()?;
        self.require_gas_price()?;
        if with_chain_id {
            self.require_chain_id()?;
        }
        Ok(())
    }

    pub fn set_nonce(&mut self, nonce: impl Into<FieldInput>) -> Result<(), TxError> {
        self.nonce = parse_optional_quantity("nonce", &nonce.into())?;
        Ok(())
    }

    pub fn set_gas_price(&mut self, gas_price: impl Into<FieldInput>) -> Result<(), TxError> {
        self.gas_price = parse_optional_quantity("gasPrice", &gas_price.into())?;
        Ok(())
    }

    pub fn set_chain_id(&mut self, chain_id: impl Into<FieldInput>) -> Result<(), TxError> {
        self.chain_id = parse_optional_quantity("chainId", &chain_id.into())?;
        Ok(())
    }

    /// Appends signatures, replacing the unsigned placeholder if present.
    pub fn append_signatures(&mut self, sigs: impl IntoIterator<Item = SignatureData>) {
        self.signatures.append(sigs);
    }

    /// Replaces the whole list. Placeholders and duplicates are dropped.
    pub fn set_signatures(&mut self, sigs: impl IntoIterator<Item = SignatureData>) {
        self.signatures = Signatures::refined(sigs.into_iter().collect());
    }

    pub(crate) fn apply_filled(
        &mut self,
        nonce: Option<BigUint>,
        gas_price: Option<BigUint>,
        chain_id: Option<BigUint>,
    ) {
        if nonce.is_some() {
            self.nonce = nonce;
        }
        if gas_price.is_some() {
            self.gas_price = gas_price;
        }
        if chain_id.is_some() {
            self.chain_id = chain_id;
        }
    }

    pub(crate) fn replace_signatures(&mut self, signatures: Signatures) {
        self.signatures = signatures;
    }

    /// Value of a plaintext field of this kind.
    ///
    /// Fails with `FieldUndefined` for an unset nonce or gasPrice. Asking for
    /// a field the kind does not carry yields `UnsupportedField`.
    pub fn field(&self, field: TxField) -> Result<FieldValue<'_>, TxError> {
        let unsupported = || TxError::UnsupportedField {
            tx_type: self.tx_type().name(),
            field: field.name(),
        };
        Ok(match field {
            TxField::Nonce => FieldValue::Quantity(self.require_nonce()?),
            TxField::GasPrice => FieldValue::Quantity(self.require_gas_price()?),
            TxField::Gas => FieldValue::Quantity(&self.gas),
            TxField::From => FieldValue::Address(&self.from),
            TxField::To => FieldValue::Address(self.to().ok_or_else(unsupported)?),
            TxField::Value => FieldValue::Quantity(self.value().ok_or_else(unsupported)?),
            TxField::Input => FieldValue::Bytes(self.input().ok_or_else(unsupported)?),
        })
    }

    /// True when both transactions agree on kind and every plaintext field.
    /// Signatures and chain id are not compared.
    pub fn same_fields(&self, other: &Transaction) -> bool {
        self.from == other.from
            && self.gas == other.gas
            && self.nonce == other.nonce
            && self.gas_price == other.gas_price
            && self.body == other.body
    }
}

/// Collects raw field inputs and validates them into a [`Transaction`].
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    tx_type: TxType,
    from: Option<AddressInput>,
    to: Option<AddressInput>,
    nonce: Option<FieldInput>,
    gas: Option<FieldInput>,
    gas_price: Option<FieldInput>,
    chain_id: Option<FieldInput>,
    value: Option<FieldInput>,
    input: Option<DataInput>,
    signatures: Vec<SignatureData>,
}

impl TransactionBuilder {
    pub fn new(tx_type: TxType) -> Self {
        Self {
            tx_type,
            from: None,
            to: None,
            nonce: None,
            gas: None,
            gas_price: None,
            chain_id: None,
            value: None,
            input: None,
            signatures: Vec::new(),
        }
    }

    pub fn from(mut self, from: impl Into<AddressInput>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<AddressInput>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn nonce(mut self, nonce: impl Into<FieldInput>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    pub fn gas(mut self, gas: impl Into<FieldInput>) -> Self {
        self.gas = Some(gas.into());
        self
    }

    pub fn gas_price(mut self, gas_price: impl Into<FieldInput>) -> Self {
        self.gas_price = Some(gas_price.into());
        self
    }

    pub fn chain_id(mut self, chain_id: impl Into<FieldInput>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn value(mut self, value: impl Into<FieldInput>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn input(mut self, input: impl Into<DataInput>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn signature(mut self, sig: SignatureData) -> Self {
        self.signatures.push(sig);
        self
    }

    pub fn signatures(mut self, sigs: impl IntoIterator<Item = SignatureData>) -> Self {
        self.signatures.extend(sigs);
        self
    }

    pub fn build(self) -> Result<Transaction, TxError> {
        let tx_type = self.tx_type;
        let reject_extra = |present: bool, field: TxField| {
            if present && !tx_type.has_field(field) {
                Err(TxError::UnsupportedField {
                    tx_type: tx_type.name(),
                    field: field.name(),
                })
            } else {
                Ok(())
            }
        };
        reject_extra(self.to.is_some(), TxField::To)?;
        reject_extra(self.value.is_some(), TxField::Value)?;
        reject_extra(self.input.is_some(), TxField::Input)?;

        let from = self
            .from
            .ok_or(TxError::MissingField("from"))?
            .resolve()?;
        let gas = parse_quantity("gas", &self.gas.ok_or(TxError::MissingField("gas"))?)?;
        let nonce = optional(self.nonce, "nonce")?;
        let gas_price = optional(self.gas_price, "gasPrice")?;
        let chain_id = optional(self.chain_id, "chainId")?;

        let to = || -> Result<Address, TxError> {
            self.to
                .clone()
                .ok_or(TxError::MissingField("to"))?
                .resolve()
        };
        let value = || -> Result<BigUint, TxError> {
            let raw = self.value.as_ref().ok_or(TxError::MissingField("value"))?;
            parse_quantity("value", raw)
        };
        let input = || -> Result<Vec<u8>, TxError> {
            self.input
                .clone()
                .ok_or(TxError::MissingField("input"))?
                .resolve("input")
        };

        let body = match tx_type {
            TxType::ValueTransfer => TxBody::ValueTransfer {
                to: to()?,
                value: value()?,
            },
            TxType::ValueTransferMemo => TxBody::ValueTransferMemo {
                to: to()?,
                value: value()?,
                input: input()?,
            },
            TxType::SmartContractExecution => TxBody::SmartContractExecution {
                to: to()?,
                value: value()?,
                input: input()?,
            },
            TxType::Cancel => TxBody::Cancel,
            TxType::ChainDataAnchoring => TxBody::ChainDataAnchoring { input: input()? },
        };

        let mut tx = Transaction {
            from,
            gas,
            nonce,
            gas_price,
            chain_id,
            body,
            signatures: Signatures::Unsigned,
        };
        tx.replace_signatures(Signatures::from_wire(self.signatures));
        Ok(tx)
    }
}

fn optional(input: Option<FieldInput>, field: &str) -> Result<Option<BigUint>, TxError> {
    match input {
        None => Ok(None),
        Some(raw) => parse_optional_quantity(field, &raw),
    }
}
