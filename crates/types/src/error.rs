/// Errors raised while assigning or reading transaction fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TxError {
    /// A field value is not well-formed (bad hex, wrong address shape).
    #[error("Invalid {0}.")]
    InvalidFormat(String),
    /// A field required at construction time was not supplied.
    #[error("{0} is missing.")]
    MissingField(&'static str),
    /// An auto-fillable field (nonce, gasPrice, chainId) is still unset when
    /// the transaction is encoded, hashed or signed.
    #[error("{0} is undefined. Define {0} in transaction or use 'fill_transaction' to fill values.")]
    FieldUndefined(&'static str),
    /// The builder received a field the transaction kind does not carry.
    #[error("{tx_type} does not carry a `{field}` field")]
    UnsupportedField {
        tx_type: &'static str,
        field: &'static str,
    },
}

impl TxError {
    pub(crate) fn invalid(field: &str) -> Self {
        TxError::InvalidFormat(field.to_string())
    }
}
