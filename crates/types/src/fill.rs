use num_bigint::BigUint;
use tracing::debug;

use crate::{Address, Transaction};

/// Node queries used to complete a transaction before signing.
///
/// Implementations own transport, timeouts and retries.
pub trait ChainRpc {
    type Error;

    fn suggest_nonce(&self, address: &Address) -> Result<BigUint, Self::Error>;
    fn suggest_gas_price(&self) -> Result<BigUint, Self::Error>;
    fn chain_id(&self) -> Result<BigUint, Self::Error>;
}

impl Transaction {
    /// Query `rpc` for whichever of nonce, gasPrice and chainId are unset.
    ///
    /// Fields already present are left alone and not queried. If any query
    /// fails the transaction is unchanged.
    pub fn fill_transaction<R: ChainRpc>(&mut self, rpc: &R) -> Result<(), R::Error> {
        let nonce = match self.nonce() {
            Some(_) => None,
            None => Some(rpc.suggest_nonce(self.from())?),
        };
        let gas_price = match self.gas_price() {
            Some(_) => None,
            None => Some(rpc.suggest_gas_price()?),
        };
        let chain_id = match self.chain_id() {
            Some(_) => None,
            None => Some(rpc.chain_id()?),
        };

        debug!(
            from = %self.from(),
            nonce = nonce.is_some(),
            gas_price = gas_price.is_some(),
            chain_id = chain_id.is_some(),
            "filled transaction fields"
        );

        self.apply_filled(nonce, gas_price, chain_id);
        Ok(())
    }
}
