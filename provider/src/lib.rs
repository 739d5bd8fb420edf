//! Read access to the ledger.
//!
//! Everything the vote protocol learns about the chain comes through the
//! [`Provider`] trait: address histories, verbose transactions, block heights
//! and spendable outputs. Implementations include the HTTP
//! [`ExplorerClient`], the [`RetryingProvider`] wrapper and an in-memory
//! ledger in `peervote-nullables`.

pub mod error;
pub mod explorer;
pub mod raw;
pub mod retry;
pub mod sender;

pub use error::ProviderError;
pub use explorer::{ExplorerClient, ExplorerConfig};
pub use raw::{RawBlock, RawInput, RawOutput, RawTransaction, ScriptPubKey};
pub use retry::{RetryPolicy, RetryingProvider};
pub use sender::find_tx_sender;

use async_trait::async_trait;
use peervote_transactions::{SpendableOutput, TransactionError};
use peervote_types::{Address, Amount, BlockHash, Network, TxId};

#[async_trait]
pub trait Provider: Send + Sync {
    /// The network this provider reads from.
    fn network(&self) -> Network;

    /// Transactions touching `address`, oldest first.
    ///
    /// Ordered by block height, then position within the block. Unconfirmed
    /// transactions come last.
    async fn list_transactions(&self, address: &Address) -> Result<Vec<TxId>, ProviderError>;

    async fn get_raw_transaction(&self, txid: &TxId) -> Result<RawTransaction, ProviderError>;

    async fn get_block(&self, hash: &BlockHash) -> Result<RawBlock, ProviderError>;

    async fn list_unspent(&self, address: &Address)
        -> Result<Vec<SpendableOutput>, ProviderError>;

    /// Choose unspent outputs of `address` covering `amount`.
    async fn select_inputs(
        &self,
        address: &Address,
        amount: Amount,
    ) -> Result<Vec<SpendableOutput>, ProviderError> {
        let unspent = self.list_unspent(address).await?;
        peervote_transactions::select_inputs(unspent, amount).map_err(|e| match e {
            TransactionError::InsufficientFunds { needed, available } => {
                ProviderError::InsufficientFunds { needed, available }
            }
            other => ProviderError::RequestFailed(other.to_string()),
        })
    }
}

#[async_trait]
impl<P: Provider + ?Sized> Provider for std::sync::Arc<P> {
    fn network(&self) -> Network {
        (**self).network()
    }

    async fn list_transactions(&self, address: &Address) -> Result<Vec<TxId>, ProviderError> {
        (**self).list_transactions(address).await
    }

    async fn get_raw_transaction(&self, txid: &TxId) -> Result<RawTransaction, ProviderError> {
        (**self).get_raw_transaction(txid).await
    }

    async fn get_block(&self, hash: &BlockHash) -> Result<RawBlock, ProviderError> {
        (**self).get_block(hash).await
    }

    async fn list_unspent(
        &self,
        address: &Address,
    ) -> Result<Vec<SpendableOutput>, ProviderError> {
        (**self).list_unspent(address).await
    }
}
