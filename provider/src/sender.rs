use peervote_types::Address;

use crate::{Provider, ProviderError, RawTransaction};

/// The address that funded `tx`.
///
/// Taken as the first address of the output spent by the first input.
/// Coinbase transactions have no sender.
pub async fn find_tx_sender<P: Provider + ?Sized>(
    provider: &P,
    tx: &RawTransaction,
) -> Result<Address, ProviderError> {
    let no_sender = || ProviderError::NoSender(tx.txid.to_string());

    let (prev_txid, prev_vout) = tx
        .vin
        .first()
        .and_then(|input| input.outpoint())
        .ok_or_else(no_sender)?;

    let prev = provider.get_raw_transaction(&prev_txid).await?;
    prev.vout
        .iter()
        .find(|o| o.n == prev_vout)
        .and_then(|o| o.addresses().next().cloned())
        .ok_or_else(no_sender)
}
