//! Nullable provider: an in-memory ledger for testing.

use async_trait::async_trait;
use peervote_provider::{Provider, ProviderError, RawBlock, RawInput, RawOutput, RawTransaction};
use peervote_transactions::{SpendableOutput, TxOutput, UnsignedTransaction};
use peervote_types::{Address, Amount, BlockHash, Network, Timestamp, TxId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Block time of height 1.
const GENESIS_TIME: u64 = 1_500_000_000;

/// Seconds between blocks.
const BLOCK_SPACING: u64 = 600;

struct Entry {
    vin: Vec<RawInput>,
    vout: Vec<RawOutput>,
    /// `None` while in the mempool.
    height: Option<u64>,
}

#[derive(Default)]
struct Ledger {
    /// Block hash at height `index + 1`.
    blocks: Vec<BlockHash>,
    txs: HashMap<TxId, Entry>,
    /// Every txid in ledger order. Mempool entries are always at the tail.
    order: Vec<TxId>,
    spent: HashSet<(TxId, u32)>,
    next_id: u64,
}

impl Ledger {
    fn tip(&self) -> u64 {
        self.blocks.len() as u64
    }

    fn next_txid(&mut self) -> TxId {
        self.next_id += 1;
        let mut bytes = [0u8; 32];
        bytes[0] = 0x7c;
        bytes[24..].copy_from_slice(&self.next_id.to_be_bytes());
        TxId::new(bytes)
    }

    fn confirmations(&self, height: Option<u64>) -> u64 {
        height.map_or(0, |h| self.tip() - h + 1)
    }

    fn touches(&self, entry: &Entry, address: &Address) -> bool {
        let pays = entry
            .vout
            .iter()
            .any(|o| o.addresses().any(|a| a == address));
        let spends = entry.vin.iter().any(|input| {
            input
                .outpoint()
                .and_then(|(txid, vout)| self.txs.get(&txid)?.vout.iter().find(|o| o.n == vout))
                .is_some_and(|o| o.addresses().any(|a| a == address))
        });
        pays || spends
    }
}

/// An in-memory ledger implementing [`Provider`].
///
/// Transactions enter the mempool and are confirmed by the next
/// [`mine_block`](Self::mine_block). Thread-safe for use with tokio's
/// multi-threaded runtime.
pub struct NullProvider {
    network: Network,
    ledger: Mutex<Ledger>,
    failures: Mutex<VecDeque<ProviderError>>,
    calls: AtomicUsize,
}

impl NullProvider {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            ledger: Mutex::new(Ledger::default()),
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A ledger with `height` empty blocks already mined.
    pub fn with_height(network: Network, height: u64) -> Self {
        let provider = Self::new(network);
        provider.mine_blocks(height);
        provider
    }

    pub fn height(&self) -> u64 {
        self.ledger.lock().unwrap().tip()
    }

    /// Mine one block holding every mempool transaction. Returns its height.
    pub fn mine_block(&self) -> u64 {
        let mut ledger = self.ledger.lock().unwrap();
        let height = ledger.tip() + 1;
        let mut bytes = [0u8; 32];
        bytes[0] = 0xb1;
        bytes[24..].copy_from_slice(&height.to_be_bytes());
        ledger.blocks.push(BlockHash::new(bytes));
        for entry in ledger.txs.values_mut() {
            if entry.height.is_none() {
                entry.height = Some(height);
            }
        }
        height
    }

    pub fn mine_blocks(&self, count: u64) {
        for _ in 0..count {
            self.mine_block();
        }
    }

    /// Add a transaction with the given inputs and outputs to the mempool.
    pub fn insert(&self, vin: Vec<RawInput>, vout: Vec<RawOutput>) -> TxId {
        let mut ledger = self.ledger.lock().unwrap();
        let txid = ledger.next_txid();
        for input in &vin {
            if let Some(outpoint) = input.outpoint() {
                ledger.spent.insert(outpoint);
            }
        }
        ledger.txs.insert(
            txid,
            Entry {
                vin,
                vout,
                height: None,
            },
        );
        ledger.order.push(txid);
        txid
    }

    /// Create a coin paying `value` to `address` out of nothing.
    pub fn fund(&self, address: &Address, value: Amount) -> SpendableOutput {
        let coinbase = RawInput {
            txid: None,
            vout: None,
            coinbase: Some("00".into()),
        };
        let txid = self.insert(
            vec![coinbase],
            vec![RawOutput::payment(0, address.clone(), value)],
        );
        SpendableOutput {
            txid,
            vout: 0,
            value,
            address: address.clone(),
            confirmations: 0,
        }
    }

    /// Put an assembled transaction into the mempool.
    pub fn submit(&self, tx: &UnsignedTransaction) -> TxId {
        let vin = tx
            .inputs
            .iter()
            .map(|i| RawInput::spending(i.txid, i.vout))
            .collect();
        let vout = tx
            .outputs
            .iter()
            .enumerate()
            .map(|(n, output)| match output {
                TxOutput::Payment { address, value } => {
                    RawOutput::payment(n as u32, address.clone(), *value)
                }
                TxOutput::Data(bytes) => RawOutput::data_output(n as u32, bytes),
            })
            .collect();
        self.insert(vin, vout)
    }

    /// Send `outputs` from `sender`, funding it with a fresh coin first.
    pub fn submit_from(&self, sender: &Address, outputs: Vec<RawOutput>) -> TxId {
        let coin = self.fund(sender, Amount::new(1_000_000));
        self.insert(vec![RawInput::spending(coin.txid, coin.vout)], outputs)
    }

    /// Make the next provider call fail with `error`. Queued errors are
    /// returned in order, one per call.
    pub fn fail_next(&self, error: ProviderError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Number of provider calls served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Provider for NullProvider {
    fn network(&self) -> Network {
        self.network
    }

    async fn list_transactions(&self, address: &Address) -> Result<Vec<TxId>, ProviderError> {
        self.enter()?;
        let ledger = self.ledger.lock().unwrap();
        Ok(ledger
            .order
            .iter()
            .filter(|txid| ledger.touches(&ledger.txs[*txid], address))
            .copied()
            .collect())
    }

    async fn get_raw_transaction(&self, txid: &TxId) -> Result<RawTransaction, ProviderError> {
        self.enter()?;
        let ledger = self.ledger.lock().unwrap();
        let entry = ledger
            .txs
            .get(txid)
            .ok_or_else(|| ProviderError::NotFound(txid.to_string()))?;
        Ok(RawTransaction {
            txid: *txid,
            confirmations: ledger.confirmations(entry.height),
            blocktime: entry
                .height
                .map(|h| Timestamp::new(GENESIS_TIME + (h - 1) * BLOCK_SPACING)),
            blockhash: entry.height.map(|h| ledger.blocks[(h - 1) as usize]),
            vin: entry.vin.clone(),
            vout: entry.vout.clone(),
        })
    }

    async fn get_block(&self, hash: &BlockHash) -> Result<RawBlock, ProviderError> {
        self.enter()?;
        let ledger = self.ledger.lock().unwrap();
        ledger
            .blocks
            .iter()
            .position(|b| b == hash)
            .map(|index| RawBlock {
                hash: *hash,
                height: index as u64 + 1,
            })
            .ok_or_else(|| ProviderError::NotFound(hash.to_string()))
    }

    async fn list_unspent(
        &self,
        address: &Address,
    ) -> Result<Vec<SpendableOutput>, ProviderError> {
        self.enter()?;
        let ledger = self.ledger.lock().unwrap();
        let mut unspent = Vec::new();
        for txid in &ledger.order {
            let entry = &ledger.txs[txid];
            for output in &entry.vout {
                if output.value.is_zero()
                    || ledger.spent.contains(&(*txid, output.n))
                    || !output.addresses().any(|a| a == address)
                {
                    continue;
                }
                unspent.push(SpendableOutput {
                    txid: *txid,
                    vout: output.n,
                    value: output.value,
                    address: address.clone(),
                    confirmations: ledger.confirmations(entry.height),
                });
            }
        }
        Ok(unspent)
    }
}
