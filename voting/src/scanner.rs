//! Scan a deck's vote tag for proposals and ballots.
//!
//! Scans are lazy streams: the tag history is fetched on first poll and each
//! transaction on demand. Every call starts from the beginning of the
//! history unless a [`ScanCursor`] says otherwise. Transactions that do not
//! pay the tag, carry no data or fail to decode are skipped; provider
//! failures end the stream with an `Err` item.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use peervote_crypto::deck_vote_tag;
use peervote_protocol::{decode_vote_cast, decode_vote_init};
use peervote_provider::{find_tx_sender, Provider, ProviderError, RawTransaction};
use peervote_types::{Address, Deck, TxId};

use crate::validity::{ObservedCast, SeenSenders};
use crate::{ValidityEngine, Vote, VoteInit, VotingError};

/// Resume point for a proposal scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanCursor {
    /// Records mined at or below this height are skipped. Unmined records
    /// are always returned.
    pub after_block: u64,
}

impl ScanCursor {
    pub fn after(after_block: u64) -> Self {
        Self { after_block }
    }

    fn admits(&self, blocknum: Option<u64>) -> bool {
        blocknum.map_or(true, |height| height > self.after_block)
    }
}

/// Candidate transactions on a deck's tag, oldest first.
struct TagHistory<'a, P: ?Sized> {
    provider: &'a P,
    deck: Arc<Deck>,
    tag: Option<Address>,
    queue: VecDeque<TxId>,
    done: bool,
}

impl<'a, P: Provider + ?Sized> TagHistory<'a, P> {
    fn new(provider: &'a P, deck: Arc<Deck>) -> Self {
        Self {
            provider,
            deck,
            tag: None,
            queue: VecDeque::new(),
            done: false,
        }
    }

    async fn load(&mut self) -> Result<Address, VotingError> {
        let tag = deck_vote_tag(&self.deck)?;
        let txids = self.provider.list_transactions(&tag).await?;
        tracing::debug!(%tag, transactions = txids.len(), "loaded tag history");
        self.queue = txids.into();
        self.tag = Some(tag.clone());
        Ok(tag)
    }

    /// Next transaction paying the tag with a data output, and its payload.
    async fn next(&mut self) -> Option<Result<(RawTransaction, Vec<u8>), VotingError>> {
        if self.done {
            return None;
        }
        let tag = match self.tag.clone() {
            Some(tag) => tag,
            None => match self.load().await {
                Ok(tag) => tag,
                Err(e) => return Some(self.fail(e)),
            },
        };

        while let Some(txid) = self.queue.pop_front() {
            let tx = match self.provider.get_raw_transaction(&txid).await {
                Ok(tx) => tx,
                Err(e) => return Some(self.fail(e.into())),
            };
            if !tx.pays_to(&tag) {
                tracing::debug!(%txid, "skipping transaction that does not pay the tag");
                continue;
            }
            match tx.data() {
                Some(data) => return Some(Ok((tx, data))),
                None => tracing::debug!(%txid, "skipping transaction without data output"),
            }
        }
        self.done = true;
        None
    }

    /// Height of the block carrying `tx`, if mined.
    async fn blocknum(&self, tx: &RawTransaction) -> Result<Option<u64>, ProviderError> {
        match tx.blockhash {
            Some(hash) if tx.confirmations > 0 => {
                Ok(Some(self.provider.get_block(&hash).await?.height))
            }
            _ => Ok(None),
        }
    }

    fn fail<T>(&mut self, e: VotingError) -> Result<T, VotingError> {
        self.done = true;
        Err(e)
    }
}

/// Every proposal announced on `deck`'s tag, in ledger order.
pub fn find_vote_inits<'a, P: Provider + ?Sized>(
    provider: &'a P,
    deck: Arc<Deck>,
) -> impl Stream<Item = Result<VoteInit, VotingError>> + 'a {
    scan_inits(provider, deck, None)
}

/// Proposals mined after `cursor`, plus unmined ones, in ledger order.
pub fn find_vote_inits_from<'a, P: Provider + ?Sized>(
    provider: &'a P,
    deck: Arc<Deck>,
    cursor: ScanCursor,
) -> impl Stream<Item = Result<VoteInit, VotingError>> + 'a {
    scan_inits(provider, deck, Some(cursor))
}

fn scan_inits<'a, P: Provider + ?Sized>(
    provider: &'a P,
    deck: Arc<Deck>,
    cursor: Option<ScanCursor>,
) -> impl Stream<Item = Result<VoteInit, VotingError>> + 'a {
    let history = TagHistory::new(provider, deck);
    stream::unfold(history, move |mut history| async move {
        let item = next_init(&mut history, cursor).await?;
        Some((item, history))
    })
}

async fn next_init<P: Provider + ?Sized>(
    history: &mut TagHistory<'_, P>,
    cursor: Option<ScanCursor>,
) -> Option<Result<VoteInit, VotingError>> {
    loop {
        let (tx, data) = match history.next().await? {
            Ok(candidate) => candidate,
            Err(e) => return Some(Err(e)),
        };
        let record = match decode_vote_init(&data) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(txid = %tx.txid, error = %e, "skipping non-proposal data");
                continue;
            }
        };
        let blocknum = match history.blocknum(&tx).await {
            Ok(blocknum) => blocknum,
            Err(e) => return Some(history.fail(e.into())),
        };
        if let Some(cursor) = cursor {
            if !cursor.admits(blocknum) {
                continue;
            }
        }
        let sender = match find_tx_sender(history.provider, &tx).await {
            Ok(sender) => Some(sender),
            Err(ProviderError::NoSender(_)) => None,
            Err(e) => return Some(history.fail(e.into())),
        };
        let init = match VoteInit::new(Arc::clone(&history.deck), tx.txid, record) {
            Ok(init) => init.observed(sender, blocknum),
            Err(e) => {
                tracing::debug!(txid = %tx.txid, error = %e, "skipping invalid proposal");
                continue;
            }
        };
        tracing::debug!(vote = %init.id(), ?blocknum, "found vote init");
        return Some(Ok(init));
    }
}

struct CastScan<'a, P: ?Sized> {
    history: TagHistory<'a, P>,
    vote_init: Arc<VoteInit>,
    choice_index: Option<u32>,
    engine: &'a ValidityEngine,
    seen: SeenSenders,
}

/// Ballots for `vote_init`, judged by `engine`, in ledger order.
///
/// Duplicate detection sees every cast of the vote; `choice_index` only
/// filters what is yielded.
pub fn find_vote_casts<'a, P: Provider + ?Sized>(
    provider: &'a P,
    vote_init: Arc<VoteInit>,
    choice_index: Option<u32>,
    engine: &'a ValidityEngine,
) -> impl Stream<Item = Result<Vote, VotingError>> + 'a {
    let scan = CastScan {
        history: TagHistory::new(provider, Arc::clone(vote_init.deck())),
        vote_init,
        choice_index,
        engine,
        seen: SeenSenders::new(),
    };
    stream::unfold(scan, |mut scan| async move {
        let item = next_cast(&mut scan).await?;
        Some((item, scan))
    })
}

async fn next_cast<P: Provider + ?Sized>(
    scan: &mut CastScan<'_, P>,
) -> Option<Result<Vote, VotingError>> {
    loop {
        let (tx, data) = match scan.history.next().await? {
            Ok(candidate) => candidate,
            Err(e) => return Some(Err(e)),
        };
        let record = match decode_vote_cast(&data) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(txid = %tx.txid, error = %e, "skipping non-ballot data");
                continue;
            }
        };
        if record.vote_init_id != scan.vote_init.id() {
            continue;
        }
        if record.choice_index as usize >= scan.vote_init.choices().len() {
            tracing::debug!(
                txid = %tx.txid,
                choice = record.choice_index,
                "skipping ballot with unknown choice"
            );
            continue;
        }
        let sender = match find_tx_sender(scan.history.provider, &tx).await {
            Ok(sender) => sender,
            Err(ProviderError::NoSender(_)) => {
                tracing::debug!(txid = %tx.txid, "skipping ballot without sender");
                continue;
            }
            Err(e) => return Some(scan.history.fail(e.into())),
        };
        let blocknum = match scan.history.blocknum(&tx).await {
            Ok(blocknum) => blocknum,
            Err(e) => return Some(scan.history.fail(e.into())),
        };

        let vote = scan.engine.assess(
            &scan.vote_init,
            &mut scan.seen,
            ObservedCast {
                id: tx.txid,
                sender,
                blocknum,
                confirmations: tx.confirmations,
                timestamp: tx.blocktime,
                choice_index: record.choice_index,
            },
        );
        if scan.choice_index.is_some_and(|c| c != vote.choice_index) {
            continue;
        }
        tracing::debug!(txid = %vote.id, status = %vote.status, "found vote cast");
        return Some(Ok(vote));
    }
}
