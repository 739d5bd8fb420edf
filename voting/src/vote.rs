//! Vote proposals and materialized ballots.

use std::fmt;
use std::sync::Arc;

use peervote_protocol::{CountMode, VoteCastRecord, VoteInitRecord, PROTOCOL_VERSION};
use peervote_types::{Address, Deck, Timestamp, TxId};
use serde::Serialize;

use crate::VotingError;

/// A vote proposal attached to a deck.
///
/// Immutable once built. Ballots refer to it by [`id`](Self::id), which is
/// the id of the transaction carrying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VoteInit {
    deck: Arc<Deck>,
    id: TxId,
    sender: Option<Address>,
    /// Height of the carrying block, once mined.
    blocknum: Option<u64>,
    #[serde(flatten)]
    record: VoteInitRecord,
}

impl VoteInit {
    /// Build a proposal, checking choices and block range.
    pub fn new(deck: Arc<Deck>, id: TxId, record: VoteInitRecord) -> Result<Self, VotingError> {
        record
            .validate()
            .map_err(|e| VotingError::InvalidVoteInit(e.to_string()))?;
        Ok(Self {
            deck,
            id,
            sender: None,
            blocknum: None,
            record,
        })
    }

    /// A SIMPLE-mode proposal at the current protocol version.
    pub fn simple(
        deck: Arc<Deck>,
        id: TxId,
        description: impl Into<String>,
        start_block: u32,
        end_block: u32,
        choices: &[&str],
    ) -> Result<Self, VotingError> {
        let record = VoteInitRecord {
            version: PROTOCOL_VERSION,
            description: description.into(),
            start_block,
            end_block,
            count_mode: CountMode::Simple,
            choices: choices.iter().map(|c| c.to_string()).collect(),
            vote_metainfo: Vec::new(),
        };
        Self::new(deck, id, record)
    }

    /// Attach ledger context observed while scanning.
    pub(crate) fn observed(mut self, sender: Option<Address>, blocknum: Option<u64>) -> Self {
        self.sender = sender;
        self.blocknum = blocknum;
        self
    }

    pub fn deck(&self) -> &Arc<Deck> {
        &self.deck
    }

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    pub fn blocknum(&self) -> Option<u64> {
        self.blocknum
    }

    pub fn record(&self) -> &VoteInitRecord {
        &self.record
    }

    pub fn version(&self) -> u32 {
        self.record.version
    }

    pub fn description(&self) -> &str {
        &self.record.description
    }

    pub fn start_block(&self) -> u32 {
        self.record.start_block
    }

    pub fn end_block(&self) -> u32 {
        self.record.end_block
    }

    pub fn count_mode(&self) -> CountMode {
        self.record.count_mode
    }

    pub fn choices(&self) -> &[String] {
        &self.record.choices
    }

    pub fn vote_metainfo(&self) -> &[u8] {
        &self.record.vote_metainfo
    }

    /// Whether `height` lies within `[start_block, end_block]`.
    pub fn in_range(&self, height: u64) -> bool {
        (self.start_block() as u64..=self.end_block() as u64).contains(&height)
    }

    /// The ballot record for `choice_index`.
    pub fn cast(&self, choice_index: u32) -> Result<VoteCastRecord, VotingError> {
        if choice_index as usize >= self.choices().len() {
            return Err(VotingError::InvalidChoice {
                index: choice_index,
                choices: self.choices().len(),
            });
        }
        Ok(VoteCastRecord {
            vote_init_id: self.id,
            choice_index,
        })
    }
}

/// Outcome of the validity rules for one ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoteStatus {
    Valid,
    /// Not yet decidable. Re-scanning later may change it.
    Pending { confirmations: u64, required: u64 },
    /// Mined outside the vote's block range. Final.
    OutOfRange { blocknum: u64, start: u32, end: u32 },
    /// The sender already voted in an earlier transaction. Final.
    Duplicate { earlier: TxId },
    /// The sender may not vote. Final.
    Ineligible,
}

impl VoteStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Whether a later scan may report a different status.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

impl fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Pending {
                confirmations,
                required,
            } => write!(f, "pending ({confirmations}/{required} confirmations)"),
            Self::OutOfRange {
                blocknum,
                start,
                end,
            } => write!(f, "out of range (block {blocknum} not in {start}..={end})"),
            Self::Duplicate { earlier } => write!(f, "duplicate of {earlier}"),
            Self::Ineligible => f.write_str("ineligible sender"),
        }
    }
}

/// A ballot as observed on the ledger, with its validity decided.
///
/// A snapshot: `confirmations` and `status` are fixed at scan time. A
/// `Pending` status is not updated as blocks arrive; rescan with
/// [`find_vote_casts`](crate::find_vote_casts) to get a current verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Vote {
    #[serde(skip)]
    pub vote_init: Arc<VoteInit>,
    /// Id of the carrying transaction.
    pub id: TxId,
    pub sender: Address,
    /// `None` while unmined.
    pub blocknum: Option<u64>,
    pub confirmations: u64,
    pub timestamp: Option<Timestamp>,
    pub choice_index: u32,
    pub status: VoteStatus,
}

impl Vote {
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// The chosen option's label.
    pub fn choice(&self) -> Option<&str> {
        self.vote_init
            .choices()
            .get(self.choice_index as usize)
            .map(String::as_str)
    }
}
