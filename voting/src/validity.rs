//! Validity rules for observed ballots.
//!
//! Applied in order, first failure wins:
//!
//! 0. unmined casts are pending;
//! 1. the carrying block must lie within `[start_block, end_block]`;
//! 2. the cast needs the configured number of confirmations;
//! 3. only a sender's earliest in-range cast counts;
//! 4. the sender must pass the [`SenderEligibility`] check.
//!
//! Rule 3 depends on every earlier cast of the same vote, so casts must be
//! assessed in ledger order through one [`SeenSenders`] record.

use std::collections::HashMap;
use std::sync::Arc;

use peervote_types::{Address, Timestamp, TxId};

use crate::{Vote, VoteInit, VoteStatus};

/// Confirmations a cast needs before it counts.
pub const DEFAULT_MIN_CONFIRMATIONS: u64 = 6;

/// Decides whether a sender may vote at all.
pub trait SenderEligibility: Send + Sync {
    fn is_eligible(&self, vote_init: &VoteInit, sender: &Address) -> bool;
}

/// Accepts every sender.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnySender;

impl SenderEligibility for AnySender {
    fn is_eligible(&self, _vote_init: &VoteInit, _sender: &Address) -> bool {
        true
    }
}

/// A decoded cast with the ledger context needed to judge it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservedCast {
    pub id: TxId,
    pub sender: Address,
    pub blocknum: Option<u64>,
    pub confirmations: u64,
    pub timestamp: Option<Timestamp>,
    pub choice_index: u32,
}

/// First in-range cast per sender, in ledger order.
#[derive(Clone, Debug, Default)]
pub struct SeenSenders {
    first: HashMap<Address, TxId>,
}

impl SeenSenders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as `sender`'s cast; returns the earlier one if any.
    fn claim(&mut self, sender: &Address, id: TxId) -> Option<TxId> {
        match self.first.get(sender) {
            Some(&earlier) if earlier != id => Some(earlier),
            Some(_) => None,
            None => {
                self.first.insert(sender.clone(), id);
                None
            }
        }
    }
}

#[derive(Clone)]
pub struct ValidityEngine {
    min_confirmations: u64,
    eligibility: Arc<dyn SenderEligibility>,
}

impl ValidityEngine {
    pub fn new(min_confirmations: u64) -> Self {
        Self {
            min_confirmations,
            eligibility: Arc::new(AnySender),
        }
    }

    pub fn with_eligibility(mut self, eligibility: Arc<dyn SenderEligibility>) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn min_confirmations(&self) -> u64 {
        self.min_confirmations
    }

    /// Judge one cast. Casts of the same vote must be passed in ledger order.
    pub fn assess(
        &self,
        vote_init: &Arc<VoteInit>,
        seen: &mut SeenSenders,
        cast: ObservedCast,
    ) -> Vote {
        let status = self.status(vote_init, seen, &cast);
        Vote {
            vote_init: Arc::clone(vote_init),
            id: cast.id,
            sender: cast.sender,
            blocknum: cast.blocknum,
            confirmations: cast.confirmations,
            timestamp: cast.timestamp,
            choice_index: cast.choice_index,
            status,
        }
    }

    /// Judge a whole ledger-ordered batch of casts.
    pub fn assess_all(
        &self,
        vote_init: &Arc<VoteInit>,
        casts: impl IntoIterator<Item = ObservedCast>,
    ) -> Vec<Vote> {
        let mut seen = SeenSenders::new();
        casts
            .into_iter()
            .map(|cast| self.assess(vote_init, &mut seen, cast))
            .collect()
    }

    fn status(&self, vote_init: &VoteInit, seen: &mut SeenSenders, cast: &ObservedCast) -> VoteStatus {
        let pending = VoteStatus::Pending {
            confirmations: cast.confirmations,
            required: self.min_confirmations,
        };

        let Some(blocknum) = cast.blocknum.filter(|_| cast.confirmations > 0) else {
            return pending;
        };

        if !vote_init.in_range(blocknum) {
            return VoteStatus::OutOfRange {
                blocknum,
                start: vote_init.start_block(),
                end: vote_init.end_block(),
            };
        }

        let earlier = seen.claim(&cast.sender, cast.id);

        if cast.confirmations < self.min_confirmations {
            return pending;
        }
        if let Some(earlier) = earlier {
            return VoteStatus::Duplicate { earlier };
        }
        if !self.eligibility.is_eligible(vote_init, &cast.sender) {
            return VoteStatus::Ineligible;
        }
        VoteStatus::Valid
    }
}

impl Default for ValidityEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIRMATIONS)
    }
}

impl std::fmt::Debug for ValidityEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidityEngine")
            .field("min_confirmations", &self.min_confirmations)
            .finish_non_exhaustive()
    }
}
