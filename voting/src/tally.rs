//! Aggregate valid ballots into per-choice counts.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures_util::{pin_mut, StreamExt};
use peervote_protocol::CountMode;
use peervote_provider::Provider;
use serde::Serialize;

use crate::{find_vote_casts, ValidityEngine, Vote, VoteInit, VotingError};

/// Vote counts keyed by choice index. Every choice has an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    counts: BTreeMap<u32, u64>,
}

impl Tally {
    pub fn count(&self, choice_index: u32) -> u64 {
        self.counts.get(&choice_index).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<u32, u64> {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// The choice with the most votes; `None` on a tie or with no votes.
    pub fn winner(&self) -> Option<u32> {
        let max = *self.counts.values().max()?;
        if max == 0 {
            return None;
        }
        let mut leaders = self.counts.iter().filter(|&(_, &n)| n == max);
        let (&choice, _) = leaders.next()?;
        match leaders.next() {
            Some(_) => None,
            None => Some(choice),
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(choice, n)| format!("{choice}: {n}"))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Count the valid ballots of `vote_init`. One valid ballot is one vote.
///
/// Ballots for other votes and ballots that are not valid are ignored.
pub fn tally<'v>(
    vote_init: &VoteInit,
    votes: impl IntoIterator<Item = &'v Vote>,
) -> Result<Tally, VotingError> {
    if vote_init.count_mode() != CountMode::Simple {
        return Err(VotingError::UnsupportedCountMode(vote_init.count_mode().name()));
    }

    let mut counts: BTreeMap<u32, u64> = (0..vote_init.choices().len() as u32)
        .map(|choice| (choice, 0))
        .collect();
    for vote in votes {
        if vote.vote_init.id() != vote_init.id() || !vote.is_valid() {
            continue;
        }
        if let Some(n) = counts.get_mut(&vote.choice_index) {
            *n += 1;
        }
    }
    Ok(Tally { counts })
}

/// Scan the ledger for `vote_init`'s ballots and count them.
pub async fn tally_vote<P: Provider + ?Sized>(
    provider: &P,
    vote_init: Arc<VoteInit>,
    engine: &ValidityEngine,
) -> Result<Tally, VotingError> {
    if vote_init.count_mode() != CountMode::Simple {
        return Err(VotingError::UnsupportedCountMode(vote_init.count_mode().name()));
    }

    let casts = find_vote_casts(provider, Arc::clone(&vote_init), None, engine);
    pin_mut!(casts);
    let mut votes = Vec::new();
    while let Some(vote) = casts.next().await {
        votes.push(vote?);
    }

    let result = tally(&vote_init, &votes)?;
    tracing::info!(
        vote = %vote_init.id(),
        casts = votes.len(),
        counted = result.total(),
        "tallied vote"
    );
    Ok(result)
}
