//! Retry transient provider failures with exponential backoff.
//!
//! The first retry waits `initial_backoff_ms`; every following one doubles
//! the wait up to `max_backoff_ms`. Permanent errors are returned at once.
//! When all attempts fail, the last error is surfaced.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use peervote_transactions::SpendableOutput;
use peervote_types::{Address, BlockHash, Network, TxId};
use serde::{Deserialize, Serialize};

use crate::{Provider, ProviderError, RawBlock, RawTransaction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    8_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Wait before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }

    /// Run `op` until it succeeds, fails permanently or attempts run out.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut retry = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && retry + 1 < attempts => {
                    let wait = self.backoff(retry);
                    tracing::warn!(
                        request = what,
                        attempt = retry + 1,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "transient provider error, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Wraps a provider and retries its transient failures.
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: Provider> RetryingProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<P: Provider> Provider for RetryingProvider<P> {
    fn network(&self) -> Network {
        self.inner.network()
    }

    async fn list_transactions(&self, address: &Address) -> Result<Vec<TxId>, ProviderError> {
        self.policy
            .run("list_transactions", || self.inner.list_transactions(address))
            .await
    }

    async fn get_raw_transaction(&self, txid: &TxId) -> Result<RawTransaction, ProviderError> {
        self.policy
            .run("get_raw_transaction", || self.inner.get_raw_transaction(txid))
            .await
    }

    async fn get_block(&self, hash: &BlockHash) -> Result<RawBlock, ProviderError> {
        self.policy
            .run("get_block", || self.inner.get_block(hash))
            .await
    }

    async fn list_unspent(
        &self,
        address: &Address,
    ) -> Result<Vec<SpendableOutput>, ProviderError> {
        self.policy
            .run("list_unspent", || self.inner.list_unspent(address))
            .await
    }
}
