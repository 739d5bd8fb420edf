//! HTTP client for an Iquidus-style block explorer.
//!
//! Endpoints used:
//! - `GET /api/getrawtransaction?txid={txid}&decrypt=1`
//! - `GET /api/getblock?hash={hash}`
//! - `GET /ext/getaddress/{address}` (history, newest first)
//! - `GET /ext/listunspent/{address}`

use std::time::Duration;

use async_trait::async_trait;
use peervote_transactions::SpendableOutput;
use peervote_types::{Address, Amount, BlockHash, Network, TxId};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{Provider, ProviderError, RawBlock, RawTransaction};

/// Default timeout for explorer requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// `listunspent` reports values in hundred-millionths of a coin.
const LISTUNSPENT_UNITS_PER_COIN: f64 = 100_000_000.0;

/// Marker text the explorer returns instead of JSON for unknown ids.
const EXPLORER_ERROR_TEXT: &str = "There was an error";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ExplorerConfig {
    /// Public explorer for `network`.
    pub fn default_url(network: Network) -> &'static str {
        match network {
            Network::Peercoin => "https://explorer.peercoin.net",
            Network::PeercoinTestnet => "https://testnet-explorer.peercoin.net",
        }
    }

    pub fn for_network(network: Network) -> Self {
        Self::with_url(Self::default_url(network))
    }

    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

pub struct ExplorerClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
    network: Network,
}

#[derive(Debug, Deserialize)]
struct AddressResponse {
    #[serde(default)]
    last_txs: Vec<AddressTx>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddressTx {
    /// The explorer puts the txid in this field.
    addresses: TxId,
}

#[derive(Debug, Deserialize)]
struct UnspentResponse {
    #[serde(default)]
    unspent_outputs: Vec<UnspentOutput>,
}

#[derive(Debug, Deserialize)]
struct UnspentOutput {
    tx_hash: TxId,
    /// Spelled this way by the explorer.
    tx_ouput_n: u32,
    value: f64,
    #[serde(default)]
    confirmations: u64,
    address: Address,
}

impl ExplorerClient {
    pub fn new(network: Network, config: ExplorerConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            network,
        }
    }

    /// Client for the public explorer of `network`.
    pub fn for_network(network: Network) -> Self {
        Self::new(network, ExplorerConfig::for_network(network))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str) -> Result<String, ProviderError> {
        let url = self.url(path);
        tracing::trace!(%url, "explorer request");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status.as_u16(), path));
        }

        response.text().await.map_err(map_reqwest_error)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let body = self.get_text(path).await?;
        parse_body(&body, path)
    }
}

impl Default for ExplorerClient {
    fn default() -> Self {
        Self::for_network(Network::Peercoin)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else if e.is_connect() {
        ProviderError::Unreachable(format!("connection failed: {e}"))
    } else {
        ProviderError::RequestFailed(e.to_string())
    }
}

fn status_error(status: u16, path: &str) -> ProviderError {
    match status {
        404 => ProviderError::NotFound(path.to_string()),
        429 => ProviderError::RateLimited,
        500..=599 => ProviderError::ServerError(status),
        _ => ProviderError::RequestFailed(format!("HTTP status {status}")),
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, path: &str) -> Result<T, ProviderError> {
    if body.trim_start().starts_with(EXPLORER_ERROR_TEXT) {
        return Err(ProviderError::NotFound(path.to_string()));
    }
    serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("{path}: {e}")))
}

/// Address history in ledger order, without repeats.
fn history_in_ledger_order(response: AddressResponse) -> Vec<TxId> {
    if let Some(error) = response.error {
        tracing::debug!(%error, "explorer has no history for address");
        return Vec::new();
    }
    let mut txids: Vec<TxId> = Vec::with_capacity(response.last_txs.len());
    for tx in response.last_txs.into_iter().rev() {
        if !txids.contains(&tx.addresses) {
            txids.push(tx.addresses);
        }
    }
    txids
}

fn to_spendable(output: UnspentOutput) -> SpendableOutput {
    SpendableOutput {
        txid: output.tx_hash,
        vout: output.tx_ouput_n,
        value: Amount::from_coins(output.value / LISTUNSPENT_UNITS_PER_COIN),
        address: output.address,
        confirmations: output.confirmations,
    }
}

#[async_trait]
impl Provider for ExplorerClient {
    fn network(&self) -> Network {
        self.network
    }

    async fn list_transactions(&self, address: &Address) -> Result<Vec<TxId>, ProviderError> {
        let response: AddressResponse = self
            .get_json(&format!("ext/getaddress/{address}"))
            .await?;
        Ok(history_in_ledger_order(response))
    }

    async fn get_raw_transaction(&self, txid: &TxId) -> Result<RawTransaction, ProviderError> {
        self.get_json(&format!("api/getrawtransaction?txid={txid}&decrypt=1"))
            .await
    }

    async fn get_block(&self, hash: &BlockHash) -> Result<RawBlock, ProviderError> {
        self.get_json(&format!("api/getblock?hash={hash}")).await
    }

    async fn list_unspent(
        &self,
        address: &Address,
    ) -> Result<Vec<SpendableOutput>, ProviderError> {
        let response: UnspentResponse = self
            .get_json(&format!("ext/listunspent/{address}"))
            .await?;
        Ok(response
            .unspent_outputs
            .into_iter()
            .map(to_spendable)
            .collect())
    }
}
