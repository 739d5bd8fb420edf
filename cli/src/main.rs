//! peervote: inspect deck votes from the command line.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use futures_util::{pin_mut, StreamExt, TryStreamExt};
use peervote_crypto::deck_vote_tag;
use peervote_protocol::{decode_vote_cast, decode_vote_init};
use peervote_provider::{ExplorerClient, ExplorerConfig, Provider, RetryingProvider};
use peervote_types::{Deck, Network, TxId};
use peervote_utils::{init_logging, LogFormat};
use peervote_voting::{
    find_vote_casts, find_vote_inits, tally_vote, VoteInit, VotingConfig,
};

#[derive(Parser)]
#[command(name = "peervote", about = "On-ledger deck voting")]
struct Cli {
    /// Network: "ppc" or "tppc".
    /// When a config file is provided, defaults to the file's network value.
    #[arg(long, env = "PEERVOTE_NETWORK")]
    network: Option<Network>,

    /// Explorer base URL (defaults to the network's public explorer).
    #[arg(long, env = "PEERVOTE_EXPLORER_URL")]
    explorer_url: Option<String>,

    /// Confirmations a ballot needs before it counts.
    #[arg(long, env = "PEERVOTE_MIN_CONFIRMATIONS")]
    min_confirmations: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "PEERVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "PEERVOTE_LOG_FORMAT")]
    log_format: Option<String>,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the vote tag address of a deck.
    Tag {
        /// Deck spawn transaction id.
        deck_id: TxId,
    },
    /// Decode hex-encoded vote metadata.
    Decode {
        hex: String,
        /// Decode a ballot instead of a proposal.
        #[arg(long)]
        cast: bool,
    },
    /// List vote proposals of a deck.
    Inits { deck_id: TxId },
    /// List ballots of a vote with their status.
    Casts {
        deck_id: TxId,
        vote_id: TxId,
        /// Only show ballots for this choice index.
        #[arg(long)]
        choice: Option<u32>,
    },
    /// Count the valid ballots of a vote.
    Tally { deck_id: TxId, vote_id: TxId },
}

fn load_config(cli: &Cli) -> anyhow::Result<VotingConfig> {
    let mut config = match &cli.config {
        Some(path) => VotingConfig::from_toml_file(path)?,
        None => VotingConfig::default(),
    };
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(url) = &cli.explorer_url {
        config.explorer_url = Some(url.clone());
    }
    if let Some(min) = cli.min_confirmations {
        config.min_confirmations = min;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

fn explorer(config: &VotingConfig) -> RetryingProvider<ExplorerClient> {
    let explorer_config = match &config.explorer_url {
        Some(url) => ExplorerConfig::with_url(url.as_str()),
        None => ExplorerConfig::for_network(config.network),
    };
    RetryingProvider::new(
        ExplorerClient::new(config.network, explorer_config),
        config.retry.clone(),
    )
}

async fn find_vote<P: Provider + ?Sized>(
    provider: &P,
    deck: Arc<Deck>,
    vote_id: TxId,
) -> anyhow::Result<Arc<VoteInit>> {
    let inits = find_vote_inits(provider, deck);
    pin_mut!(inits);
    while let Some(init) = inits.next().await {
        let init = init?;
        if init.id() == vote_id {
            return Ok(Arc::new(init));
        }
    }
    bail!("vote {vote_id} not found on this deck's tag")
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.log_format.parse()?;
    init_logging(format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    let deck = |id: TxId| Arc::new(Deck::new(id, config.network));

    match cli.command {
        Command::Tag { deck_id } => {
            println!("{}", deck_vote_tag(&deck(deck_id))?);
        }
        Command::Decode { hex, cast } => {
            let bytes = hex::decode(hex.trim()).context("metadata is not valid hex")?;
            if cast {
                print_json(&decode_vote_cast(&bytes)?)?;
            } else {
                print_json(&decode_vote_init(&bytes)?)?;
            }
        }
        Command::Inits { deck_id } => {
            let provider = explorer(&config);
            let inits: Vec<VoteInit> = find_vote_inits(&provider, deck(deck_id))
                .try_collect()
                .await?;
            if cli.json {
                print_json(&inits)?;
            } else {
                for init in &inits {
                    println!(
                        "{}  blocks {}..={}  {}  {:?}  {}",
                        init.id(),
                        init.start_block(),
                        init.end_block(),
                        init.count_mode().name(),
                        init.choices(),
                        init.description()
                    );
                }
            }
        }
        Command::Casts {
            deck_id,
            vote_id,
            choice,
        } => {
            let provider = explorer(&config);
            let engine = config.validity_engine();
            let vote = find_vote(&provider, deck(deck_id), vote_id).await?;
            let votes: Vec<_> = find_vote_casts(&provider, vote, choice, &engine)
                .try_collect()
                .await?;
            if cli.json {
                print_json(&votes)?;
            } else {
                for v in &votes {
                    println!(
                        "{}  {}  {}  {}",
                        v.id,
                        v.sender,
                        v.choice().unwrap_or("?"),
                        v.status
                    );
                }
            }
        }
        Command::Tally { deck_id, vote_id } => {
            let provider = explorer(&config);
            let engine = config.validity_engine();
            let vote = find_vote(&provider, deck(deck_id), vote_id).await?;
            let result = tally_vote(&provider, Arc::clone(&vote), &engine).await?;
            if cli.json {
                print_json(&result)?;
            } else {
                for (index, label) in vote.choices().iter().enumerate() {
                    println!("{index}  {label}: {}", result.count(index as u32));
                }
                match result.winner() {
                    Some(w) => println!("winner: {}", vote.choices()[w as usize]),
                    None => println!("winner: none"),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let cli = Cli::parse_from([
            "peervote",
            "--network",
            "tppc",
            "--min-confirmations",
            "3",
            "tag",
            "7ee8026f5292f4953b741cc3259e1c66742a095e038642e09d6f22c2438b4467",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.network, Network::PeercoinTestnet);
        assert_eq!(config.min_confirmations, 3);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn casts_accepts_choice_filter() {
        let cli = Cli::parse_from([
            "peervote",
            "casts",
            "7ee8026f5292f4953b741cc3259e1c66742a095e038642e09d6f22c2438b4467",
            "0fce7f493038abb8aaa8f5b3e8130d01e5804c8dee9a19202c6cceae7c8e5e27",
            "--choice",
            "1",
        ]);
        assert!(matches!(cli.command, Command::Casts { choice: Some(1), .. }));
    }

    #[test]
    fn invalid_deck_id_rejected() {
        assert!(Cli::try_parse_from(["peervote", "tag", "zz"]).is_err());
    }
}
