use anyhow::{ensure, Result};
use clap::Parser;
use ethers_core::types::Address;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::DEFAULT_TOKEN_ADDRESS;

/// Show the claim state of a token drop for a wallet.
#[derive(Clone, Debug, Parser)]
#[clap(name = "claim-drop", version)]
pub struct Options {
    /// Address of the token drop contract.
    #[clap(
        long,
        env = "CLAIM_DROP_TOKEN_ADDRESS",
        default_value = DEFAULT_TOKEN_ADDRESS,
        value_parser = parse_address,
    )]
    pub token_address: Address,

    /// JSON file holding claim data keyed by contract address.
    #[clap(long, env = "CLAIM_DROP_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Wallet to check eligibility for. Without one the claim is never enabled.
    #[clap(long, env = "CLAIM_DROP_WALLET", value_parser = parse_address)]
    pub wallet: Option<Address>,

    /// Number of units to claim.
    #[clap(long, env = "CLAIM_DROP_QUANTITY", default_value = "1")]
    pub quantity: u64,

    /// Keep polling the snapshot and print the page whenever it changes.
    #[clap(long)]
    pub watch: bool,

    /// Seconds between polls in watch mode.
    #[clap(long, env = "CLAIM_DROP_POLL_INTERVAL_SECS", default_value = "7")]
    pub poll_interval_secs: u64,

    /// Print the page as JSON instead of text.
    #[clap(long)]
    pub json: bool,

    /// Print Prometheus metrics on exit.
    #[clap(long)]
    pub metrics: bool,

    #[clap(long, env = "CLAIM_DROP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.token_address.is_zero(),
            "token address must not be the zero address"
        );
        ensure!(
            !self.watch || self.poll_interval_secs > 0,
            "poll interval must be at least one second"
        );
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.trim()
        .parse::<Address>()
        .map_err(|err| format!("invalid address {s:?}: {err}"))
}
