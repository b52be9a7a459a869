//! # Node Configuration
//!
//! Selects a network from the parameter table and applies environment
//! overrides.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RAFFLE_NETWORK` | `hardhat` | Network name |
//! | `RAFFLE_ENTRANCE_FEE` | network fee | Entrance fee in ether |
//! | `RAFFLE_INTERVAL_SECS` | network interval | Seconds between settlements |
//! | `RAFFLE_KEEPER_POLL_MS` | `1000` | Keeper poll period |
//! | `RAFFLE_ORACLE_DELAY_MS` | `2000` | Delay before the relay fulfils a request |
//! | `RAFFLE_DEMO_PLAYERS` | `3` | Demo entrants per round, 0 disables |

use crate::networks::{self, NetworkError, NetworkParams};
use raffle_engine::{ConfigError, RaffleConfig};
use shared_types::{parse_ether, UnitsError, U256, WEI_PER_ETHER};
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_NETWORK: &str = "hardhat";
pub const DEFAULT_KEEPER_POLL_MS: u64 = 1_000;
pub const DEFAULT_ORACLE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_DEMO_PLAYERS: usize = 3;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum NodeConfigError {
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("invalid entrance fee: {0}")]
    EntranceFee(#[from] UnitsError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("invalid raffle configuration: {0}")]
    Raffle(#[from] ConfigError),
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub network: &'static NetworkParams,
    /// Entrance fee in wei.
    pub entrance_fee: U256,
    pub interval_secs: u64,
    pub keeper_poll: Duration,
    pub oracle_delay: Duration,
    pub demo_players: usize,
    /// Initial subscription funding on development networks (2 LINK).
    pub vrf_fund_amount: U256,
}

impl NodeConfig {
    /// Load from process environment.
    pub fn from_env() -> Result<Self, NodeConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NodeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = lookup("RAFFLE_NETWORK").unwrap_or_else(|| DEFAULT_NETWORK.to_string());
        let network = networks::lookup(&name).ok_or(NodeConfigError::UnknownNetwork(name))?;

        let fee = lookup("RAFFLE_ENTRANCE_FEE").unwrap_or_else(|| network.entrance_fee.to_string());
        let entrance_fee = parse_ether(&fee)?;

        let interval_secs = parse_var(&lookup, "RAFFLE_INTERVAL_SECS")?.unwrap_or(network.interval_secs);
        let keeper_poll_ms =
            parse_var(&lookup, "RAFFLE_KEEPER_POLL_MS")?.unwrap_or(DEFAULT_KEEPER_POLL_MS);
        let oracle_delay_ms =
            parse_var(&lookup, "RAFFLE_ORACLE_DELAY_MS")?.unwrap_or(DEFAULT_ORACLE_DELAY_MS);
        let demo_players = parse_var(&lookup, "RAFFLE_DEMO_PLAYERS")?.unwrap_or(DEFAULT_DEMO_PLAYERS);

        if keeper_poll_ms == 0 {
            return Err(NodeConfigError::InvalidValue {
                var: "RAFFLE_KEEPER_POLL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            network,
            entrance_fee,
            interval_secs,
            keeper_poll: Duration::from_millis(keeper_poll_ms),
            oracle_delay: Duration::from_millis(oracle_delay_ms),
            demo_players,
            vrf_fund_amount: U256::from(2u64) * U256::from(WEI_PER_ETHER),
        })
    }

    /// Raffle configuration for the given subscription.
    pub fn raffle_config(&self, subscription_id: u64) -> Result<RaffleConfig, NodeConfigError> {
        Ok(RaffleConfig::builder()
            .entrance_fee(self.entrance_fee)
            .interval_secs(self.interval_secs)
            .key_hash(self.network.key_hash_bytes()?)
            .subscription_id(subscription_id)
            .callback_gas_limit(self.network.callback_gas_limit)
            .build()?)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, NodeConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| NodeConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_follow_hardhat() {
        let config = NodeConfig::from_lookup(vars(&[])).unwrap();
        assert_eq!(config.network.name, "hardhat");
        assert_eq!(config.entrance_fee, parse_ether("0.01").unwrap());
        assert_eq!(config.interval_secs, 20);
        assert_eq!(config.keeper_poll, Duration::from_millis(DEFAULT_KEEPER_POLL_MS));
        assert_eq!(config.demo_players, DEFAULT_DEMO_PLAYERS);
        assert_eq!(config.vrf_fund_amount, parse_ether("2").unwrap());
    }

    #[test]
    fn test_overrides() {
        let config = NodeConfig::from_lookup(vars(&[
            ("RAFFLE_NETWORK", "localhost"),
            ("RAFFLE_ENTRANCE_FEE", "0.5"),
            ("RAFFLE_INTERVAL_SECS", "5"),
            ("RAFFLE_ORACLE_DELAY_MS", "10"),
            ("RAFFLE_DEMO_PLAYERS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.network.name, "localhost");
        assert_eq!(config.entrance_fee, parse_ether("0.5").unwrap());
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.oracle_delay, Duration::from_millis(10));
        assert_eq!(config.demo_players, 0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            NodeConfig::from_lookup(vars(&[("RAFFLE_NETWORK", "mainnet")])),
            Err(NodeConfigError::UnknownNetwork(_))
        ));
        assert!(matches!(
            NodeConfig::from_lookup(vars(&[("RAFFLE_INTERVAL_SECS", "soon")])),
            Err(NodeConfigError::InvalidValue { var: "RAFFLE_INTERVAL_SECS", .. })
        ));
        assert!(matches!(
            NodeConfig::from_lookup(vars(&[("RAFFLE_ENTRANCE_FEE", "1.2.3")])),
            Err(NodeConfigError::EntranceFee(_))
        ));
        assert!(matches!(
            NodeConfig::from_lookup(vars(&[("RAFFLE_KEEPER_POLL_MS", "0")])),
            Err(NodeConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_raffle_config_uses_network_routing() {
        let config = NodeConfig::from_lookup(vars(&[])).unwrap();
        let raffle = config.raffle_config(1).unwrap();
        assert_eq!(raffle.routing.subscription_id, 1);
        assert_eq!(raffle.routing.callback_gas_limit, 500_000);
        assert_eq!(raffle.routing.key_hash[0], 0xd8);
    }
}
