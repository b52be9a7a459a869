//! # Network Parameters
//!
//! Per-network deployment parameters. Development networks run against the
//! bundled mock coordinator; live networks carry the real coordinator
//! address and subscription for reference.

use shared_types::{Address, AddressParseError, SubscriptionId};
use thiserror::Error;

/// Whether a network is served by the bundled mock coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    Development,
    Live,
}

/// Deployment parameters for one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    pub name: &'static str,
    pub chain_id: u64,
    pub kind: NetworkKind,
    /// Coordinator contract, live networks only.
    pub coordinator: Option<&'static str>,
    /// Gas lane, hex without prefix.
    pub key_hash: &'static str,
    /// Live subscription. Development networks create their own.
    pub subscription_id: Option<SubscriptionId>,
    pub callback_gas_limit: u32,
    pub interval_secs: u64,
    /// Entrance fee in ether.
    pub entrance_fee: &'static str,
}

/// Error decoding network parameters.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("invalid key hash: {0}")]
    KeyHash(#[from] hex::FromHexError),

    #[error("invalid coordinator address: {0}")]
    Coordinator(#[from] AddressParseError),
}

const DEV_KEY_HASH: &str = "d89b2bf150e3b9e13446986e571fb9cab24b13cea0a43ea20a6049a85cc807cc";

/// Known networks.
pub const NETWORKS: &[NetworkParams] = &[
    NetworkParams {
        name: "hardhat",
        chain_id: 31337,
        kind: NetworkKind::Development,
        coordinator: None,
        key_hash: DEV_KEY_HASH,
        subscription_id: None,
        callback_gas_limit: 500_000,
        interval_secs: 20,
        entrance_fee: "0.01",
    },
    NetworkParams {
        name: "localhost",
        chain_id: 31337,
        kind: NetworkKind::Development,
        coordinator: None,
        key_hash: DEV_KEY_HASH,
        subscription_id: None,
        callback_gas_limit: 500_000,
        interval_secs: 20,
        entrance_fee: "0.01",
    },
    NetworkParams {
        name: "goerli",
        chain_id: 5,
        kind: NetworkKind::Live,
        coordinator: Some("0x6168499c0cFfCaCD319c818142124B7A15E857ab"),
        key_hash: DEV_KEY_HASH,
        subscription_id: Some(21057),
        callback_gas_limit: 500_000,
        interval_secs: 20,
        entrance_fee: "0.01",
    },
];

/// Look up a network by name (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static NetworkParams> {
    NETWORKS
        .iter()
        .find(|network| network.name.eq_ignore_ascii_case(name))
}

impl NetworkParams {
    pub fn is_development(&self) -> bool {
        self.kind == NetworkKind::Development
    }

    pub fn key_hash_bytes(&self) -> Result<[u8; 32], NetworkError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(self.key_hash, &mut bytes)?;
        Ok(bytes)
    }

    pub fn coordinator_address(&self) -> Result<Option<Address>, NetworkError> {
        Ok(self.coordinator.map(str::parse::<Address>).transpose()?)
    }
}
