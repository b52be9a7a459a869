//! Raffle configuration, fixed at construction.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use shared_types::{SubscriptionId, U256};

/// Upper bound on words per request accepted by the coordinator.
pub const MAX_NUM_WORDS: u32 = 500;

/// Upper bound on block confirmations accepted by the coordinator.
pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;

pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;

pub const DEFAULT_NUM_WORDS: u32 = 1;

/// Oracle routing parameters.
///
/// Opaque to the raffle; forwarded unchanged with every randomness request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRouting {
    /// Gas lane identifying the oracle key and price ceiling
    pub key_hash: [u8; 32],
    /// Billing account at the oracle
    pub subscription_id: SubscriptionId,
    /// Gas budget for the fulfillment callback
    pub callback_gas_limit: u32,
    /// Confirmations the oracle waits before responding
    pub request_confirmations: u16,
    /// Random words per request
    pub num_words: u32,
}

impl OracleRouting {
    #[must_use]
    pub fn new(key_hash: [u8; 32], subscription_id: SubscriptionId, callback_gas_limit: u32) -> Self {
        Self {
            key_hash,
            subscription_id,
            callback_gas_limit,
            request_confirmations: DEFAULT_REQUEST_CONFIRMATIONS,
            num_words: DEFAULT_NUM_WORDS,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.callback_gas_limit == 0 {
            return Err(ConfigError::ZeroCallbackGasLimit);
        }
        if self.num_words == 0 || self.num_words > MAX_NUM_WORDS {
            return Err(ConfigError::InvalidNumWords {
                got: self.num_words,
                max: MAX_NUM_WORDS,
            });
        }
        if self.request_confirmations > MAX_REQUEST_CONFIRMATIONS {
            return Err(ConfigError::TooManyConfirmations {
                got: self.request_confirmations,
                max: MAX_REQUEST_CONFIRMATIONS,
            });
        }
        Ok(())
    }
}

/// Raffle configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleConfig {
    /// Minimum accepted amount per entry, in wei
    pub entrance_fee: U256,
    /// Minimum seconds between settlements before upkeep is eligible
    pub interval_secs: u64,
    /// Pass-through oracle routing
    pub routing: OracleRouting,
}

impl RaffleConfig {
    #[must_use]
    pub fn builder() -> RaffleConfigBuilder {
        RaffleConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing.validate()
    }
}

/// Builder for [`RaffleConfig`].
#[derive(Clone, Debug, Default)]
pub struct RaffleConfigBuilder {
    entrance_fee: Option<U256>,
    interval_secs: Option<u64>,
    key_hash: [u8; 32],
    subscription_id: SubscriptionId,
    callback_gas_limit: Option<u32>,
    request_confirmations: Option<u16>,
    num_words: Option<u32>,
}

impl RaffleConfigBuilder {
    #[must_use]
    pub fn entrance_fee(mut self, fee: U256) -> Self {
        self.entrance_fee = Some(fee);
        self
    }

    #[must_use]
    pub fn interval_secs(mut self, secs: u64) -> Self {
        self.interval_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn key_hash(mut self, key_hash: [u8; 32]) -> Self {
        self.key_hash = key_hash;
        self
    }

    #[must_use]
    pub fn subscription_id(mut self, id: SubscriptionId) -> Self {
        self.subscription_id = id;
        self
    }

    #[must_use]
    pub fn callback_gas_limit(mut self, limit: u32) -> Self {
        self.callback_gas_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn request_confirmations(mut self, confirmations: u16) -> Self {
        self.request_confirmations = Some(confirmations);
        self
    }

    #[must_use]
    pub fn num_words(mut self, num_words: u32) -> Self {
        self.num_words = Some(num_words);
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<RaffleConfig, ConfigError> {
        let entrance_fee = self
            .entrance_fee
            .ok_or(ConfigError::MissingField("entrance_fee"))?;
        let interval_secs = self
            .interval_secs
            .ok_or(ConfigError::MissingField("interval_secs"))?;
        let callback_gas_limit = self
            .callback_gas_limit
            .ok_or(ConfigError::MissingField("callback_gas_limit"))?;

        let mut routing = OracleRouting::new(self.key_hash, self.subscription_id, callback_gas_limit);
        if let Some(confirmations) = self.request_confirmations {
            routing.request_confirmations = confirmations;
        }
        if let Some(num_words) = self.num_words {
            routing.num_words = num_words;
        }

        let config = RaffleConfig {
            entrance_fee,
            interval_secs,
            routing,
        };
        config.validate()?;
        Ok(config)
    }
}
