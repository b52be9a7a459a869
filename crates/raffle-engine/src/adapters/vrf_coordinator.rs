//! Mock VRF Coordinator
//!
//! Development stand-in for the randomness oracle. Bills requests to funded
//! subscriptions and delivers deterministic words on demand:
//!
//! `word[i] = keccak256(request_id ‖ i)` (both 32-byte big-endian)
//!
//! A request stays pending until a delivery completes. If the consumer fails
//! with a fatal settlement error the request is kept so the same words can be
//! delivered again; any other outcome resolves it.

use crate::domain::MAX_NUM_WORDS;
use crate::error::{ErrorKind, OracleError, RaffleResult};
use crate::ports::{RandomnessConsumer, RandomnessOracle, RandomnessRequest};
use async_trait::async_trait;
use parking_lot::RwLock;
use sha3::{Digest, Keccak256};
use shared_types::{RequestId, SubscriptionId, U256, WEI_PER_ETHER};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Flat fee per fulfillment: 0.25 LINK.
pub const DEFAULT_BASE_FEE: u64 = WEI_PER_ETHER / 4;

/// LINK per unit of callback gas.
pub const DEFAULT_GAS_PRICE_LINK: u64 = 1_000_000_000;

/// Billing account snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionInfo {
    pub balance: U256,
    pub request_count: u64,
}

#[derive(Clone, Debug)]
struct PendingVrfRequest {
    subscription_id: SubscriptionId,
    callback_gas_limit: u32,
    num_words: u32,
}

/// Outcome of one delivery attempt.
#[derive(Debug)]
pub struct FulfillmentReport {
    pub request_id: RequestId,
    pub success: bool,
    /// Fee charged; zero when the request was kept for redelivery
    pub payment: U256,
    pub outcome: RaffleResult<crate::domain::Settlement>,
}

#[derive(Default)]
struct CoordinatorState {
    next_subscription_id: SubscriptionId,
    next_request_id: u64,
    subscriptions: HashMap<SubscriptionId, SubscriptionInfo>,
    pending: HashMap<RequestId, PendingVrfRequest>,
}

pub struct MockVrfCoordinator {
    base_fee: U256,
    gas_price_link: U256,
    state: RwLock<CoordinatorState>,
}

impl MockVrfCoordinator {
    pub fn new(base_fee: U256, gas_price_link: U256) -> Self {
        Self {
            base_fee,
            gas_price_link,
            state: RwLock::new(CoordinatorState::default()),
        }
    }

    pub fn base_fee(&self) -> U256 {
        self.base_fee
    }

    pub fn gas_price_link(&self) -> U256 {
        self.gas_price_link
    }

    /// Open an empty subscription. Ids start at 1.
    pub fn create_subscription(&self) -> SubscriptionId {
        let mut state = self.state.write();
        state.next_subscription_id += 1;
        let id = state.next_subscription_id;
        state.subscriptions.insert(id, SubscriptionInfo::default());
        info!(subscription_id = id, "Subscription created");
        id
    }

    pub fn fund_subscription(
        &self,
        subscription_id: SubscriptionId,
        amount: U256,
    ) -> Result<U256, OracleError> {
        let mut state = self.state.write();
        let sub = state
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or(OracleError::InvalidSubscription(subscription_id))?;
        sub.balance = sub.balance.saturating_add(amount);
        debug!(subscription_id, amount = %amount, balance = %sub.balance, "Subscription funded");
        Ok(sub.balance)
    }

    pub fn subscription(&self, subscription_id: SubscriptionId) -> Option<SubscriptionInfo> {
        self.state.read().subscriptions.get(&subscription_id).cloned()
    }

    /// Requests issued but not yet resolved.
    pub fn pending_requests(&self) -> Vec<RequestId> {
        let mut ids: Vec<RequestId> = self.state.read().pending.keys().copied().collect();
        ids.sort_by_key(|id| id.0);
        ids
    }

    /// Fee for fulfilling a request with the given gas budget.
    pub fn fulfillment_fee(&self, callback_gas_limit: u32) -> U256 {
        self.base_fee
            .saturating_add(self.gas_price_link.saturating_mul(U256::from(callback_gas_limit)))
    }

    /// Deliver derived words for `request_id` to `consumer`.
    pub async fn fulfill_random_words<C>(
        &self,
        request_id: RequestId,
        consumer: &C,
    ) -> Result<FulfillmentReport, OracleError>
    where
        C: RandomnessConsumer + ?Sized,
    {
        let num_words = self.pending_request(request_id)?.num_words;
        let words = derive_words(request_id, num_words);
        self.deliver(request_id, consumer, words).await
    }

    /// Deliver caller-supplied words for `request_id` to `consumer`.
    ///
    /// An empty override falls back to derived words. Otherwise the override
    /// must carry exactly as many words as were requested.
    pub async fn fulfill_random_words_with_override<C>(
        &self,
        request_id: RequestId,
        consumer: &C,
        words: Vec<U256>,
    ) -> Result<FulfillmentReport, OracleError>
    where
        C: RandomnessConsumer + ?Sized,
    {
        let num_words = self.pending_request(request_id)?.num_words;
        let words = if words.is_empty() {
            derive_words(request_id, num_words)
        } else if words.len() != num_words as usize {
            return Err(OracleError::WrongNumberOfWords {
                request_id,
                expected: num_words,
                got: words.len(),
            });
        } else {
            words
        };
        self.deliver(request_id, consumer, words).await
    }

    fn pending_request(&self, request_id: RequestId) -> Result<PendingVrfRequest, OracleError> {
        self.state
            .read()
            .pending
            .get(&request_id)
            .cloned()
            .ok_or(OracleError::NonexistentRequest(request_id))
    }

    async fn deliver<C>(
        &self,
        request_id: RequestId,
        consumer: &C,
        words: Vec<U256>,
    ) -> Result<FulfillmentReport, OracleError>
    where
        C: RandomnessConsumer + ?Sized,
    {
        let pending = self.pending_request(request_id)?;
        let payment = self.fulfillment_fee(pending.callback_gas_limit);

        let balance = self
            .subscription(pending.subscription_id)
            .map(|sub| sub.balance)
            .ok_or(OracleError::InvalidSubscription(pending.subscription_id))?;
        if balance < payment {
            return Err(OracleError::InsufficientBalance {
                subscription_id: pending.subscription_id,
                balance,
                required: payment,
            });
        }

        let outcome = consumer.fulfill_random_words(request_id, words).await;

        let keep_pending = matches!(&outcome, Err(e) if e.kind() == ErrorKind::FatalSettlement);
        if keep_pending {
            warn!(request_id = %request_id, "Consumer settlement failed, request kept for redelivery");
            return Ok(FulfillmentReport {
                request_id,
                success: false,
                payment: U256::zero(),
                outcome,
            });
        }

        let mut state = self.state.write();
        // A concurrent delivery may have resolved it while the consumer ran;
        // only the first resolution is billed.
        let payment = if state.pending.remove(&request_id).is_some() {
            if let Some(sub) = state.subscriptions.get_mut(&pending.subscription_id) {
                sub.balance = sub.balance.saturating_sub(payment);
            }
            payment
        } else {
            U256::zero()
        };
        drop(state);

        let success = outcome.is_ok();
        info!(request_id = %request_id, success, payment = %payment, "Random words fulfilled");
        Ok(FulfillmentReport {
            request_id,
            success,
            payment,
            outcome,
        })
    }
}

impl Default for MockVrfCoordinator {
    fn default() -> Self {
        Self::new(
            U256::from(DEFAULT_BASE_FEE),
            U256::from(DEFAULT_GAS_PRICE_LINK),
        )
    }
}

#[async_trait]
impl RandomnessOracle for MockVrfCoordinator {
    async fn request_randomness(
        &self,
        request: RandomnessRequest,
    ) -> Result<RequestId, OracleError> {
        if request.num_words > MAX_NUM_WORDS {
            return Err(OracleError::TooManyWords {
                requested: request.num_words,
                max: MAX_NUM_WORDS,
            });
        }

        let mut state = self.state.write();
        let sub = state
            .subscriptions
            .get_mut(&request.subscription_id)
            .ok_or(OracleError::InvalidSubscription(request.subscription_id))?;
        sub.request_count += 1;

        state.next_request_id += 1;
        let request_id = RequestId::from(state.next_request_id);
        state.pending.insert(
            request_id,
            PendingVrfRequest {
                subscription_id: request.subscription_id,
                callback_gas_limit: request.callback_gas_limit,
                num_words: request.num_words,
            },
        );

        info!(
            request_id = %request_id,
            subscription_id = request.subscription_id,
            num_words = request.num_words,
            "Randomness requested"
        );
        Ok(request_id)
    }
}

/// `keccak256(request_id ‖ index)` for each index.
pub fn derive_words(request_id: RequestId, num_words: u32) -> Vec<U256> {
    let mut id_bytes = [0u8; 32];
    request_id.0.to_big_endian(&mut id_bytes);

    (0..num_words)
        .map(|index| {
            let mut index_bytes = [0u8; 32];
            U256::from(index).to_big_endian(&mut index_bytes);

            let mut hasher = Keccak256::new();
            hasher.update(id_bytes);
            hasher.update(index_bytes);
            U256::from_big_endian(&hasher.finalize())
        })
        .collect()
}
