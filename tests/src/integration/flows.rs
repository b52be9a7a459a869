//! # Integration Test Flows
//!
//! The raffle service driven through the mock coordinator and the in-memory
//! payout ledger, the way the development node wires them.
//!
//! ## Flows Tested:
//!
//! 1. **Round trip**: entries, upkeep, fulfillment, payout, reopen
//! 2. **Stale delivery**: duplicate and unknown request ids are rejected
//! 3. **Oracle outage**: a failed request leaves the round open
//! 4. **Many rounds**: pools flow to winners, round ids advance

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use proptest::prelude::*;

    use raffle_engine::{
        InMemoryPayoutLedger, ManualClock, MockVrfCoordinator, OracleError, PreconditionError,
        RaffleApi, RaffleConfig, RaffleError, RaffleService, RandomnessOracle, RandomnessRequest,
        RoundState,
    };
    use shared_types::{parse_ether, Address, RequestId, SubscriptionId, U256, WEI_PER_ETHER};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Raffle<O> = RaffleService<O, InMemoryPayoutLedger, ManualClock>;

    struct World {
        raffle: Arc<Raffle<MockVrfCoordinator>>,
        coordinator: Arc<MockVrfCoordinator>,
        payouts: Arc<InMemoryPayoutLedger>,
        clock: Arc<ManualClock>,
    }

    fn fee() -> U256 {
        parse_ether("0.01").unwrap()
    }

    fn config(subscription_id: SubscriptionId) -> RaffleConfig {
        RaffleConfig::builder()
            .entrance_fee(fee())
            .interval_secs(20)
            .subscription_id(subscription_id)
            .callback_gas_limit(500_000)
            .build()
            .unwrap()
    }

    fn world() -> World {
        let coordinator = Arc::new(MockVrfCoordinator::default());
        let sub = coordinator.create_subscription();
        coordinator
            .fund_subscription(sub, U256::from(10u64) * U256::from(WEI_PER_ETHER))
            .unwrap();
        let payouts = Arc::new(InMemoryPayoutLedger::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let raffle = RaffleService::new(
            config(sub),
            coordinator.clone(),
            payouts.clone(),
            clock.clone(),
        )
        .unwrap();

        World {
            raffle: Arc::new(raffle),
            coordinator,
            payouts,
            clock,
        }
    }

    fn player(n: usize) -> Address {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&(n as u64 + 1).to_be_bytes());
        Address::from(bytes)
    }

    async fn fill_round(w: &World, entrants: usize) {
        for n in 0..entrants {
            w.raffle.enter(player(n), fee()).await.unwrap();
        }
        w.clock.advance_time(21);
    }

    /// Oracle that fails while `down` is set, otherwise delegates.
    struct FlakyOracle {
        inner: Arc<MockVrfCoordinator>,
        down: AtomicBool,
    }

    #[async_trait]
    impl RandomnessOracle for FlakyOracle {
        async fn request_randomness(
            &self,
            request: RandomnessRequest,
        ) -> Result<RequestId, OracleError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(OracleError::Unavailable("oracle offline".into()));
            }
            self.inner.request_randomness(request).await
        }
    }

    // =============================================================================
    // ROUND TRIP
    // =============================================================================

    #[tokio::test]
    async fn test_round_trip_pays_selected_entrant() {
        let w = world();
        fill_round(&w, 5).await;
        assert!(w.raffle.check_upkeep().await);

        let request_id = w.raffle.perform_upkeep().await.unwrap();
        let report = w
            .coordinator
            .fulfill_random_words_with_override(request_id, w.raffle.as_ref(), vec![U256::from(42u64)])
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.payment, w.coordinator.fulfillment_fee(500_000));

        let settlement = report.outcome.unwrap();
        assert_eq!(settlement.winner_index, 2);
        assert_eq!(settlement.winner, player(2));
        assert_eq!(w.payouts.balance_of(player(2)), parse_ether("0.05").unwrap());

        assert_eq!(w.raffle.round_state().await, RoundState::Open);
        assert_eq!(w.raffle.entrant_count().await, 0);
        assert!(w.raffle.balance().await.is_zero());
        assert_eq!(w.raffle.recent_winner().await, Some(player(2)));
        assert_eq!(w.raffle.last_settlement_timestamp().await, 1_700_000_021);
    }

    #[tokio::test]
    async fn test_derived_words_pick_an_entrant() {
        let w = world();
        fill_round(&w, 4).await;
        let request_id = w.raffle.perform_upkeep().await.unwrap();

        let report = w
            .coordinator
            .fulfill_random_words(request_id, w.raffle.as_ref())
            .await
            .unwrap();

        let settlement = report.outcome.unwrap();
        let expected = raffle_engine::derive_words(request_id, 1)[0] % U256::from(4u64);
        assert_eq!(U256::from(settlement.winner_index), expected);
        assert_eq!(settlement.winner, player(settlement.winner_index));
    }

    // =============================================================================
    // STALE DELIVERY
    // =============================================================================

    #[tokio::test]
    async fn test_duplicate_delivery_is_rejected_everywhere() {
        let w = world();
        fill_round(&w, 5).await;
        let request_id = w.raffle.perform_upkeep().await.unwrap();
        w.coordinator
            .fulfill_random_words(request_id, w.raffle.as_ref())
            .await
            .unwrap();
        let after_first = w.raffle.snapshot().await;

        // Coordinator has resolved the request.
        let again = w
            .coordinator
            .fulfill_random_words(request_id, w.raffle.as_ref())
            .await;
        assert!(matches!(again, Err(OracleError::NonexistentRequest(_))));

        // A direct redelivery reaches the raffle and is refused.
        let direct = w.raffle.fulfill(request_id, U256::from(99u64)).await;
        assert!(matches!(&direct, Err(e) if e.is_stale_delivery()));

        assert_eq!(w.raffle.snapshot().await, after_first);
        assert_eq!(w.payouts.transfers().len(), 1);
    }

    #[tokio::test]
    async fn test_fulfillment_while_open_is_rejected() {
        let w = world();
        fill_round(&w, 2).await;

        let result = w.raffle.fulfill(RequestId::from(1), U256::one()).await;

        assert_eq!(
            result,
            Err(RaffleError::Precondition(PreconditionError::UnknownRequest {
                request_id: RequestId::from(1),
                outstanding: None,
            }))
        );
        assert_eq!(w.raffle.entrant_count().await, 2);
    }

    // =============================================================================
    // ORACLE OUTAGE
    // =============================================================================

    #[tokio::test]
    async fn test_oracle_outage_rolls_back_then_recovers() {
        let coordinator = Arc::new(MockVrfCoordinator::default());
        let sub = coordinator.create_subscription();
        coordinator
            .fund_subscription(sub, U256::from(WEI_PER_ETHER))
            .unwrap();
        let oracle = Arc::new(FlakyOracle {
            inner: coordinator.clone(),
            down: AtomicBool::new(true),
        });
        let clock = Arc::new(ManualClock::new(0));
        let raffle: Raffle<FlakyOracle> = RaffleService::new(
            config(sub),
            oracle.clone(),
            Arc::new(InMemoryPayoutLedger::new()),
            clock.clone(),
        )
        .unwrap();

        raffle.enter(player(0), fee()).await.unwrap();
        clock.advance_time(20);

        let failed = raffle.perform_upkeep().await;
        assert!(matches!(failed, Err(RaffleError::Oracle(OracleError::Unavailable(_)))));
        assert_eq!(raffle.round_state().await, RoundState::Open);
        assert_eq!(raffle.outstanding_request().await, None);
        assert!(raffle.check_upkeep().await);

        oracle.down.store(false, Ordering::SeqCst);
        let request_id = raffle.perform_upkeep().await.unwrap();
        assert_eq!(raffle.outstanding_request().await, Some(request_id));

        let report = coordinator
            .fulfill_random_words(request_id, &raffle)
            .await
            .unwrap();
        assert!(report.success);
    }

    // =============================================================================
    // MANY ROUNDS
    // =============================================================================

    #[tokio::test]
    async fn test_consecutive_rounds_pay_every_pool() {
        let w = world();
        let sizes = [3usize, 1, 6, 2];

        for (i, size) in sizes.iter().enumerate() {
            assert_eq!(w.raffle.round_id().await, i as u64 + 1);
            fill_round(&w, *size).await;
            let request_id = w.raffle.perform_upkeep().await.unwrap();
            w.coordinator
                .fulfill_random_words(request_id, w.raffle.as_ref())
                .await
                .unwrap()
                .outcome
                .unwrap();
        }

        let paid = w
            .payouts
            .transfers()
            .iter()
            .fold(U256::zero(), |acc, t| acc + t.amount);
        let entered: usize = sizes.iter().sum();
        assert_eq!(paid, fee() * U256::from(entered));
        assert_eq!(w.raffle.round_id().await, sizes.len() as u64 + 1);
        assert!(w.coordinator.pending_requests().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_winner_is_word_mod_entrants(entrants in 1usize..20, word in any::<u64>()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let w = world();
                fill_round(&w, entrants).await;
                let request_id = w.raffle.perform_upkeep().await.unwrap();

                let settlement = w
                    .raffle
                    .fulfill(request_id, U256::from(word))
                    .await
                    .unwrap();

                let index = (word % entrants as u64) as usize;
                prop_assert_eq!(settlement.winner_index, index);
                prop_assert_eq!(settlement.winner, player(index));
                prop_assert_eq!(settlement.amount, fee() * U256::from(entrants));
                Ok(())
            })?;
        }
    }
}
