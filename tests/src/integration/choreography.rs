//! # Choreography Tests
//!
//! The development node's collaborators reacting to each other over the bus:
//!
//! ```text
//! [Players] ──enter──→ [Raffle] ──EntrantJoined──→ [Event Bus]
//! [Keeper]  ──perform_upkeep──→ [Raffle] ──UpkeepPerformed──→ [Event Bus]
//!                                                                 │
//!                                                                 ↓
//!                                                          [Oracle Relay]
//!                                                                 │
//!                                              fulfill_random_words
//!                                                                 ↓
//!                                [Raffle] ──WinnerSettled──→ [Event Bus]
//! ```
//!
//! ## Test Categories
//!
//! 1. **Happy Path**: keeper, relay and players settle rounds unattended
//! 2. **Ordering**: events for one round arrive in lifecycle order
//! 3. **Concurrency**: parallel entries are numbered without gaps

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::watch;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use raffle_engine::{NoOpMetrics, RaffleApi, RoundState, UpkeepKeeper};
    use raffle_node::{deploy_dev, DemoPlayers, DevDeployment, NodeConfig, OracleRelay};
    use shared_bus::{EventFilter, EventTopic, RaffleEvent};
    use shared_types::{Address, U256};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn dev_node(interval_secs: &'static str) -> DevDeployment {
        let config = NodeConfig::from_lookup(move |var| match var {
            "RAFFLE_INTERVAL_SECS" => Some(interval_secs.to_string()),
            _ => None,
        })
        .unwrap();
        deploy_dev(&config, Arc::new(NoOpMetrics)).unwrap()
    }

    fn spawn_relay(d: &DevDeployment) {
        let relay = OracleRelay::new(
            d.coordinator.clone(),
            d.raffle.clone(),
            d.subscription_id,
            Duration::from_millis(1),
            U256::zero(),
        );
        tokio::spawn(relay.run(d.bus.subscribe(EventFilter::topics(vec![EventTopic::Upkeep]))));
    }

    // =============================================================================
    // HAPPY PATH
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_keeper_and_relay_settle_rounds_unattended() {
        let d = dev_node("0");
        let mut settled = d.bus.subscribe(EventFilter::topics(vec![EventTopic::Settlement]));

        spawn_relay(&d);
        let demo = DemoPlayers::new(d.raffle.clone(), 3);
        let players = demo.players().to_vec();
        tokio::spawn(demo.run(d.bus.subscribe(EventFilter::topics(vec![EventTopic::Settlement]))));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let keeper = UpkeepKeeper::new(d.raffle.clone(), Duration::from_millis(5));
        let keeper_task = tokio::spawn(keeper.run(shutdown_rx));

        for expected_round in 1..=2u64 {
            let event = timeout(Duration::from_secs(5), settled.recv())
                .await
                .expect("timeout waiting for settlement")
                .expect("bus closed");
            match event {
                RaffleEvent::WinnerSettled { round, winner, amount, .. } => {
                    assert_eq!(round, expected_round);
                    // The keeper may close a round before every player is in.
                    let fee = d.raffle.entrance_fee();
                    assert!(players.contains(&winner));
                    assert!(!amount.is_zero() && amount <= fee * U256::from(3u64));
                    assert!((amount % fee).is_zero());
                    assert!(d.payouts.balance_of(winner) >= amount);
                }
                other => panic!("Expected WinnerSettled, got {:?}", other),
            }
        }

        shutdown_tx.send(true).unwrap();
        timeout(Duration::from_secs(2), keeper_task)
            .await
            .expect("keeper did not stop")
            .unwrap();
    }

    // =============================================================================
    // ORDERING
    // =============================================================================

    #[tokio::test]
    async fn test_round_events_arrive_in_lifecycle_order() {
        let d = dev_node("0");
        let mut stream = d.bus.event_stream(EventFilter::all().in_rounds(vec![1]));
        spawn_relay(&d);

        DemoPlayers::new(d.raffle.clone(), 2).enter_round().await;
        let request_id = d.raffle.perform_upkeep().await.unwrap();

        let mut seen = Vec::new();
        while seen.len() < 4 {
            let event = timeout(Duration::from_secs(2), stream.next())
                .await
                .expect("timeout waiting for event")
                .expect("bus closed");
            seen.push(event);
        }

        assert!(matches!(seen[0], RaffleEvent::EntrantJoined { entrant_count: 1, .. }));
        assert!(matches!(seen[1], RaffleEvent::EntrantJoined { entrant_count: 2, .. }));
        assert_eq!(seen[2], RaffleEvent::UpkeepPerformed { round: 1, request_id });
        assert!(matches!(seen[3], RaffleEvent::WinnerSettled { round: 1, .. }));
    }

    #[tokio::test]
    async fn test_upkeep_waits_for_interval() {
        let d = dev_node("3600");
        DemoPlayers::new(d.raffle.clone(), 2).enter_round().await;

        let keeper = UpkeepKeeper::new(d.raffle.clone(), Duration::from_millis(5));
        assert!(matches!(keeper.tick().await, raffle_engine::KeeperOutcome::Idle));
        assert_eq!(d.raffle.round_state().await, RoundState::Open);
        assert!(d.coordinator.pending_requests().is_empty());
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_entries_are_numbered_without_gaps() {
        let d = dev_node("3600");
        let mut joined = d.bus.subscribe(EventFilter::topics(vec![EventTopic::Entries]));
        let fee = d.raffle.entrance_fee();

        let handles: Vec<_> = (0..32u8)
            .map(|n| {
                let raffle = d.raffle.clone();
                tokio::spawn(async move { raffle.enter(Address::repeat_byte(n), fee).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        for expected in 1..=32usize {
            let event = timeout(Duration::from_millis(500), joined.recv())
                .await
                .expect("timeout waiting for entry")
                .expect("bus closed");
            assert!(matches!(
                event,
                RaffleEvent::EntrantJoined { entrant_count, .. } if entrant_count == expected
            ));
        }
        assert_eq!(d.raffle.balance().await, fee * U256::from(32u64));
    }
}
