//! # Raffle Events
//!
//! Notifications emitted after each successful mutating raffle operation.

use serde::{Deserialize, Serialize};
use shared_types::{Address, RequestId, RoundId, Timestamp, U256};

/// All events that flow through the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaffleEvent {
    // =========================================================================
    // ENTRY LEDGER
    // =========================================================================
    /// An entrant paid into the current round.
    EntrantJoined {
        round: RoundId,
        entrant: Address,
        amount: U256,
        /// Entrant count after this entry.
        entrant_count: usize,
    },

    // =========================================================================
    // UPKEEP (OPEN -> CALCULATING)
    // =========================================================================
    /// The round closed to entries and randomness was requested.
    UpkeepPerformed {
        round: RoundId,
        request_id: RequestId,
    },

    // =========================================================================
    // SETTLEMENT (CALCULATING -> OPEN)
    // =========================================================================
    /// The round was settled and the pool paid out.
    WinnerSettled {
        round: RoundId,
        request_id: RequestId,
        winner: Address,
        amount: U256,
        settled_at: Timestamp,
    },
}

impl RaffleEvent {
    /// Topic used for subscription filtering.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::EntrantJoined { .. } => EventTopic::Entries,
            Self::UpkeepPerformed { .. } => EventTopic::Upkeep,
            Self::WinnerSettled { .. } => EventTopic::Settlement,
        }
    }

    /// Round the event belongs to.
    #[must_use]
    pub fn round(&self) -> RoundId {
        match self {
            Self::EntrantJoined { round, .. }
            | Self::UpkeepPerformed { round, .. }
            | Self::WinnerSettled { round, .. } => *round,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// `EntrantJoined`.
    Entries,
    /// `UpkeepPerformed`.
    Upkeep,
    /// `WinnerSettled`.
    Settlement,
    /// Every topic.
    All,
}

impl EventTopic {
    /// Topics an event can actually carry.
    pub const CONCRETE: [EventTopic; 3] = [Self::Entries, Self::Upkeep, Self::Settlement];
}

/// Filter applied on the subscriber side.
///
/// Empty vectors match everything.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub topics: Vec<EventTopic>,
    pub rounds: Vec<RoundId>,
}

impl EventFilter {
    /// Match every event.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Match events on the given topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            rounds: Vec::new(),
        }
    }

    /// Restrict to the given rounds.
    #[must_use]
    pub fn in_rounds(mut self, rounds: Vec<RoundId>) -> Self {
        self.rounds = rounds;
        self
    }

    /// Concrete topics this filter lets through, ignoring rounds.
    #[must_use]
    pub fn listened_topics(&self) -> Vec<EventTopic> {
        if self.topics.is_empty() || self.topics.contains(&EventTopic::All) {
            return EventTopic::CONCRETE.to_vec();
        }
        EventTopic::CONCRETE
            .into_iter()
            .filter(|topic| self.topics.contains(topic))
            .collect()
    }

    #[must_use]
    pub fn matches(&self, event: &RaffleEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let round_match = self.rounds.is_empty() || self.rounds.contains(&event.round());

        topic_match && round_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(round: RoundId) -> RaffleEvent {
        RaffleEvent::EntrantJoined {
            round,
            entrant: Address::repeat_byte(1),
            amount: U256::from(10u64),
            entrant_count: 1,
        }
    }

    #[test]
    fn test_event_topic_mapping() {
        assert_eq!(joined(1).topic(), EventTopic::Entries);

        let upkeep = RaffleEvent::UpkeepPerformed {
            round: 1,
            request_id: RequestId::from(1),
        };
        assert_eq!(upkeep.topic(), EventTopic::Upkeep);

        let settled = RaffleEvent::WinnerSettled {
            round: 3,
            request_id: RequestId::from(9),
            winner: Address::repeat_byte(2),
            amount: U256::from(50u64),
            settled_at: 1_700_000_000,
        };
        assert_eq!(settled.topic(), EventTopic::Settlement);
        assert_eq!(settled.round(), 3);
    }

    #[test]
    fn test_filter_all() {
        assert!(EventFilter::all().matches(&joined(1)));
    }

    #[test]
    fn test_filter_by_topic() {
        let filter = EventFilter::topics(vec![EventTopic::Settlement]);
        assert!(!filter.matches(&joined(1)));

        let filter = EventFilter::topics(vec![EventTopic::All]);
        assert!(filter.matches(&joined(1)));
    }

    #[test]
    fn test_listened_topics() {
        assert_eq!(EventFilter::all().listened_topics(), EventTopic::CONCRETE.to_vec());
        assert_eq!(
            EventFilter::topics(vec![EventTopic::All]).listened_topics(),
            EventTopic::CONCRETE.to_vec()
        );
        assert_eq!(
            EventFilter::topics(vec![EventTopic::Settlement, EventTopic::Upkeep, EventTopic::Upkeep])
                .listened_topics(),
            vec![EventTopic::Upkeep, EventTopic::Settlement]
        );
    }

    #[test]
    fn test_filter_by_round() {
        let filter = EventFilter::all().in_rounds(vec![2]);
        assert!(!filter.matches(&joined(1)));
        assert!(filter.matches(&joined(2)));
    }

    #[test]
    fn test_event_serializes() {
        let json = serde_json::to_string(&joined(4)).unwrap();
        let back: RaffleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, joined(4));
    }
}
