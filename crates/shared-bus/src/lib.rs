//! # Shared Bus - Raffle Notification Bus
//!
//! Carries raffle lifecycle notifications from the service to off-band
//! observers (automation keepers, oracle relays, dashboards, tests).
//!
//! ## Rules
//!
//! - The raffle publishes only after a mutating operation has succeeded.
//! - Publishing never blocks and never fails the operation that triggered
//!   it; an event with no subscribers is dropped.
//! - Observers never call back into the raffle through the bus. They use
//!   the raffle's inbound ports.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │    Raffle    │                    │   Observer   │
//! │   service    │    publish()       │ (keeper etc) │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, RaffleEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the slowest one lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
