//! # Request Table
//!
//! Outstanding randomness requests keyed by oracle request id.
//!
//! A request is inserted by upkeep and removed by the matching fulfillment.
//! Upkeep can only run from OPEN, so the table never holds more than one
//! entry; a second insert is refused rather than silently replacing it.

use crate::error::PreconditionError;
use serde::{Deserialize, Serialize};
use shared_types::{RequestId, RoundId, Timestamp};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub request_id: RequestId,
    pub round: RoundId,
    pub requested_at: Timestamp,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestTable {
    pending: HashMap<RequestId, PendingRequest>,
}

impl RequestTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        request_id: RequestId,
        round: RoundId,
        requested_at: Timestamp,
    ) -> Result<(), PreconditionError> {
        if let Some(existing) = self.outstanding() {
            return Err(PreconditionError::RequestAlreadyOutstanding {
                request_id: existing,
            });
        }
        self.pending.insert(
            request_id,
            PendingRequest {
                request_id,
                round,
                requested_at,
            },
        );
        Ok(())
    }

    /// Look up `request_id`, failing with `UnknownRequest` if it is not outstanding.
    pub fn matching(&self, request_id: RequestId) -> Result<&PendingRequest, PreconditionError> {
        self.pending
            .get(&request_id)
            .ok_or(PreconditionError::UnknownRequest {
                request_id,
                outstanding: self.outstanding(),
            })
    }

    pub fn resolve(&mut self, request_id: RequestId) -> Result<PendingRequest, PreconditionError> {
        let outstanding = self.outstanding();
        self.pending
            .remove(&request_id)
            .ok_or(PreconditionError::UnknownRequest {
                request_id,
                outstanding,
            })
    }

    #[must_use]
    pub fn outstanding(&self) -> Option<RequestId> {
        self.pending.keys().next().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
