//! HTTP DTOs for reveal endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{BulkRevealOutcome, RevealOutcome, RevealStatus};
use crate::domain::foundation::{ListingId, Timestamp};
use crate::domain::ledger::{Balance, RevealRecord};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query parameters for a single reveal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevealParams {
    /// Listing kind used to look up the reveal price.
    pub kind: Option<String>,
}

/// Body of `POST /api/reveals/bulk`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRevealRequest {
    pub listing_ids: Vec<Uuid>,
    #[serde(default)]
    pub listing_kind: Option<String>,
}

impl BulkRevealRequest {
    pub fn listing_ids(&self) -> Vec<ListingId> {
        self.listing_ids
            .iter()
            .copied()
            .map(ListingId::from_uuid)
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct RevealResponse {
    pub listing_id: ListingId,
    pub status: RevealStatus,
    pub credits_charged: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

impl From<RevealOutcome> for RevealResponse {
    fn from(outcome: RevealOutcome) -> Self {
        Self {
            listing_id: outcome.listing_id,
            status: outcome.status,
            credits_charged: outcome.credits_charged,
            revealed_at: outcome.record.map(|r| r.created_at),
            balance: outcome.balance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkRevealResponse {
    pub revealed: Vec<ListingId>,
    pub already_owned: Vec<ListingId>,
    pub total_cost: u64,
    pub unlocked_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Balance>,
}

impl From<BulkRevealOutcome> for BulkRevealResponse {
    fn from(outcome: BulkRevealOutcome) -> Self {
        Self {
            unlocked_count: outcome.unlocked_count(),
            revealed: outcome.revealed,
            already_owned: outcome.already_owned,
            total_cost: outcome.total_cost,
            balance: outcome.balance,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevealRecordResponse {
    pub listing_id: ListingId,
    pub credit_cost: u32,
    pub revealed_at: Timestamp,
}

impl From<RevealRecord> for RevealRecordResponse {
    fn from(record: RevealRecord) -> Self {
        Self {
            listing_id: record.listing_id,
            credit_cost: record.credit_cost.get(),
            revealed_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevealCheckResponse {
    pub listing_id: ListingId,
    pub revealed: bool,
}
