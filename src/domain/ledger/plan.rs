//! Bulk charge planning.

use std::collections::HashSet;

use crate::domain::foundation::{ListingId, ValidationError};

use super::CreditCost;

/// Partition of a bulk reveal request into paid and free items.
///
/// Duplicate ids in the request are collapsed, keeping first-seen order, so
/// a listing can never be priced twice in one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkChargePlan {
    pub new_listings: Vec<ListingId>,
    pub already_owned: Vec<ListingId>,
    pub cost_per_item: CreditCost,
    pub total_cost: u64,
}

impl BulkChargePlan {
    pub fn new(
        requested: &[ListingId],
        owned: &HashSet<ListingId>,
        cost_per_item: CreditCost,
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(requested.len());
        let mut new_listings = Vec::new();
        let mut already_owned = Vec::new();

        for listing_id in requested {
            if !seen.insert(*listing_id) {
                continue;
            }
            if owned.contains(listing_id) {
                already_owned.push(*listing_id);
            } else {
                new_listings.push(*listing_id);
            }
        }

        let total_cost = cost_per_item.times(new_listings.len()).ok_or_else(|| {
            ValidationError::invalid_format("listing_ids", "total reveal cost overflows")
        })?;

        Ok(Self {
            new_listings,
            already_owned,
            cost_per_item,
            total_cost,
        })
    }

    /// Nothing left to charge for.
    pub fn is_free(&self) -> bool {
        self.new_listings.is_empty()
    }
}
