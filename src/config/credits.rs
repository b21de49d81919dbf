//! Credit pricing and balance configuration

use serde::Deserialize;

use crate::application::{RevealPricing, DEFAULT_MAX_BULK_REVEAL};
use crate::domain::ledger::CreditCost;

use super::error::ValidationError;
use super::server::split_list;

/// Reveal prices and balance thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsConfig {
    #[serde(default = "default_reveal_cost")]
    pub default_reveal_cost: u32,

    /// Per-kind prices as `kind=cost` pairs, comma-separated
    pub listing_kind_costs: Option<String>,

    /// Balances at or below this are flagged as low
    #[serde(default = "default_low_balance_threshold")]
    pub low_balance_threshold: u32,

    /// Credits granted to a newly provisioned profile
    #[serde(default)]
    pub starting_credits: u32,

    #[serde(default = "default_max_bulk_reveal")]
    pub max_bulk_reveal: usize,
}

impl CreditsConfig {
    /// Parses `listing_kind_costs` into `(kind, cost)` pairs.
    pub fn kind_costs(&self) -> Result<Vec<(String, CreditCost)>, ValidationError> {
        split_list(self.listing_kind_costs.as_deref())
            .into_iter()
            .map(|entry| {
                let (kind, cost) = entry
                    .split_once('=')
                    .ok_or_else(|| ValidationError::InvalidRevealCost(entry.clone()))?;
                let kind = kind.trim();
                let cost = cost
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(|c| CreditCost::new(c).ok())
                    .ok_or_else(|| ValidationError::InvalidRevealCost(entry.clone()))?;
                if kind.is_empty() {
                    return Err(ValidationError::InvalidRevealCost(entry.clone()));
                }
                Ok((kind.to_string(), cost))
            })
            .collect()
    }

    pub fn pricing(&self) -> Result<RevealPricing, ValidationError> {
        let default_cost = CreditCost::new(self.default_reveal_cost).map_err(|_| {
            ValidationError::InvalidRevealCost(format!(
                "default_reveal_cost={}",
                self.default_reveal_cost
            ))
        })?;
        Ok(self
            .kind_costs()?
            .into_iter()
            .fold(RevealPricing::new(default_cost), |pricing, (kind, cost)| {
                pricing.with_kind(kind, cost)
            }))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pricing()?;
        if self.max_bulk_reveal == 0 || self.max_bulk_reveal > 1000 {
            return Err(ValidationError::InvalidBulkLimit);
        }
        Ok(())
    }
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            default_reveal_cost: default_reveal_cost(),
            listing_kind_costs: None,
            low_balance_threshold: default_low_balance_threshold(),
            starting_credits: 0,
            max_bulk_reveal: default_max_bulk_reveal(),
        }
    }
}

fn default_reveal_cost() -> u32 {
    1
}

fn default_low_balance_threshold() -> u32 {
    5
}

fn default_max_bulk_reveal() -> usize {
    DEFAULT_MAX_BULK_REVEAL
}
