//! Per-listing-kind reveal pricing.

use std::collections::HashMap;

use crate::domain::foundation::ValidationError;
use crate::domain::ledger::CreditCost;

/// Price table: a default cost plus overrides per listing kind.
#[derive(Debug, Clone, Default)]
pub struct RevealPricing {
    default_cost: CreditCost,
    kind_costs: HashMap<String, CreditCost>,
}

impl RevealPricing {
    pub fn new(default_cost: CreditCost) -> Self {
        Self {
            default_cost,
            kind_costs: HashMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>, cost: CreditCost) -> Self {
        self.kind_costs.insert(kind.into().to_lowercase(), cost);
        self
    }

    pub fn default_cost(&self) -> CreditCost {
        self.default_cost
    }

    /// Resolves the price for one reveal.
    ///
    /// A caller-supplied cost wins and must be at least 1. Otherwise the
    /// kind's price applies, falling back to the default for unknown kinds.
    pub fn cost_for(
        &self,
        kind: Option<&str>,
        cost_override: Option<u32>,
    ) -> Result<CreditCost, ValidationError> {
        if let Some(credits) = cost_override {
            return CreditCost::new(credits);
        }
        Ok(kind
            .and_then(|k| self.kind_costs.get(&k.to_lowercase()))
            .copied()
            .unwrap_or(self.default_cost))
    }
}
