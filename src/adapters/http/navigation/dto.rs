//! HTTP DTOs for navigation endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::navigation::{GuardState, NavigationDecision, Resolution};

#[derive(Debug, Clone, Deserialize)]
pub struct NavigationParams {
    pub path: String,
}

/// Guard decision for one path.
///
/// `intended_destination` is set when the caller is sent to sign in from a
/// protected path; the client keeps it and returns there afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub decision: NavigationDecision,
    pub state: GuardState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intended_destination: Option<String>,
}

impl From<Resolution> for NavigationResponse {
    fn from(resolution: Resolution) -> Self {
        Self {
            decision: resolution.decision,
            state: resolution.state,
            intended_destination: resolution.remember,
        }
    }
}
