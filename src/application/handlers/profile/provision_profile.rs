//! ProvisionProfileHandler - Command handler ensuring a user has a profile.
//!
//! Called from the recovery screen when a signed-in user has no profile row
//! yet. Safe to call repeatedly and concurrently.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::profile::Profile;
use crate::ports::ProfileRepository;

/// Command to create the user's profile if it does not exist.
#[derive(Debug, Clone)]
pub struct ProvisionProfileCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct ProvisionProfileResult {
    pub profile: Profile,
    /// False when the profile already existed.
    pub created: bool,
}

pub struct ProvisionProfileHandler {
    repository: Arc<dyn ProfileRepository>,
    starting_credits: u32,
}

impl ProvisionProfileHandler {
    pub fn new(repository: Arc<dyn ProfileRepository>, starting_credits: u32) -> Self {
        Self {
            repository,
            starting_credits,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProvisionProfileCommand,
    ) -> Result<ProvisionProfileResult, DomainError> {
        // 1. Existing profile wins
        if let Some(profile) = self.repository.find_by_user(&cmd.user_id).await? {
            return Ok(ProvisionProfileResult {
                profile,
                created: false,
            });
        }

        // 2. Create, tolerating a concurrent create for the same user
        let profile = Profile::provision(cmd.user_id.clone(), self.starting_credits);
        match self.repository.create(&profile).await {
            Ok(()) => {
                tracing::info!(user_id = %cmd.user_id, "Profile provisioned");
                Ok(ProvisionProfileResult {
                    profile,
                    created: true,
                })
            }
            Err(err) if err.code == ErrorCode::Conflict => {
                tracing::debug!(user_id = %cmd.user_id, "Profile created concurrently");
                let profile = self
                    .repository
                    .find_by_user(&cmd.user_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::InternalError,
                            "Profile conflict reported but no profile found",
                        )
                    })?;
                Ok(ProvisionProfileResult {
                    profile,
                    created: false,
                })
            }
            Err(err) => Err(err),
        }
    }
}
