//! PostgreSQL implementation of ProfileRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::profile::{OnboardingDetails, Profile, SubscriptionStatus};
use crate::ports::ProfileRepository;

use super::database_error;

/// PostgreSQL implementation of the ProfileRepository port.
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a profile.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ProfileRow {
    id: String,
    credits_remaining: i32,
    unlimited: bool,
    onboarding_complete: bool,
    subscription_status: String,
    company_name: Option<String>,
    service_area: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let subscription_status = row
            .subscription_status
            .parse::<SubscriptionStatus>()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid subscription status: {}", e),
                )
            })?;

        Ok(Profile {
            user_id: UserId::new(row.id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
            })?,
            credits_remaining: stored_credits(row.credits_remaining)?,
            unlimited: row.unlimited,
            onboarding_complete: row.onboarding_complete,
            subscription_status,
            company_name: row.company_name,
            service_area: row.service_area,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Converts a stored balance, which the schema keeps non-negative.
pub(super) fn stored_credits(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative credit balance in storage: {}", value),
        )
    })
}

const PROFILE_COLUMNS: &str = "id, credits_remaining, unlimited, onboarding_complete, \
     subscription_status, company_name, service_area, created_at, updated_at";

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("find profile", e))?;

        row.map(Profile::try_from).transpose()
    }

    async fn create(&self, profile: &Profile) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, credits_remaining, unlimited, onboarding_complete, subscription_status,
                company_name, service_area, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(i64::from(profile.credits_remaining()))
        .bind(profile.unlimited)
        .bind(profile.onboarding_complete)
        .bind(profile.subscription_status.as_str())
        .bind(&profile.company_name)
        .bind(&profile.service_area)
        .bind(profile.created_at.as_datetime())
        .bind(profile.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("profiles_pkey") {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        format!("Profile already exists for user {}", profile.user_id),
                    );
                }
            }
            database_error("create profile", e)
        })?;

        Ok(())
    }

    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        details: &OnboardingDetails,
    ) -> Result<Profile, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(&format!(
            r#"
            UPDATE profiles SET
                company_name = $2,
                service_area = $3,
                onboarding_complete = TRUE,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(&details.company_name)
        .bind(&details.service_area)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("complete onboarding", e))?;

        row.map(Profile::try_from).transpose()?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::ProfileNotFound,
                format!("No profile for user {}", user_id),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(credits: i32, status: &str) -> ProfileRow {
        let now = Utc::now();
        ProfileRow {
            id: "user-1".to_string(),
            credits_remaining: credits,
            unlimited: false,
            onboarding_complete: true,
            subscription_status: status.to_string(),
            company_name: Some("Acme".to_string()),
            service_area: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn converts_valid_row() {
        let profile = Profile::try_from(row(4, "past_due")).unwrap();
        assert_eq!(profile.credits_remaining(), 4);
        assert_eq!(profile.subscription_status, SubscriptionStatus::PastDue);
        assert!(profile.onboarding_complete);
    }

    #[test]
    fn rejects_negative_balance() {
        let err = Profile::try_from(row(-1, "active")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Profile::try_from(row(0, "platinum")).is_err());
    }
}
