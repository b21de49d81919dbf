//! PostgreSQL implementation of CreditLedger.
//!
//! Each charge runs in one transaction:
//!
//! 1. read the balance (no lock)
//! 2. insert reveal rows with `ON CONFLICT (listing_id, user_id) DO NOTHING`;
//!    the unique constraint makes at-most-once hold even across concurrent
//!    requests, because a second insert of the same pair waits for the first
//!    transaction and then skips
//! 3. decrement with `WHERE unlimited OR credits_remaining >= $n`
//!
//! If step 3 matches no row the transaction rolls back. The result is
//! `LedgerRaceLost` when the step 1 read looked sufficient, since only a
//! concurrent charge can explain the difference.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ListingId, Timestamp, UserId};
use crate::domain::ledger::{
    Balance, BulkChargeOutcome, BulkChargePlan, ChargeOutcome, ChargeReason, CreditCost,
    RevealRecord,
};
use crate::ports::CreditLedger;

use super::database_error;
use super::profile_repository::stored_credits;

/// PostgreSQL implementation of the CreditLedger port.
pub struct PostgresCreditLedger {
    pool: PgPool,
}

impl PostgresCreditLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BalanceRow {
    credits_remaining: i32,
    unlimited: bool,
}

impl TryFrom<BalanceRow> for Balance {
    type Error = DomainError;

    fn try_from(row: BalanceRow) -> Result<Self, Self::Error> {
        Ok(Balance::new(stored_credits(row.credits_remaining)?, row.unlimited))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RevealRow {
    listing_id: Uuid,
    user_id: String,
    credit_cost: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<RevealRow> for RevealRecord {
    type Error = DomainError;

    fn try_from(row: RevealRow) -> Result<Self, Self::Error> {
        let invalid = |e: crate::domain::foundation::ValidationError| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid reveal row: {}", e))
        };
        let cost = u32::try_from(row.credit_cost).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Negative reveal cost in storage: {}", row.credit_cost),
            )
        })?;
        Ok(RevealRecord {
            listing_id: ListingId::from_uuid(row.listing_id),
            user_id: UserId::new(row.user_id).map_err(invalid)?,
            credit_cost: CreditCost::new(cost).map_err(invalid)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn profile_not_found(user_id: &UserId) -> DomainError {
    DomainError::new(
        ErrorCode::ProfileNotFound,
        format!("No profile for user {}", user_id),
    )
    .with_detail("user_id", user_id.as_str())
}

fn total_as_i64(total: u64) -> Result<i64, DomainError> {
    i64::try_from(total).map_err(|_| DomainError::validation("credit_cost", "charge too large"))
}

async fn read_balance(conn: &mut PgConnection, user_id: &UserId) -> Result<Balance, DomainError> {
    let row: Option<BalanceRow> =
        sqlx::query_as("SELECT credits_remaining, unlimited FROM profiles WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(conn)
            .await
            .map_err(|e| database_error("read balance", e))?;

    row.map(Balance::try_from)
        .transpose()?
        .ok_or_else(|| profile_not_found(user_id))
}

/// Conditional decrement. `None` when the balance no longer covers `amount`.
async fn try_debit(
    conn: &mut PgConnection,
    user_id: &UserId,
    amount: u64,
) -> Result<Option<Balance>, DomainError> {
    let row: Option<BalanceRow> = sqlx::query_as(
        r#"
        UPDATE profiles SET
            credits_remaining = CASE WHEN unlimited THEN credits_remaining
                                     ELSE credits_remaining - $2 END,
            updated_at = CASE WHEN unlimited THEN updated_at ELSE NOW() END
        WHERE id = $1
          AND (unlimited OR credits_remaining >= $2)
        RETURNING credits_remaining, unlimited
        "#,
    )
    .bind(user_id.as_str())
    .bind(total_as_i64(amount)?)
    .fetch_optional(conn)
    .await
    .map_err(|e| database_error("debit credits", e))?;

    row.map(Balance::try_from).transpose()
}

#[async_trait]
impl CreditLedger for PostgresCreditLedger {
    async fn charge_one(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
        cost: CreditCost,
    ) -> Result<ChargeOutcome, DomainError> {
        let required = u64::from(cost.get());
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("begin charge", e))?;

        let before = read_balance(&mut tx, user_id).await?;

        let inserted: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            INSERT INTO reveals (listing_id, user_id, credit_cost, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (listing_id, user_id) DO NOTHING
            RETURNING created_at
            "#,
        )
        .bind(listing_id.as_uuid())
        .bind(user_id.as_str())
        .bind(i64::from(cost.get()))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| database_error("insert reveal", e))?;

        let Some((created_at,)) = inserted else {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback charge", e))?;
            tracing::debug!(user_id = %user_id, listing_id = %listing_id, "Listing already revealed");
            return Ok(ChargeOutcome::already_owned(listing_id));
        };

        if !before.can_afford(required) {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback charge", e))?;
            return Ok(ChargeOutcome::insufficient(listing_id, required, before));
        }

        let Some(after) = try_debit(&mut tx, user_id, required).await? else {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback charge", e))?;
            let current = self.balance(user_id).await?;
            tracing::warn!(
                user_id = %user_id,
                listing_id = %listing_id,
                required,
                "Concurrent charge drained balance before commit"
            );
            return Ok(ChargeOutcome::race_lost(listing_id, required, current));
        };

        tx.commit()
            .await
            .map_err(|e| database_error("commit charge", e))?;

        tracing::debug!(
            user_id = %user_id,
            listing_id = %listing_id,
            cost = required,
            credits_remaining = after.credits_remaining,
            "Listing revealed"
        );

        let record = RevealRecord {
            listing_id,
            user_id: user_id.clone(),
            credit_cost: cost,
            created_at: Timestamp::from_datetime(created_at),
        };
        Ok(ChargeOutcome::charged(record, after))
    }

    async fn charge_many(
        &self,
        user_id: &UserId,
        listing_ids: &[ListingId],
        cost_per_item: CreditCost,
    ) -> Result<BulkChargeOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("begin bulk charge", e))?;

        let before = read_balance(&mut tx, user_id).await?;

        let requested: Vec<Uuid> = listing_ids.iter().map(|id| *id.as_uuid()).collect();
        let owned_rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT listing_id FROM reveals WHERE user_id = $1 AND listing_id = ANY($2)",
        )
        .bind(user_id.as_str())
        .bind(&requested)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| database_error("read owned reveals", e))?;
        let owned: HashSet<ListingId> = owned_rows
            .into_iter()
            .map(|(id,)| ListingId::from_uuid(id))
            .collect();

        let plan = BulkChargePlan::new(listing_ids, &owned, cost_per_item)?;

        if plan.is_free() {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback bulk charge", e))?;
            return Ok(BulkChargeOutcome {
                reason: ChargeReason::AlreadyOwned,
                charged: Vec::new(),
                already_owned: plan.already_owned,
                total_cost: 0,
                balance: Some(before),
            });
        }

        if !before.can_afford(plan.total_cost) {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback bulk charge", e))?;
            return Ok(BulkChargeOutcome {
                reason: ChargeReason::InsufficientCredits,
                charged: Vec::new(),
                already_owned: plan.already_owned,
                total_cost: plan.total_cost,
                balance: Some(before),
            });
        }

        let new_ids: Vec<Uuid> = plan.new_listings.iter().map(|id| *id.as_uuid()).collect();
        let inserted_rows: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(
            r#"
            INSERT INTO reveals (listing_id, user_id, credit_cost, created_at)
            SELECT listing_id, $2, $3, NOW() FROM UNNEST($1::uuid[]) AS t(listing_id)
            ON CONFLICT (listing_id, user_id) DO NOTHING
            RETURNING listing_id, created_at
            "#,
        )
        .bind(&new_ids)
        .bind(user_id.as_str())
        .bind(i64::from(cost_per_item.get()))
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| database_error("insert reveals", e))?;

        // A concurrent request may have revealed some of these since the
        // owned-set read. Only rows this transaction inserted are charged.
        let inserted: std::collections::HashMap<Uuid, DateTime<Utc>> =
            inserted_rows.into_iter().collect();
        let mut already_owned = plan.already_owned;
        let mut charged = Vec::with_capacity(inserted.len());
        for id in plan.new_listings {
            match inserted.get(id.as_uuid()) {
                Some(created_at) => charged.push(RevealRecord {
                    listing_id: id,
                    user_id: user_id.clone(),
                    credit_cost: cost_per_item,
                    created_at: Timestamp::from_datetime(*created_at),
                }),
                None => already_owned.push(id),
            }
        }

        if charged.is_empty() {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback bulk charge", e))?;
            return Ok(BulkChargeOutcome {
                reason: ChargeReason::AlreadyOwned,
                charged: Vec::new(),
                already_owned,
                total_cost: 0,
                balance: Some(before),
            });
        }

        let total_cost = cost_per_item
            .times(charged.len())
            .ok_or_else(|| DomainError::validation("listing_ids", "total reveal cost overflows"))?;

        let Some(after) = try_debit(&mut tx, user_id, total_cost).await? else {
            tx.rollback()
                .await
                .map_err(|e| database_error("rollback bulk charge", e))?;
            let current = self.balance(user_id).await?;
            tracing::warn!(
                user_id = %user_id,
                total_cost,
                "Concurrent charge drained balance before bulk commit"
            );
            return Ok(BulkChargeOutcome {
                reason: ChargeReason::LedgerRaceLost,
                charged: Vec::new(),
                already_owned,
                total_cost,
                balance: Some(current),
            });
        };

        tx.commit()
            .await
            .map_err(|e| database_error("commit bulk charge", e))?;

        tracing::debug!(
            user_id = %user_id,
            charged = charged.len(),
            total_cost,
            "Bulk reveal charged"
        );

        Ok(BulkChargeOutcome {
            reason: ChargeReason::Charged,
            charged,
            already_owned,
            total_cost,
            balance: Some(after),
        })
    }

    async fn balance(&self, user_id: &UserId) -> Result<Balance, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| database_error("acquire connection", e))?;
        read_balance(&mut conn, user_id).await
    }

    async fn is_revealed(
        &self,
        user_id: &UserId,
        listing_id: ListingId,
    ) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM reveals WHERE listing_id = $1 AND user_id = $2)",
        )
        .bind(listing_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("check reveal", e))?;

        Ok(exists)
    }

    async fn revealed_listings(&self, user_id: &UserId) -> Result<Vec<RevealRecord>, DomainError> {
        let rows: Vec<RevealRow> = sqlx::query_as(
            r#"
            SELECT listing_id, user_id, credit_cost, created_at
            FROM reveals
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list reveals", e))?;

        rows.into_iter().map(RevealRecord::try_from).collect()
    }
}
