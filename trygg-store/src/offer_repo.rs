use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use trygg_core::offer::{Loan, Offer, OfferStatus};
use trygg_core::pii::Masked;
use trygg_core::repository::{OfferRepository, StoreError};
use uuid::Uuid;

pub struct PostgresOfferRepository {
    pub pool: PgPool,
}

impl PostgresOfferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend<E>(e: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend(Box::new(e))
}

fn offer_from_row(row: &PgRow) -> Result<Offer, StoreError> {
    let loans: serde_json::Value = row.try_get("loans").map_err(backend)?;
    let loans: Vec<Loan> = serde_json::from_value(loans).map_err(backend)?;

    let status: String = row.try_get("status").map_err(backend)?;
    let status: OfferStatus = status.parse().map_err(backend)?;

    let personal_id: Option<String> = row.try_get("personal_id").map_err(backend)?;

    Ok(Offer {
        id: row.try_get("id").map_err(backend)?,
        personal_id: personal_id.map(Masked),
        loans,
        monthly_cost: row.try_get("monthly_cost").map_err(backend)?,
        insured_amount: row.try_get("insured_amount").map_err(backend)?,
        premium: row.try_get("premium").map_err(backend)?,
        status,
        created_at: row.try_get("created_at").map_err(backend)?,
        valid_until: row.try_get("valid_until").map_err(backend)?,
        accepted_at: row.try_get("accepted_at").map_err(backend)?,
        version: row.try_get("version").map_err(backend)?,
    })
}

#[async_trait]
impl OfferRepository for PostgresOfferRepository {
    async fn insert(&self, offer: &Offer) -> Result<(), StoreError> {
        let loans = serde_json::to_value(&offer.loans).map_err(backend)?;

        sqlx::query(
            r#"
            INSERT INTO offers (id, personal_id, loans, monthly_cost, insured_amount, premium,
                                status, created_at, valid_until, accepted_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(offer.id)
        .bind(offer.personal_id.as_ref().map(|p| p.0.as_str()))
        .bind(loans)
        .bind(offer.monthly_cost)
        .bind(offer.insured_amount)
        .bind(offer.premium)
        .bind(offer.status.to_string())
        .bind(offer.created_at)
        .bind(offer.valid_until)
        .bind(offer.accepted_at)
        .bind(offer.version)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Offer>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, personal_id, loans, monthly_cost, insured_amount, premium,
                   status, created_at, valid_until, accepted_at, version
            FROM offers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(offer_from_row).transpose()
    }

    async fn update(&self, offer: &Offer) -> Result<(), StoreError> {
        let loans = serde_json::to_value(&offer.loans).map_err(backend)?;

        // Compare-and-swap on the version column; a stale writer affects
        // zero rows.
        let result = sqlx::query(
            r#"
            UPDATE offers
            SET personal_id = $2, loans = $3, monthly_cost = $4, insured_amount = $5,
                premium = $6, status = $7, accepted_at = $8, version = version + 1
            WHERE id = $1 AND version = $9
            "#,
        )
        .bind(offer.id)
        .bind(offer.personal_id.as_ref().map(|p| p.0.as_str()))
        .bind(loans)
        .bind(offer.monthly_cost)
        .bind(offer.insured_amount)
        .bind(offer.premium)
        .bind(offer.status.to_string())
        .bind(offer.accepted_at)
        .bind(offer.version)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict(offer.id));
        }
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM offers")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;

        let total: i64 = row.try_get("total").map_err(backend)?;
        Ok(total as u64)
    }

    async fn count_accepted_before(&self, before: DateTime<Utc>) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total FROM offers WHERE status = 'ACCEPTED' AND accepted_at < $1",
        )
        .bind(before)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        let total: i64 = row.try_get("total").map_err(backend)?;
        Ok(total as u64)
    }

    async fn list_expired_created(&self, now: DateTime<Utc>) -> Result<Vec<Offer>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, personal_id, loans, monthly_cost, insured_amount, premium,
                   status, created_at, valid_until, accepted_at, version
            FROM offers
            WHERE status = 'CREATED' AND valid_until < $1
            ORDER BY created_at
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(offer_from_row).collect()
    }
}
