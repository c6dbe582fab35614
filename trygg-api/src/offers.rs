use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use trygg_core::offer::{Loan, Offer, OfferDraft, OfferStatus};
use trygg_core::pii::Masked;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDto {
    pub lender: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub personal_id: String,
    pub loans: Vec<LoanDto>,
    pub monthly_cost: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOfferRequest {
    pub personal_id: String,
    pub loans: Vec<LoanDto>,
    pub monthly_cost: Decimal,
}

/// Public offer view. `accepted_at` is deliberately not exposed here.
#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub id: Uuid,
    pub personal_id: Option<String>,
    pub loans: Vec<LoanDto>,
    pub monthly_cost: Decimal,
    pub insured_amount: Decimal,
    pub premium: Decimal,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
}

impl From<Offer> for OfferResponse {
    fn from(offer: Offer) -> Self {
        Self {
            id: offer.id,
            personal_id: offer.personal_id.map(Masked::into_inner),
            loans: offer
                .loans
                .into_iter()
                .map(|l| LoanDto {
                    lender: l.lender,
                    amount: l.amount,
                })
                .collect(),
            monthly_cost: offer.monthly_cost,
            insured_amount: offer.insured_amount,
            premium: offer.premium,
            status: offer.status,
            created_at: offer.created_at,
            valid_until: offer.valid_until,
        }
    }
}

fn draft(personal_id: String, loans: Vec<LoanDto>, monthly_cost: Decimal) -> OfferDraft {
    OfferDraft {
        personal_id,
        loans: loans
            .into_iter()
            .map(|l| Loan {
                lender: l.lender,
                amount: l.amount,
            })
            .collect(),
        monthly_cost,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /offer
pub async fn create_offer(
    State(state): State<AppState>,
    Json(req): Json<CreateOfferRequest>,
) -> Result<Json<OfferResponse>, ApiError> {
    let offer = state
        .offers
        .create(
            draft(req.personal_id, req.loans, req.monthly_cost),
            state.valid_days,
        )
        .await?;
    Ok(Json(offer.into()))
}

/// PUT /offer/{id}
pub async fn update_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOfferRequest>,
) -> Result<Json<OfferResponse>, ApiError> {
    let offer = state
        .offers
        .update(id, draft(req.personal_id, req.loans, req.monthly_cost))
        .await?;
    Ok(Json(offer.into()))
}

/// POST /offer/{id}/accept
pub async fn accept_offer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferResponse>, ApiError> {
    let offer = state.offers.accept(id).await?;
    Ok(Json(offer.into()))
}
