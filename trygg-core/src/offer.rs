use crate::pii::Masked;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Premium rate applied to the insured amount (3.8%).
pub fn premium_rate() -> Decimal {
    Decimal::new(38, 3)
}

/// Offer status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferStatus {
    Created,
    Accepted,
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferStatus::Created => write!(f, "CREATED"),
            OfferStatus::Accepted => write!(f, "ACCEPTED"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown offer status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for OfferStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(OfferStatus::Created),
            "ACCEPTED" => Ok(OfferStatus::Accepted),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A single loan covered by an offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Loan {
    pub lender: String,
    pub amount: Decimal,
}

/// Client-supplied fields of an offer, used for both creation and update
#[derive(Debug, Clone)]
pub struct OfferDraft {
    pub personal_id: String,
    pub loans: Vec<Loan>,
    pub monthly_cost: Decimal,
}

/// An insurance offer tied to a set of consumer loans
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offer {
    pub id: Uuid,
    pub personal_id: Option<Masked<String>>,
    pub loans: Vec<Loan>,
    pub monthly_cost: Decimal,
    pub insured_amount: Decimal,
    pub premium: Decimal,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    /// Optimistic-lock counter, bumped by the repository on every successful update.
    pub version: i64,
}

impl Offer {
    /// Create a new offer from client data, deriving the insured amount and
    /// premium and opening the validity window.
    pub fn new(draft: OfferDraft, valid_days: i64) -> Self {
        let now = Utc::now();
        let mut offer = Self {
            id: Uuid::new_v4(),
            personal_id: Some(Masked(draft.personal_id)),
            loans: draft.loans,
            monthly_cost: draft.monthly_cost,
            insured_amount: Decimal::ZERO,
            premium: Decimal::ZERO,
            status: OfferStatus::Created,
            created_at: now,
            valid_until: now + Duration::days(valid_days),
            accepted_at: None,
            version: 0,
        };
        offer.recalculate();
        offer
    }

    /// Overwrite the client-supplied fields and recompute the derived ones
    /// from scratch. The validity window is never extended.
    pub fn apply(&mut self, draft: OfferDraft) {
        self.personal_id = Some(Masked(draft.personal_id));
        self.loans = draft.loans;
        self.monthly_cost = draft.monthly_cost;
        self.recalculate();
    }

    /// Check if offer can no longer be accepted or updated at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    fn recalculate(&mut self) {
        // Amounts are summed as-is; zero or negative entries are not rejected here.
        self.insured_amount = self.loans.iter().map(|l| l.amount).sum();
        self.premium = self.insured_amount * premium_rate();
    }
}
