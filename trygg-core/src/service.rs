use crate::error::OfferError;
use crate::offer::{Offer, OfferDraft, OfferStatus};
use crate::repository::{OfferRepository, StoreError};
use crate::stats::ConversionStats;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Offer lifecycle engine: creation, update, acceptance and the
/// anonymization sweep, on top of a pluggable repository.
pub struct OfferService {
    repo: Arc<dyn OfferRepository>,
}

impl OfferService {
    pub fn new(repo: Arc<dyn OfferRepository>) -> Self {
        Self { repo }
    }

    /// Create and persist a new offer. The validity period is passed in
    /// explicitly rather than read from ambient configuration.
    pub async fn create(&self, draft: OfferDraft, valid_days: i64) -> Result<Offer, OfferError> {
        let offer = Offer::new(draft, valid_days);
        self.repo.insert(&offer).await?;
        Ok(offer)
    }

    /// Replace the client-supplied fields of an offer and recompute the
    /// derived ones. Checked in order: existence, not yet accepted, not
    /// expired. The validity window is not renewed by an update.
    pub async fn update(&self, id: Uuid, draft: OfferDraft) -> Result<Offer, OfferError> {
        let mut offer = self.repo.get(id).await?.ok_or(OfferError::NotFound(id))?;
        if offer.status != OfferStatus::Created {
            return Err(OfferError::AlreadyAccepted(id));
        }
        if offer.is_expired_at(Utc::now()) {
            return Err(OfferError::Expired(id));
        }

        offer.apply(draft);
        self.repo.update(&offer).await?;
        Ok(offer)
    }

    /// Accept an offer that is still within its validity window.
    ///
    /// Acceptance is not blocked by a prior acceptance: re-accepting a
    /// still-valid offer succeeds and resets `accepted_at`.
    pub async fn accept(&self, id: Uuid) -> Result<Offer, OfferError> {
        let mut offer = self.repo.get(id).await?.ok_or(OfferError::NotFound(id))?;
        if offer.is_expired_at(Utc::now()) {
            return Err(OfferError::Expired(id));
        }

        offer.status = OfferStatus::Accepted;
        offer.accepted_at = Some(Utc::now());
        self.repo.update(&offer).await?;
        Ok(offer)
    }

    /// Clear the personal identifier on every offer that expired without
    /// being accepted. Best-effort batch: a failure to persist one record
    /// is logged and never aborts the rest. Returns the number of records
    /// actually touched, so a second run right after a first returns 0.
    pub async fn anonymize_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let expired = self.repo.list_expired_created(now).await?;
        let mut touched = 0;
        for mut offer in expired {
            if offer.personal_id.is_none() {
                continue;
            }
            offer.personal_id = None;
            match self.repo.update(&offer).await {
                Ok(()) => touched += 1,
                Err(e) => {
                    tracing::warn!(offer_id = %offer.id, "failed to anonymize offer: {e}");
                }
            }
        }
        Ok(touched)
    }

    /// Conversion reporting over all offers ever created.
    pub async fn conversion_stats(&self, valid_days: i64) -> Result<ConversionStats, OfferError> {
        let total = self.repo.count_all().await?;
        let accepted = self.repo.count_accepted_before(Utc::now()).await?;
        Ok(ConversionStats::from_counts(total, accepted, valid_days))
    }
}
