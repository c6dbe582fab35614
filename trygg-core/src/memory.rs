use crate::offer::{Offer, OfferStatus};
use crate::repository::{OfferRepository, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// HashMap-backed repository, used by tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryOfferRepository {
    offers: RwLock<HashMap<Uuid, Offer>>,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn insert(&self, offer: &Offer) -> Result<(), StoreError> {
        let mut offers = self.offers.write().unwrap_or_else(PoisonError::into_inner);
        offers.insert(offer.id, offer.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Offer>, StoreError> {
        let offers = self.offers.read().unwrap_or_else(PoisonError::into_inner);
        Ok(offers.get(&id).cloned())
    }

    async fn update(&self, offer: &Offer) -> Result<(), StoreError> {
        let mut offers = self.offers.write().unwrap_or_else(PoisonError::into_inner);
        let stored = offers
            .get_mut(&offer.id)
            .ok_or(StoreError::VersionConflict(offer.id))?;
        if stored.version != offer.version {
            return Err(StoreError::VersionConflict(offer.id));
        }
        let mut next = offer.clone();
        next.version += 1;
        *stored = next;
        Ok(())
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        let offers = self.offers.read().unwrap_or_else(PoisonError::into_inner);
        Ok(offers.len() as u64)
    }

    async fn count_accepted_before(&self, before: DateTime<Utc>) -> Result<u64, StoreError> {
        let offers = self.offers.read().unwrap_or_else(PoisonError::into_inner);
        let count = offers
            .values()
            .filter(|o| o.status == OfferStatus::Accepted)
            .filter(|o| o.accepted_at.is_some_and(|at| at < before))
            .count();
        Ok(count as u64)
    }

    async fn list_expired_created(&self, now: DateTime<Utc>) -> Result<Vec<Offer>, StoreError> {
        let offers = self.offers.read().unwrap_or_else(PoisonError::into_inner);
        Ok(offers
            .values()
            .filter(|o| o.status == OfferStatus::Created && o.valid_until < now)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::OfferDraft;
    use rust_decimal::Decimal;

    fn sample_offer() -> Offer {
        Offer::new(
            OfferDraft {
                personal_id: "19800101-1234".to_string(),
                loans: Vec::new(),
                monthly_cost: Decimal::ZERO,
            },
            30,
        )
    }

    #[tokio::test]
    async fn update_rejects_stale_versions() {
        let repo = InMemoryOfferRepository::new();
        let offer = sample_offer();
        repo.insert(&offer).await.unwrap();

        // First writer wins and bumps the version.
        repo.update(&offer).await.unwrap();
        assert_eq!(repo.get(offer.id).await.unwrap().unwrap().version, 1);

        // Second writer still holds version 0.
        let err = repo.update(&offer).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict(id) if id == offer.id));
    }

    #[tokio::test]
    async fn expired_created_listing_ignores_live_offers() {
        let repo = InMemoryOfferRepository::new();
        let live = sample_offer();
        let mut expired = sample_offer();
        expired.valid_until = Utc::now() - chrono::Duration::days(1);
        repo.insert(&live).await.unwrap();
        repo.insert(&expired).await.unwrap();

        let hits = repo.list_expired_created(Utc::now()).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, expired.id);
    }
}
