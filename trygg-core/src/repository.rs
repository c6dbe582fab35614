use crate::offer::Offer;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Failures raised by a repository backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record changed under us between load and save.
    #[error("offer {0} was modified concurrently")]
    VersionConflict(Uuid),

    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Repository trait for offer data access
#[async_trait]
pub trait OfferRepository: Send + Sync {
    async fn insert(&self, offer: &Offer) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Offer>, StoreError>;

    /// Persist a modified offer. The write only succeeds when the stored
    /// version still equals `offer.version`; the stored version is then
    /// bumped by one. A mismatch yields [`StoreError::VersionConflict`].
    async fn update(&self, offer: &Offer) -> Result<(), StoreError>;

    async fn count_all(&self) -> Result<u64, StoreError>;

    async fn count_accepted_before(&self, before: DateTime<Utc>) -> Result<u64, StoreError>;

    /// All offers still in `Created` status whose validity window closed
    /// before `now`, i.e. the candidates for anonymization.
    async fn list_expired_created(&self, now: DateTime<Utc>) -> Result<Vec<Offer>, StoreError>;
}
