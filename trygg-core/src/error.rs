use crate::repository::StoreError;
use uuid::Uuid;

/// Deterministic validation failures of the offer lifecycle, plus storage
/// passthrough. None of the first three are ever transient, so no retry
/// policy applies to them.
#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("Offer not found: {0}")]
    NotFound(Uuid),

    #[error("Offer expired: {0}")]
    Expired(Uuid),

    #[error("Offer already accepted: {0}")]
    AlreadyAccepted(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
