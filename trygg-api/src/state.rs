use std::sync::Arc;
use trygg_core::OfferService;

#[derive(Clone)]
pub struct AppState {
    pub offers: Arc<OfferService>,
    /// Validity period for new offers, handed to the engine per call.
    pub valid_days: i64,
}
