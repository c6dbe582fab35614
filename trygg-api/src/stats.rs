use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::state::AppState;
use trygg_core::ConversionStats;

/// GET /stats/conversion
pub async fn conversion(State(state): State<AppState>) -> Result<Json<ConversionStats>, ApiError> {
    let stats = state.offers.conversion_stats(state.valid_days).await?;
    Ok(Json(stats))
}
