use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};
use trygg_core::OfferService;

/// Periodic anonymization of offers that expired without acceptance.
///
/// Runs on a single task: each sweep is awaited to completion before the
/// next tick can fire, and missed ticks are skipped rather than bursted,
/// so two sweeps never run at the same time.
pub async fn run_anonymization_sweeper(offers: Arc<OfferService>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Anonymization sweeper started, interval {:?}", every);

    loop {
        ticker.tick().await;
        match offers.anonymize_expired(Utc::now()).await {
            Ok(touched) => info!(touched, "anonymization sweep finished"),
            Err(e) => error!("anonymization sweep could not scan offers: {}", e),
        }
    }
}
