use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trygg_api::{app, sweeper, AppState};
use trygg_core::{OfferRepository, OfferService};
use trygg_store::{DbClient, PostgresOfferRepository};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trygg_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = trygg_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting trygg API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let repo: Arc<dyn OfferRepository> = Arc::new(PostgresOfferRepository::new(db.pool.clone()));
    let offers = Arc::new(OfferService::new(repo));

    tokio::spawn(sweeper::run_anonymization_sweeper(
        offers.clone(),
        Duration::from_secs(config.offer.sweep_interval_seconds),
    ));

    let app = app(AppState {
        offers,
        valid_days: config.offer.valid_days,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
