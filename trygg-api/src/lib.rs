use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod offers;
pub mod state;
pub mod stats;
pub mod sweeper;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/offer", post(offers::create_offer))
        .route("/offer/{id}", put(offers::update_offer))
        .route("/offer/{id}/accept", post(offers::accept_offer))
        .route("/stats/conversion", get(stats::conversion))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
