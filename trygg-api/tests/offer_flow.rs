use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use trygg_api::{app, AppState};
use trygg_core::{InMemoryOfferRepository, OfferService};

fn test_app() -> Router {
    let repo = Arc::new(InMemoryOfferRepository::new());
    let offers = Arc::new(OfferService::new(repo));
    app(AppState {
        offers,
        valid_days: 30,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(v) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Decimal fields serialize as JSON strings; compare them numerically so
/// trailing zeros don't matter.
fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn sample_offer_body() -> Value {
    json!({
        "personal_id": "19800101-1234",
        "loans": [
            { "lender": "BankA", "amount": 1_200_000 },
            { "lender": "BankB", "amount": 800_000 }
        ],
        "monthly_cost": 9_500
    })
}

#[tokio::test]
async fn create_offer_returns_populated_view() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/offer", Some(sample_offer_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["personal_id"], "19800101-1234");
    assert_eq!(decimal(&body["insured_amount"]), Decimal::new(2_000_000, 0));
    assert_eq!(decimal(&body["premium"]), Decimal::new(76_000, 0));
    assert_eq!(body["status"], "CREATED");
    assert_eq!(body["loans"].as_array().unwrap().len(), 2);
    assert!(body.get("id").is_some());
    assert!(body.get("created_at").is_some());
    assert!(body.get("valid_until").is_some());
    // Acceptance time stays out of the public view.
    assert!(body.get("accepted_at").is_none());
}

#[tokio::test]
async fn update_recomputes_amounts_but_not_the_validity_window() {
    let app = test_app();
    let (_, created) = send(&app, Method::POST, "/offer", Some(sample_offer_body())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/offer/{id}"),
        Some(json!({
            "personal_id": "19900202-5678",
            "loans": [{ "lender": "BankC", "amount": 1_000_000 }],
            "monthly_cost": 12_000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["personal_id"], "19900202-5678");
    assert_eq!(decimal(&updated["insured_amount"]), Decimal::new(1_000_000, 0));
    assert_eq!(decimal(&updated["premium"]), Decimal::new(38_000, 0));
    assert_eq!(updated["valid_until"], created["valid_until"]);
}

#[tokio::test]
async fn accept_marks_the_offer_accepted() {
    let app = test_app();
    let (_, created) = send(&app, Method::POST, "/offer", Some(sample_offer_body())).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, accepted) = send(&app, Method::POST, &format!("/offer/{id}/accept"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");
    assert!(accepted.get("accepted_at").is_none());
}

#[tokio::test]
async fn update_after_acceptance_is_a_client_error() {
    let app = test_app();
    let (_, created) = send(&app, Method::POST, "/offer", Some(sample_offer_body())).await;
    let id = created["id"].as_str().unwrap().to_string();
    send(&app, Method::POST, &format!("/offer/{id}/accept"), None).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/offer/{id}"),
        Some(sample_offer_body()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Offer already accepted"));
}

#[tokio::test]
async fn accepting_an_unknown_offer_is_not_found() {
    let app = test_app();
    let id = uuid::Uuid::new_v4();

    let (status, body) = send(&app, Method::POST, &format!("/offer/{id}/accept"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Offer not found"));
}

#[tokio::test]
async fn stats_on_an_empty_store_report_zero_rate() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/stats/conversion", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert_eq!(body["accepted_within_validity"], 0);
    assert_eq!(body["conversion_rate_percent"], 0.0);
    assert_eq!(body["period_description"], "30 days");
}

#[tokio::test]
async fn stats_report_the_accepted_share() {
    let app = test_app();
    let (_, first) = send(&app, Method::POST, "/offer", Some(sample_offer_body())).await;
    send(&app, Method::POST, "/offer", Some(sample_offer_body())).await;
    let id = first["id"].as_str().unwrap().to_string();
    send(&app, Method::POST, &format!("/offer/{id}/accept"), None).await;

    let (status, body) = send(&app, Method::GET, "/stats/conversion", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["accepted_within_validity"], 1);
    assert_eq!(body["conversion_rate_percent"], 50.0);
}
