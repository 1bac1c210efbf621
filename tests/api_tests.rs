use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use serde_json::{json, Value};

use listing_recommender::{
    config::Config,
    db::InMemoryStore,
    models::{ApprovalStatus, Listing, Location, PropertyType},
    routes::{create_router, AppState},
};

fn listing(id: i64, price: f64, bedrooms: i32) -> Listing {
    Listing {
        id,
        title: format!("Listing {}", id),
        description: None,
        property_type: PropertyType::House,
        location: Location {
            province: "Luanda".to_string(),
            municipality: "Viana".to_string(),
            neighborhood: None,
        },
        price,
        bedrooms: Some(bedrooms),
        bathrooms: None,
        area: None,
        status: ApprovalStatus::Approved,
        owner_id: 1,
        created_at: Utc::now(),
    }
}

const REGISTERED_USERS: [i64; 6] = [1, 3, 4, 7, 10, 11];

fn create_test_server(listings: Vec<Listing>) -> TestServer {
    let config = Config::from_vars(Vec::new()).unwrap();
    let store = Arc::new(InMemoryStore::seeded(REGISTERED_USERS, listings));
    let app = create_router(AppState::new(store, &config));
    TestServer::new(app).unwrap()
}

fn as_user(request: TestRequest, user_id: i64, role: &str) -> TestRequest {
    request
        .add_header(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_str(&user_id.to_string()).unwrap(),
        )
        .add_header(
            HeaderName::from_static("x-user-role"),
            HeaderValue::from_str(role).unwrap(),
        )
}

fn recommended_ids(body: &Value) -> Vec<i64> {
    body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["listing"]["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Vec::new());
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server(Vec::new());
    let request_id = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(request_id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), request_id);
}

#[tokio::test]
async fn test_recommendations_require_session() {
    let server = create_test_server(vec![listing(1, 10.0, 2)]);

    let response = server.get("/api/v1/recommendations").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_recommendation_access_by_role() {
    let server = create_test_server(vec![listing(1, 10.0, 2)]);

    as_user(server.get("/api/v1/users/5/recommendations"), 3, "agency")
        .await
        .assert_status(StatusCode::FORBIDDEN);

    as_user(server.get("/api/v1/users/5/recommendations"), 4, "consumer")
        .await
        .assert_status(StatusCode::FORBIDDEN);

    as_user(server.get("/api/v1/users/5/recommendations"), 1, "admin")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_preferences_drive_content_ranking() {
    let server = create_test_server(vec![
        listing(1, 10.0, 2),
        listing(2, 50.0, 4),
        listing(3, 10.0, 2),
    ]);

    let response = as_user(server.put("/api/v1/preferences"), 7, "consumer")
        .json(&json!({
            "property_type": null,
            "province": null,
            "max_price": 10.0,
            "min_bedrooms": 2
        }))
        .await;
    response.assert_status_ok();

    let response = as_user(server.get("/api/v1/preferences"), 7, "consumer").await;
    let body: Value = response.json();
    assert_eq!(body["preferences"]["min_bedrooms"], 2);

    let response = as_user(server.get("/api/v1/recommendations?n=3"), 7, "consumer").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["user_id"], 7);
    assert_eq!(recommended_ids(&body), vec![1, 3, 2]);
    assert_eq!(body["recommendations"][0]["source"], "content");
}

#[tokio::test]
async fn test_negative_n_is_rejected() {
    let server = create_test_server(vec![listing(1, 10.0, 2)]);

    let response = as_user(server.get("/api/v1/recommendations?n=-1"), 7, "consumer").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("n must be non-negative"));
}

#[tokio::test]
async fn test_invalid_preferences_are_rejected() {
    let server = create_test_server(Vec::new());

    as_user(server.put("/api/v1/preferences"), 7, "consumer")
        .json(&json!({ "max_price": -5.0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_interactions_feed_collaborative_recommendations() {
    let server = create_test_server(vec![
        listing(1, 10.0, 1),
        listing(2, 20.0, 2),
        listing(3, 30.0, 3),
    ]);

    // No listing matches this province, so content scoring contributes nothing
    as_user(server.put("/api/v1/preferences"), 10, "consumer")
        .json(&json!({ "province": "Benguela" }))
        .await
        .assert_status_ok();

    for (user_id, listing_id) in [(10, 1), (11, 1), (11, 2), (11, 2)] {
        as_user(
            server.post(&format!("/api/v1/listings/{}/interactions", listing_id)),
            user_id,
            "consumer",
        )
        .json(&json!({ "kind": "view" }))
        .await
        .assert_status(StatusCode::CREATED);
    }

    let response = as_user(server.get("/api/v1/recommendations"), 10, "consumer").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(recommended_ids(&body), vec![2, 1]);
    assert_eq!(body["recommendations"][0]["source"], "collaborative");
}

#[tokio::test]
async fn test_interaction_on_unknown_listing_is_not_found() {
    let server = create_test_server(vec![listing(1, 10.0, 1)]);

    as_user(server.post("/api/v1/listings/99/interactions"), 10, "consumer")
        .json(&json!({ "kind": "click" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_flow() {
    let server = create_test_server(vec![listing(1, 10.0, 1), listing(2, 20.0, 2)]);

    as_user(server.put("/api/v1/listings/1/favorite"), 4, "consumer")
        .await
        .assert_status(StatusCode::CREATED);
    as_user(server.put("/api/v1/listings/1/favorite"), 4, "consumer")
        .await
        .assert_status_ok();

    let response = as_user(server.get("/api/v1/favorites"), 4, "consumer").await;
    let favorites: Vec<Value> = response.json();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["id"], 1);

    as_user(server.delete("/api/v1/listings/1/favorite"), 4, "consumer")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    as_user(server.delete("/api/v1/listings/1/favorite"), 4, "consumer")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_writes_from_unknown_user_are_not_found() {
    let server = create_test_server(vec![listing(1, 10.0, 1)]);

    as_user(server.put("/api/v1/preferences"), 99, "consumer")
        .json(&json!({ "min_bedrooms": 1 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    as_user(server.post("/api/v1/listings/1/interactions"), 99, "consumer")
        .json(&json!({ "kind": "view" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    as_user(server.put("/api/v1/listings/1/favorite"), 99, "consumer")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
