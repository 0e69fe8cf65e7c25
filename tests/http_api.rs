use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pilgrim_planner::cache::AppCache;
use pilgrim_planner::planner::models::Deal;
use pilgrim_planner::{app, AppState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

// Only the stateless endpoints and cache-backed reads are exercised here, so
// the pool never connects.
fn make_app() -> Router {
    make_app_with_cache(AppCache::default())
}

fn make_app_with_cache(cache: AppCache) -> Router {
    let db = PgPoolOptions::new()
        .connect_lazy("postgres://planner@localhost/planner_test")
        .unwrap();
    app(AppState { db, cache })
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn money(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn trip(num_travelers: u32) -> Value {
    json!({
        "pilgrimage_id": 10,
        "start_date": "2026-05-01",
        "end_date": "2026-05-05",
        "num_travelers": num_travelers,
        "accommodation_type": "standard",
        "transportation": "private",
        "guide_required": true,
        "base_price": "100"
    })
}

fn deal(code: &str, min_travelers: i32) -> Value {
    json!({
        "code": code,
        "title": format!("{} deal", code),
        "discount_percentage": "20",
        "valid_from": "2026-03-01",
        "valid_to": "2026-03-31",
        "pilgrimage_id": null,
        "min_travelers": min_travelers,
        "min_days": 1,
        "active": true
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn price_endpoint_returns_breakdown() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/price",
        json!({
            "base_price": "100",
            "num_travelers": 2,
            "accommodation_type": "standard",
            "transportation": "private",
            "guide_required": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&body["base_total"]), dec!(200));
    assert_eq!(money(&body["subtotal"]), dec!(510));
    assert_eq!(money(&body["tax_amount"]), dec!(43.35));
    assert_eq!(money(&body["discount_amount"]), dec!(0));
    assert_eq!(money(&body["total"]), dec!(553.35));
}

#[tokio::test]
async fn price_endpoint_rejects_empty_party() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/price",
        json!({
            "num_travelers": 0,
            "accommodation_type": "budget",
            "transportation": "public"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_input");
}

#[tokio::test]
async fn price_endpoint_reports_malformed_bodies_as_json() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/price",
        json!({
            "num_travelers": -1,
            "accommodation_type": "budget",
            "transportation": "public"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_input");
    assert!(body["message"].as_str().unwrap().contains("num_travelers"));
}

#[tokio::test]
async fn price_endpoint_rejects_unpriceable_amounts() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/price",
        json!({
            "base_price": Decimal::MAX.to_string(),
            "num_travelers": 2,
            "accommodation_type": "luxury",
            "transportation": "guided_tour"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_input");
}

#[tokio::test]
async fn refund_endpoint_applies_policy_tiers() {
    let app = make_app();

    let (status, body) = post_json(
        &app,
        "/api/planner/refund",
        json!({ "total_paid": "1000", "days_until_trip": 20 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&body["refund_amount"]), dec!(700));
    assert_eq!(body["refund_percentage"], 70);

    let (_, body) = post_json(
        &app,
        "/api/planner/refund",
        json!({ "total_paid": "1000", "days_until_trip": 1 }),
    )
    .await;
    assert_eq!(money(&body["refund_amount"]), dec!(0));
    assert_eq!(body["tier"], "no_refund");
}

#[tokio::test]
async fn itinerary_endpoint_distributes_attractions() {
    let app = make_app();
    let attractions: Vec<Value> = (1..=12)
        .map(|id| json!({ "id": id, "popularity": 13 - id, "visit_duration_minutes": 90 }))
        .collect();

    let (status, body) = post_json(
        &app,
        "/api/planner/itinerary",
        json!({
            "start_date": "2026-05-01",
            "end_date": "2026-05-05",
            "attractions": attractions
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scheduled_count"], 8);
    assert_eq!(body["unscheduled"], json!([9, 10, 11, 12]));

    let days = body["days"].as_array().unwrap();
    let per_day: Vec<usize> = days
        .iter()
        .map(|d| d["attractions"].as_array().unwrap().len())
        .collect();
    assert_eq!(per_day, vec![1, 2, 2, 2, 1]);
    assert_eq!(days[0]["title"], "Arrival & Orientation");
    assert_eq!(days[0]["attractions"][0]["attraction_id"], 1);
    assert_eq!(days[1]["attractions"][1]["start_time"], "11:15");
    assert_eq!(days[1]["total_duration_minutes"], 180);
    assert_eq!(days[1]["end_time"], "11:15");
}

#[tokio::test]
async fn itinerary_endpoint_rejects_reversed_dates() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/itinerary",
        json!({ "start_date": "2026-05-05", "end_date": "2026-05-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_input");
}

#[tokio::test]
async fn itinerary_endpoint_rejects_overlong_trips() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/itinerary",
        json!({ "start_date": "0001-01-01", "end_date": "9999-12-31" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_input");
}

#[tokio::test]
async fn current_deals_lists_catalog_valid_today() {
    let cache = AppCache::default();
    let april: Deal = serde_json::from_value(json!({
        "code": "APRIL",
        "discount_percentage": "5",
        "valid_from": "2026-04-01",
        "valid_to": "2026-04-30",
        "min_travelers": 1,
        "min_days": 1,
        "active": true
    }))
    .unwrap();
    let group: Deal = serde_json::from_value(deal("GROUP20", 8)).unwrap();
    cache.store_active_deals(vec![group, april]).await;
    let app = make_app_with_cache(cache);

    let (status, body) = get_json(&app, "/api/planner/deals?today=2026-03-15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["deals"][0]["code"], "GROUP20");

    let (_, body) = get_json(&app, "/api/planner/deals?today=2026-04-10").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["deals"][0]["code"], "APRIL");

    let (status, body) = get_json(&app, "/api/planner/deals?today=someday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_input");
}

#[tokio::test]
async fn applicable_deals_accepts_unknown_payment_status() {
    let app = make_app();
    let mut refunded = trip(2);
    refunded["payment_status"] = json!("refunded");

    let (status, body) = post_json(
        &app,
        "/api/planner/deals/applicable",
        json!({
            "trip": refunded,
            "deals": [deal("EARLYBIRD", 1)],
            "today": "2026-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn applicable_deals_excludes_unmet_minimums() {
    let app = make_app();
    let (status, body) = post_json(
        &app,
        "/api/planner/deals/applicable",
        json!({
            "trip": trip(4),
            "deals": [deal("EARLYBIRD", 1), deal("GROUP20", 5)],
            "today": "2026-03-15"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["deals"][0]["code"], "EARLYBIRD");
}

#[tokio::test]
async fn apply_deal_endpoint() {
    let app = make_app();

    let (status, body) = post_json(
        &app,
        "/api/planner/deals/apply",
        json!({
            "trip": trip(2),
            "deals": [deal("EARLYBIRD", 1)],
            "deal_code": "EARLYBIRD",
            "today": "2026-03-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 553.35 * 20% = 110.67
    assert_eq!(money(&body["original_total"]), dec!(553.35));
    assert_eq!(money(&body["applied_deal"]["discount_amount"]), dec!(110.67));
    assert_eq!(money(&body["new_total"]), dec!(442.68));

    let (status, body) = post_json(
        &app,
        "/api/planner/deals/apply",
        json!({
            "trip": trip(2),
            "deals": [deal("EARLYBIRD", 1)],
            "deal_code": "UNKNOWN",
            "today": "2026-03-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_deal");

    let (status, body) = post_json(
        &app,
        "/api/planner/deals/apply",
        json!({
            "trip": trip(4),
            "deals": [deal("GROUP20", 5)],
            "deal_code": "GROUP20",
            "today": "2026-03-15"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_type"], "not_applicable");
    assert_eq!(body["details"]["reason"], "insufficient_travelers");
    assert_eq!(body["message"], "This deal requires at least 5 travelers");
}

#[tokio::test]
async fn cache_stats_start_empty() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/cache/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["deals_by_code_size"], 0);
    assert_eq!(json["active_deals_cached"], false);
}
