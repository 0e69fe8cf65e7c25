//! HTTP routes for the planner API.
//!
//! The stateless endpoints take everything they need in the request body;
//! the `/trips/:id/...` endpoints load the trip and catalogs from the store.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::extract::{ApiJson, ApiQuery};
use crate::AppState;

use super::calculators::{quote_trip, PriceBreakdown, RefundQuote};
use super::deals::{self, DealApplication};
use super::itinerary;
use super::models::TripRequest;
use super::requests::{
    ApplicableDealsRequest, ApplyDealRequest, ApplyTripDealRequest, AsOfQuery, EditDayRequest,
    GenerateItineraryRequest, RefundRequest,
};
use super::responses::{DailyPlanResponse, DealsResponse, ItineraryResponse};
use super::services;

/// Planner routes, nested by the caller under `/api/planner`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/price", post(price))
        .route("/refund", post(refund))
        .route("/itinerary", post(generate_itinerary))
        .route("/deals", get(current_deals))
        .route("/deals/applicable", post(applicable_deals))
        .route("/deals/apply", post(apply_deal))
        .route("/trips/:trip_id/price", get(trip_price))
        .route("/trips/:trip_id/itinerary", get(trip_itinerary))
        .route("/trips/:trip_id/days/:day_number", put(edit_trip_day))
        .route("/trips/:trip_id/deals", get(trip_deals))
        .route("/trips/:trip_id/apply-deal", post(apply_trip_deal))
        .route("/trips/:trip_id/refund", get(trip_refund))
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

async fn price(ApiJson(request): ApiJson<TripRequest>) -> Result<Json<PriceBreakdown>> {
    Ok(Json(quote_trip(&request)?))
}

async fn refund(ApiJson(request): ApiJson<RefundRequest>) -> Json<RefundQuote> {
    Json(RefundQuote::new(request.total_paid, request.days_until_trip))
}

async fn generate_itinerary(
    ApiJson(request): ApiJson<GenerateItineraryRequest>,
) -> Result<Json<ItineraryResponse>> {
    let itinerary =
        itinerary::generate_itinerary(request.start_date, request.end_date, &request.attractions)?;
    Ok(Json(itinerary.into()))
}

async fn current_deals(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<DealsResponse>> {
    let today = today_or(query.today);
    let deals = services::current_deals(&state.db, &state.cache, today).await?;
    Ok(Json(deals.into()))
}

async fn applicable_deals(
    ApiJson(request): ApiJson<ApplicableDealsRequest>,
) -> Result<Json<DealsResponse>> {
    request.trip.validate()?;
    let today = today_or(request.today);

    let deals: Vec<_> = deals::applicable_deals(&request.trip, &request.deals, today)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(deals.into()))
}

async fn apply_deal(
    ApiJson(request): ApiJson<ApplyDealRequest>,
) -> Result<Json<DealApplication>> {
    let today = today_or(request.today);
    let application =
        deals::apply_deal_code(&request.trip, &request.deals, &request.deal_code, today)?;
    Ok(Json(application))
}

async fn trip_price(
    State(state): State<AppState>,
    Path(trip_id): Path<i32>,
) -> Result<Json<PriceBreakdown>> {
    Ok(Json(services::price_trip(&state.db, trip_id).await?))
}

async fn trip_itinerary(
    State(state): State<AppState>,
    Path(trip_id): Path<i32>,
) -> Result<Json<ItineraryResponse>> {
    let itinerary = services::trip_itinerary(&state.db, &state.cache, trip_id).await?;
    Ok(Json(itinerary.into()))
}

async fn edit_trip_day(
    State(state): State<AppState>,
    Path((trip_id, day_number)): Path<(i32, u32)>,
    ApiJson(request): ApiJson<EditDayRequest>,
) -> Result<Json<DailyPlanResponse>> {
    let plan =
        services::edit_trip_day(&state.db, &state.cache, trip_id, day_number, &request.entries)
            .await?;
    Ok(Json(plan.into()))
}

async fn trip_deals(
    State(state): State<AppState>,
    Path(trip_id): Path<i32>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<DealsResponse>> {
    let today = today_or(query.today);
    let deals = services::trip_applicable_deals(&state.db, &state.cache, trip_id, today).await?;
    Ok(Json(deals.into()))
}

async fn apply_trip_deal(
    State(state): State<AppState>,
    Path(trip_id): Path<i32>,
    ApiJson(request): ApiJson<ApplyTripDealRequest>,
) -> Result<Json<DealApplication>> {
    let today = today_or(request.today);
    let application =
        services::apply_trip_deal(&state.db, &state.cache, trip_id, &request.deal_code, today)
            .await?;
    Ok(Json(application))
}

async fn trip_refund(
    State(state): State<AppState>,
    Path(trip_id): Path<i32>,
    ApiQuery(query): ApiQuery<AsOfQuery>,
) -> Result<Json<RefundQuote>> {
    let today = today_or(query.today);
    Ok(Json(services::trip_refund_quote(&state.db, trip_id, today).await?))
}
