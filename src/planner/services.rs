//! Planning service functions with database access.
//!
//! These functions load trips and catalogs through the cache and database,
//! then hand off to the pure calculators. Nothing here writes to the store;
//! callers persist the returned values themselves.

use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::AppCache;
use crate::error::{AppError, Result};

use super::calculators::{quote_refund, PriceBreakdown, RefundQuote};
use super::deals::{self, DealApplication};
use super::itinerary::{self, DailyPlan, Itinerary, ScheduleEntry};
use super::models::{Attraction, Deal, Trip};
use super::queries;
use super::PlannerError;

/// Load a trip by id
pub async fn load_trip(pool: &PgPool, trip_id: i32) -> Result<Trip> {
    let row = queries::get_trip(pool, trip_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Trip::from(row))
}

/// Attraction catalog for a pilgrimage, cached per pilgrimage
pub async fn load_attractions(
    pool: &PgPool,
    cache: &AppCache,
    pilgrimage_id: i32,
) -> Result<Arc<Vec<Attraction>>> {
    if let Some(cached) = cache.attractions.get(&pilgrimage_id).await {
        debug!("Cache HIT for attractions of pilgrimage {}", pilgrimage_id);
        return Ok(cached);
    }

    debug!("Cache MISS for attractions of pilgrimage {}", pilgrimage_id);
    let attractions = Arc::new(queries::get_attractions_for_pilgrimage(pool, pilgrimage_id).await?);
    cache
        .attractions
        .insert(pilgrimage_id, attractions.clone())
        .await;

    Ok(attractions)
}

/// Full active deal catalog
pub async fn load_active_deals(pool: &PgPool, cache: &AppCache) -> Result<Arc<Vec<Deal>>> {
    if let Some(cached) = cache.active_deals().await {
        debug!("Cache HIT for active deals");
        return Ok(cached);
    }

    debug!("Cache MISS for active deals");
    let deals = queries::get_active_deals(pool).await?;
    Ok(cache.store_active_deals(deals).await)
}

/// Active deals valid on `today`, for browsing without a trip
pub async fn current_deals(
    pool: &PgPool,
    cache: &AppCache,
    today: NaiveDate,
) -> Result<Vec<Deal>> {
    let catalog = load_active_deals(pool, cache).await?;
    let deals: Vec<Deal> = deals::current_deals(&catalog, today)
        .into_iter()
        .cloned()
        .collect();

    debug!(%today, count = deals.len(), "Current deals listed");
    Ok(deals)
}

/// Resolve an active deal by code, failing with `InvalidDeal` when unknown
pub async fn resolve_deal(pool: &PgPool, cache: &AppCache, code: &str) -> Result<Arc<Deal>> {
    let code = code.trim();
    if code.is_empty() {
        return Err(PlannerError::invalid_input("No deal code provided").into());
    }

    if let Some(cached) = cache.deals_by_code.get(code).await {
        debug!("Cache HIT for deal {}", code);
        return Ok(cached);
    }

    let deal = queries::find_active_deal_by_code(pool, code)
        .await?
        .ok_or_else(|| PlannerError::InvalidDeal {
            code: code.to_string(),
        })?;

    let deal = Arc::new(deal);
    cache
        .deals_by_code
        .insert(code.to_string(), deal.clone())
        .await;

    Ok(deal)
}

/// Price a stored trip from its current parameters
pub async fn price_trip(pool: &PgPool, trip_id: i32) -> Result<PriceBreakdown> {
    let trip = load_trip(pool, trip_id).await?;
    trip.validate()?;
    Ok(trip.price()?)
}

/// Generate an itinerary for a stored trip from its pilgrimage's attractions
pub async fn trip_itinerary(pool: &PgPool, cache: &AppCache, trip_id: i32) -> Result<Itinerary> {
    let trip = load_trip(pool, trip_id).await?;
    let attractions = load_attractions(pool, cache, trip.pilgrimage_id).await?;
    let itinerary = itinerary::generate_itinerary(trip.start_date, trip.end_date, &attractions)?;

    info!(
        trip_id,
        days = itinerary.days.len(),
        unscheduled = itinerary.unscheduled.len(),
        "Itinerary generated"
    );

    Ok(itinerary)
}

/// Build a hand-edited schedule for one day of a stored trip
///
/// Entries are checked against the trip's attraction catalog; unknown
/// attractions are dropped.
pub async fn edit_trip_day(
    pool: &PgPool,
    cache: &AppCache,
    trip_id: i32,
    day_number: u32,
    entries: &[ScheduleEntry],
) -> Result<DailyPlan> {
    let trip = load_trip(pool, trip_id).await?;
    let mut plan = itinerary::create_daily_plans(trip.start_date, trip.end_date)?
        .into_iter()
        .find(|plan| plan.day_number == day_number)
        .ok_or(AppError::NotFound)?;

    let attractions = load_attractions(pool, cache, trip.pilgrimage_id).await?;
    itinerary::replace_day_schedule(&mut plan, entries, &attractions)?;

    debug!(trip_id, day_number, attractions = plan.attractions.len(), "Day schedule edited");
    Ok(plan)
}

/// Deals from the active catalog that apply to a stored trip
pub async fn trip_applicable_deals(
    pool: &PgPool,
    cache: &AppCache,
    trip_id: i32,
    today: NaiveDate,
) -> Result<Vec<Deal>> {
    let trip = load_trip(pool, trip_id).await?;
    let catalog = load_active_deals(pool, cache).await?;

    Ok(deals::applicable_deals(&trip, &catalog, today)
        .into_iter()
        .cloned()
        .collect())
}

/// Apply a deal code to a stored trip
pub async fn apply_trip_deal(
    pool: &PgPool,
    cache: &AppCache,
    trip_id: i32,
    code: &str,
    today: NaiveDate,
) -> Result<DealApplication> {
    let trip = load_trip(pool, trip_id).await?;
    let deal = resolve_deal(pool, cache, code).await?;
    let application = deals::apply_deal(&trip, &deal, today)?;

    info!(
        trip_id,
        code = %application.applied_deal.code,
        discount = %application.applied_deal.discount_amount,
        new_total = %application.new_total,
        "Deal applied"
    );

    Ok(application)
}

/// Refund quote for cancelling a stored trip
pub async fn trip_refund_quote(pool: &PgPool, trip_id: i32, today: NaiveDate) -> Result<RefundQuote> {
    let trip = load_trip(pool, trip_id).await?;
    let quote = quote_refund(&trip, today)?;

    info!(
        trip_id,
        days_until_trip = quote.days_until_trip,
        refund = %quote.refund_amount,
        "Refund quoted"
    );

    Ok(quote)
}
