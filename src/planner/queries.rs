//! Database queries for the planning engine.
//!
//! Reads only. Money columns are stored as floats and cast to numeric so
//! they decode straight into `Decimal`.

use sqlx::PgPool;

use crate::error::AppError;

use super::models::{Attraction, Deal, TripRow};

/// Get a trip joined with its pilgrimage's list price
pub async fn get_trip(pool: &PgPool, trip_id: i32) -> Result<Option<TripRow>, AppError> {
    let trip = sqlx::query_as::<_, TripRow>(
        r#"
        SELECT
            t.id, t.pilgrimage_id, t.start_date, t.end_date, t.num_travelers,
            t.accommodation_type, t.transportation, t.guide_required,
            t.payment_status,
            t.total_price::numeric AS total_price,
            p.price::numeric AS pilgrimage_price
        FROM trip_plan t
        JOIN pilgrimage p ON p.id = t.pilgrimage_id
        WHERE t.id = $1
        "#,
    )
    .bind(trip_id)
    .fetch_optional(pool)
    .await?;

    Ok(trip)
}

/// Get the attraction catalog for a pilgrimage, in catalog order
pub async fn get_attractions_for_pilgrimage(
    pool: &PgPool,
    pilgrimage_id: i32,
) -> Result<Vec<Attraction>, AppError> {
    let attractions = sqlx::query_as::<_, Attraction>(
        r#"
        SELECT
            id, pilgrimage_id, name, category,
            COALESCE(popularity, 1) AS popularity,
            COALESCE(visit_duration, 60) AS visit_duration_minutes
        FROM attraction
        WHERE pilgrimage_id = $1
        ORDER BY id
        "#,
    )
    .bind(pilgrimage_id)
    .fetch_all(pool)
    .await?;

    Ok(attractions)
}

/// Get all active deals (date filtering happens in the resolver)
pub async fn get_active_deals(pool: &PgPool) -> Result<Vec<Deal>, AppError> {
    let deals = sqlx::query_as::<_, Deal>(
        r#"
        SELECT
            id, code, title,
            discount_percentage::numeric AS discount_percentage,
            valid_from, valid_to, pilgrimage_id,
            COALESCE(min_travelers, 1) AS min_travelers,
            COALESCE(min_days, 1) AS min_days,
            active
        FROM deal
        WHERE active = true
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(deals)
}

/// Find an active deal by its code
pub async fn find_active_deal_by_code(pool: &PgPool, code: &str) -> Result<Option<Deal>, AppError> {
    let deal = sqlx::query_as::<_, Deal>(
        r#"
        SELECT
            id, code, title,
            discount_percentage::numeric AS discount_percentage,
            valid_from, valid_to, pilgrimage_id,
            COALESCE(min_travelers, 1) AS min_travelers,
            COALESCE(min_days, 1) AS min_days,
            active
        FROM deal
        WHERE code = $1
          AND active = true
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    Ok(deal)
}
