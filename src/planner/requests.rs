//! Request DTOs for planner API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::itinerary::ScheduleEntry;
use super::models::{Attraction, Deal, Trip};

/// Request to quote a refund
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_paid: Decimal,
    pub days_until_trip: i64,
}

/// Request to build an itinerary from a supplied catalog
#[derive(Debug, Deserialize)]
pub struct GenerateItineraryRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub attractions: Vec<Attraction>,
}

/// Request to list the deals applicable to a trip
#[derive(Debug, Deserialize)]
pub struct ApplicableDealsRequest {
    pub trip: Trip,
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request to apply a deal code from a supplied catalog
#[derive(Debug, Deserialize)]
pub struct ApplyDealRequest {
    pub trip: Trip,
    pub deals: Vec<Deal>,
    pub deal_code: String,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request to apply a deal code to a stored trip
#[derive(Debug, Deserialize)]
pub struct ApplyTripDealRequest {
    pub deal_code: String,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request to replace a stored trip day's schedule
#[derive(Debug, Deserialize)]
pub struct EditDayRequest {
    pub entries: Vec<ScheduleEntry>,
}

/// Optional evaluation date for date-dependent lookups
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}
