//! Trip planning domain types.
//!
//! Row types use sqlx's FromRow derive for direct database deserialization;
//! the same types double as JSON payloads for the pure endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::calculators::{compute_price, PriceBreakdown, DEFAULT_BASE_PRICE};
use super::PlannerError;

/// Accommodation tier. Unknown tiers are kept verbatim and price at 1.0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccommodationType {
    Budget,
    Standard,
    Luxury,
    Unrecognized(String),
}

impl AccommodationType {
    pub fn multiplier(&self) -> Decimal {
        match self {
            AccommodationType::Budget => Decimal::ONE,
            AccommodationType::Standard => dec!(1.5),
            AccommodationType::Luxury => dec!(2.5),
            AccommodationType::Unrecognized(_) => Decimal::ONE,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AccommodationType::Budget => "budget",
            AccommodationType::Standard => "standard",
            AccommodationType::Luxury => "luxury",
            AccommodationType::Unrecognized(other) => other,
        }
    }
}

impl From<&str> for AccommodationType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "budget" => AccommodationType::Budget,
            "standard" => AccommodationType::Standard,
            "luxury" => AccommodationType::Luxury,
            _ => AccommodationType::Unrecognized(value.to_string()),
        }
    }
}

impl From<String> for AccommodationType {
    fn from(value: String) -> Self {
        AccommodationType::from(value.as_str())
    }
}

impl From<AccommodationType> for String {
    fn from(value: AccommodationType) -> Self {
        value.as_str().to_string()
    }
}

/// Transportation tier. Unknown tiers are kept verbatim and price at 1.0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Transportation {
    Public,
    Private,
    GuidedTour,
    Unrecognized(String),
}

impl Transportation {
    pub fn multiplier(&self) -> Decimal {
        match self {
            Transportation::Public => Decimal::ONE,
            Transportation::Private => dec!(1.8),
            Transportation::GuidedTour => dec!(2.2),
            Transportation::Unrecognized(_) => Decimal::ONE,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Transportation::Public => "public",
            Transportation::Private => "private",
            Transportation::GuidedTour => "guided_tour",
            Transportation::Unrecognized(other) => other,
        }
    }
}

impl From<&str> for Transportation {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "public" => Transportation::Public,
            "private" => Transportation::Private,
            "guided_tour" => Transportation::GuidedTour,
            _ => Transportation::Unrecognized(value.to_string()),
        }
    }
}

impl From<String> for Transportation {
    fn from(value: String) -> Self {
        Transportation::from(value.as_str())
    }
}

impl From<Transportation> for String {
    fn from(value: Transportation) -> Self {
        value.as_str().to_string()
    }
}

/// Payment lifecycle of a trip. Unknown values read as pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
    RefundPending,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::RefundPending => "refund_pending",
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "paid" => PaymentStatus::Paid,
            "cancelled" => PaymentStatus::Cancelled,
            "refund_pending" => PaymentStatus::RefundPending,
            _ => PaymentStatus::Pending,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        PaymentStatus::from(value.as_str())
    }
}

impl From<PaymentStatus> for String {
    fn from(value: PaymentStatus) -> Self {
        value.as_str().to_string()
    }
}

fn default_base_price() -> Decimal {
    DEFAULT_BASE_PRICE
}

/// Use the default base price when none (or zero) is configured.
pub fn base_price_or_default(price: Option<Decimal>) -> Decimal {
    match price {
        Some(p) if !p.is_zero() => p,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Parameters that determine a trip's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    #[serde(default = "default_base_price", with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    pub num_travelers: u32,
    pub accommodation_type: AccommodationType,
    pub transportation: Transportation,
    #[serde(default)]
    pub guide_required: bool,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.num_travelers < 1 {
            return Err(PlannerError::invalid_input(
                "num_travelers must be at least 1",
            ));
        }
        if self.base_price < Decimal::ZERO {
            return Err(PlannerError::invalid_input("base_price must not be negative"));
        }
        Ok(())
    }
}

/// Attraction from the pilgrimage catalog
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Attraction {
    pub id: i32,
    #[serde(default)]
    pub pilgrimage_id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// 1-10, only used to order attractions when building an itinerary
    pub popularity: i32,
    pub visit_duration_minutes: i32,
}

/// Promotional deal
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default)]
    pub id: i32,
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_percentage: Decimal,
    pub valid_from: NaiveDate,
    /// Inclusive
    pub valid_to: NaiveDate,
    #[serde(default)]
    pub pilgrimage_id: Option<i32>,
    pub min_travelers: i32,
    pub min_days: i32,
    pub active: bool,
}

impl Deal {
    pub fn is_valid_on(&self, day: NaiveDate) -> bool {
        self.valid_from <= day && day <= self.valid_to
    }
}

/// Trip row joined with its pilgrimage price
#[derive(Debug, Clone, FromRow)]
pub struct TripRow {
    pub id: i32,
    pub pilgrimage_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_travelers: i32,
    pub accommodation_type: String,
    pub transportation: String,
    pub guide_required: Option<bool>,
    pub payment_status: Option<String>,
    pub total_price: Option<Decimal>,
    pub pilgrimage_price: Option<Decimal>,
}

/// A planned trip. Price fields are derived from the inputs on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub id: i32,
    pub pilgrimage_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub num_travelers: u32,
    pub accommodation_type: AccommodationType,
    pub transportation: Transportation,
    #[serde(default)]
    pub guide_required: bool,
    #[serde(default = "default_base_price", with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Amount actually charged, when the trip has been paid
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub total_paid: Option<Decimal>,
}

impl Trip {
    /// Inclusive number of calendar days covered by the trip.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn request(&self) -> TripRequest {
        TripRequest {
            base_price: self.base_price,
            num_travelers: self.num_travelers,
            accommodation_type: self.accommodation_type.clone(),
            transportation: self.transportation.clone(),
            guide_required: self.guide_required,
        }
    }

    /// Engine price before any promotional deal.
    pub fn price(&self) -> Result<PriceBreakdown, PlannerError> {
        compute_price(
            self.base_price,
            self.num_travelers,
            &self.accommodation_type,
            &self.transportation,
            self.guide_required,
        )
    }

    pub fn validate(&self) -> Result<(), PlannerError> {
        self.request().validate()?;
        if self.end_date < self.start_date {
            return Err(PlannerError::invalid_input(
                "end_date must not be before start_date",
            ));
        }
        Ok(())
    }
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Self {
            id: row.id,
            pilgrimage_id: row.pilgrimage_id,
            start_date: row.start_date,
            end_date: row.end_date,
            // Negative counts surface as InvalidInput through validate()
            num_travelers: u32::try_from(row.num_travelers).unwrap_or(0),
            accommodation_type: AccommodationType::from(row.accommodation_type),
            transportation: Transportation::from(row.transportation),
            guide_required: row.guide_required.unwrap_or(false),
            base_price: base_price_or_default(row.pilgrimage_price),
            payment_status: row
                .payment_status
                .as_deref()
                .map(PaymentStatus::from)
                .unwrap_or_default(),
            total_paid: row.total_price,
        }
    }
}
