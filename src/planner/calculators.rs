//! Core pricing calculation functions.
//!
//! Pure functions for trip pricing and cancellation math - no database access.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::models::{AccommodationType, PaymentStatus, Transportation, Trip, TripRequest};
use super::PlannerError;

/// Base price applied when a pilgrimage has no price configured.
pub const DEFAULT_BASE_PRICE: Decimal = dec!(100.00);

/// Flat fee for a dedicated guide, independent of party size.
pub const GUIDE_FEE: Decimal = dec!(50.00);

/// Sales tax applied to the subtotal.
pub const TAX_RATE: Decimal = dec!(0.085);

/// Group discount rate, granted above [`GROUP_DISCOUNT_MIN_TRAVELERS`].
pub const GROUP_DISCOUNT_RATE: Decimal = dec!(0.05);

/// Parties strictly larger than this get the group discount.
pub const GROUP_DISCOUNT_MIN_TRAVELERS: u32 = 3;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use pilgrim_planner::planner::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Itemised trip price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub accommodation_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub transportation_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub guide_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

/// Calculate the full price breakdown for a trip.
///
/// Unrecognized accommodation or transportation tiers price like the
/// cheapest tier (multiplier 1.0) instead of failing. Amounts too large for
/// a `Decimal` are rejected as `InvalidInput`.
pub fn compute_price(
    base_price: Decimal,
    num_travelers: u32,
    accommodation_type: &AccommodationType,
    transportation: &Transportation,
    guide_required: bool,
) -> Result<PriceBreakdown, PlannerError> {
    let base_total = checked(base_price.checked_mul(Decimal::from(num_travelers)))?;
    let accommodation_fee =
        checked(base_total.checked_mul(accommodation_type.multiplier() - Decimal::ONE))?;
    let transportation_fee =
        checked(base_total.checked_mul(transportation.multiplier() - Decimal::ONE))?;
    let guide_fee = if guide_required { GUIDE_FEE } else { Decimal::ZERO };

    let subtotal = checked(
        base_total
            .checked_add(accommodation_fee)
            .and_then(|sum| sum.checked_add(transportation_fee))
            .and_then(|sum| sum.checked_add(guide_fee)),
    )?;
    let tax_amount = round_money(checked(subtotal.checked_mul(TAX_RATE))?, 2);

    // Flat rate once the party is large enough, not proportional to size
    let discount_amount = if num_travelers > GROUP_DISCOUNT_MIN_TRAVELERS {
        round_money(checked(subtotal.checked_mul(GROUP_DISCOUNT_RATE))?, 2)
    } else {
        Decimal::ZERO
    };

    let total = round_money(
        checked(subtotal.checked_add(tax_amount))? - discount_amount,
        2,
    );

    Ok(PriceBreakdown {
        base_price,
        base_total,
        accommodation_fee,
        transportation_fee,
        guide_fee,
        subtotal,
        tax_amount,
        discount_amount,
        total,
    })
}

/// Turn an overflowed checked operation into `InvalidInput`.
pub(crate) fn checked(amount: Option<Decimal>) -> Result<Decimal, PlannerError> {
    amount.ok_or_else(|| PlannerError::invalid_input("amount is too large to price"))
}

/// Validate a trip request and price it.
pub fn quote_trip(request: &TripRequest) -> Result<PriceBreakdown, PlannerError> {
    request.validate()?;

    compute_price(
        request.base_price,
        request.num_travelers,
        &request.accommodation_type,
        &request.transportation,
        request.guide_required,
    )
}

/// Cancellation policy tier for a given notice period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundTier {
    /// More than 30 days notice
    Full,
    /// 15 to 30 days notice
    Partial,
    /// 3 to 14 days notice
    Half,
    /// 2 days or less, or the trip already started
    NoRefund,
}

impl RefundTier {
    pub fn for_days_until_trip(days_until_trip: i64) -> Self {
        match days_until_trip {
            d if d > 30 => RefundTier::Full,
            d if d > 14 => RefundTier::Partial,
            d if d > 2 => RefundTier::Half,
            _ => RefundTier::NoRefund,
        }
    }

    /// Fraction of the paid amount returned.
    pub fn rate(self) -> Decimal {
        match self {
            RefundTier::Full => Decimal::ONE,
            RefundTier::Partial => dec!(0.7),
            RefundTier::Half => dec!(0.5),
            RefundTier::NoRefund => Decimal::ZERO,
        }
    }

    pub fn percentage(self) -> u32 {
        match self {
            RefundTier::Full => 100,
            RefundTier::Partial => 70,
            RefundTier::Half => 50,
            RefundTier::NoRefund => 0,
        }
    }
}

/// Refund owed when cancelling `days_until_trip` days before departure.
///
/// Negative values (trip already under way) fall into the no-refund tier;
/// rejecting started trips is left to the caller.
pub fn refund_amount(total_paid: Decimal, days_until_trip: i64) -> Decimal {
    let tier = RefundTier::for_days_until_trip(days_until_trip);
    round_money(total_paid * tier.rate(), 2)
}

/// Refund calculation with the policy tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefundQuote {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_paid: Decimal,
    pub days_until_trip: i64,
    pub tier: RefundTier,
    pub refund_percentage: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub refund_amount: Decimal,
}

impl RefundQuote {
    pub fn new(total_paid: Decimal, days_until_trip: i64) -> Self {
        let tier = RefundTier::for_days_until_trip(days_until_trip);
        Self {
            total_paid,
            days_until_trip,
            tier,
            refund_percentage: tier.percentage(),
            refund_amount: refund_amount(total_paid, days_until_trip),
        }
    }
}

/// Refund quote for cancelling a stored trip on `today`.
///
/// Only paid trips that have not started yet are refundable. The quote is
/// based on the amount charged, falling back to the engine total when no
/// charge was recorded.
pub fn quote_refund(trip: &Trip, today: NaiveDate) -> Result<RefundQuote, PlannerError> {
    if trip.payment_status != PaymentStatus::Paid {
        return Err(PlannerError::NotRefundable {
            reason: "Only paid trips can be refunded".to_string(),
        });
    }
    if trip.start_date < today {
        return Err(PlannerError::NotRefundable {
            reason: "Cannot refund trips that have already started".to_string(),
        });
    }

    let days_until_trip = (trip.start_date - today).num_days();
    let total_paid = match trip.total_paid {
        Some(paid) => paid,
        None => trip.price()?.total,
    };

    Ok(RefundQuote::new(total_paid, days_until_trip))
}
