//! Promotional deal resolution.
//!
//! A trip carries at most one deal. The discount is always taken from the
//! engine total before any deal, so applying a second code replaces the first
//! instead of stacking on an already discounted price.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{checked, round_money};
use super::models::{Deal, Trip};
use super::{DealRejection, PlannerError};

/// Check a deal's scope, minimums and validity window against a trip.
///
/// Does not look at `active`; inactive deals are treated as unknown codes
/// by [`find_deal`] and [`apply_deal`].
pub fn check_deal(deal: &Deal, trip: &Trip, today: NaiveDate) -> Result<(), DealRejection> {
    if let Some(scope) = deal.pilgrimage_id {
        if scope != trip.pilgrimage_id {
            return Err(DealRejection::WrongPilgrimage {
                deal_pilgrimage_id: scope,
                trip_pilgrimage_id: trip.pilgrimage_id,
            });
        }
    }

    if i64::from(deal.min_travelers) > i64::from(trip.num_travelers) {
        return Err(DealRejection::InsufficientTravelers {
            required: deal.min_travelers,
            actual: trip.num_travelers,
        });
    }

    let duration = trip.duration_days();
    if i64::from(deal.min_days) > duration {
        return Err(DealRejection::InsufficientDays {
            required: deal.min_days,
            actual: duration,
        });
    }

    if !deal.is_valid_on(today) {
        return Err(DealRejection::OutsideValidityWindow);
    }

    Ok(())
}

/// Deals from `catalog` that can be applied to `trip` on `today`.
///
/// Matches what [`apply_deal`] accepts: inactive deals and deals with a
/// discount outside 0-100% are left out.
pub fn applicable_deals<'a>(trip: &Trip, catalog: &'a [Deal], today: NaiveDate) -> Vec<&'a Deal> {
    catalog
        .iter()
        .filter(|deal| {
            deal.active
                && check_discount_percentage(deal).is_ok()
                && check_deal(deal, trip, today).is_ok()
        })
        .collect()
}

fn check_discount_percentage(deal: &Deal) -> Result<(), PlannerError> {
    if deal.discount_percentage < Decimal::ZERO || deal.discount_percentage > Decimal::ONE_HUNDRED {
        return Err(PlannerError::invalid_input(format!(
            "discount_percentage {} is outside 0-100",
            deal.discount_percentage
        )));
    }
    Ok(())
}

/// Active deals whose validity window covers `today`, regardless of any trip.
pub fn current_deals(catalog: &[Deal], today: NaiveDate) -> Vec<&Deal> {
    catalog
        .iter()
        .filter(|deal| deal.active && deal.is_valid_on(today))
        .collect()
}

/// Look up an active deal by code.
pub fn find_deal<'a>(catalog: &'a [Deal], code: &str) -> Result<&'a Deal, PlannerError> {
    let code = code.trim();
    catalog
        .iter()
        .find(|deal| deal.active && deal.code == code)
        .ok_or_else(|| PlannerError::InvalidDeal {
            code: code.to_string(),
        })
}

/// Deal recorded against a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedDeal {
    pub code: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount_amount: Decimal,
}

/// Result of applying a deal to a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealApplication {
    pub applied_deal: AppliedDeal,
    /// Engine total the discount was taken from
    #[serde(with = "rust_decimal::serde::str")]
    pub original_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub new_total: Decimal,
}

/// Apply `deal` to `trip`.
pub fn apply_deal(trip: &Trip, deal: &Deal, today: NaiveDate) -> Result<DealApplication, PlannerError> {
    if !deal.active {
        return Err(PlannerError::InvalidDeal {
            code: deal.code.clone(),
        });
    }
    check_discount_percentage(deal)?;
    trip.validate()?;
    check_deal(deal, trip, today)?;

    let original_total = trip.price()?.total;
    let discount_amount = round_money(
        checked(
            original_total
                .checked_mul(deal.discount_percentage)
                .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED)),
        )?,
        2,
    );

    Ok(DealApplication {
        applied_deal: AppliedDeal {
            code: deal.code.clone(),
            title: deal.title.clone(),
            discount_percentage: deal.discount_percentage,
            discount_amount,
        },
        original_total,
        new_total: original_total - discount_amount,
    })
}

/// Resolve `code` in `catalog` and apply it to `trip`.
pub fn apply_deal_code(
    trip: &Trip,
    catalog: &[Deal],
    code: &str,
    today: NaiveDate,
) -> Result<DealApplication, PlannerError> {
    let deal = find_deal(catalog, code)?;
    apply_deal(trip, deal, today)
}
