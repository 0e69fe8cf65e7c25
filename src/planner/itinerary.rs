//! Day-by-day itinerary generation.
//!
//! Attractions are spread over the trip by popularity, with lighter first
//! and last days. Start times come from a fixed slot pattern; there is no
//! conflict resolution against visit durations.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::models::Attraction;
use super::PlannerError;

/// Upper bound on attractions scheduled on a single day.
pub const MAX_ATTRACTIONS_PER_DAY: usize = 4;

/// Longest trip span, in days, that a plan is built for.
pub const MAX_TRIP_DAYS: i64 = 365;

pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_END_TIME: &str = "17:00";

/// Attraction placed on a day of the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttractionAssignment {
    pub attraction_id: i32,
    /// "HH:MM"
    pub start_time: String,
    pub order: u32,
    pub visit_duration_minutes: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Schedule for one calendar day of a trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPlan {
    pub day_number: u32,
    pub date: NaiveDate,
    pub title: String,
    pub attractions: Vec<AttractionAssignment>,
}

impl DailyPlan {
    pub fn new(day_number: u32, date: NaiveDate, title: impl Into<String>) -> Self {
        Self {
            day_number,
            date,
            title: title.into(),
            attractions: Vec::new(),
        }
    }

    /// Sum of visit durations for the day, in minutes.
    pub fn total_duration_minutes(&self) -> i64 {
        self.attractions
            .iter()
            .map(|a| i64::from(a.visit_duration_minutes))
            .sum()
    }

    /// Earliest start time, or 09:00 for an empty day.
    pub fn start_time(&self) -> &str {
        self.attractions
            .iter()
            .map(|a| a.start_time.as_str())
            .min()
            .unwrap_or(DEFAULT_START_TIME)
    }

    /// Latest start time, or 17:00 for an empty day.
    pub fn end_time(&self) -> &str {
        self.attractions
            .iter()
            .map(|a| a.start_time.as_str())
            .max()
            .unwrap_or(DEFAULT_END_TIME)
    }
}

/// Default title for a day given its position in the trip.
pub fn day_title(day_number: u32, total_days: u32) -> String {
    if day_number == 1 {
        "Arrival & Orientation".to_string()
    } else if day_number == total_days {
        "Farewell & Departure".to_string()
    } else {
        format!("Day {} Exploration", day_number)
    }
}

/// Create one empty plan per calendar day from `start_date` to `end_date` inclusive.
pub fn create_daily_plans(
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<DailyPlan>, PlannerError> {
    if end_date < start_date {
        return Err(PlannerError::invalid_input(
            "end_date must not be before start_date",
        ));
    }

    let span = (end_date - start_date).num_days() + 1;
    if span > MAX_TRIP_DAYS {
        return Err(PlannerError::invalid_input(format!(
            "trip spans {} days, longer than the {} day maximum",
            span, MAX_TRIP_DAYS
        )));
    }
    let total_days = u32::try_from(span)
        .map_err(|_| PlannerError::invalid_input("trip is too long"))?;

    Ok(start_date
        .iter_days()
        .take(total_days as usize)
        .zip(1..=total_days)
        .map(|(date, day_number)| DailyPlan::new(day_number, date, day_title(day_number, total_days)))
        .collect())
}

/// Start time for the `slot`-th attraction of a day.
///
/// Spreads slots between 09:00 and 16:xx; the pattern is not monotonic for
/// larger slot numbers.
pub fn slot_start_time(slot: usize) -> String {
    let hour = 9 + (slot * 2) % 7;
    let minute = (slot * 15) % 60;
    format!("{:02}:{:02}", hour, minute)
}

/// Regular daily capacity: `floor(attractions / days)` clamped to 1..=4.
pub fn attractions_per_day(attraction_count: usize, day_count: usize) -> usize {
    if day_count == 0 {
        return 0;
    }
    (attraction_count / day_count).clamp(1, MAX_ATTRACTIONS_PER_DAY)
}

/// Capacity of a given day; arrival and departure days get one fewer.
pub fn day_capacity(day_number: u32, total_days: usize, per_day: usize) -> usize {
    let is_edge_day = day_number == 1 || day_number as usize == total_days;
    if is_edge_day {
        per_day.saturating_sub(1).max(1)
    } else {
        per_day
    }
}

/// Outcome of distributing a catalog over the days of a trip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
    pub scheduled: Vec<i32>,
    /// Attractions that did not fit, most popular first
    pub unscheduled: Vec<i32>,
}

/// Assign attractions to days, most popular first.
///
/// Assignments are appended to each day's list. Anything left once every
/// day is full is reported as unscheduled.
pub fn distribute(daily_plans: &mut [DailyPlan], attractions: &[Attraction]) -> DistributionSummary {
    let mut sorted: Vec<&Attraction> = attractions.iter().collect();
    // Stable, so equally popular attractions keep catalog order
    sorted.sort_by(|a, b| b.popularity.cmp(&a.popularity));

    let total_days = daily_plans.len();
    let per_day = attractions_per_day(sorted.len(), total_days);

    let mut remaining = sorted.into_iter();
    let mut scheduled = Vec::new();

    for plan in daily_plans.iter_mut() {
        let capacity = day_capacity(plan.day_number, total_days, per_day);

        for (slot, attraction) in remaining.by_ref().take(capacity).enumerate() {
            plan.attractions.push(AttractionAssignment {
                attraction_id: attraction.id,
                start_time: slot_start_time(slot),
                order: slot as u32,
                visit_duration_minutes: attraction.visit_duration_minutes,
                notes: String::new(),
            });
            scheduled.push(attraction.id);
        }
    }

    DistributionSummary {
        scheduled,
        unscheduled: remaining.map(|a| a.id).collect(),
    }
}

/// Generated trip schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub days: Vec<DailyPlan>,
    pub unscheduled: Vec<i32>,
}

/// Build daily plans for the trip span and fill them from the catalog.
pub fn generate_itinerary(
    start_date: NaiveDate,
    end_date: NaiveDate,
    attractions: &[Attraction],
) -> Result<Itinerary, PlannerError> {
    let mut days = create_daily_plans(start_date, end_date)?;
    let summary = distribute(&mut days, attractions);

    Ok(Itinerary {
        days,
        unscheduled: summary.unscheduled,
    })
}

/// One row of a hand-edited day schedule
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleEntry {
    pub attraction_id: i32,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Replace a day's attractions with a hand-edited list.
///
/// Entries naming attractions outside `catalog` are skipped; `order` is the
/// entry's position in the submitted list.
pub fn replace_day_schedule(
    plan: &mut DailyPlan,
    entries: &[ScheduleEntry],
    catalog: &[Attraction],
) -> Result<(), PlannerError> {
    let mut attractions = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let Some(attraction) = catalog.iter().find(|a| a.id == entry.attraction_id) else {
            continue;
        };

        let start_time = match entry.start_time.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_START_TIME.to_string(),
            Some(time) => NaiveTime::parse_from_str(time, "%H:%M")
                .map_err(|_| {
                    PlannerError::invalid_input(format!("start_time '{}' is not HH:MM", time))
                })?
                // Stored zero-padded so times order correctly as strings
                .format("%H:%M")
                .to_string(),
        };

        attractions.push(AttractionAssignment {
            attraction_id: attraction.id,
            start_time,
            order: index as u32,
            visit_duration_minutes: attraction.visit_duration_minutes,
            notes: entry.notes.clone().unwrap_or_default(),
        });
    }

    plan.attractions = attractions;
    Ok(())
}
