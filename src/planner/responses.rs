//! Response DTOs for planner API endpoints.

use serde::Serialize;

use super::itinerary::{DailyPlan, Itinerary};
use super::models::Deal;

/// Day of an itinerary with its derived summary
#[derive(Debug, Serialize)]
pub struct DailyPlanResponse {
    #[serde(flatten)]
    pub plan: DailyPlan,
    pub start_time: String,
    pub end_time: String,
    pub total_duration_minutes: i64,
}

impl From<DailyPlan> for DailyPlanResponse {
    fn from(plan: DailyPlan) -> Self {
        Self {
            start_time: plan.start_time().to_string(),
            end_time: plan.end_time().to_string(),
            total_duration_minutes: plan.total_duration_minutes(),
            plan,
        }
    }
}

/// Response for itinerary generation
#[derive(Debug, Serialize)]
pub struct ItineraryResponse {
    pub days: Vec<DailyPlanResponse>,
    pub scheduled_count: usize,
    pub unscheduled: Vec<i32>,
}

impl From<Itinerary> for ItineraryResponse {
    fn from(itinerary: Itinerary) -> Self {
        let scheduled_count = itinerary.days.iter().map(|d| d.attractions.len()).sum();
        Self {
            days: itinerary.days.into_iter().map(DailyPlanResponse::from).collect(),
            scheduled_count,
            unscheduled: itinerary.unscheduled,
        }
    }
}

/// Response listing deals
#[derive(Debug, Serialize)]
pub struct DealsResponse {
    pub count: usize,
    pub deals: Vec<Deal>,
}

impl From<Vec<Deal>> for DealsResponse {
    fn from(deals: Vec<Deal>) -> Self {
        Self {
            count: deals.len(),
            deals,
        }
    }
}

/// Generic planner error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
