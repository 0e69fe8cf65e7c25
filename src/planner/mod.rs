//! Trip planning engine.
//!
//! Pricing, itinerary generation, deal resolution and refund math for
//! pilgrimage trips. The web front end calls this module over HTTP/JSON and
//! persists whatever it returns.

pub mod calculators;
pub mod deals;
pub mod errors;
pub mod itinerary;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_price, refund_amount, round_money, PriceBreakdown, RefundQuote};
pub use deals::{applicable_deals, apply_deal, DealApplication};
pub use errors::{DealRejection, PlannerError};
pub use itinerary::{distribute, DailyPlan, Itinerary};
pub use routes::router;
