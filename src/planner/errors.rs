//! Planner error types.

use std::fmt;

use serde::Serialize;

/// Why a deal cannot be used for a particular trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DealRejection {
    WrongPilgrimage {
        deal_pilgrimage_id: i32,
        trip_pilgrimage_id: i32,
    },
    InsufficientTravelers { required: i32, actual: u32 },
    InsufficientDays { required: i32, actual: i64 },
    OutsideValidityWindow,
}

impl fmt::Display for DealRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DealRejection::WrongPilgrimage { .. } => {
                write!(f, "This deal is not applicable to your selected pilgrimage")
            }
            DealRejection::InsufficientTravelers { required, .. } => {
                write!(f, "This deal requires at least {} travelers", required)
            }
            DealRejection::InsufficientDays { required, .. } => {
                write!(f, "This deal requires at least {} days", required)
            }
            DealRejection::OutsideValidityWindow => write!(f, "This deal is not currently valid"),
        }
    }
}

/// Planning calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("Invalid or expired deal code: {code}")]
    InvalidDeal { code: String },

    #[error("{0}")]
    NotApplicable(DealRejection),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Trip cannot be refunded: {reason}")]
    NotRefundable { reason: String },
}

impl PlannerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        PlannerError::InvalidInput {
            message: message.into(),
        }
    }

    /// Stable identifier used in JSON error bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            PlannerError::InvalidDeal { .. } => "invalid_deal",
            PlannerError::NotApplicable(_) => "not_applicable",
            PlannerError::InvalidInput { .. } => "invalid_input",
            PlannerError::NotRefundable { .. } => "not_refundable",
        }
    }
}

impl From<DealRejection> for PlannerError {
    fn from(rejection: DealRejection) -> Self {
        PlannerError::NotApplicable(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_error_display() {
        let err = PlannerError::InvalidDeal {
            code: "NOPE".to_string(),
        };
        assert!(err.to_string().contains("NOPE"));

        let err = PlannerError::from(DealRejection::InsufficientTravelers {
            required: 5,
            actual: 4,
        });
        assert_eq!(err.to_string(), "This deal requires at least 5 travelers");
        assert_eq!(err.error_type(), "not_applicable");

        let err = PlannerError::invalid_input("bad dates");
        assert!(err.to_string().contains("bad dates"));
    }

    #[test]
    fn test_deal_rejection_serializes_reason_tag() {
        let json = serde_json::to_value(DealRejection::InsufficientDays {
            required: 7,
            actual: 3,
        })
        .unwrap();
        assert_eq!(json["reason"], "insufficient_days");
        assert_eq!(json["required"], 7);
    }
}
