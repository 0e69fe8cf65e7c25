//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::planner::responses::ErrorResponse;
use crate::planner::PlannerError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Planner(#[from] PlannerError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Planner(err) => match err {
                PlannerError::InvalidDeal { .. } | PlannerError::InvalidInput { .. } => {
                    StatusCode::BAD_REQUEST
                }
                PlannerError::NotApplicable(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PlannerError::NotRefundable { .. } => StatusCode::CONFLICT,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::NotFound => ErrorResponse {
                error_type: "not_found".to_string(),
                message: "Not found".to_string(),
                details: None,
            },
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ErrorResponse {
                    error_type: "database".to_string(),
                    message: "Database error".to_string(),
                    details: None,
                }
            }
            AppError::Planner(err) => {
                tracing::warn!("Planner request rejected: {}", err);
                let details = match err {
                    PlannerError::NotApplicable(rejection) => serde_json::to_value(rejection).ok(),
                    _ => None,
                };
                ErrorResponse {
                    error_type: err.error_type().to_string(),
                    message: err.to_string(),
                    details,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
