//! HTTP request handlers for the burrow API.
//!
//! Every response body is JSON except the plain-text rejections for a
//! wrong method or an undecodable request body.

use crate::config::Routes;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{on, post, MethodFilter},
    Router as AxumRouter,
};
use gophernet_domain::Burrow;
use gophernet_service::{BurrowService, ServiceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Domain service
    pub service: Arc<dyn BurrowService>,
}

/// Response envelope shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// "success" or "error"
    pub status: String,

    /// Human readable outcome
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonResponse<T> {
    fn success(message: Option<&str>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.map(str::to_string),
            data: Some(data),
        }
    }
}

impl JsonResponse<()> {
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Rent request body
#[derive(Debug, Deserialize)]
pub struct RentRequest {
    /// Name of the burrow to rent
    pub name: String,
}

/// Payload of a successful rental
#[derive(Debug, Serialize, Deserialize)]
pub struct RentedBurrow {
    /// Name of the rented burrow
    pub name: String,
}

/// Application error type
#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be decoded
    BadRequest(String),
    /// Rental refused
    Rental(ServiceError),
    /// Report could not be generated
    Report(ServiceError),
    /// Route exists but not for this method
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response()
            }
            ApiError::Rental(e) => {
                (StatusCode::BAD_REQUEST, Json(JsonResponse::error(e.to_string()))).into_response()
            }
            ApiError::Report(e) => {
                tracing::error!(error = %e, "Failed to generate report");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(JsonResponse::error("Failed to generate report")),
                )
                    .into_response()
            }
        }
    }
}

/// GET list of burrows
async fn get_burrows(State(state): State<AppState>) -> Json<JsonResponse<Vec<Burrow>>> {
    Json(JsonResponse::success(None, state.service.get_all_burrows()))
}

/// POST rent a burrow by name
async fn rent_burrow(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<JsonResponse<RentedBurrow>>, ApiError> {
    let request: RentRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if let Err(e) = state.service.rent_burrow(&request.name) {
        if e.is_rental_rejection() {
            tracing::info!(burrow = %request.name, reason = %e, "Rental refused");
        } else {
            tracing::error!(burrow = %request.name, error = %e, "Rental failed");
        }
        return Err(ApiError::Rental(e));
    }

    tracing::info!(burrow = %request.name, "Burrow rented");
    Ok(Json(JsonResponse::success(
        Some("Burrow rented successfully"),
        RentedBurrow { name: request.name },
    )))
}

/// GET a freshly generated report
async fn get_report(State(state): State<AppState>) -> Result<Json<JsonResponse<String>>, ApiError> {
    let report = state.service.generate_report().map_err(ApiError::Report)?;

    Ok(Json(JsonResponse::success(
        Some("Report generated successfully"),
        report,
    )))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Create the axum router with all routes
///
/// GET routes are mounted with a plain GET filter so HEAD also gets 405.
pub fn create_router(state: AppState, routes: &Routes) -> AxumRouter {
    AxumRouter::new()
        .route(
            &routes.get_burrows,
            on(MethodFilter::GET, get_burrows).fallback(method_not_allowed),
        )
        .route(
            &routes.rent_burrow,
            post(rent_burrow).fallback(method_not_allowed),
        )
        .route(
            &routes.get_report,
            on(MethodFilter::GET, get_report).fallback(method_not_allowed),
        )
        .with_state(state)
}
