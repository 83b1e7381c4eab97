//! Student-side enrollment handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Enrollment;
use crate::errors::AppResult;
use crate::services::{Cancellation, PaymentDue};
use crate::types::ApiResponse;

/// Create enrollment routes (student-facing)
pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(my_enrollments))
        .route("/pending-payments", get(pending_payments))
        .route("/:id/cancel", put(cancel_enrollment))
}

/// Student: list own enrollments
#[utoipa::path(
    get,
    path = "/enrollments",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own enrollments, newest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_enrollments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Enrollment>>> {
    let enrollments = state
        .enrollment_service
        .list_my_enrollments(current.actor())
        .await?;

    Ok(Json(enrollments))
}

/// Student: enrollments currently blocked pending payment
#[utoipa::path(
    get,
    path = "/enrollments/pending-payments",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrollments needing payment"),
        (status = 403, description = "Not a student")
    )
)]
pub async fn pending_payments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<PaymentDue>>> {
    let due = state
        .enrollment_service
        .pending_payments(current.actor())
        .await?;

    Ok(Json(due))
}

/// Student: cancel an own enrollment; scheduled sessions are cancelled
/// with it
#[utoipa::path(
    put,
    path = "/enrollments/{id}/cancel",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment cancelled"),
        (status = 404, description = "Enrollment not found"),
        (status = 409, description = "Enrollment already terminal")
    )
)]
pub async fn cancel_enrollment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Cancellation>>> {
    let cancellation = state
        .enrollment_service
        .cancel(current.actor(), id)
        .await?;

    Ok(Json(ApiResponse::with_message(
        cancellation,
        "Enrollment has been cancelled",
    )))
}
