//! Enrollment request handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{EnrollmentRequest, RequestStatus};
use crate::errors::AppResult;
use crate::services::Decision;

/// Status filter for request listings
#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
}

/// Teacher decision body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DecideRequestBody {
    /// accepted or rejected
    #[schema(example = "accepted")]
    pub status: RequestStatus,
    #[validate(length(max = 2000, message = "Response message is too long"))]
    pub response_message: Option<String>,
}

/// Create request-ledger routes
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/mine", get(my_requests))
        .route("/incoming", get(incoming_requests))
        .route("/:id", put(decide_request))
}

/// Student: list own requests
#[utoipa::path(
    get,
    path = "/requests/mine",
    tag = "Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own requests, newest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<EnrollmentRequest>>> {
    let requests = state
        .request_service
        .list_my_requests(current.actor())
        .await?;

    Ok(Json(requests))
}

/// Teacher: list incoming requests
#[utoipa::path(
    get,
    path = "/requests/incoming",
    tag = "Requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Incoming requests, newest first"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn incoming_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<RequestListQuery>,
) -> AppResult<Json<Vec<EnrollmentRequest>>> {
    let requests = state
        .request_service
        .list_incoming(current.actor(), query.status)
        .await?;

    Ok(Json(requests))
}

/// Teacher: accept or reject a pending request. Acceptance opens a
/// trial enrollment.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "Requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = DecideRequestBody,
    responses(
        (status = 200, description = "Decision applied"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Already decided or student already enrolled")
    )
)]
pub async fn decide_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<DecideRequestBody>,
) -> AppResult<Json<Decision>> {
    let decision = state
        .request_service
        .decide(current.actor(), id, payload.status, payload.response_message)
        .await?;

    Ok(Json(decision))
}
