//! Student-facing course catalog handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CatalogFilter, EnrollmentRequest};
use crate::errors::AppResult;
use crate::services::CatalogEntry;
use crate::types::{Created, Paginated, PaginationParams};

/// Catalog browse filters
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl From<CatalogQuery> for CatalogFilter {
    fn from(query: CatalogQuery) -> Self {
        CatalogFilter {
            search: query.search.filter(|s| !s.is_empty()),
            subject: query.subject.filter(|s| !s.is_empty()),
            grade_level: query.grade_level.filter(|s| !s.is_empty()),
            min_price: query.min_price,
            max_price: query.max_price,
        }
    }
}

/// Enrollment request body; the message is synthesized from the course
/// title when absent
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequestBody {
    #[validate(length(max = 2000, message = "Message is too long"))]
    #[schema(example = "I would like to enroll in Algebra I")]
    pub message: Option<String>,
}

/// Create catalog routes (student-facing)
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(browse))
        .route("/:id", get(detail))
        .route("/:id/request", post(request_enrollment))
}

/// Browse published courses
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Published courses with enrollment facts"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn browse(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(filter): Query<CatalogQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<CatalogEntry>>> {
    let (entries, total) = state
        .course_service
        .browse_catalog(current.actor(), filter.into(), &pagination)
        .await?;

    Ok(Json(Paginated::new(
        entries,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Published course detail with the caller's request/enrollment flags
#[utoipa::path(
    get,
    path = "/catalog/{id}",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course detail"),
        (status = 404, description = "Course not found or not published")
    )
)]
pub async fn detail(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CatalogEntry>> {
    let entry = state
        .course_service
        .catalog_entry(current.actor(), id)
        .await?;

    Ok(Json(entry))
}

/// Request enrollment in a published course
#[utoipa::path(
    post,
    path = "/catalog/{id}/request",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created", body = EnrollmentRequest),
        (status = 404, description = "Course not found or not published"),
        (status = 409, description = "Already requested or enrolled")
    )
)]
pub async fn request_enrollment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateRequestBody>,
) -> AppResult<Created<EnrollmentRequest>> {
    let request = state
        .request_service
        .create_request(current.actor(), id, payload.message)
        .await?;

    Ok(Created(request))
}
