//! Review handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Review, ReviewSummary};
use crate::errors::AppResult;
use crate::types::{Created, Paginated, PaginationParams};

/// Review submission request; resubmitting updates the existing review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub teacher_id: Uuid,
    /// Omit to review the teacher overall
    pub course_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(example = 5)]
    pub rating: i16,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    #[serde(default)]
    pub comment: String,
}

/// A teacher's reviews with their aggregate summary
#[derive(Debug, Serialize)]
pub struct TeacherReviewsResponse {
    pub reviews: Paginated<Review>,
    pub summary: ReviewSummary,
}

/// Admin review-listing filters
#[derive(Debug, Deserialize)]
pub struct AdminReviewQuery {
    pub teacher_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
}

/// Create authenticated review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_review))
        .route("/admin/all", get(admin_reviews))
}

/// Create public review routes (no authentication)
pub fn public_review_routes() -> Router<AppState> {
    Router::new().route("/teacher/:id", get(teacher_reviews))
}

/// Student: submit or update a teacher review
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = Review),
        (status = 400, description = "Invalid rating"),
        (status = 403, description = "Only students can review"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> AppResult<Created<Review>> {
    let review = state
        .review_service
        .submit(
            current.actor(),
            payload.teacher_id,
            payload.course_id,
            payload.rating,
            payload.comment,
        )
        .await?;

    Ok(Created(review))
}

/// Public: a teacher's reviews with the aggregate rating
#[utoipa::path(
    get,
    path = "/reviews/teacher/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Reviews and summary")
    )
)]
pub async fn teacher_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<TeacherReviewsResponse>> {
    let (reviews, total, summary) = state
        .review_service
        .teacher_reviews(id, &pagination)
        .await?;

    Ok(Json(TeacherReviewsResponse {
        reviews: Paginated::new(reviews, pagination.page, pagination.limit(), total),
        summary,
    }))
}

/// Admin: list reviews with optional party filters
#[utoipa::path(
    get,
    path = "/reviews/admin/all",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Review listing"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn admin_reviews(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<AdminReviewQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Review>>> {
    let (reviews, total) = state
        .review_service
        .admin_list(
            current.actor(),
            query.teacher_id,
            query.student_id,
            &pagination,
        )
        .await?;

    Ok(Json(Paginated::new(
        reviews,
        pagination.page,
        pagination.limit(),
        total,
    )))
}
