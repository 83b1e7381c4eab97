//! Dashboard statistics handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{StudentStats, TeacherStats};

/// Create dashboard stats routes
pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/student", get(student_stats))
        .route("/teacher", get(teacher_stats))
}

/// Student dashboard counters
#[utoipa::path(
    get,
    path = "/stats/student",
    tag = "Dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Student dashboard stats"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn student_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<StudentStats>> {
    let stats = state.stats_service.student_stats(current.actor()).await?;
    Ok(Json(stats))
}

/// Teacher dashboard counters
#[utoipa::path(
    get,
    path = "/stats/teacher",
    tag = "Dashboards",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Teacher dashboard stats"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn teacher_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<TeacherStats>> {
    let stats = state.stats_service.teacher_stats(current.actor()).await?;
    Ok(Json(stats))
}
