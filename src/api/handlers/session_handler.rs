//! Session scheduler handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    Attendance, MeetingDetails, Session, SessionFeedback, SessionMaterials, SessionStatus,
    SessionUpdate,
};
use crate::errors::AppResult;
use crate::types::NoContent;

/// Filters for the teacher's session listing
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub status: Option<SessionStatus>,
    #[serde(default)]
    pub upcoming: bool,
}

/// Session update request; omitted fields are left untouched.
/// Attendance and feedback may be recorded at any time.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSessionRequest {
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 30, max = 180, message = "Duration must be 30-180 minutes"))]
    pub duration_minutes: Option<i32>,
    /// scheduled, started, completed, or cancelled
    pub status: Option<SessionStatus>,
    pub meeting: Option<MeetingDetails>,
    pub description: Option<String>,
    pub materials: Option<Vec<String>>,
    pub notes: Option<String>,
    pub homework: Option<String>,
    pub attendance: Option<Attendance>,
    pub feedback: Option<SessionFeedback>,
}

/// Create session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(my_sessions))
        .route("/upcoming", get(upcoming_sessions))
        .route("/:id", put(update_session))
        .route("/:id", delete(delete_session))
}

/// Teacher: own sessions with optional filters
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Teacher's sessions, soonest first"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn my_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<SessionListQuery>,
) -> AppResult<Json<Vec<Session>>> {
    let sessions = state
        .session_service
        .my_sessions(current.actor(), query.status, query.upcoming)
        .await?;

    Ok(Json(sessions))
}

/// Student: upcoming scheduled sessions
#[utoipa::path(
    get,
    path = "/sessions/upcoming",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Upcoming sessions, soonest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn upcoming_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Session>>> {
    let sessions = state
        .session_service
        .upcoming_for_student(current.actor())
        .await?;

    Ok(Json(sessions))
}

/// Teacher: update an owned session
#[utoipa::path(
    put,
    path = "/sessions/{id}",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Updated session", body = Session),
        (status = 404, description = "Session not found")
    )
)]
pub async fn update_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSessionRequest>,
) -> AppResult<Json<Session>> {
    let update = SessionUpdate {
        scheduled_at: payload.scheduled_at,
        duration_minutes: payload.duration_minutes,
        status: payload.status,
        meeting: payload.meeting,
        description: payload.description,
        materials: payload.materials.map(|items| SessionMaterials { items }),
        notes: payload.notes,
        homework: payload.homework,
        attendance: payload.attendance,
        feedback: payload.feedback,
    };

    let session = state
        .session_service
        .update(current.actor(), id, update)
        .await?;

    Ok(Json(session))
}

/// Teacher: delete an owned session, only while still scheduled
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    tag = "Sessions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found or cannot be deleted")
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.session_service.delete(current.actor(), id).await?;
    Ok(NoContent)
}
