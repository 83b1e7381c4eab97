//! Teacher-side course management handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
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
use crate::config::{
    DEFAULT_CURRENCY, DEFAULT_FREE_TRIAL_DAYS, DEFAULT_MAX_STUDENTS,
    DEFAULT_SESSION_DURATION_MINUTES, DEFAULT_TOTAL_SESSIONS,
};
use crate::domain::{
    Course, CourseContent, CoursePricing, CourseSchedule, CourseStatus, CourseUpdate, Enrollment,
    MeetingDetails, NewCourse, NewSession, Session, SessionMaterials,
};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Pricing section of a course payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PricingBody {
    #[schema(value_type = String, example = "20")]
    pub price_per_session: Decimal,
    #[validate(range(min = 1, message = "Total sessions must be at least 1"))]
    #[serde(default = "default_total_sessions")]
    pub total_sessions: i32,
    #[validate(range(min = 0, message = "Trial days must not be negative"))]
    #[serde(default = "default_trial_days")]
    pub free_trial_days: i32,
    #[validate(range(min = 0, max = 100, message = "Discount must be between 0 and 100"))]
    #[serde(default)]
    pub discount_percentage: i32,
    #[serde(default = "default_true")]
    pub has_trial: bool,
    #[serde(default)]
    pub upfront_payment: bool,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_total_sessions() -> i32 {
    DEFAULT_TOTAL_SESSIONS
}

fn default_trial_days() -> i32 {
    DEFAULT_FREE_TRIAL_DAYS
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl PricingBody {
    fn into_pricing(self) -> AppResult<CoursePricing> {
        if self.price_per_session < Decimal::ZERO {
            return Err(AppError::validation("Price must not be negative"));
        }
        Ok(CoursePricing {
            price_per_session: self.price_per_session,
            total_sessions: self.total_sessions,
            free_trial_days: self.free_trial_days,
            discount_percentage: self.discount_percentage,
            has_trial: self.has_trial,
            upfront_payment: self.upfront_payment,
            currency: self.currency,
        })
    }
}

/// Schedule section of a course payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ScheduleBody {
    #[serde(default)]
    pub availability: Vec<crate::domain::AvailabilitySlot>,
    #[validate(range(min = 30, message = "Sessions must run at least 30 minutes"))]
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_duration() -> i32 {
    DEFAULT_SESSION_DURATION_MINUTES
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl From<ScheduleBody> for CourseSchedule {
    fn from(body: ScheduleBody) -> Self {
        CourseSchedule {
            availability: body.availability,
            duration_minutes: body.duration_minutes,
            timezone: body.timezone,
        }
    }
}

/// Course creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    #[schema(example = "Algebra I")]
    pub title: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    #[schema(example = "Mathematics")]
    pub subject: String,
    #[validate(length(min = 1, message = "Grade level is required"))]
    #[schema(example = "9th grade")]
    pub grade_level: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[serde(default)]
    pub content: CourseContent,
    #[validate(nested)]
    pub pricing: PricingBody,
    #[validate(nested)]
    pub schedule: Option<ScheduleBody>,
    #[validate(range(min = 1, message = "Max students must be at least 1"))]
    #[serde(default = "default_max_students")]
    pub max_students: i32,
    /// draft or published
    #[serde(default = "default_status")]
    pub status: CourseStatus,
}

fn default_max_students() -> i32 {
    DEFAULT_MAX_STUDENTS
}

fn default_status() -> CourseStatus {
    CourseStatus::Draft
}

/// Course update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    pub content: Option<CourseContent>,
    #[validate(nested)]
    pub pricing: Option<PricingBody>,
    #[validate(nested)]
    pub schedule: Option<ScheduleBody>,
    #[validate(range(min = 1, message = "Max students must be at least 1"))]
    pub max_students: Option<i32>,
    pub status: Option<CourseStatus>,
}

/// Status filter for course listings
#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub status: Option<CourseStatus>,
}

/// Session creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSessionRequest {
    /// Enrolled student the session is for
    pub student: Uuid,
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    #[validate(range(min = 30, max = 180, message = "Duration must be 30-180 minutes"))]
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
    pub meeting: MeetingDetails,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub homework: String,
}

/// Create teacher-side course routes
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/", post(create_course))
        .route("/:id", get(get_course))
        .route("/:id", put(update_course))
        .route("/:id", delete(delete_course))
        .route("/:id/enrollments", get(course_roster))
        .route("/:id/sessions", get(course_sessions))
        .route("/:id/sessions", post(create_session))
}

/// List the teacher's own courses
#[utoipa::path(
    get,
    path = "/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own courses"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<CourseListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Course>>> {
    let (courses, total) = state
        .course_service
        .list_own_courses(current.actor(), query.status, &pagination)
        .await?;

    Ok(Json(Paginated::new(
        courses,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> AppResult<Created<Course>> {
    if payload.status == CourseStatus::Archived {
        return Err(AppError::validation("New courses cannot be archived"));
    }

    let new_course = NewCourse {
        // The service stamps the authenticated teacher as owner
        teacher_id: current.id,
        title: payload.title,
        subject: payload.subject,
        grade_level: payload.grade_level,
        description: payload.description,
        content: payload.content,
        pricing: payload.pricing.into_pricing()?,
        schedule: payload
            .schedule
            .map(CourseSchedule::from)
            .unwrap_or_else(|| CourseSchedule {
                availability: Vec::new(),
                duration_minutes: DEFAULT_SESSION_DURATION_MINUTES,
                timezone: "UTC".to_string(),
            }),
        max_students: payload.max_students,
        status: payload.status,
    };

    let course = state
        .course_service
        .create_course(current.actor(), new_course)
        .await?;

    Ok(Created(course))
}

/// Get an owned course
#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Course>> {
    let course = state
        .course_service
        .get_owned_course(current.actor(), id)
        .await?;

    Ok(Json(course))
}

/// Update an owned course
#[utoipa::path(
    put,
    path = "/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated course", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCourseRequest>,
) -> AppResult<Json<Course>> {
    let update = CourseUpdate {
        title: payload.title,
        subject: payload.subject,
        grade_level: payload.grade_level,
        description: payload.description,
        content: payload.content,
        pricing: payload.pricing.map(PricingBody::into_pricing).transpose()?,
        schedule: payload.schedule.map(CourseSchedule::from),
        max_students: payload.max_students,
        status: payload.status,
    };

    let course = state
        .course_service
        .update_course(current.actor(), id, update)
        .await?;

    Ok(Json(course))
}

/// Delete an owned course, cancelling all its enrollments
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted, enrollments cancelled"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<crate::services::CourseDeletion>>> {
    let deletion = state
        .course_service
        .delete_course(current.actor(), id)
        .await?;

    let message = format!(
        "Course deleted successfully. {} enrollments were cancelled.",
        deletion.cancelled_enrollments
    );

    Ok(Json(ApiResponse::with_message(deletion, message)))
}

/// Roster of an owned course
#[utoipa::path(
    get,
    path = "/courses/{id}/enrollments",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course enrollments"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_roster(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Enrollment>>> {
    let roster = state
        .enrollment_service
        .list_course_roster(current.actor(), id)
        .await?;

    Ok(Json(roster))
}

/// Sessions of an owned course
#[utoipa::path(
    get,
    path = "/courses/{id}/sessions",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course sessions"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_sessions(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<Session>>> {
    let sessions = state
        .session_service
        .list_for_course(current.actor(), id)
        .await?;

    Ok(Json(sessions))
}

/// Schedule a session for an enrolled student
#[utoipa::path(
    post,
    path = "/courses/{id}/sessions",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session scheduled", body = Session),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Student is not enrolled")
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateSessionRequest>,
) -> AppResult<Created<Session>> {
    let new_session = NewSession {
        student_id: payload.student,
        // The service stamps the authenticated teacher and the course
        teacher_id: current.id,
        course_id: id,
        scheduled_at: payload.scheduled_at,
        duration_minutes: payload.duration_minutes,
        meeting: payload.meeting,
        description: payload.description,
        materials: SessionMaterials {
            items: payload.materials,
        },
        notes: payload.notes,
        homework: payload.homework,
    };

    let session = state
        .session_service
        .create(current.actor(), id, new_session)
        .await?;

    Ok(Created(session))
}
