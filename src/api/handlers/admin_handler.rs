//! Platform administration handlers: user management and global stats.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{TeachingProfile, UserFilter, UserResponse, UserRole, UserUpdate};
use crate::errors::AppResult;
use crate::services::{AdminStats, CreateAccount};
use crate::types::{Created, NoContent, Paginated, PaginationParams};

/// Admin account-creation request; unlike self-registration this may
/// create accounts of any role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// student, teacher, or admin
    pub role: UserRole,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub grade_levels: Vec<String>,
    #[serde(default)]
    pub bio: String,
}

/// Admin user-update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub grade_levels: Option<Vec<String>>,
    pub bio: Option<String>,
}

/// User-listing filters
#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub role: Option<UserRole>,
}

/// Create admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(platform_stats))
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
}

/// Platform-wide dashboard counters
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Platform stats"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn platform_stats(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<AdminStats>> {
    let stats = state.stats_service.admin_stats(current.actor()).await?;
    Ok(Json(stats))
}

/// List users with search/role filters
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User listing"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<UserListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let filter = UserFilter {
        search: query.search.filter(|s| !s.is_empty()),
        role: query.role,
    };

    let (users, total) = state
        .user_service
        .list_users(current.actor(), filter, &pagination)
        .await?;

    Ok(Json(Paginated::new(
        users.into_iter().map(UserResponse::from).collect(),
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Create an account of any role
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .create_user(
            current.actor(),
            CreateAccount {
                name: payload.name,
                email: payload.email,
                role: payload.role,
                password: payload.password,
                profile: TeachingProfile {
                    subjects: payload.subjects,
                    grade_levels: payload.grade_levels,
                    bio: payload.bio,
                },
            },
        )
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Update another user's profile fields
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let existing = state.user_service.get_user(id).await?;
    let profile = TeachingProfile {
        subjects: payload.subjects.unwrap_or(existing.profile.subjects),
        grade_levels: payload.grade_levels.unwrap_or(existing.profile.grade_levels),
        bio: payload.bio.unwrap_or(existing.profile.bio),
    };

    let user = state
        .user_service
        .update_user(
            current.actor(),
            id,
            UserUpdate {
                name: payload.name,
                profile: Some(profile),
            },
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.user_service.delete_user(current.actor(), id).await?;
    Ok(NoContent)
}
