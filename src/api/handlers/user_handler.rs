//! Current-user profile handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{TeachingProfile, UserResponse, UserUpdate};
use crate::errors::AppResult;

/// Profile update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub grade_levels: Option<Vec<String>>,
    pub bio: Option<String>,
}

/// Create current-user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/me", put(update_profile))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(current.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update the authenticated user's profile
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    // Merge partial profile fields over the stored profile
    let existing = state.user_service.get_user(current.id).await?;
    let profile = TeachingProfile {
        subjects: payload.subjects.unwrap_or(existing.profile.subjects),
        grade_levels: payload.grade_levels.unwrap_or(existing.profile.grade_levels),
        bio: payload.bio.unwrap_or(existing.profile.bio),
    };

    let update = UserUpdate {
        name: payload.name,
        profile: Some(profile),
    };

    let user = state
        .user_service
        .update_profile(current.actor(), update)
        .await?;

    Ok(Json(UserResponse::from(user)))
}
