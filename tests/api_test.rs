//! API-surface tests.
//!
//! These tests exercise mock service implementations and the shared
//! response/domain types without requiring database or Redis
//! connections.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use tutorlink::domain::{TeachingProfile, User, UserRole};
use tutorlink::errors::{AppError, AppResult};
use tutorlink::services::{AuthService, Claims, Registration, TokenResponse};

// =============================================================================
// Mock Services for Testing
// =============================================================================

/// Mock auth service that returns predefined responses
struct MockAuthService;

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        if registration.role.is_admin() {
            return Err(AppError::validation("Invalid role"));
        }

        Ok(User {
            id: Uuid::new_v4(),
            email: registration.email,
            password_hash: "hashed".to_string(),
            name: registration.name,
            role: registration.role,
            profile: registration.profile,
            rating: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    async fn login(&self, email: String, _password: String) -> AppResult<TokenResponse> {
        if email == "unknown@example.com" {
            return Err(AppError::InvalidCredentials);
        }

        Ok(TokenResponse {
            access_token: "mock-token".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 86400,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        if token == "valid-test-token" {
            Ok(Claims {
                sub: Uuid::new_v4(),
                email: "student@example.com".to_string(),
                role: "student".to_string(),
                exp: Utc::now().timestamp() + 3600,
                iat: Utc::now().timestamp(),
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

fn registration(role: UserRole) -> Registration {
    Registration {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        role,
        password: "SecurePass123!".to_string(),
        profile: TeachingProfile::default(),
    }
}

// =============================================================================
// Auth Service Contract Tests
// =============================================================================

#[tokio::test]
async fn register_returns_the_created_account() {
    let service = MockAuthService;

    let user = service.register(registration(UserRole::Student)).await.unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.role, UserRole::Student);
}

#[tokio::test]
async fn register_refuses_admin_self_registration() {
    let service = MockAuthService;

    let result = service.register(registration(UserRole::Admin)).await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn login_issues_a_bearer_token() {
    let service = MockAuthService;

    let token = service
        .login("jane@example.com".to_string(), "SecurePass123!".to_string())
        .await
        .unwrap();

    assert_eq!(token.token_type, "Bearer");
    assert!(!token.access_token.is_empty());
}

#[tokio::test]
async fn invalid_tokens_are_unauthorized() {
    let service = MockAuthService;

    assert!(service.verify_token("valid-test-token").is_ok());
    assert!(matches!(
        service.verify_token("garbage").unwrap_err(),
        AppError::Unauthorized
    ));
}

// =============================================================================
// Shared Response Types
// =============================================================================

#[tokio::test]
async fn api_response_structure() {
    use tutorlink::types::ApiResponse;

    let response: ApiResponse<String> = ApiResponse::success("test data".to_string());
    assert!(response.success);
    assert_eq!(response.data.unwrap(), "test data");
    assert!(response.message.is_none());
}

#[tokio::test]
async fn api_response_with_message() {
    use tutorlink::types::ApiResponse;

    let response: ApiResponse<i32> = ApiResponse::with_message(3, "Operation completed");
    assert!(response.success);
    assert_eq!(response.data.unwrap(), 3);
    assert_eq!(response.message.unwrap(), "Operation completed");
}

#[tokio::test]
async fn paginated_response_counts_pages() {
    use tutorlink::types::Paginated;

    let page = Paginated::new(vec![1, 2, 3], 1, 3, 7);
    assert_eq!(page.meta.total_pages, 3);
    assert_eq!(page.meta.total, 7);
    assert_eq!(page.data.len(), 3);
}

// =============================================================================
// Domain Serialization
// =============================================================================

#[tokio::test]
async fn user_role_round_trips() {
    assert_eq!(UserRole::Student.to_string(), "student");
    assert_eq!(UserRole::Teacher.to_string(), "teacher");
    assert_eq!(UserRole::Admin.to_string(), "admin");
    assert_eq!(UserRole::from("teacher"), UserRole::Teacher);
}

#[tokio::test]
async fn user_serialization_hides_the_password_hash() {
    let user = User {
        id: Uuid::new_v4(),
        email: "jane@example.com".to_string(),
        password_hash: "super-secret-hash".to_string(),
        name: "Jane Doe".to_string(),
        role: UserRole::Student,
        profile: TeachingProfile::default(),
        rating: Decimal::ZERO,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("super-secret-hash"));
    assert!(json.contains("jane@example.com"));
}

#[tokio::test]
async fn payment_status_wire_format_is_lowercase() {
    use tutorlink::domain::PaymentStatus;

    let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
    assert_eq!(json, "\"completed\"");

    let parsed: PaymentStatus = serde_json::from_str("\"refunded\"").unwrap();
    assert_eq!(parsed, PaymentStatus::Refunded);
}

#[tokio::test]
async fn meeting_platform_wire_format_is_snake_case() {
    use tutorlink::domain::MeetingPlatform;

    let json = serde_json::to_string(&MeetingPlatform::GoogleMeet).unwrap();
    assert_eq!(json, "\"google_meet\"");
}
