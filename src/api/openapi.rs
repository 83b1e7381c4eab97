//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, auth_handler, catalog_handler, course_handler, enrollment_handler,
    payment_handler, request_handler, review_handler, session_handler, stats_handler,
    user_handler,
};
use crate::domain::{
    Attendance, AvailabilitySlot, CardSnapshot, Course, CourseCapacity, CourseContent,
    CoursePricing, CourseSchedule, CourseStatus, Enrollment, EnrollmentRequest, EnrollmentStatus,
    FeedbackEntry, MeetingDetails, MeetingPlatform, Payment, PaymentHistory, PaymentMethod,
    PaymentRecord, PaymentRecordStatus, PaymentState, PaymentStatus, RequestStatus, Review,
    ReviewSummary, Session, SessionFeedback, SessionMaterials, SessionStatus, TeachingProfile,
    UserResponse, UserRole, WeeklyAvailability,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the TutorLink API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TutorLink API",
        version = "0.1.0",
        description = "Tutoring-marketplace REST backend: course catalog, enrollment requests, trial/payment lifecycle, session scheduling, and reviews",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        // Current user
        user_handler::get_current_user,
        user_handler::update_profile,
        // Catalog (student)
        catalog_handler::browse,
        catalog_handler::detail,
        catalog_handler::request_enrollment,
        // Courses (teacher)
        course_handler::list_courses,
        course_handler::create_course,
        course_handler::get_course,
        course_handler::update_course,
        course_handler::delete_course,
        course_handler::course_roster,
        course_handler::course_sessions,
        course_handler::create_session,
        // Requests
        request_handler::my_requests,
        request_handler::incoming_requests,
        request_handler::decide_request,
        // Enrollments
        enrollment_handler::my_enrollments,
        enrollment_handler::pending_payments,
        enrollment_handler::cancel_enrollment,
        // Payments
        payment_handler::create_payment,
        payment_handler::my_payments,
        payment_handler::teacher_payments,
        payment_handler::teacher_earnings,
        payment_handler::update_payment,
        payment_handler::admin_payments,
        payment_handler::admin_analytics,
        // Sessions
        session_handler::my_sessions,
        session_handler::upcoming_sessions,
        session_handler::update_session,
        session_handler::delete_session,
        // Reviews
        review_handler::submit_review,
        review_handler::teacher_reviews,
        review_handler::admin_reviews,
        // Dashboards
        stats_handler::student_stats,
        stats_handler::teacher_stats,
        // Admin
        admin_handler::platform_stats,
        admin_handler::list_users,
        admin_handler::create_user,
        admin_handler::update_user,
        admin_handler::delete_user,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            TeachingProfile,
            Course,
            CourseStatus,
            CourseContent,
            CoursePricing,
            CourseSchedule,
            CourseCapacity,
            AvailabilitySlot,
            WeeklyAvailability,
            EnrollmentRequest,
            RequestStatus,
            Enrollment,
            EnrollmentStatus,
            PaymentState,
            PaymentHistory,
            PaymentRecord,
            PaymentRecordStatus,
            Payment,
            PaymentStatus,
            PaymentMethod,
            CardSnapshot,
            Session,
            SessionStatus,
            MeetingDetails,
            MeetingPlatform,
            Attendance,
            FeedbackEntry,
            SessionFeedback,
            SessionMaterials,
            Review,
            ReviewSummary,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Request bodies
            user_handler::UpdateProfileRequest,
            catalog_handler::CreateRequestBody,
            course_handler::CreateCourseRequest,
            course_handler::UpdateCourseRequest,
            course_handler::PricingBody,
            course_handler::ScheduleBody,
            course_handler::CreateSessionRequest,
            request_handler::DecideRequestBody,
            payment_handler::CreatePaymentRequest,
            payment_handler::UpdatePaymentRequest,
            payment_handler::CardBody,
            session_handler::UpdateSessionRequest,
            review_handler::CreateReviewRequest,
            admin_handler::CreateUserRequest,
            admin_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Users", description = "Current-user profile"),
        (name = "Catalog", description = "Published course browsing and enrollment requests"),
        (name = "Courses", description = "Teacher-side course management"),
        (name = "Requests", description = "Enrollment request ledger"),
        (name = "Enrollments", description = "Enrollment lifecycle"),
        (name = "Payments", description = "Simulated payment ledger"),
        (name = "Sessions", description = "Session scheduling"),
        (name = "Reviews", description = "Teacher reviews"),
        (name = "Dashboards", description = "Per-role dashboard stats"),
        (name = "Admin", description = "Platform administration")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
