//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion, and use the Unit of Work for repository
//! access and transaction management.

mod auth_service;
pub mod container;
mod course_service;
mod enrollment_service;
mod payment_service;
mod request_service;
mod review_service;
mod session_service;
mod stats_service;
mod user_service;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use course_service::{CatalogEntry, CourseCatalog, CourseDeletion, CourseService};
pub use enrollment_service::{Cancellation, EnrollmentEngine, EnrollmentService, PaymentDue};
pub use payment_service::{
    CreatePayment, EarningsSummary, PartyIncome, PaymentAnalytics, PaymentLedger, PaymentService,
    StatusSummary,
};
pub use request_service::{Decision, RequestLedger, RequestService};
pub use review_service::{ReviewBook, ReviewService};
pub use session_service::{SessionScheduler, SessionService};
pub use stats_service::{
    AdminStats, CourseCounts, Dashboards, EnrollmentCounts, SessionCounts, StatsService,
    StudentStats, TeacherStats, UserCounts,
};
pub use user_service::{CreateAccount, UserManager, UserService};
