//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.
//! Each aggregate gets a trait (mockable for unit tests) and a
//! SeaORM-backed store. Multi-row state transitions go through the
//! transactional repositories in `infra::unit_of_work` instead.

mod course_repository;
mod enrollment_repository;
pub(crate) mod entities;
mod payment_repository;
mod request_repository;
mod review_repository;
mod session_repository;
mod user_repository;

pub use course_repository::{CourseRepository, CourseStore};
pub use enrollment_repository::{EnrollmentRepository, EnrollmentStore};
pub use payment_repository::{
    IncomeParty, IncomeRow, PaymentRepository, PaymentStore, StatusTotalRow,
};
pub use request_repository::{RequestRepository, RequestStore};
pub use review_repository::{ReviewRepository, ReviewStore};
pub use session_repository::{SessionRepository, SessionStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use course_repository::MockCourseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use enrollment_repository::MockEnrollmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use request_repository::MockRequestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use session_repository::MockSessionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

// Shared query fragment for the transactional repositories
pub(crate) use enrollment_repository::live_condition as live_enrollment_condition;
