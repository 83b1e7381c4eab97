//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Redis cache (rate limiting, health checks)
//! - Unit of Work for transaction management

pub mod cache;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{
    CourseRepository, CourseStore, EnrollmentRepository, EnrollmentStore, PaymentRepository,
    PaymentStore, RequestRepository, RequestStore, ReviewRepository, ReviewStore,
    SessionRepository, SessionStore, UserRepository, UserStore,
};
pub use unit_of_work::{
    Persistence, TransactionContext, TxCourseRepository, TxEnrollmentRepository,
    TxPaymentRepository, TxRequestRepository, TxSessionRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockCourseRepository, MockEnrollmentRepository, MockPaymentRepository, MockRequestRepository,
    MockReviewRepository, MockSessionRepository, MockUserRepository,
};
