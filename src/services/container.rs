//! Service Container - Centralized service construction and access.
//!
//! Wires every service to the shared Unit of Work so handlers depend on
//! service traits, not implementations.

use std::sync::Arc;

use super::{
    AuthService, CourseService, EnrollmentService, PaymentService, RequestService, ReviewService,
    SessionService, StatsService, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Concrete service container holding one instance of every service.
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    course_service: Arc<dyn CourseService>,
    request_service: Arc<dyn RequestService>,
    enrollment_service: Arc<dyn EnrollmentService>,
    payment_service: Arc<dyn PaymentService>,
    session_service: Arc<dyn SessionService>,
    review_service: Arc<dyn ReviewService>,
    stats_service: Arc<dyn StatsService>,
}

impl Services {
    /// Create service container from a database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{
            Authenticator, CourseCatalog, Dashboards, EnrollmentEngine, PaymentLedger,
            RequestLedger, ReviewBook, SessionScheduler, UserManager,
        };

        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            course_service: Arc::new(CourseCatalog::new(uow.clone())),
            request_service: Arc::new(RequestLedger::new(uow.clone())),
            enrollment_service: Arc::new(EnrollmentEngine::new(uow.clone())),
            payment_service: Arc::new(PaymentLedger::new(uow.clone())),
            session_service: Arc::new(SessionScheduler::new(uow.clone())),
            review_service: Arc::new(ReviewBook::new(uow.clone())),
            stats_service: Arc::new(Dashboards::new(uow)),
        }
    }

    pub fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    pub fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    pub fn courses(&self) -> Arc<dyn CourseService> {
        self.course_service.clone()
    }

    pub fn requests(&self) -> Arc<dyn RequestService> {
        self.request_service.clone()
    }

    pub fn enrollments(&self) -> Arc<dyn EnrollmentService> {
        self.enrollment_service.clone()
    }

    pub fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }

    pub fn sessions(&self) -> Arc<dyn SessionService> {
        self.session_service.clone()
    }

    pub fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }

    pub fn stats(&self) -> Arc<dyn StatsService> {
        self.stats_service.clone()
    }
}
