//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and
//! infrastructure.

use std::sync::Arc;

use crate::infra::{Cache, Database};
use crate::services::{
    AuthService, CourseService, EnrollmentService, PaymentService, RequestService, ReviewService,
    Services, SessionService, StatsService, UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub course_service: Arc<dyn CourseService>,
    pub request_service: Arc<dyn RequestService>,
    pub enrollment_service: Arc<dyn EnrollmentService>,
    pub payment_service: Arc<dyn PaymentService>,
    pub session_service: Arc<dyn SessionService>,
    pub review_service: Arc<dyn ReviewService>,
    pub stats_service: Arc<dyn StatsService>,
    /// Redis cache (rate limiting, health checks)
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        config: crate::config::Config,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::from_services(&services, cache, database)
    }

    /// Create application state from an existing service container.
    pub fn from_services(
        services: &Services,
        cache: Arc<Cache>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            course_service: services.courses(),
            request_service: services.requests(),
            enrollment_service: services.enrollments(),
            payment_service: services.payments(),
            session_service: services.sessions(),
            review_service: services.reviews(),
            stats_service: services.stats(),
            cache,
            database,
        }
    }
}
