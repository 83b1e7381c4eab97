//! Shared test support: a mock-backed unit of work and domain fixtures.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use tutorlink::domain::{
    Actor, Course, CourseCapacity, CourseContent, CoursePricing, CourseSchedule, CourseStatus,
    Enrollment, EnrollmentRequest, EnrollmentStatus, Payment, PaymentMethod, PaymentState,
    PaymentStatus, RequestStatus, UserRole,
};
use tutorlink::errors::{AppError, AppResult};
use tutorlink::infra::{
    CourseRepository, EnrollmentRepository, MockCourseRepository, MockEnrollmentRepository,
    MockPaymentRepository, MockRequestRepository, MockReviewRepository, MockSessionRepository,
    MockUserRepository, PaymentRepository, RequestRepository, ReviewRepository,
    SessionRepository, TransactionContext, UnitOfWork, UserRepository,
};

/// Mock-backed unit of work.
///
/// Repository calls are served by the mockall mocks; transactional
/// closures are not supported here (transaction paths are exercised by
/// integration tests against a real database).
pub struct TestUnitOfWork {
    pub users: Arc<MockUserRepository>,
    pub courses: Arc<MockCourseRepository>,
    pub requests: Arc<MockRequestRepository>,
    pub enrollments: Arc<MockEnrollmentRepository>,
    pub payments: Arc<MockPaymentRepository>,
    pub sessions: Arc<MockSessionRepository>,
    pub reviews: Arc<MockReviewRepository>,
}

impl Default for TestUnitOfWork {
    fn default() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            courses: Arc::new(MockCourseRepository::new()),
            requests: Arc::new(MockRequestRepository::new()),
            enrollments: Arc::new(MockEnrollmentRepository::new()),
            payments: Arc::new(MockPaymentRepository::new()),
            sessions: Arc::new(MockSessionRepository::new()),
            reviews: Arc::new(MockReviewRepository::new()),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.courses.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.requests.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        self.enrollments.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    fn sessions(&self) -> Arc<dyn SessionRepository> {
        self.sessions.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal(
            "Transactions not supported in test mock",
        ))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal(
            "Transactions not supported in test mock",
        ))
    }
}

pub fn student_actor() -> Actor {
    Actor::new(Uuid::new_v4(), UserRole::Student)
}

pub fn teacher_actor() -> Actor {
    Actor::new(Uuid::new_v4(), UserRole::Teacher)
}

pub fn admin_actor() -> Actor {
    Actor::new(Uuid::new_v4(), UserRole::Admin)
}

/// A published course: 20 per session, 8 sessions, 3-day trial.
pub fn test_course(teacher_id: Uuid) -> Course {
    let now = Utc::now();
    Course {
        id: Uuid::new_v4(),
        teacher_id,
        title: "Algebra I".to_string(),
        subject: "Mathematics".to_string(),
        grade_level: "9th grade".to_string(),
        description: "Linear equations and inequalities".to_string(),
        content: CourseContent::default(),
        pricing: CoursePricing {
            price_per_session: Decimal::from(20),
            total_sessions: 8,
            free_trial_days: 3,
            discount_percentage: 0,
            has_trial: true,
            upfront_payment: false,
            currency: "USD".to_string(),
        },
        schedule: CourseSchedule {
            availability: Vec::new(),
            duration_minutes: 60,
            timezone: "UTC".to_string(),
        },
        capacity: CourseCapacity {
            max_students: 10,
            current_students: 0,
        },
        status: CourseStatus::Published,
        rating: Decimal::ZERO,
        total_ratings: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_enrollment(
    student_id: Uuid,
    teacher_id: Uuid,
    course_id: Uuid,
    status: EnrollmentStatus,
    trial_ends_at: DateTime<Utc>,
) -> Enrollment {
    let now = Utc::now();
    Enrollment {
        id: Uuid::new_v4(),
        student_id,
        teacher_id,
        course_id,
        enrolled_at: now - Duration::days(1),
        trial_ends_at,
        status,
        payment: PaymentState {
            total_amount: Decimal::from(160),
            paid_amount: Decimal::ZERO,
            sessions_completed: 0,
            history: Default::default(),
        },
        created_at: now,
        updated_at: now,
    }
}

pub fn test_request(
    student_id: Uuid,
    teacher_id: Uuid,
    course_id: Uuid,
    status: RequestStatus,
) -> EnrollmentRequest {
    let now = Utc::now();
    EnrollmentRequest {
        id: Uuid::new_v4(),
        student_id,
        teacher_id,
        course_id,
        message: "I would like to enroll in Algebra I".to_string(),
        status,
        response_message: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_payment(
    enrollment: &Enrollment,
    status: PaymentStatus,
    amount: Decimal,
) -> Payment {
    let now = Utc::now();
    Payment {
        id: Uuid::new_v4(),
        enrollment_id: enrollment.id,
        student_id: enrollment.student_id,
        teacher_id: enrollment.teacher_id,
        course_id: enrollment.course_id,
        amount,
        currency: "USD".to_string(),
        method: PaymentMethod::CreditCard,
        status,
        session_count: 1,
        card: None,
        proof_image: None,
        proof_uploaded_at: None,
        transaction_id: None,
        payment_date: now,
        trial_expired: false,
        notes: String::new(),
        refund_amount: Decimal::ZERO,
        refund_date: None,
        refund_reason: None,
        created_at: now,
        updated_at: now,
    }
}
