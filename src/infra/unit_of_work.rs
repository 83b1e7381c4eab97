//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and transaction lifecycle. The
//! invariant-bearing state transitions of the enrollment engine
//! (request acceptance, enrollment cancellation, course deletion,
//! payment creation and settlement) each execute inside one
//! transaction obtained here, so the course seat counter and the
//! duplicate-billing guard hold under concurrency.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{course, enrollment, payment, request, session};
use super::repositories::{
    CourseRepository, CourseStore, EnrollmentRepository, EnrollmentStore, PaymentRepository,
    PaymentStore, RequestRepository, RequestStore, ReviewRepository, ReviewStore,
    SessionRepository, SessionStore, UserRepository, UserStore,
};
use crate::domain::{
    Course, Enrollment, EnrollmentRequest, EnrollmentStatus, NewEnrollment, NewPayment, Payment,
    PaymentPatch, PaymentRecord, PaymentRecordStatus, PaymentStatus, RequestStatus, SessionStatus,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. Note: this trait is not mockable directly due to generic
/// methods. For testing, mock at the repository level or use
/// integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn courses(&self) -> Arc<dyn CourseRepository>;
    fn requests(&self) -> Arc<dyn RequestRepository>;
    fn enrollments(&self) -> Arc<dyn EnrollmentRepository>;
    fn payments(&self) -> Arc<dyn PaymentRepository>;
    fn sessions(&self) -> Arc<dyn SessionRepository>;
    fn reviews(&self) -> Arc<dyn ReviewRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is automatically committed on success or rolled
    /// back on error. Uses ReadCommitted isolation for balanced
    /// consistency/performance.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;

    /// Execute a closure within a serializable transaction.
    ///
    /// Used for the paths that carry the counting and duplicate-billing
    /// invariants.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn courses(&self) -> TxCourseRepository<'_> {
        TxCourseRepository::new(self.txn)
    }

    pub fn requests(&self) -> TxRequestRepository<'_> {
        TxRequestRepository::new(self.txn)
    }

    pub fn enrollments(&self) -> TxEnrollmentRepository<'_> {
        TxEnrollmentRepository::new(self.txn)
    }

    pub fn payments(&self) -> TxPaymentRepository<'_> {
        TxPaymentRepository::new(self.txn)
    }

    pub fn sessions(&self) -> TxSessionRepository<'_> {
        TxSessionRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    course_repo: Arc<CourseStore>,
    request_repo: Arc<RequestStore>,
    enrollment_repo: Arc<EnrollmentStore>,
    payment_repo: Arc<PaymentStore>,
    session_repo: Arc<SessionStore>,
    review_repo: Arc<ReviewStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            course_repo: Arc::new(CourseStore::new(db.clone())),
            request_repo: Arc::new(RequestStore::new(db.clone())),
            enrollment_repo: Arc::new(EnrollmentStore::new(db.clone())),
            payment_repo: Arc::new(PaymentStore::new(db.clone())),
            session_repo: Arc::new(SessionStore::new(db.clone())),
            review_repo: Arc::new(ReviewStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn courses(&self) -> Arc<dyn CourseRepository> {
        self.course_repo.clone()
    }

    fn requests(&self) -> Arc<dyn RequestRepository> {
        self.request_repo.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentRepository> {
        self.enrollment_repo.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payment_repo.clone()
    }

    fn sessions(&self) -> Arc<dyn SessionRepository> {
        self.session_repo.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.review_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

/// Transaction-aware course repository.
pub struct TxCourseRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCourseRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = course::Entity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    /// Adjust the live-enrollment seat counter. The counter never goes
    /// below zero.
    pub async fn adjust_current_students(&self, id: Uuid, delta: i32) -> AppResult<Course> {
        let existing = course::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let next = (existing.current_students + delta).max(0);
        let mut active: course::ActiveModel = existing.into();
        active.current_students = Set(next);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(Course::from(model))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = course::Entity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

/// Transaction-aware request repository.
pub struct TxRequestRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRequestRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_owned(
        &self,
        id: Uuid,
        teacher_id: Uuid,
    ) -> AppResult<Option<EnrollmentRequest>> {
        let result = request::Entity::find_by_id(id)
            .filter(request::Column::TeacherId.eq(teacher_id))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(EnrollmentRequest::from))
    }

    /// Stamp the teacher's decision on a request.
    pub async fn mark_decided(
        &self,
        id: Uuid,
        status: RequestStatus,
        response_message: Option<String>,
    ) -> AppResult<EnrollmentRequest> {
        let existing = request::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: request::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.response_message = Set(response_message);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(EnrollmentRequest::from(model))
    }
}

/// Transaction-aware enrollment repository.
pub struct TxEnrollmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxEnrollmentRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        let result = enrollment::Entity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Enrollment::from))
    }

    pub async fn find_live_for(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>> {
        let result = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(super::repositories::live_enrollment_condition())
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Enrollment::from))
    }

    /// Open a trial enrollment from an accepted request.
    pub async fn create(&self, new_enrollment: NewEnrollment) -> AppResult<Enrollment> {
        let now = chrono::Utc::now();
        let active_model = enrollment::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(new_enrollment.student_id),
            teacher_id: Set(new_enrollment.teacher_id),
            course_id: Set(new_enrollment.course_id),
            enrolled_at: Set(now),
            trial_ends_at: Set(new_enrollment.trial_ends_at),
            status: Set(EnrollmentStatus::Trial.to_string()),
            total_amount: Set(new_enrollment.total_amount),
            paid_amount: Set(rust_decimal::Decimal::ZERO),
            sessions_completed: Set(0),
            payment_history: Set(Default::default()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.txn).await.map_err(AppError::from)?;
        Ok(Enrollment::from(model))
    }

    pub async fn set_status(&self, id: Uuid, status: EnrollmentStatus) -> AppResult<Enrollment> {
        let existing = enrollment::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: enrollment::ActiveModel = existing.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(Enrollment::from(model))
    }

    /// Record a settled payment on the enrollment's payment sub-state.
    pub async fn record_payment(
        &self,
        id: Uuid,
        amount: rust_decimal::Decimal,
        session_count: i32,
    ) -> AppResult<Enrollment> {
        let existing = enrollment::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = chrono::Utc::now();
        let mut history = existing.payment_history.clone();
        history.records.push(PaymentRecord {
            amount,
            paid_at: now,
            session_count,
            status: PaymentRecordStatus::Paid,
        });

        let paid_amount = existing.paid_amount + amount;
        let sessions_completed = existing.sessions_completed + session_count;

        let mut active: enrollment::ActiveModel = existing.into();
        active.paid_amount = Set(paid_amount);
        active.sessions_completed = Set(sessions_completed);
        active.payment_history = Set(history);
        active.updated_at = Set(now);

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(Enrollment::from(model))
    }

    pub async fn count_live_for_course(&self, course_id: Uuid) -> AppResult<u64> {
        enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(super::repositories::live_enrollment_condition())
            .count(self.txn)
            .await
            .map_err(Into::into)
    }

    /// Cancel every enrollment for a course, returning how many were
    /// still live beforehand.
    pub async fn cancel_all_for_course(&self, course_id: Uuid) -> AppResult<u64> {
        let live = self.count_live_for_course(course_id).await?;

        enrollment::Entity::update_many()
            .col_expr(
                enrollment::Column::Status,
                sea_orm::sea_query::Expr::value(EnrollmentStatus::Cancelled.as_str()),
            )
            .col_expr(
                enrollment::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now()),
            )
            .filter(enrollment::Column::CourseId.eq(course_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(live)
    }
}

/// Transaction-aware payment repository.
pub struct TxPaymentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxPaymentRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let result = payment::Entity::find_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Payment::from))
    }

    /// The duplicate-billing guard, re-checked inside the transaction.
    pub async fn find_blocking_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> AppResult<Option<Payment>> {
        let result = payment::Entity::find()
            .filter(payment::Column::EnrollmentId.eq(enrollment_id))
            .filter(
                sea_orm::Condition::any()
                    .add(payment::Column::Status.eq(PaymentStatus::Pending.as_str()))
                    .add(payment::Column::Status.eq(PaymentStatus::Completed.as_str())),
            )
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Payment::from))
    }

    pub async fn create(&self, new_payment: NewPayment) -> AppResult<Payment> {
        let now = chrono::Utc::now();
        let proof_uploaded_at = new_payment.proof_image.as_ref().map(|_| now);
        let active_model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            enrollment_id: Set(new_payment.enrollment_id),
            student_id: Set(new_payment.student_id),
            teacher_id: Set(new_payment.teacher_id),
            course_id: Set(new_payment.course_id),
            amount: Set(new_payment.amount),
            currency: Set(new_payment.currency),
            method: Set(new_payment.method.to_string()),
            status: Set(PaymentStatus::Pending.to_string()),
            session_count: Set(new_payment.session_count),
            card: Set(new_payment.card),
            proof_image: Set(new_payment.proof_image),
            proof_uploaded_at: Set(proof_uploaded_at),
            transaction_id: Set(None),
            payment_date: Set(now),
            trial_expired: Set(new_payment.trial_expired),
            notes: Set(new_payment.notes),
            refund_amount: Set(rust_decimal::Decimal::ZERO),
            refund_date: Set(None),
            refund_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.txn).await.map_err(AppError::from)?;
        Ok(Payment::from(model))
    }

    /// Apply a teacher-side patch. A non-zero refund amount stamps the
    /// refund date.
    pub async fn apply(&self, id: Uuid, patch: PaymentPatch) -> AppResult<Payment> {
        let existing = payment::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = chrono::Utc::now();
        let mut active: payment::ActiveModel = existing.into();
        if let Some(status) = patch.status {
            active.status = Set(status.to_string());
        }
        if let Some(refund_amount) = patch.refund_amount {
            if refund_amount > rust_decimal::Decimal::ZERO {
                active.refund_amount = Set(refund_amount);
                active.refund_date = Set(Some(now));
            }
        }
        if let Some(refund_reason) = patch.refund_reason {
            active.refund_reason = Set(Some(refund_reason));
        }
        if let Some(notes) = patch.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(now);

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(Payment::from(model))
    }
}

/// Transaction-aware session repository.
pub struct TxSessionRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxSessionRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Cancel still-scheduled sessions for a course, optionally narrowed
    /// to one student. Returns how many sessions were cancelled.
    pub async fn cancel_scheduled(
        &self,
        student_id: Option<Uuid>,
        course_id: Uuid,
    ) -> AppResult<u64> {
        let mut query = session::Entity::update_many()
            .col_expr(
                session::Column::Status,
                sea_orm::sea_query::Expr::value(SessionStatus::Cancelled.as_str()),
            )
            .col_expr(
                session::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now()),
            )
            .filter(session::Column::CourseId.eq(course_id))
            .filter(session::Column::Status.eq(SessionStatus::Scheduled.as_str()));

        if let Some(student_id) = student_id {
            query = query.filter(session::Column::StudentId.eq(student_id));
        }

        let result = query.exec(self.txn).await.map_err(AppError::from)?;
        Ok(result.rows_affected)
    }
}
