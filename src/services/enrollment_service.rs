//! Enrollment service - listings, cancellation, and the pending-payment
//! view of the enrollment state machine.
//!
//! Trial expiry is never stored: the needs-payment predicate is evaluated
//! at read time over (now, status, trial window, upfront flag).

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Action, Actor, Course, Enrollment};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// A trial enrollment currently blocked pending payment.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDue {
    pub enrollment: Enrollment,
    pub course: Course,
    /// Whether the trial window has elapsed (as opposed to an upfront
    /// payment demand).
    pub trial_expired: bool,
}

/// Outcome of a cancellation: the cancelled enrollment and how many of
/// its scheduled sessions were swept up.
#[derive(Debug, Clone, Serialize)]
pub struct Cancellation {
    pub enrollment: Enrollment,
    pub cancelled_sessions: u64,
}

/// Enrollment service trait for dependency injection.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Student: list own enrollments, newest first
    async fn list_my_enrollments(&self, actor: Actor) -> AppResult<Vec<Enrollment>>;

    /// Teacher: roster of an owned course
    async fn list_course_roster(&self, actor: Actor, course_id: Uuid)
        -> AppResult<Vec<Enrollment>>;

    /// Student: trial enrollments whose needs-payment predicate is true
    /// and which have no pending/completed payment yet
    async fn pending_payments(&self, actor: Actor) -> AppResult<Vec<PaymentDue>>;

    /// Student: cancel an own enrollment; still-scheduled sessions for
    /// the (student, course) pair are cancelled with it
    async fn cancel(&self, actor: Actor, enrollment_id: Uuid) -> AppResult<Cancellation>;
}

/// Concrete implementation of EnrollmentService using Unit of Work.
pub struct EnrollmentEngine<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EnrollmentEngine<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> EnrollmentService for EnrollmentEngine<U> {
    async fn list_my_enrollments(&self, actor: Actor) -> AppResult<Vec<Enrollment>> {
        self.uow.enrollments().list_for_student(actor.id).await
    }

    async fn list_course_roster(
        &self,
        actor: Actor,
        course_id: Uuid,
    ) -> AppResult<Vec<Enrollment>> {
        actor.ensure(Action::ManageCourses)?;

        self.uow
            .courses()
            .find_owned(course_id, actor.id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.enrollments().list_for_course(course_id).await
    }

    async fn pending_payments(&self, actor: Actor) -> AppResult<Vec<PaymentDue>> {
        actor.ensure(Action::MakePayments)?;

        let now = Utc::now();
        let trials = self
            .uow
            .enrollments()
            .list_trial_for_student(actor.id)
            .await?;

        let mut due = Vec::new();
        for enrollment in trials {
            let Some(course) = self.uow.courses().find_by_id(enrollment.course_id).await? else {
                continue;
            };

            if !enrollment.needs_payment(now, course.pricing.upfront_payment) {
                continue;
            }

            // Skip enrollments already covered by a pending/completed payment
            if self
                .uow
                .payments()
                .find_blocking_for_enrollment(enrollment.id)
                .await?
                .is_some()
            {
                continue;
            }

            let trial_expired = enrollment.trial_expired(now);
            due.push(PaymentDue {
                enrollment,
                course,
                trial_expired,
            });
        }

        Ok(due)
    }

    async fn cancel(&self, actor: Actor, enrollment_id: Uuid) -> AppResult<Cancellation> {
        actor.ensure(Action::CancelEnrollment)?;

        let enrollment = self
            .uow
            .enrollments()
            .find_by_id(enrollment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // "Not yours" reads as not found, matching the lookup scoping
        if !enrollment.is_owned_by(actor.id) {
            return Err(AppError::NotFound);
        }

        if enrollment.status.is_terminal() {
            return Err(AppError::conflict("Enrollment is no longer active"));
        }

        let student_id = enrollment.student_id;
        let course_id = enrollment.course_id;
        let was_live = enrollment.is_live();

        let (enrollment, cancelled_sessions) = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let enrollment = ctx
                        .enrollments()
                        .set_status(enrollment_id, crate::domain::EnrollmentStatus::Cancelled)
                        .await?;

                    let cancelled_sessions = ctx
                        .sessions()
                        .cancel_scheduled(Some(student_id), course_id)
                        .await?;

                    // Free the seat the live enrollment was occupying
                    if was_live {
                        ctx.courses().adjust_current_students(course_id, -1).await?;
                    }

                    Ok((enrollment, cancelled_sessions))
                })
            })
            .await?;

        tracing::info!(
            enrollment_id = %enrollment.id,
            cancelled_sessions,
            "Enrollment cancelled"
        );

        Ok(Cancellation {
            enrollment,
            cancelled_sessions,
        })
    }
}
