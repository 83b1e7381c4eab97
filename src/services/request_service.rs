//! Request service - the enrollment request ledger.
//!
//! Acceptance is the entry point of the enrollment state machine: it
//! creates the trial enrollment and bumps the course seat counter in one
//! serializable transaction, so the counting invariant holds under
//! concurrent decisions.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Action, Actor, Enrollment, EnrollmentRequest, NewEnrollment, NewRequest, RequestStatus,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Outcome of a teacher's decision. An acceptance carries the trial
/// enrollment it opened.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub request: EnrollmentRequest,
    pub enrollment: Option<Enrollment>,
}

/// Request service trait for dependency injection.
#[async_trait]
pub trait RequestService: Send + Sync {
    /// Student: ask to enroll in a published course
    async fn create_request(
        &self,
        actor: Actor,
        course_id: Uuid,
        message: Option<String>,
    ) -> AppResult<EnrollmentRequest>;

    /// Student: list own requests, newest first
    async fn list_my_requests(&self, actor: Actor) -> AppResult<Vec<EnrollmentRequest>>;

    /// Teacher: list incoming requests, optionally filtered by status
    async fn list_incoming(
        &self,
        actor: Actor,
        status: Option<RequestStatus>,
    ) -> AppResult<Vec<EnrollmentRequest>>;

    /// Teacher: accept or reject a pending request
    async fn decide(
        &self,
        actor: Actor,
        request_id: Uuid,
        decision: RequestStatus,
        response_message: Option<String>,
    ) -> AppResult<Decision>;
}

/// Concrete implementation of RequestService using Unit of Work.
pub struct RequestLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RequestLedger<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RequestService for RequestLedger<U> {
    async fn create_request(
        &self,
        actor: Actor,
        course_id: Uuid,
        message: Option<String>,
    ) -> AppResult<EnrollmentRequest> {
        actor.ensure(Action::RequestEnrollment)?;

        let course = self
            .uow
            .courses()
            .find_published(course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self
            .uow
            .enrollments()
            .find_live_for(actor.id, course_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("You are already enrolled in this course"));
        }

        if self
            .uow
            .requests()
            .has_open_request(actor.id, course_id)
            .await?
        {
            return Err(AppError::conflict(
                "You have already sent a request for this course",
            ));
        }

        let message =
            message.unwrap_or_else(|| EnrollmentRequest::default_message(&course.title));

        self.uow
            .requests()
            .create(NewRequest {
                student_id: actor.id,
                teacher_id: course.teacher_id,
                course_id,
                message,
            })
            .await
    }

    async fn list_my_requests(&self, actor: Actor) -> AppResult<Vec<EnrollmentRequest>> {
        self.uow.requests().list_for_student(actor.id).await
    }

    async fn list_incoming(
        &self,
        actor: Actor,
        status: Option<RequestStatus>,
    ) -> AppResult<Vec<EnrollmentRequest>> {
        actor.ensure(Action::DecideRequests)?;
        self.uow.requests().list_for_teacher(actor.id, status).await
    }

    async fn decide(
        &self,
        actor: Actor,
        request_id: Uuid,
        decision: RequestStatus,
        response_message: Option<String>,
    ) -> AppResult<Decision> {
        actor.ensure(Action::DecideRequests)?;

        if decision == RequestStatus::Pending {
            return Err(AppError::validation("Invalid status"));
        }

        let request = self
            .uow
            .requests()
            .find_owned(request_id, actor.id)
            .await?
            .ok_or(AppError::NotFound)?;

        if request.status.is_decided() {
            return Err(AppError::conflict("Request has already been decided"));
        }

        if decision == RequestStatus::Rejected {
            let request = self
                .uow
                .transaction(|ctx| {
                    Box::pin(async move {
                        ctx.requests()
                            .mark_decided(request_id, RequestStatus::Rejected, response_message)
                            .await
                    })
                })
                .await?;

            return Ok(Decision {
                request,
                enrollment: None,
            });
        }

        // Acceptance: enrollment creation, seat counter, and the request
        // stamp commit or roll back together.
        let student_id = request.student_id;
        let course_id = request.course_id;
        let (request, enrollment) = self
            .uow
            .transaction_serializable(|ctx| {
                Box::pin(async move {
                    if ctx
                        .enrollments()
                        .find_live_for(student_id, course_id)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict(
                            "Student is already enrolled in this course",
                        ));
                    }

                    let course = ctx
                        .courses()
                        .find_by_id(course_id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    let trial_ends_at =
                        Utc::now() + Duration::days(i64::from(course.pricing.free_trial_days));

                    let enrollment = ctx
                        .enrollments()
                        .create(NewEnrollment {
                            student_id,
                            teacher_id: course.teacher_id,
                            course_id,
                            trial_ends_at,
                            total_amount: course.pricing.total_amount(),
                        })
                        .await?;

                    ctx.courses().adjust_current_students(course_id, 1).await?;

                    let request = ctx
                        .requests()
                        .mark_decided(request_id, RequestStatus::Accepted, response_message)
                        .await?;

                    Ok((request, enrollment))
                })
            })
            .await?;

        tracing::info!(
            request_id = %request.id,
            enrollment_id = %enrollment.id,
            "Request accepted, trial enrollment opened"
        );

        Ok(Decision {
            request,
            enrollment: Some(enrollment),
        })
    }
}
