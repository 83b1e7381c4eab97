//! Session service - scheduling gated by live enrollment.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::UPCOMING_SESSIONS_LIMIT;
use crate::domain::{Action, Actor, NewSession, Session, SessionStatus, SessionUpdate};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Session service trait for dependency injection.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Teacher: schedule a session for a student enrolled in an owned
    /// course
    async fn create(
        &self,
        actor: Actor,
        course_id: Uuid,
        new_session: NewSession,
    ) -> AppResult<Session>;

    /// Teacher: sessions of an owned course, soonest first
    async fn list_for_course(&self, actor: Actor, course_id: Uuid) -> AppResult<Vec<Session>>;

    /// Teacher: own sessions with optional status/upcoming filters
    async fn my_sessions(
        &self,
        actor: Actor,
        status: Option<SessionStatus>,
        upcoming: bool,
    ) -> AppResult<Vec<Session>>;

    /// Student: upcoming scheduled sessions
    async fn upcoming_for_student(&self, actor: Actor) -> AppResult<Vec<Session>>;

    /// Teacher: update an owned session (status, meeting details,
    /// attendance, feedback)
    async fn update(
        &self,
        actor: Actor,
        session_id: Uuid,
        update: SessionUpdate,
    ) -> AppResult<Session>;

    /// Teacher: delete an owned session, permitted only while scheduled
    async fn delete(&self, actor: Actor, session_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of SessionService using Unit of Work.
pub struct SessionScheduler<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> SessionScheduler<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> SessionService for SessionScheduler<U> {
    async fn create(
        &self,
        actor: Actor,
        course_id: Uuid,
        new_session: NewSession,
    ) -> AppResult<Session> {
        actor.ensure(Action::ManageSessions)?;

        self.uow
            .courses()
            .find_owned(course_id, actor.id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Sessions only exist against a live enrollment
        if self
            .uow
            .enrollments()
            .find_live_for(new_session.student_id, course_id)
            .await?
            .is_none()
        {
            return Err(AppError::conflict("Student is not enrolled in this course"));
        }

        let new_session = NewSession {
            teacher_id: actor.id,
            course_id,
            ..new_session
        };

        self.uow.sessions().create(new_session).await
    }

    async fn list_for_course(&self, actor: Actor, course_id: Uuid) -> AppResult<Vec<Session>> {
        actor.ensure(Action::ManageSessions)?;

        self.uow
            .courses()
            .find_owned(course_id, actor.id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.sessions().list_for_course(course_id).await
    }

    async fn my_sessions(
        &self,
        actor: Actor,
        status: Option<SessionStatus>,
        upcoming: bool,
    ) -> AppResult<Vec<Session>> {
        actor.ensure(Action::ManageSessions)?;

        let upcoming_after = upcoming.then(Utc::now);
        self.uow
            .sessions()
            .list_for_teacher(actor.id, status, upcoming_after)
            .await
    }

    async fn upcoming_for_student(&self, actor: Actor) -> AppResult<Vec<Session>> {
        self.uow
            .sessions()
            .list_upcoming_for_student(actor.id, Utc::now(), UPCOMING_SESSIONS_LIMIT)
            .await
    }

    async fn update(
        &self,
        actor: Actor,
        session_id: Uuid,
        update: SessionUpdate,
    ) -> AppResult<Session> {
        actor.ensure(Action::ManageSessions)?;
        self.uow.sessions().update(session_id, actor.id, update).await
    }

    async fn delete(&self, actor: Actor, session_id: Uuid) -> AppResult<()> {
        actor.ensure(Action::ManageSessions)?;
        self.uow.sessions().delete_scheduled(session_id, actor.id).await
    }
}
