//! Session repository - data access for the session scheduler.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::session::{self, Entity as SessionEntity};
use crate::domain::{NewSession, Session, SessionStatus, SessionUpdate};
use crate::errors::{AppError, AppResult};

/// Session repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find session by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Create a new scheduled session
    async fn create(&self, new_session: NewSession) -> AppResult<Session>;

    /// List a course's sessions, soonest first
    async fn list_for_course(&self, course_id: Uuid) -> AppResult<Vec<Session>>;

    /// List a teacher's sessions with optional status/upcoming filters
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<SessionStatus>,
        upcoming_after: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Session>>;

    /// List a student's upcoming scheduled sessions, soonest first
    async fn list_upcoming_for_student(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<Session>>;

    /// Apply a partial update to a teacher-owned session
    async fn update(&self, id: Uuid, teacher_id: Uuid, update: SessionUpdate)
        -> AppResult<Session>;

    /// Delete a teacher-owned session, permitted only while still scheduled
    async fn delete_scheduled(&self, id: Uuid, teacher_id: Uuid) -> AppResult<()>;

    /// Count a student's upcoming scheduled sessions
    async fn count_upcoming_for_student(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Count all sessions
    async fn count_all(&self) -> AppResult<u64>;

    /// Count upcoming scheduled sessions platform-wide
    async fn count_upcoming(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// SeaORM-backed implementation of SessionRepository.
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for SessionStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        let result = SessionEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Session::from))
    }

    async fn create(&self, new_session: NewSession) -> AppResult<Session> {
        let now = chrono::Utc::now();
        let active_model = session::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(new_session.student_id),
            teacher_id: Set(new_session.teacher_id),
            course_id: Set(new_session.course_id),
            scheduled_at: Set(new_session.scheduled_at),
            duration_minutes: Set(new_session.duration_minutes),
            status: Set(SessionStatus::Scheduled.to_string()),
            meeting: Set(new_session.meeting),
            description: Set(new_session.description),
            materials: Set(new_session.materials),
            notes: Set(new_session.notes),
            homework: Set(new_session.homework),
            attendance: Set(Default::default()),
            feedback: Set(Default::default()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Session::from(model))
    }

    async fn list_for_course(&self, course_id: Uuid) -> AppResult<Vec<Session>> {
        let models = SessionEntity::find()
            .filter(session::Column::CourseId.eq(course_id))
            .order_by_asc(session::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Session::from).collect())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<SessionStatus>,
        upcoming_after: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Session>> {
        let mut query = SessionEntity::find().filter(session::Column::TeacherId.eq(teacher_id));
        if let Some(status) = status {
            query = query.filter(session::Column::Status.eq(status.as_str()));
        }
        if let Some(now) = upcoming_after {
            query = query
                .filter(session::Column::ScheduledAt.gt(now))
                .filter(session::Column::Status.eq(SessionStatus::Scheduled.as_str()));
        }

        let models = query
            .order_by_asc(session::Column::ScheduledAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Session::from).collect())
    }

    async fn list_upcoming_for_student(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<Session>> {
        let models = SessionEntity::find()
            .filter(session::Column::StudentId.eq(student_id))
            .filter(session::Column::Status.eq(SessionStatus::Scheduled.as_str()))
            .filter(session::Column::ScheduledAt.gt(now))
            .order_by_asc(session::Column::ScheduledAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Session::from).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        teacher_id: Uuid,
        update: SessionUpdate,
    ) -> AppResult<Session> {
        let existing = SessionEntity::find_by_id(id)
            .filter(session::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: session::ActiveModel = existing.into();
        if let Some(scheduled_at) = update.scheduled_at {
            active.scheduled_at = Set(scheduled_at);
        }
        if let Some(duration_minutes) = update.duration_minutes {
            active.duration_minutes = Set(duration_minutes);
        }
        if let Some(status) = update.status {
            active.status = Set(status.to_string());
        }
        if let Some(meeting) = update.meeting {
            active.meeting = Set(meeting);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(materials) = update.materials {
            active.materials = Set(materials);
        }
        if let Some(notes) = update.notes {
            active.notes = Set(notes);
        }
        if let Some(homework) = update.homework {
            active.homework = Set(homework);
        }
        if let Some(attendance) = update.attendance {
            active.attendance = Set(attendance);
        }
        if let Some(feedback) = update.feedback {
            active.feedback = Set(feedback);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Session::from(model))
    }

    async fn delete_scheduled(&self, id: Uuid, teacher_id: Uuid) -> AppResult<()> {
        let result = SessionEntity::delete_many()
            .filter(session::Column::Id.eq(id))
            .filter(session::Column::TeacherId.eq(teacher_id))
            .filter(session::Column::Status.eq(SessionStatus::Scheduled.as_str()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn count_upcoming_for_student(
        &self,
        student_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        SessionEntity::find()
            .filter(session::Column::StudentId.eq(student_id))
            .filter(session::Column::Status.eq(SessionStatus::Scheduled.as_str()))
            .filter(session::Column::ScheduledAt.gt(now))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_all(&self) -> AppResult<u64> {
        SessionEntity::find()
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_upcoming(&self, now: DateTime<Utc>) -> AppResult<u64> {
        SessionEntity::find()
            .filter(session::Column::Status.eq(SessionStatus::Scheduled.as_str()))
            .filter(session::Column::ScheduledAt.gt(now))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
