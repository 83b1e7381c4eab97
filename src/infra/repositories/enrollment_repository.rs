//! Enrollment repository - read-side data access for the enrollment engine.
//!
//! State transitions (create on acceptance, cancel, promote on payment)
//! happen through the transactional repositories in the unit of work;
//! this repository serves the read paths and existence guards.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::enrollment::{self, Entity as EnrollmentEntity};
use crate::domain::{Enrollment, EnrollmentStatus};
use crate::errors::{AppError, AppResult};

/// Condition matching live (seat-occupying) enrollments.
pub(crate) fn live_condition() -> Condition {
    Condition::any()
        .add(enrollment::Column::Status.eq(EnrollmentStatus::Trial.as_str()))
        .add(enrollment::Column::Status.eq(EnrollmentStatus::Active.as_str()))
}

/// Enrollment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Find enrollment by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>>;

    /// Find the live (trial or active) enrollment for (student, course)
    async fn find_live_for(&self, student_id: Uuid, course_id: Uuid)
        -> AppResult<Option<Enrollment>>;

    /// List a student's enrollments, newest first
    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<Enrollment>>;

    /// List a course's enrollments, newest first
    async fn list_for_course(&self, course_id: Uuid) -> AppResult<Vec<Enrollment>>;

    /// List a student's trial enrollments (the needs-payment candidates)
    async fn list_trial_for_student(&self, student_id: Uuid) -> AppResult<Vec<Enrollment>>;

    /// Count live enrollments for a course
    async fn count_live_for_course(&self, course_id: Uuid) -> AppResult<u64>;

    /// Count a student's enrollments, optionally live only
    async fn count_for_student(&self, student_id: Uuid, live_only: bool) -> AppResult<u64>;

    /// Count a teacher's enrollments, optionally live only
    async fn count_for_teacher(&self, teacher_id: Uuid, live_only: bool) -> AppResult<u64>;

    /// Count all enrollments, optionally live only
    async fn count_all(&self, live_only: bool) -> AppResult<u64>;
}

/// SeaORM-backed implementation of EnrollmentRepository.
pub struct EnrollmentStore {
    db: DatabaseConnection,
}

impl EnrollmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnrollmentRepository for EnrollmentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        let result = EnrollmentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Enrollment::from))
    }

    async fn find_live_for(
        &self,
        student_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>> {
        let result = EnrollmentEntity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(live_condition())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Enrollment::from))
    }

    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .order_by_desc(enrollment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    async fn list_for_course(&self, course_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .order_by_desc(enrollment::Column::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    async fn list_trial_for_student(&self, student_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .filter(enrollment::Column::StudentId.eq(student_id))
            .filter(enrollment::Column::Status.eq(EnrollmentStatus::Trial.as_str()))
            .order_by_desc(enrollment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    async fn count_live_for_course(&self, course_id: Uuid) -> AppResult<u64> {
        EnrollmentEntity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .filter(live_condition())
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn count_for_student(&self, student_id: Uuid, live_only: bool) -> AppResult<u64> {
        let mut query =
            EnrollmentEntity::find().filter(enrollment::Column::StudentId.eq(student_id));
        if live_only {
            query = query.filter(live_condition());
        }
        query.count(&self.db).await.map_err(Into::into)
    }

    async fn count_for_teacher(&self, teacher_id: Uuid, live_only: bool) -> AppResult<u64> {
        let mut query =
            EnrollmentEntity::find().filter(enrollment::Column::TeacherId.eq(teacher_id));
        if live_only {
            query = query.filter(live_condition());
        }
        query.count(&self.db).await.map_err(Into::into)
    }

    async fn count_all(&self, live_only: bool) -> AppResult<u64> {
        let mut query = EnrollmentEntity::find();
        if live_only {
            query = query.filter(live_condition());
        }
        query.count(&self.db).await.map_err(Into::into)
    }
}
