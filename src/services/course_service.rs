//! Course service - teacher-side catalog management and the student-side
//! browse views.
//!
//! Deleting a course is a cascade: every enrollment is cancelled, their
//! still-scheduled sessions with them, in one transaction, and the count
//! of previously-live enrollments is reported back.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Action, Actor, CatalogFilter, Course, CourseStatus, CourseUpdate, NewCourse,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// A published course as the browsing student sees it, with derived
/// enrollment facts.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub course: Course,
    pub enrollment_count: u64,
    pub available_slots: i64,
    pub has_requested: bool,
    pub has_enrolled: bool,
}

/// Outcome of a course deletion.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDeletion {
    /// Enrollments that were still live when the course was removed
    pub cancelled_enrollments: u64,
    pub cancelled_sessions: u64,
}

/// Course service trait for dependency injection.
#[async_trait]
pub trait CourseService: Send + Sync {
    /// Teacher: create a course (draft unless published explicitly)
    async fn create_course(&self, actor: Actor, new_course: NewCourse) -> AppResult<Course>;

    /// Teacher: fetch an owned course
    async fn get_owned_course(&self, actor: Actor, course_id: Uuid) -> AppResult<Course>;

    /// Teacher: update an owned course
    async fn update_course(
        &self,
        actor: Actor,
        course_id: Uuid,
        update: CourseUpdate,
    ) -> AppResult<Course>;

    /// Teacher: list own courses
    async fn list_own_courses(
        &self,
        actor: Actor,
        status: Option<CourseStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)>;

    /// Teacher: delete an owned course, cancelling all its enrollments
    async fn delete_course(&self, actor: Actor, course_id: Uuid) -> AppResult<CourseDeletion>;

    /// Student: browse published courses
    async fn browse_catalog(
        &self,
        actor: Actor,
        filter: CatalogFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<CatalogEntry>, u64)>;

    /// Student: published course detail with the caller's request and
    /// enrollment flags
    async fn catalog_entry(&self, actor: Actor, course_id: Uuid) -> AppResult<CatalogEntry>;
}

/// Concrete implementation of CourseService using Unit of Work.
pub struct CourseCatalog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CourseCatalog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn build_catalog_entry(&self, actor: Actor, course: Course) -> AppResult<CatalogEntry> {
        let enrollment_count = self
            .uow
            .enrollments()
            .count_live_for_course(course.id)
            .await?;
        let has_requested = self
            .uow
            .requests()
            .has_open_request(actor.id, course.id)
            .await?;
        let has_enrolled = self
            .uow
            .enrollments()
            .find_live_for(actor.id, course.id)
            .await?
            .is_some();

        let available_slots =
            (i64::from(course.capacity.max_students) - enrollment_count as i64).max(0);

        Ok(CatalogEntry {
            course,
            enrollment_count,
            available_slots,
            has_requested,
            has_enrolled,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> CourseService for CourseCatalog<U> {
    async fn create_course(&self, actor: Actor, new_course: NewCourse) -> AppResult<Course> {
        actor.ensure(Action::ManageCourses)?;

        let new_course = NewCourse {
            teacher_id: actor.id,
            ..new_course
        };

        self.uow.courses().create(new_course).await
    }

    async fn get_owned_course(&self, actor: Actor, course_id: Uuid) -> AppResult<Course> {
        actor.ensure(Action::ManageCourses)?;

        self.uow
            .courses()
            .find_owned(course_id, actor.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn update_course(
        &self,
        actor: Actor,
        course_id: Uuid,
        update: CourseUpdate,
    ) -> AppResult<Course> {
        actor.ensure(Action::ManageCourses)?;
        self.uow.courses().update(course_id, actor.id, update).await
    }

    async fn list_own_courses(
        &self,
        actor: Actor,
        status: Option<CourseStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)> {
        actor.ensure(Action::ManageCourses)?;
        self.uow
            .courses()
            .list_for_teacher(actor.id, status, pagination)
            .await
    }

    async fn delete_course(&self, actor: Actor, course_id: Uuid) -> AppResult<CourseDeletion> {
        actor.ensure(Action::ManageCourses)?;

        self.uow
            .courses()
            .find_owned(course_id, actor.id)
            .await?
            .ok_or(AppError::NotFound)?;

        let deletion = self
            .uow
            .transaction_serializable(|ctx| {
                Box::pin(async move {
                    let cancelled_enrollments =
                        ctx.enrollments().cancel_all_for_course(course_id).await?;

                    let cancelled_sessions =
                        ctx.sessions().cancel_scheduled(None, course_id).await?;

                    ctx.courses().delete(course_id).await?;

                    Ok(CourseDeletion {
                        cancelled_enrollments,
                        cancelled_sessions,
                    })
                })
            })
            .await?;

        tracing::info!(
            %course_id,
            cancelled_enrollments = deletion.cancelled_enrollments,
            cancelled_sessions = deletion.cancelled_sessions,
            "Course deleted"
        );

        Ok(deletion)
    }

    async fn browse_catalog(
        &self,
        actor: Actor,
        filter: CatalogFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<CatalogEntry>, u64)> {
        let (courses, total) = self
            .uow
            .courses()
            .search_published(filter, pagination)
            .await?;

        let mut entries = Vec::with_capacity(courses.len());
        for course in courses {
            entries.push(self.build_catalog_entry(actor, course).await?);
        }

        Ok((entries, total))
    }

    async fn catalog_entry(&self, actor: Actor, course_id: Uuid) -> AppResult<CatalogEntry> {
        let course = self
            .uow
            .courses()
            .find_published(course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.build_catalog_entry(actor, course).await
    }
}
