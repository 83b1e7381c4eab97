//! Stats service - read-only dashboard aggregations per role.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::try_join;

use crate::domain::{Action, Actor, CourseStatus, PaymentFilter, PaymentStatus, RequestStatus, UserRole};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Student dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct StudentStats {
    pub total_requests: u64,
    pub pending_requests: u64,
    pub accepted_requests: u64,
    pub total_enrollments: u64,
    pub active_enrollments: u64,
    pub upcoming_sessions: u64,
    pub total_spent: Decimal,
}

/// Teacher dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherStats {
    pub total_courses: u64,
    pub published_courses: u64,
    pub total_enrollments: u64,
    pub active_students: u64,
    pub pending_requests: u64,
    pub total_earnings: Decimal,
}

/// Platform-wide admin counters.
#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub users: UserCounts,
    pub courses: CourseCounts,
    pub enrollments: EnrollmentCounts,
    pub sessions: SessionCounts,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCounts {
    pub total: u64,
    pub students: u64,
    pub teachers: u64,
    pub admins: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseCounts {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    pub archived: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentCounts {
    pub total: u64,
    pub active: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCounts {
    pub total: u64,
    pub upcoming: u64,
}

/// Stats service trait for dependency injection.
#[async_trait]
pub trait StatsService: Send + Sync {
    async fn student_stats(&self, actor: Actor) -> AppResult<StudentStats>;
    async fn teacher_stats(&self, actor: Actor) -> AppResult<TeacherStats>;
    async fn admin_stats(&self, actor: Actor) -> AppResult<AdminStats>;
}

/// Concrete implementation of StatsService using Unit of Work.
pub struct Dashboards<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Dashboards<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StatsService for Dashboards<U> {
    async fn student_stats(&self, actor: Actor) -> AppResult<StudentStats> {
        let requests = self.uow.requests();
        let enrollments = self.uow.enrollments();
        let sessions = self.uow.sessions();
        let payments = self.uow.payments();

        let (
            total_requests,
            pending_requests,
            accepted_requests,
            total_enrollments,
            active_enrollments,
            upcoming_sessions,
            total_spent,
        ) = try_join!(
            requests.count_for_student(actor.id, None),
            requests.count_for_student(actor.id, Some(RequestStatus::Pending)),
            requests.count_for_student(actor.id, Some(RequestStatus::Accepted)),
            enrollments.count_for_student(actor.id, false),
            enrollments.count_for_student(actor.id, true),
            sessions.count_upcoming_for_student(actor.id, Utc::now()),
            payments.sum_amount(PaymentFilter {
                student_id: Some(actor.id),
                status: Some(PaymentStatus::Completed),
                ..Default::default()
            }),
        )?;

        Ok(StudentStats {
            total_requests,
            pending_requests,
            accepted_requests,
            total_enrollments,
            active_enrollments,
            upcoming_sessions,
            total_spent,
        })
    }

    async fn teacher_stats(&self, actor: Actor) -> AppResult<TeacherStats> {
        actor.ensure(Action::ManageCourses)?;

        let courses = self.uow.courses();
        let enrollments = self.uow.enrollments();
        let requests = self.uow.requests();
        let payments = self.uow.payments();

        let (
            total_courses,
            published_courses,
            total_enrollments,
            active_students,
            pending_requests,
            total_earnings,
        ) = try_join!(
            courses.count_for_teacher(actor.id, None),
            courses.count_for_teacher(actor.id, Some(CourseStatus::Published)),
            enrollments.count_for_teacher(actor.id, false),
            enrollments.count_for_teacher(actor.id, true),
            requests.count_for_teacher(actor.id, Some(RequestStatus::Pending)),
            payments.sum_amount(PaymentFilter {
                teacher_id: Some(actor.id),
                status: Some(PaymentStatus::Completed),
                ..Default::default()
            }),
        )?;

        Ok(TeacherStats {
            total_courses,
            published_courses,
            total_enrollments,
            active_students,
            pending_requests,
            total_earnings,
        })
    }

    async fn admin_stats(&self, actor: Actor) -> AppResult<AdminStats> {
        actor.ensure(Action::Administer)?;

        let users = self.uow.users();
        let courses = self.uow.courses();
        let enrollments = self.uow.enrollments();
        let sessions = self.uow.sessions();

        let (total_users, students, teachers, admins) = try_join!(
            users.count_all(),
            users.count_by_role(UserRole::Student),
            users.count_by_role(UserRole::Teacher),
            users.count_by_role(UserRole::Admin),
        )?;

        let (total_courses, published, draft, archived) = try_join!(
            courses.count_all(None),
            courses.count_all(Some(CourseStatus::Published)),
            courses.count_all(Some(CourseStatus::Draft)),
            courses.count_all(Some(CourseStatus::Archived)),
        )?;

        let (total_enrollments, active_enrollments, total_sessions, upcoming_sessions) = try_join!(
            enrollments.count_all(false),
            enrollments.count_all(true),
            sessions.count_all(),
            sessions.count_upcoming(Utc::now()),
        )?;

        Ok(AdminStats {
            users: UserCounts {
                total: total_users,
                students,
                teachers,
                admins,
            },
            courses: CourseCounts {
                total: total_courses,
                published,
                draft,
                archived,
            },
            enrollments: EnrollmentCounts {
                total: total_enrollments,
                active: active_enrollments,
            },
            sessions: SessionCounts {
                total: total_sessions,
                upcoming: upcoming_sessions,
            },
        })
    }
}
