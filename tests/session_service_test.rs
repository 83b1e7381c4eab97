//! Session scheduler unit tests over mocked repositories.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{student_actor, teacher_actor, test_course, test_enrollment, TestUnitOfWork};
use tutorlink::domain::{
    EnrollmentStatus, MeetingDetails, MeetingPlatform, NewSession, SessionMaterials,
};
use tutorlink::errors::AppError;
use tutorlink::infra::{
    MockCourseRepository, MockEnrollmentRepository, MockSessionRepository,
};
use tutorlink::services::{SessionScheduler, SessionService};

fn new_session(student_id: Uuid, teacher_id: Uuid, course_id: Uuid) -> NewSession {
    NewSession {
        student_id,
        teacher_id,
        course_id,
        scheduled_at: Utc::now() + Duration::days(1),
        duration_minutes: 60,
        meeting: MeetingDetails {
            platform: MeetingPlatform::Zoom,
            meeting_id: String::new(),
            meeting_password: String::new(),
            meeting_url: String::new(),
            meeting_number: String::new(),
        },
        description: String::new(),
        materials: SessionMaterials::default(),
        notes: String::new(),
        homework: String::new(),
    }
}

#[tokio::test]
async fn create_requires_course_ownership() {
    let mut courses = MockCourseRepository::new();
    courses.expect_find_owned().returning(|_, _| Ok(None));

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        ..Default::default()
    };
    let service = SessionScheduler::new(Arc::new(uow));

    let teacher = teacher_actor();
    let course_id = Uuid::new_v4();
    let result = service
        .create(
            teacher,
            course_id,
            new_session(Uuid::new_v4(), teacher.id, course_id),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn create_conflicts_when_student_not_enrolled() {
    let teacher = teacher_actor();
    let course = test_course(teacher.id);
    let course_id = course.id;

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_owned()
        .returning(move |_, _| Ok(Some(course.clone())));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_live_for().returning(|_, _| Ok(None));

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        enrollments: Arc::new(enrollments),
        ..Default::default()
    };
    let service = SessionScheduler::new(Arc::new(uow));

    let result = service
        .create(
            teacher,
            course_id,
            new_session(Uuid::new_v4(), teacher.id, course_id),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn create_schedules_for_live_enrollment() {
    let teacher = teacher_actor();
    let student_id = Uuid::new_v4();
    let course = test_course(teacher.id);
    let course_id = course.id;
    let enrollment = test_enrollment(
        student_id,
        teacher.id,
        course_id,
        EnrollmentStatus::Active,
        Utc::now() - Duration::days(10),
    );

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_owned()
        .returning(move |_, _| Ok(Some(course.clone())));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_live_for()
        .returning(move |_, _| Ok(Some(enrollment.clone())));

    let mut sessions = MockSessionRepository::new();
    sessions.expect_create().returning(|new_session| {
        let now = Utc::now();
        Ok(tutorlink::domain::Session {
            id: Uuid::new_v4(),
            student_id: new_session.student_id,
            teacher_id: new_session.teacher_id,
            course_id: new_session.course_id,
            scheduled_at: new_session.scheduled_at,
            duration_minutes: new_session.duration_minutes,
            status: tutorlink::domain::SessionStatus::Scheduled,
            meeting: new_session.meeting,
            description: new_session.description,
            materials: new_session.materials,
            notes: new_session.notes,
            homework: new_session.homework,
            attendance: Default::default(),
            feedback: Default::default(),
            created_at: now,
            updated_at: now,
        })
    });

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        enrollments: Arc::new(enrollments),
        sessions: Arc::new(sessions),
        ..Default::default()
    };
    let service = SessionScheduler::new(Arc::new(uow));

    let session = service
        .create(
            teacher,
            course_id,
            new_session(student_id, teacher.id, course_id),
        )
        .await
        .unwrap();

    assert_eq!(session.student_id, student_id);
    assert_eq!(session.teacher_id, teacher.id);
    assert_eq!(
        session.status,
        tutorlink::domain::SessionStatus::Scheduled
    );
}

#[tokio::test]
async fn students_cannot_schedule_sessions() {
    let service = SessionScheduler::new(Arc::new(TestUnitOfWork::default()));

    let student = student_actor();
    let course_id = Uuid::new_v4();
    let result = service
        .create(
            student,
            course_id,
            new_session(student.id, Uuid::new_v4(), course_id),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn delete_propagates_not_found_for_undeletable_sessions() {
    let mut sessions = MockSessionRepository::new();
    // The store refuses deletion unless the session is still scheduled
    sessions
        .expect_delete_scheduled()
        .returning(|_, _| Err(AppError::NotFound));

    let uow = TestUnitOfWork {
        sessions: Arc::new(sessions),
        ..Default::default()
    };
    let service = SessionScheduler::new(Arc::new(uow));

    let result = service.delete(teacher_actor(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
