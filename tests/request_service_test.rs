//! Request ledger unit tests over mocked repositories.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use common::{
    student_actor, teacher_actor, test_course, test_enrollment, test_request, TestUnitOfWork,
};
use tutorlink::domain::{EnrollmentStatus, RequestStatus};
use tutorlink::errors::AppError;
use tutorlink::infra::{MockCourseRepository, MockEnrollmentRepository, MockRequestRepository};
use tutorlink::services::{RequestLedger, RequestService};

#[tokio::test]
async fn create_request_rejects_unpublished_course() {
    let mut courses = MockCourseRepository::new();
    courses.expect_find_published().returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        ..Default::default()
    };
    let service = RequestLedger::new(Arc::new(uow));

    let result = service
        .create_request(student_actor(), Uuid::new_v4(), None)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn create_request_conflicts_when_already_enrolled() {
    let student = student_actor();
    let teacher_id = Uuid::new_v4();
    let course = test_course(teacher_id);
    let course_id = course.id;
    let enrollment = test_enrollment(
        student.id,
        teacher_id,
        course_id,
        EnrollmentStatus::Trial,
        Utc::now() + Duration::days(3),
    );

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_published()
        .returning(move |_| Ok(Some(course.clone())));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_live_for()
        .returning(move |_, _| Ok(Some(enrollment.clone())));

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        enrollments: Arc::new(enrollments),
        ..Default::default()
    };
    let service = RequestLedger::new(Arc::new(uow));

    let result = service.create_request(student, course_id, None).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn create_request_conflicts_on_open_request() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());
    let course_id = course.id;

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_published()
        .returning(move |_| Ok(Some(course.clone())));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_live_for().returning(|_, _| Ok(None));

    let mut requests = MockRequestRepository::new();
    requests.expect_has_open_request().returning(|_, _| Ok(true));

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        enrollments: Arc::new(enrollments),
        requests: Arc::new(requests),
        ..Default::default()
    };
    let service = RequestLedger::new(Arc::new(uow));

    let result = service.create_request(student, course_id, None).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn create_request_synthesizes_default_message() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());
    let course_id = course.id;
    let course_title = course.title.clone();

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_published()
        .returning(move |_| Ok(Some(course.clone())));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_live_for().returning(|_, _| Ok(None));

    let mut requests = MockRequestRepository::new();
    requests
        .expect_has_open_request()
        .returning(|_, _| Ok(false));
    let expected_title = course_title.clone();
    requests.expect_create().returning(move |new_request| {
        assert!(new_request.message.contains(&expected_title));
        Ok(test_request(
            new_request.student_id,
            new_request.teacher_id,
            new_request.course_id,
            RequestStatus::Pending,
        ))
    });

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        enrollments: Arc::new(enrollments),
        requests: Arc::new(requests),
        ..Default::default()
    };
    let service = RequestLedger::new(Arc::new(uow));

    let request = service
        .create_request(student, course_id, None)
        .await
        .unwrap();

    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.student_id, student.id);
}

#[tokio::test]
async fn students_cannot_decide_requests() {
    let service = RequestLedger::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .decide(
            student_actor(),
            Uuid::new_v4(),
            RequestStatus::Accepted,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn decide_rejects_pending_as_a_decision() {
    let service = RequestLedger::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .decide(
            teacher_actor(),
            Uuid::new_v4(),
            RequestStatus::Pending,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn decide_requires_ownership() {
    let mut requests = MockRequestRepository::new();
    requests.expect_find_owned().returning(|_, _| Ok(None));

    let uow = TestUnitOfWork {
        requests: Arc::new(requests),
        ..Default::default()
    };
    let service = RequestLedger::new(Arc::new(uow));

    let result = service
        .decide(
            teacher_actor(),
            Uuid::new_v4(),
            RequestStatus::Accepted,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn decide_conflicts_when_already_decided() {
    let teacher = teacher_actor();
    let request = test_request(
        Uuid::new_v4(),
        teacher.id,
        Uuid::new_v4(),
        RequestStatus::Accepted,
    );
    let request_id = request.id;

    let mut requests = MockRequestRepository::new();
    requests
        .expect_find_owned()
        .returning(move |_, _| Ok(Some(request.clone())));

    let uow = TestUnitOfWork {
        requests: Arc::new(requests),
        ..Default::default()
    };
    let service = RequestLedger::new(Arc::new(uow));

    let result = service
        .decide(teacher, request_id, RequestStatus::Rejected, None)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn list_incoming_requires_teacher_capability() {
    let service = RequestLedger::new(Arc::new(TestUnitOfWork::default()));

    let result = service.list_incoming(student_actor(), None).await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}
