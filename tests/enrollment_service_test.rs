//! Enrollment engine unit tests: the lazy needs-payment view and the
//! cancellation guards, over mocked repositories.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{
    student_actor, teacher_actor, test_course, test_enrollment, test_payment, TestUnitOfWork,
};
use tutorlink::domain::{EnrollmentStatus, PaymentStatus};
use tutorlink::errors::AppError;
use tutorlink::infra::{
    MockCourseRepository, MockEnrollmentRepository, MockPaymentRepository,
};
use tutorlink::services::{EnrollmentEngine, EnrollmentService};

#[tokio::test]
async fn pending_payments_lists_elapsed_trials() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());
    let course_id = course.id;

    // Trial window elapsed yesterday
    let enrollment = test_enrollment(
        student.id,
        course.teacher_id,
        course_id,
        EnrollmentStatus::Trial,
        Utc::now() - Duration::days(1),
    );

    let mut enrollments = MockEnrollmentRepository::new();
    let listed = enrollment.clone();
    enrollments
        .expect_list_trial_for_student()
        .returning(move |_| Ok(vec![listed.clone()]));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(course.clone())));

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_blocking_for_enrollment()
        .returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        courses: Arc::new(courses),
        payments: Arc::new(payments),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let due = service.pending_payments(student).await.unwrap();

    assert_eq!(due.len(), 1);
    assert!(due[0].trial_expired);
    assert_eq!(due[0].enrollment.course_id, course_id);
}

#[tokio::test]
async fn pending_payments_skips_unexpired_trials() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());

    // Trial still running, no upfront payment demanded
    let enrollment = test_enrollment(
        student.id,
        course.teacher_id,
        course.id,
        EnrollmentStatus::Trial,
        Utc::now() + Duration::days(2),
    );

    let mut enrollments = MockEnrollmentRepository::new();
    let listed = enrollment.clone();
    enrollments
        .expect_list_trial_for_student()
        .returning(move |_| Ok(vec![listed.clone()]));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(course.clone())));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        courses: Arc::new(courses),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let due = service.pending_payments(student).await.unwrap();

    assert!(due.is_empty());
}

#[tokio::test]
async fn pending_payments_lists_upfront_courses_within_trial() {
    let student = student_actor();
    let mut course = test_course(Uuid::new_v4());
    course.pricing.upfront_payment = true;

    let enrollment = test_enrollment(
        student.id,
        course.teacher_id,
        course.id,
        EnrollmentStatus::Trial,
        Utc::now() + Duration::days(2),
    );

    let mut enrollments = MockEnrollmentRepository::new();
    let listed = enrollment.clone();
    enrollments
        .expect_list_trial_for_student()
        .returning(move |_| Ok(vec![listed.clone()]));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(course.clone())));

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_blocking_for_enrollment()
        .returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        courses: Arc::new(courses),
        payments: Arc::new(payments),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let due = service.pending_payments(student).await.unwrap();

    assert_eq!(due.len(), 1);
    // Due because of the upfront policy, not trial expiry
    assert!(!due[0].trial_expired);
}

#[tokio::test]
async fn pending_payments_skips_enrollments_with_open_payment() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());

    let enrollment = test_enrollment(
        student.id,
        course.teacher_id,
        course.id,
        EnrollmentStatus::Trial,
        Utc::now() - Duration::days(1),
    );
    let open_payment = test_payment(&enrollment, PaymentStatus::Pending, Decimal::from(20));

    let mut enrollments = MockEnrollmentRepository::new();
    let listed = enrollment.clone();
    enrollments
        .expect_list_trial_for_student()
        .returning(move |_| Ok(vec![listed.clone()]));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(course.clone())));

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_blocking_for_enrollment()
        .returning(move |_| Ok(Some(open_payment.clone())));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        courses: Arc::new(courses),
        payments: Arc::new(payments),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let due = service.pending_payments(student).await.unwrap();

    assert!(due.is_empty());
}

#[tokio::test]
async fn cancel_hides_other_students_enrollments() {
    let student = student_actor();
    let other_student = Uuid::new_v4();
    let enrollment = test_enrollment(
        other_student,
        Uuid::new_v4(),
        Uuid::new_v4(),
        EnrollmentStatus::Trial,
        Utc::now() + Duration::days(3),
    );
    let enrollment_id = enrollment.id;

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(enrollment.clone())));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let result = service.cancel(student, enrollment_id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn cancel_conflicts_on_terminal_enrollment() {
    let student = student_actor();
    let enrollment = test_enrollment(
        student.id,
        Uuid::new_v4(),
        Uuid::new_v4(),
        EnrollmentStatus::Cancelled,
        Utc::now() - Duration::days(10),
    );
    let enrollment_id = enrollment.id;

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(enrollment.clone())));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let result = service.cancel(student, enrollment_id).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn roster_requires_course_ownership() {
    let mut courses = MockCourseRepository::new();
    courses.expect_find_owned().returning(|_, _| Ok(None));

    let uow = TestUnitOfWork {
        courses: Arc::new(courses),
        ..Default::default()
    };
    let service = EnrollmentEngine::new(Arc::new(uow));

    let result = service
        .list_course_roster(teacher_actor(), Uuid::new_v4())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}
