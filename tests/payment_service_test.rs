//! Payment ledger unit tests over mocked repositories.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{
    student_actor, teacher_actor, test_course, test_enrollment, test_payment, TestUnitOfWork,
};
use tutorlink::domain::{
    EnrollmentStatus, PaymentMethod, PaymentPatch, PaymentStatus,
};
use tutorlink::errors::AppError;
use tutorlink::infra::{
    MockCourseRepository, MockEnrollmentRepository, MockPaymentRepository,
};
use tutorlink::services::{CreatePayment, PaymentLedger, PaymentService};

fn create_input(course_id: Uuid, amount: Decimal, session_count: Option<i32>) -> CreatePayment {
    CreatePayment {
        course_id,
        method: PaymentMethod::CreditCard,
        amount,
        session_count,
        card: None,
        proof_image: None,
        notes: String::new(),
    }
}

#[tokio::test]
async fn create_requires_a_live_enrollment() {
    let mut enrollments = MockEnrollmentRepository::new();
    enrollments.expect_find_live_for().returning(|_, _| Ok(None));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        ..Default::default()
    };
    let service = PaymentLedger::new(Arc::new(uow));

    let result = service
        .create(
            student_actor(),
            create_input(Uuid::new_v4(), Decimal::from(20), None),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn create_validates_amount_against_session_count() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());
    let course_id = course.id;
    let enrollment = test_enrollment(
        student.id,
        course.teacher_id,
        course_id,
        EnrollmentStatus::Trial,
        Utc::now() - Duration::days(1),
    );

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_live_for()
        .returning(move |_, _| Ok(Some(enrollment.clone())));

    let mut courses = MockCourseRepository::new();
    courses
        .expect_find_by_id()
        .returning(move |_| Ok(Some(course.clone())));

    let uow = TestUnitOfWork {
        enrollments: Arc::new(enrollments),
        courses: Arc::new(courses),
        ..Default::default()
    };
    let service = PaymentLedger::new(Arc::new(uow));

    // 3 sessions at 20 should cost 60, not 50
    let result = service
        .create(student, create_input(course_id, Decimal::from(50), Some(3)))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn create_guards_against_duplicate_billing() {
    let student = student_actor();
    let course = test_course(Uuid::new_v4());
    let course_id = course.id;
    let enrollment = test_enrollment(
        student.id,
        course.teacher_id,
        course_id,
        EnrollmentStatus::Trial,
        Utc::now() - Duration::days(1),
    );
    let open_payment = test_payment(&enrollment, PaymentStatus::Pending, Decimal::from(20));

    let mut enrollments = MockEnrollmentRepository::new();
    enrollments
        .expect_find_live_for()
        .returning(move |_, _| Ok(Some(enrollment.clone())));

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
    let service = PaymentLedger::new(Arc::new(uow));

    let result = service
        .create(student, create_input(course_id, Decimal::from(20), Some(1)))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn teachers_cannot_create_payments() {
    let service = PaymentLedger::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .create(
            teacher_actor(),
            create_input(Uuid::new_v4(), Decimal::from(20), None),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn update_rejects_foreign_teacher() {
    let owner_teacher = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let enrollment = test_enrollment(
        student_id,
        owner_teacher,
        Uuid::new_v4(),
        EnrollmentStatus::Trial,
        Utc::now() - Duration::days(1),
    );
    let payment = test_payment(&enrollment, PaymentStatus::Pending, Decimal::from(20));
    let payment_id = payment.id;

    let mut payments = MockPaymentRepository::new();
    payments
        .expect_find_by_id()
        .returning(move |_| Ok(Some(payment.clone())));

    let uow = TestUnitOfWork {
        payments: Arc::new(payments),
        ..Default::default()
    };
    let service = PaymentLedger::new(Arc::new(uow));

    // A different teacher than the payment's owner
    let result = service
        .update(
            teacher_actor(),
            payment_id,
            PaymentPatch {
                status: Some(PaymentStatus::Completed),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn update_unknown_payment_is_not_found() {
    let mut payments = MockPaymentRepository::new();
    payments.expect_find_by_id().returning(|_| Ok(None));

    let uow = TestUnitOfWork {
        payments: Arc::new(payments),
        ..Default::default()
    };
    let service = PaymentLedger::new(Arc::new(uow));

    let result = service
        .update(teacher_actor(), Uuid::new_v4(), PaymentPatch::default())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn admin_listing_requires_admin() {
    let service = PaymentLedger::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .admin_list(
            teacher_actor(),
            Default::default(),
            &Default::default(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}
