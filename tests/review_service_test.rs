//! Review service unit tests over mocked repositories.

mod common;

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{student_actor, teacher_actor, TestUnitOfWork};
use tutorlink::domain::{Review, TeachingProfile, User, UserRole};
use tutorlink::errors::AppError;
use tutorlink::infra::{MockReviewRepository, MockUserRepository};
use tutorlink::services::{ReviewBook, ReviewService};

fn test_user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: "user@example.com".to_string(),
        password_hash: "hashed".to_string(),
        name: "Test User".to_string(),
        role,
        profile: TeachingProfile::default(),
        rating: Decimal::ZERO,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn submit_rejects_out_of_range_rating() {
    let service = ReviewBook::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .submit(student_actor(), Uuid::new_v4(), None, 6, String::new())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn submit_rejects_non_teachers_as_targets() {
    let target = test_user(UserRole::Student);
    let target_id = target.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(target.clone())));

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        ..Default::default()
    };
    let service = ReviewBook::new(Arc::new(uow));

    let result = service
        .submit(student_actor(), target_id, None, 4, String::new())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn only_students_submit_reviews() {
    let service = ReviewBook::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .submit(teacher_actor(), Uuid::new_v4(), None, 4, String::new())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn submit_upserts_through_the_repository() {
    let student = student_actor();
    let target = test_user(UserRole::Teacher);
    let target_id = target.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(target.clone())));

    let mut reviews = MockReviewRepository::new();
    reviews.expect_upsert().returning(
        |student_id, teacher_id, course_id, rating, comment| {
            let now = Utc::now();
            Ok(Review {
                id: Uuid::new_v4(),
                student_id,
                teacher_id,
                course_id,
                rating,
                comment,
                created_at: now,
                updated_at: now,
            })
        },
    );

    let uow = TestUnitOfWork {
        users: Arc::new(users),
        reviews: Arc::new(reviews),
        ..Default::default()
    };
    let service = ReviewBook::new(Arc::new(uow));

    let review = service
        .submit(student, target_id, None, 5, "Great teacher".to_string())
        .await
        .unwrap();

    assert_eq!(review.rating, 5);
    assert_eq!(review.teacher_id, target_id);
    assert_eq!(review.student_id, student.id);
}

#[tokio::test]
async fn admin_listing_requires_admin() {
    let service = ReviewBook::new(Arc::new(TestUnitOfWork::default()));

    let result = service
        .admin_list(student_actor(), None, None, &Default::default())
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}
