//! Review service - teacher reputation.
//!
//! One review per (student, teacher, course); re-submitting updates the
//! existing review.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{MAX_REVIEW_RATING, MIN_REVIEW_RATING};
use crate::domain::{Action, Actor, Review, ReviewSummary};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Student: submit or update a review for a teacher
    async fn submit(
        &self,
        actor: Actor,
        teacher_id: Uuid,
        course_id: Option<Uuid>,
        rating: i16,
        comment: String,
    ) -> AppResult<Review>;

    /// Public: a teacher's reviews with their aggregate summary
    async fn teacher_reviews(
        &self,
        teacher_id: Uuid,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64, ReviewSummary)>;

    /// Admin: list reviews with optional party filters
    async fn admin_list(
        &self,
        actor: Actor,
        teacher_id: Option<Uuid>,
        student_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)>;
}

/// Concrete implementation of ReviewService using Unit of Work.
pub struct ReviewBook<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReviewBook<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ReviewService for ReviewBook<U> {
    async fn submit(
        &self,
        actor: Actor,
        teacher_id: Uuid,
        course_id: Option<Uuid>,
        rating: i16,
        comment: String,
    ) -> AppResult<Review> {
        actor.ensure(Action::SubmitReviews)?;

        if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        let teacher = self
            .uow
            .users()
            .find_by_id(teacher_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !teacher.is_teacher() {
            return Err(AppError::NotFound);
        }

        self.uow
            .reviews()
            .upsert(actor.id, teacher_id, course_id, rating, comment)
            .await
    }

    async fn teacher_reviews(
        &self,
        teacher_id: Uuid,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64, ReviewSummary)> {
        let (reviews, total) = self
            .uow
            .reviews()
            .list_for_teacher(teacher_id, pagination)
            .await?;
        let summary = self.uow.reviews().summary_for_teacher(teacher_id).await?;

        Ok((reviews, total, summary))
    }

    async fn admin_list(
        &self,
        actor: Actor,
        teacher_id: Option<Uuid>,
        student_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        actor.ensure(Action::Administer)?;
        self.uow
            .reviews()
            .list_filtered(teacher_id, student_id, pagination)
            .await
    }
}
