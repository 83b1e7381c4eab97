//! Review repository - data access for teacher reviews.
//!
//! Re-submitting a review for the same (student, teacher, course) triple
//! updates the existing row rather than inserting a duplicate.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::review::{self, Entity as ReviewEntity};
use crate::domain::{Review, ReviewSummary};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Review repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert or update the review for (student, teacher, course)
    async fn upsert(
        &self,
        student_id: Uuid,
        teacher_id: Uuid,
        course_id: Option<Uuid>,
        rating: i16,
        comment: String,
    ) -> AppResult<Review>;

    /// List a teacher's reviews, newest first, paginated
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)>;

    /// Average rating and review count for a teacher
    async fn summary_for_teacher(&self, teacher_id: Uuid) -> AppResult<ReviewSummary>;

    /// Admin listing with optional party filters
    async fn list_filtered(
        &self,
        teacher_id: Option<Uuid>,
        student_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)>;
}

/// SeaORM-backed implementation of ReviewRepository.
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn upsert(
        &self,
        student_id: Uuid,
        teacher_id: Uuid,
        course_id: Option<Uuid>,
        rating: i16,
        comment: String,
    ) -> AppResult<Review> {
        let mut query = ReviewEntity::find()
            .filter(review::Column::StudentId.eq(student_id))
            .filter(review::Column::TeacherId.eq(teacher_id));
        query = match course_id {
            Some(course_id) => query.filter(review::Column::CourseId.eq(course_id)),
            None => query.filter(review::Column::CourseId.is_null()),
        };

        let existing = query.one(&self.db).await.map_err(AppError::from)?;
        let now = chrono::Utc::now();

        let model = match existing {
            Some(model) => {
                let mut active: review::ActiveModel = model.into();
                active.rating = Set(rating);
                active.comment = Set(comment);
                active.updated_at = Set(now);
                active.update(&self.db).await.map_err(AppError::from)?
            }
            None => {
                let active = review::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    student_id: Set(student_id),
                    teacher_id: Set(teacher_id),
                    course_id: Set(course_id),
                    rating: Set(rating),
                    comment: Set(comment),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                active.insert(&self.db).await.map_err(AppError::from)?
            }
        };

        Ok(Review::from(model))
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        let paginator = ReviewEntity::find()
            .filter(review::Column::TeacherId.eq(teacher_id))
            .order_by_desc(review::Column::CreatedAt)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Review::from).collect(), total))
    }

    async fn summary_for_teacher(&self, teacher_id: Uuid) -> AppResult<ReviewSummary> {
        // SUM over a smallint column comes back as a bigint
        let row: Option<(Option<i64>, i64)> = ReviewEntity::find()
            .select_only()
            .column_as(review::Column::Rating.sum(), "total")
            .column_as(review::Column::Id.count(), "count")
            .filter(review::Column::TeacherId.eq(teacher_id))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let (total, count) = row.unwrap_or((None, 0));
        let average = if count > 0 {
            total.unwrap_or(0) as f64 / count as f64
        } else {
            0.0
        };

        Ok(ReviewSummary {
            average,
            count: count.max(0) as u64,
        })
    }

    async fn list_filtered(
        &self,
        teacher_id: Option<Uuid>,
        student_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Review>, u64)> {
        let mut query = ReviewEntity::find();
        if let Some(teacher_id) = teacher_id {
            query = query.filter(review::Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = student_id {
            query = query.filter(review::Column::StudentId.eq(student_id));
        }

        let paginator = query
            .order_by_desc(review::Column::CreatedAt)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Review::from).collect(), total))
    }
}
