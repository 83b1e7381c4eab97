//! Course repository - data access for the course catalog.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::course::{self, Entity as CourseEntity};
use crate::domain::{
    CatalogFilter, Course, CourseStatus, CourseUpdate, NewCourse, WeeklyAvailability,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Course repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find course by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>>;

    /// Find a published course by ID (catalog view)
    async fn find_published(&self, id: Uuid) -> AppResult<Option<Course>>;

    /// Find a course owned by the given teacher
    async fn find_owned(&self, id: Uuid, teacher_id: Uuid) -> AppResult<Option<Course>>;

    /// Create a new course
    async fn create(&self, new_course: NewCourse) -> AppResult<Course>;

    /// Apply a partial update to an owned course
    async fn update(&self, id: Uuid, teacher_id: Uuid, update: CourseUpdate) -> AppResult<Course>;

    /// List a teacher's courses, optionally filtered by status
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<CourseStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)>;

    /// Browse published courses with catalog filters
    async fn search_published(
        &self,
        filter: CatalogFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)>;

    /// Count a teacher's courses, optionally filtered by status
    async fn count_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<CourseStatus>,
    ) -> AppResult<u64>;

    /// Count all courses, optionally filtered by status
    async fn count_all(&self, status: Option<CourseStatus>) -> AppResult<u64>;
}

/// SeaORM-backed implementation of CourseRepository.
pub struct CourseStore {
    db: DatabaseConnection,
}

impl CourseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn catalog_condition(filter: &CatalogFilter) -> Condition {
    let mut condition =
        Condition::all().add(course::Column::Status.eq(CourseStatus::Published.as_str()));

    if let Some(search) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(course::Column::Title.contains(search))
                .add(course::Column::Description.contains(search))
                .add(course::Column::Subject.contains(search)),
        );
    }
    if let Some(subject) = &filter.subject {
        condition = condition.add(course::Column::Subject.eq(subject));
    }
    if let Some(grade_level) = &filter.grade_level {
        condition = condition.add(course::Column::GradeLevel.eq(grade_level));
    }
    if let Some(min_price) = filter.min_price {
        condition = condition.add(course::Column::PricePerSession.gte(min_price));
    }
    if let Some(max_price) = filter.max_price {
        condition = condition.add(course::Column::PricePerSession.lte(max_price));
    }

    condition
}

#[async_trait]
impl CourseRepository for CourseStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = CourseEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    async fn find_published(&self, id: Uuid) -> AppResult<Option<Course>> {
        let result = CourseEntity::find_by_id(id)
            .filter(course::Column::Status.eq(CourseStatus::Published.as_str()))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    async fn find_owned(&self, id: Uuid, teacher_id: Uuid) -> AppResult<Option<Course>> {
        let result = CourseEntity::find_by_id(id)
            .filter(course::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Course::from))
    }

    async fn create(&self, new_course: NewCourse) -> AppResult<Course> {
        let now = chrono::Utc::now();
        let active_model = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            teacher_id: Set(new_course.teacher_id),
            title: Set(new_course.title),
            subject: Set(new_course.subject),
            grade_level: Set(new_course.grade_level),
            description: Set(new_course.description),
            content: Set(new_course.content),
            price_per_session: Set(new_course.pricing.price_per_session),
            total_sessions: Set(new_course.pricing.total_sessions),
            free_trial_days: Set(new_course.pricing.free_trial_days),
            discount_percentage: Set(new_course.pricing.discount_percentage),
            has_trial: Set(new_course.pricing.has_trial),
            upfront_payment: Set(new_course.pricing.upfront_payment),
            currency: Set(new_course.pricing.currency),
            availability: Set(WeeklyAvailability {
                slots: new_course.schedule.availability,
            }),
            duration_minutes: Set(new_course.schedule.duration_minutes),
            timezone: Set(new_course.schedule.timezone),
            max_students: Set(new_course.max_students),
            current_students: Set(0),
            status: Set(new_course.status.to_string()),
            rating: Set(rust_decimal::Decimal::ZERO),
            total_ratings: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Course::from(model))
    }

    async fn update(&self, id: Uuid, teacher_id: Uuid, update: CourseUpdate) -> AppResult<Course> {
        let existing = CourseEntity::find_by_id(id)
            .filter(course::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: course::ActiveModel = existing.into();
        if let Some(title) = update.title {
            active.title = Set(title);
        }
        if let Some(subject) = update.subject {
            active.subject = Set(subject);
        }
        if let Some(grade_level) = update.grade_level {
            active.grade_level = Set(grade_level);
        }
        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(content) = update.content {
            active.content = Set(content);
        }
        if let Some(pricing) = update.pricing {
            active.price_per_session = Set(pricing.price_per_session);
            active.total_sessions = Set(pricing.total_sessions);
            active.free_trial_days = Set(pricing.free_trial_days);
            active.discount_percentage = Set(pricing.discount_percentage);
            active.has_trial = Set(pricing.has_trial);
            active.upfront_payment = Set(pricing.upfront_payment);
            active.currency = Set(pricing.currency);
        }
        if let Some(schedule) = update.schedule {
            active.availability = Set(WeeklyAvailability {
                slots: schedule.availability,
            });
            active.duration_minutes = Set(schedule.duration_minutes);
            active.timezone = Set(schedule.timezone);
        }
        if let Some(max_students) = update.max_students {
            active.max_students = Set(max_students);
        }
        if let Some(status) = update.status {
            active.status = Set(status.to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Course::from(model))
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<CourseStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)> {
        let mut condition = Condition::all().add(course::Column::TeacherId.eq(teacher_id));
        if let Some(status) = status {
            condition = condition.add(course::Column::Status.eq(status.as_str()));
        }

        let paginator = CourseEntity::find()
            .filter(condition)
            .order_by_desc(course::Column::CreatedAt)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Course::from).collect(), total))
    }

    async fn search_published(
        &self,
        filter: CatalogFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Course>, u64)> {
        let paginator = CourseEntity::find()
            .filter(catalog_condition(&filter))
            .order_by_desc(course::Column::CreatedAt)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Course::from).collect(), total))
    }

    async fn count_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<CourseStatus>,
    ) -> AppResult<u64> {
        let mut query = CourseEntity::find().filter(course::Column::TeacherId.eq(teacher_id));
        if let Some(status) = status {
            query = query.filter(course::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(Into::into)
    }

    async fn count_all(&self, status: Option<CourseStatus>) -> AppResult<u64> {
        let mut query = CourseEntity::find();
        if let Some(status) = status {
            query = query.filter(course::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(Into::into)
    }
}
