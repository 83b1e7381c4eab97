//! Enrollment request repository - data access for the request ledger.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::request::{self, Entity as RequestEntity};
use crate::domain::{EnrollmentRequest, NewRequest, RequestStatus};
use crate::errors::{AppError, AppResult};

/// Request repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Find request by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EnrollmentRequest>>;

    /// Find a request addressed to the given teacher
    async fn find_owned(&self, id: Uuid, teacher_id: Uuid)
        -> AppResult<Option<EnrollmentRequest>>;

    /// Whether a non-rejected request already exists for (student, course)
    async fn has_open_request(&self, student_id: Uuid, course_id: Uuid) -> AppResult<bool>;

    /// Create a new pending request
    async fn create(&self, new_request: NewRequest) -> AppResult<EnrollmentRequest>;

    /// List a student's requests, newest first
    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<EnrollmentRequest>>;

    /// List a teacher's incoming requests, optionally filtered by status
    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<RequestStatus>,
    ) -> AppResult<Vec<EnrollmentRequest>>;

    /// Count a student's requests, optionally filtered by status
    async fn count_for_student(
        &self,
        student_id: Uuid,
        status: Option<RequestStatus>,
    ) -> AppResult<u64>;

    /// Count a teacher's requests, optionally filtered by status
    async fn count_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<RequestStatus>,
    ) -> AppResult<u64>;
}

/// SeaORM-backed implementation of RequestRepository.
pub struct RequestStore {
    db: DatabaseConnection,
}

impl RequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequestRepository for RequestStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EnrollmentRequest>> {
        let result = RequestEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(EnrollmentRequest::from))
    }

    async fn find_owned(
        &self,
        id: Uuid,
        teacher_id: Uuid,
    ) -> AppResult<Option<EnrollmentRequest>> {
        let result = RequestEntity::find_by_id(id)
            .filter(request::Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(EnrollmentRequest::from))
    }

    async fn has_open_request(&self, student_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        let count = RequestEntity::find()
            .filter(request::Column::StudentId.eq(student_id))
            .filter(request::Column::CourseId.eq(course_id))
            .filter(request::Column::Status.ne(RequestStatus::Rejected.as_str()))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, new_request: NewRequest) -> AppResult<EnrollmentRequest> {
        let now = chrono::Utc::now();
        let active_model = request::ActiveModel {
            id: Set(Uuid::new_v4()),
            student_id: Set(new_request.student_id),
            teacher_id: Set(new_request.teacher_id),
            course_id: Set(new_request.course_id),
            message: Set(new_request.message),
            status: Set(RequestStatus::Pending.to_string()),
            response_message: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(EnrollmentRequest::from(model))
    }

    async fn list_for_student(&self, student_id: Uuid) -> AppResult<Vec<EnrollmentRequest>> {
        let models = RequestEntity::find()
            .filter(request::Column::StudentId.eq(student_id))
            .order_by_desc(request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(EnrollmentRequest::from).collect())
    }

    async fn list_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<RequestStatus>,
    ) -> AppResult<Vec<EnrollmentRequest>> {
        let mut query = RequestEntity::find().filter(request::Column::TeacherId.eq(teacher_id));
        if let Some(status) = status {
            query = query.filter(request::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_desc(request::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(EnrollmentRequest::from).collect())
    }

    async fn count_for_student(
        &self,
        student_id: Uuid,
        status: Option<RequestStatus>,
    ) -> AppResult<u64> {
        let mut query = RequestEntity::find().filter(request::Column::StudentId.eq(student_id));
        if let Some(status) = status {
            query = query.filter(request::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(Into::into)
    }

    async fn count_for_teacher(
        &self,
        teacher_id: Uuid,
        status: Option<RequestStatus>,
    ) -> AppResult<u64> {
        let mut query = RequestEntity::find().filter(request::Column::TeacherId.eq(teacher_id));
        if let Some(status) = status {
            query = query.filter(request::Column::Status.eq(status.as_str()));
        }
        query.count(&self.db).await.map_err(Into::into)
    }
}
