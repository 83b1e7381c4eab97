//! Payment repository - read-side data access and reporting for the
//! payment ledger. Ledger writes happen through the unit of work.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::payment::{self, Entity as PaymentEntity};
use crate::domain::{Payment, PaymentFilter, PaymentStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Aggregated income attributed to one party (student/teacher/course).
#[derive(Debug, Clone, FromQueryResult)]
pub struct IncomeRow {
    pub party_id: Uuid,
    pub total: Option<Decimal>,
    pub count: i64,
}

/// Ledger totals per payment status.
#[derive(Debug, Clone, FromQueryResult)]
pub struct StatusTotalRow {
    pub status: String,
    pub count: i64,
    pub total: Option<Decimal>,
}

/// Which party an income aggregation groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeParty {
    Student,
    Teacher,
    Course,
}

pub(crate) fn filter_condition(filter: &PaymentFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(status) = filter.status {
        condition = condition.add(payment::Column::Status.eq(status.as_str()));
    }
    if let Some(student_id) = filter.student_id {
        condition = condition.add(payment::Column::StudentId.eq(student_id));
    }
    if let Some(teacher_id) = filter.teacher_id {
        condition = condition.add(payment::Column::TeacherId.eq(teacher_id));
    }
    if let Some(course_id) = filter.course_id {
        condition = condition.add(payment::Column::CourseId.eq(course_id));
    }
    if let Some(from) = filter.from {
        condition = condition.add(payment::Column::PaymentDate.gte(from));
    }
    if let Some(to) = filter.to {
        condition = condition.add(payment::Column::PaymentDate.lte(to));
    }
    condition
}

/// Payment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find payment by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>>;

    /// Find the pending/completed payment blocking duplicates for an enrollment
    async fn find_blocking_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> AppResult<Option<Payment>>;

    /// List payments matching the filter, newest first, paginated
    async fn list_filtered(
        &self,
        filter: PaymentFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)>;

    /// Sum of amounts over matching payments
    async fn sum_amount(&self, filter: PaymentFilter) -> AppResult<Decimal>;

    /// Count matching payments
    async fn count_with(&self, filter: PaymentFilter) -> AppResult<u64>;

    /// Income grouped by the chosen party, largest first
    async fn income_by_party(
        &self,
        party: IncomeParty,
        filter: PaymentFilter,
    ) -> AppResult<Vec<IncomeRow>>;

    /// Count and total per ledger status
    async fn status_breakdown(&self, filter: PaymentFilter) -> AppResult<Vec<StatusTotalRow>>;
}

/// SeaORM-backed implementation of PaymentRepository.
pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        let result = PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Payment::from))
    }

    async fn find_blocking_for_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> AppResult<Option<Payment>> {
        let result = PaymentEntity::find()
            .filter(payment::Column::EnrollmentId.eq(enrollment_id))
            .filter(
                Condition::any()
                    .add(payment::Column::Status.eq(PaymentStatus::Pending.as_str()))
                    .add(payment::Column::Status.eq(PaymentStatus::Completed.as_str())),
            )
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Payment::from))
    }

    async fn list_filtered(
        &self,
        filter: PaymentFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        let paginator = PaymentEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(payment::Column::PaymentDate)
            .paginate(&self.db, pagination.limit());

        let total = paginator.num_items().await?;
        let models = paginator
            .fetch_page(pagination.page.saturating_sub(1))
            .await?;

        Ok((models.into_iter().map(Payment::from).collect(), total))
    }

    async fn sum_amount(&self, filter: PaymentFilter) -> AppResult<Decimal> {
        let total: Option<Option<Decimal>> = PaymentEntity::find()
            .select_only()
            .column_as(payment::Column::Amount.sum(), "total")
            .filter(filter_condition(&filter))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(total.flatten().unwrap_or_default())
    }

    async fn count_with(&self, filter: PaymentFilter) -> AppResult<u64> {
        PaymentEntity::find()
            .filter(filter_condition(&filter))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn income_by_party(
        &self,
        party: IncomeParty,
        filter: PaymentFilter,
    ) -> AppResult<Vec<IncomeRow>> {
        let party_column = match party {
            IncomeParty::Student => payment::Column::StudentId,
            IncomeParty::Teacher => payment::Column::TeacherId,
            IncomeParty::Course => payment::Column::CourseId,
        };

        let mut rows: Vec<IncomeRow> = PaymentEntity::find()
            .select_only()
            .column_as(party_column, "party_id")
            .column_as(payment::Column::Amount.sum(), "total")
            .column_as(payment::Column::Id.count(), "count")
            .filter(filter_condition(&filter))
            .group_by(party_column)
            .into_model()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        rows.sort_by(|a, b| b.total.unwrap_or_default().cmp(&a.total.unwrap_or_default()));

        Ok(rows)
    }

    async fn status_breakdown(&self, filter: PaymentFilter) -> AppResult<Vec<StatusTotalRow>> {
        let rows = PaymentEntity::find()
            .select_only()
            .column(payment::Column::Status)
            .column_as(payment::Column::Id.count(), "count")
            .column_as(payment::Column::Amount.sum(), "total")
            .filter(filter_condition(&filter))
            .group_by(payment::Column::Status)
            .into_model()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows)
    }
}
