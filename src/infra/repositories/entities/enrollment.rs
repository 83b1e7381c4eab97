//! Enrollment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Enrollment, EnrollmentStatus, PaymentHistory, PaymentState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub enrolled_at: DateTimeUtc,
    pub trial_ends_at: DateTimeUtc,
    pub status: String,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub sessions_completed: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub payment_history: PaymentHistory,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Enrollment {
    fn from(model: Model) -> Self {
        Enrollment {
            id: model.id,
            student_id: model.student_id,
            teacher_id: model.teacher_id,
            course_id: model.course_id,
            enrolled_at: model.enrolled_at,
            trial_ends_at: model.trial_ends_at,
            status: EnrollmentStatus::from(model.status.as_str()),
            payment: PaymentState {
                total_amount: model.total_amount,
                paid_amount: model.paid_amount,
                sessions_completed: model.sessions_completed,
                history: model.payment_history,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
