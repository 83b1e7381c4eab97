//! Payment database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{CardSnapshot, Payment, PaymentMethod, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub method: String,
    pub status: String,
    pub session_count: i32,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub card: Option<CardSnapshot>,
    /// Base64 proof image for offline methods
    #[sea_orm(column_type = "Text", nullable)]
    pub proof_image: Option<String>,
    pub proof_uploaded_at: Option<DateTimeUtc>,
    #[sea_orm(unique, nullable)]
    pub transaction_id: Option<String>,
    pub payment_date: DateTimeUtc,
    pub trial_expired: bool,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    pub refund_amount: Decimal,
    pub refund_date: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub refund_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Payment {
            id: model.id,
            enrollment_id: model.enrollment_id,
            student_id: model.student_id,
            teacher_id: model.teacher_id,
            course_id: model.course_id,
            amount: model.amount,
            currency: model.currency,
            method: PaymentMethod::from(model.method.as_str()),
            status: PaymentStatus::from(model.status.as_str()),
            session_count: model.session_count,
            card: model.card,
            proof_image: model.proof_image,
            proof_uploaded_at: model.proof_uploaded_at,
            transaction_id: model.transaction_id,
            payment_date: model.payment_date,
            trial_expired: model.trial_expired,
            notes: model.notes,
            refund_amount: model.refund_amount,
            refund_date: model.refund_date,
            refund_reason: model.refund_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
