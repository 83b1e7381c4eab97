//! Enrollment request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{EnrollmentRequest, RequestStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub response_message: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for EnrollmentRequest {
    fn from(model: Model) -> Self {
        EnrollmentRequest {
            id: model.id,
            student_id: model.student_id,
            teacher_id: model.teacher_id,
            course_id: model.course_id,
            message: model.message,
            status: RequestStatus::from(model.status.as_str()),
            response_message: model.response_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
