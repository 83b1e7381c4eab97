//! Session database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{
    Attendance, MeetingDetails, Session, SessionFeedback, SessionMaterials, SessionStatus,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub scheduled_at: DateTimeUtc,
    pub duration_minutes: i32,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub meeting: MeetingDetails,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub materials: SessionMaterials,
    #[sea_orm(column_type = "Text")]
    pub notes: String,
    #[sea_orm(column_type = "Text")]
    pub homework: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub attendance: Attendance,
    #[sea_orm(column_type = "JsonBinary")]
    pub feedback: SessionFeedback,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Session {
    fn from(model: Model) -> Self {
        Session {
            id: model.id,
            student_id: model.student_id,
            teacher_id: model.teacher_id,
            course_id: model.course_id,
            scheduled_at: model.scheduled_at,
            duration_minutes: model.duration_minutes,
            status: SessionStatus::from(model.status.as_str()),
            meeting: model.meeting,
            description: model.description,
            materials: model.materials,
            notes: model.notes,
            homework: model.homework,
            attendance: model.attendance,
            feedback: model.feedback,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
