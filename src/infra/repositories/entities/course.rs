//! Course database entity for SeaORM.
//!
//! The Mongo original embedded pricing/schedule/capacity sub-documents;
//! here scalar fields become columns and free-form blocks become JSON.

use sea_orm::entity::prelude::*;

use crate::domain::{
    Course, CourseCapacity, CourseContent, CoursePricing, CourseSchedule, CourseStatus,
    WeeklyAvailability,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub content: CourseContent,
    pub price_per_session: Decimal,
    pub total_sessions: i32,
    pub free_trial_days: i32,
    pub discount_percentage: i32,
    pub has_trial: bool,
    pub upfront_payment: bool,
    pub currency: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub availability: WeeklyAvailability,
    pub duration_minutes: i32,
    pub timezone: String,
    pub max_students: i32,
    pub current_students: i32,
    pub status: String,
    pub rating: Decimal,
    pub total_ratings: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Course {
    fn from(model: Model) -> Self {
        Course {
            id: model.id,
            teacher_id: model.teacher_id,
            title: model.title,
            subject: model.subject,
            grade_level: model.grade_level,
            description: model.description,
            content: model.content,
            pricing: CoursePricing {
                price_per_session: model.price_per_session,
                total_sessions: model.total_sessions,
                free_trial_days: model.free_trial_days,
                discount_percentage: model.discount_percentage,
                has_trial: model.has_trial,
                upfront_payment: model.upfront_payment,
                currency: model.currency,
            },
            schedule: CourseSchedule {
                availability: model.availability.slots,
                duration_minutes: model.duration_minutes,
                timezone: model.timezone,
            },
            capacity: CourseCapacity {
                max_students: model.max_students,
                current_students: model.current_students,
            },
            status: CourseStatus::from(model.status.as_str()),
            rating: model.rating,
            total_ratings: model.total_ratings,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
