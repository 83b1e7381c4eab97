//! Review domain entity: one review per (student, teacher, course),
//! with upsert semantics on re-submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Review domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    /// None reviews the teacher overall rather than a specific course.
    pub course_id: Option<Uuid>,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate rating summary for a teacher.
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct ReviewSummary {
    pub average: f64,
    pub count: u64,
}
