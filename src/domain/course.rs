//! Course domain entity: a teacher-authored offering with pricing,
//! schedule, and enrollment capacity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Course lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }
}

impl From<&str> for CourseStatus {
    fn from(s: &str) -> Self {
        match s {
            "published" => CourseStatus::Published,
            "archived" => CourseStatus::Archived,
            _ => CourseStatus::Draft,
        }
    }
}

impl std::fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free-form course description blocks, stored as a JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct CourseContent {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub curriculum: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
}

/// A weekly availability window ("monday", "16:00", "18:00").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AvailabilitySlot {
    pub day: String,
    pub start: String,
    pub end: String,
}

/// Weekly availability, stored as a JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct WeeklyAvailability {
    #[serde(default)]
    pub slots: Vec<AvailabilitySlot>,
}

/// Pricing policy for a course.
///
/// `upfront_payment` demands payment while still in trial;
/// `free_trial_days == 0` makes an enrollment immediately due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CoursePricing {
    #[schema(value_type = String, example = "20")]
    pub price_per_session: Decimal,
    pub total_sessions: i32,
    pub free_trial_days: i32,
    pub discount_percentage: i32,
    pub has_trial: bool,
    pub upfront_payment: bool,
    pub currency: String,
}

impl CoursePricing {
    /// Full course price: per-session rate times the number of sessions sold.
    pub fn total_amount(&self) -> Decimal {
        self.price_per_session * Decimal::from(self.total_sessions)
    }
}

/// Meeting cadence and timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CourseSchedule {
    pub availability: Vec<AvailabilitySlot>,
    pub duration_minutes: i32,
    pub timezone: String,
}

/// Enrollment capacity. `current_students` counts non-terminal
/// (trial or active) enrollments and is maintained transactionally
/// alongside enrollment writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CourseCapacity {
    pub max_students: i32,
    pub current_students: i32,
}

impl CourseCapacity {
    pub fn available_slots(&self) -> i32 {
        (self.max_students - self.current_students).max(0)
    }
}

/// Course domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub description: String,
    pub content: CourseContent,
    pub pricing: CoursePricing,
    pub schedule: CourseSchedule,
    pub capacity: CourseCapacity,
    pub status: CourseStatus,
    pub rating: Decimal,
    pub total_ratings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    pub fn is_owned_by(&self, teacher_id: Uuid) -> bool {
        self.teacher_id == teacher_id
    }
}

/// Fields required to create a course.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub teacher_id: Uuid,
    pub title: String,
    pub subject: String,
    pub grade_level: String,
    pub description: String,
    pub content: CourseContent,
    pub pricing: CoursePricing,
    pub schedule: CourseSchedule,
    pub max_students: i32,
    pub status: CourseStatus,
}

/// Partial course update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub description: Option<String>,
    pub content: Option<CourseContent>,
    pub pricing: Option<CoursePricing>,
    pub schedule: Option<CourseSchedule>,
    pub max_students: Option<i32>,
    pub status: Option<CourseStatus>,
}

/// Catalog browse filters (published courses only).
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_amount_multiplies_rate_by_sessions() {
        let pricing = CoursePricing {
            price_per_session: Decimal::from(20),
            total_sessions: 8,
            free_trial_days: 3,
            discount_percentage: 0,
            has_trial: true,
            upfront_payment: false,
            currency: "USD".to_string(),
        };
        assert_eq!(pricing.total_amount(), Decimal::from(160));
    }

    #[test]
    fn available_slots_never_negative() {
        let capacity = CourseCapacity {
            max_students: 2,
            current_students: 5,
        };
        assert_eq!(capacity.available_slots(), 0);
    }
}
