//! Payment domain entity - the simulated payment ledger.
//!
//! Payments reference their enrollment directly rather than being matched
//! by (student, course) at read time. Card entries keep only a last-4
//! snapshot; offline methods carry an uploaded proof image instead.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Payment ledger status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and completed payments block another payment for the
    /// same enrollment (duplicate-billing guard).
    pub fn blocks_duplicate(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Completed)
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        match s {
            "completed" => PaymentStatus::Completed,
            "failed" => PaymentStatus::Failed,
            "refunded" => PaymentStatus::Refunded,
            "cancelled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Pending,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported (simulated) payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Cash => "cash",
        }
    }

    /// Card methods capture a last-4 snapshot; offline methods capture
    /// an uploaded proof image.
    pub fn is_card(&self) -> bool {
        matches!(self, PaymentMethod::CreditCard | PaymentMethod::DebitCard)
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, PaymentMethod::BankTransfer | PaymentMethod::Cash)
    }
}

impl From<&str> for PaymentMethod {
    fn from(s: &str) -> Self {
        match s {
            "credit_card" => PaymentMethod::CreditCard,
            "debit_card" => PaymentMethod::DebitCard,
            "paypal" => PaymentMethod::Paypal,
            "bank_transfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Cash,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sanitised card details for simulated card payments.
/// Never holds a full PAN or CVV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct CardSnapshot {
    #[serde(default)]
    pub holder_name: String,
    #[serde(default)]
    pub last4: String,
    #[serde(default)]
    pub brand: String,
    pub expiry_month: Option<i32>,
    pub expiry_year: Option<i32>,
}

/// Payment domain entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// How many sessions this payment buys; recorded on the enrollment
    /// when the payment settles.
    pub session_count: i32,
    pub card: Option<CardSnapshot>,
    pub proof_image: Option<String>,
    pub proof_uploaded_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub trial_expired: bool,
    pub notes: String,
    pub refund_amount: Decimal,
    pub refund_date: Option<DateTime<Utc>>,
    pub refund_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn is_owned_by_teacher(&self, teacher_id: Uuid) -> bool {
        self.teacher_id == teacher_id
    }
}

/// Fields required to open a payment against an enrollment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub course_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub method: PaymentMethod,
    pub session_count: i32,
    pub card: Option<CardSnapshot>,
    pub proof_image: Option<String>,
    pub trial_expired: bool,
    pub notes: String,
}

/// Teacher-side payment update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PaymentPatch {
    pub status: Option<PaymentStatus>,
    pub refund_amount: Option<Decimal>,
    pub refund_reason: Option<String>,
    pub notes: Option<String>,
}

/// Admin ledger filters.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    pub status: Option<PaymentStatus>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_and_completed_block_duplicates() {
        assert!(PaymentStatus::Pending.blocks_duplicate());
        assert!(PaymentStatus::Completed.blocks_duplicate());
        assert!(!PaymentStatus::Failed.blocks_duplicate());
        assert!(!PaymentStatus::Refunded.blocks_duplicate());
        assert!(!PaymentStatus::Cancelled.blocks_duplicate());
    }

    #[test]
    fn method_classification() {
        assert!(PaymentMethod::CreditCard.is_card());
        assert!(PaymentMethod::DebitCard.is_card());
        assert!(PaymentMethod::BankTransfer.is_offline());
        assert!(PaymentMethod::Cash.is_offline());
        assert!(!PaymentMethod::Paypal.is_card());
        assert!(!PaymentMethod::Paypal.is_offline());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
            PaymentStatus::Cancelled,
        ] {
            assert_eq!(PaymentStatus::from(status.as_str()), status);
        }
    }
}
