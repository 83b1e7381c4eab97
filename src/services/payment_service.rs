//! Payment service - the simulated payment ledger.
//!
//! Creation is guarded against duplicate billing inside a serializable
//! transaction. Settlement (teacher marking a payment completed) records
//! the payment on the owning enrollment and promotes it from trial to
//! active in the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    Action, Actor, CardSnapshot, EnrollmentStatus, NewPayment, Payment, PaymentFilter,
    PaymentMethod, PaymentPatch, PaymentStatus,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::IncomeParty;
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

/// Student-side payment creation input.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub course_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Decimal,
    /// Sessions the payment is expected to cover; validated against the
    /// course rate when present
    pub session_count: Option<i32>,
    pub card: Option<CardSnapshot>,
    pub proof_image: Option<String>,
    pub notes: String,
}

/// Teacher earnings roll-up.
#[derive(Debug, Clone, Serialize)]
pub struct EarningsSummary {
    pub total_earnings: Decimal,
    pub pending_payments: u64,
    pub completed_payments: u64,
    pub this_month: Decimal,
    pub last_month: Decimal,
}

/// Income attributed to one party, with its display name resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PartyIncome {
    pub id: Uuid,
    pub name: String,
    pub total: Decimal,
    pub count: i64,
}

/// Ledger totals for one status.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    pub status: String,
    pub count: i64,
    pub total: Decimal,
}

/// Admin reporting view over the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentAnalytics {
    pub total_income: Decimal,
    pub income_by_student: Vec<PartyIncome>,
    pub income_by_teacher: Vec<PartyIncome>,
    pub income_by_course: Vec<PartyIncome>,
    pub status_summary: Vec<StatusSummary>,
}

/// Payment service trait for dependency injection.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Student: open a payment for an own live enrollment
    async fn create(&self, actor: Actor, input: CreatePayment) -> AppResult<Payment>;

    /// Teacher: update a payment's status / refund fields. Marking a
    /// payment completed records it on the enrollment and promotes the
    /// enrollment from trial to active.
    async fn update(&self, actor: Actor, payment_id: Uuid, patch: PaymentPatch)
        -> AppResult<Payment>;

    /// Student: own payments, newest first
    async fn my_payments(
        &self,
        actor: Actor,
        status: Option<PaymentStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)>;

    /// Teacher: payments for own courses
    async fn teacher_payments(
        &self,
        actor: Actor,
        status: Option<PaymentStatus>,
        course_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)>;

    /// Teacher: earnings roll-up
    async fn earnings(&self, actor: Actor) -> AppResult<EarningsSummary>;

    /// Admin: filtered ledger listing
    async fn admin_list(
        &self,
        actor: Actor,
        filter: PaymentFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)>;

    /// Admin: income analytics over completed payments
    async fn analytics(
        &self,
        actor: Actor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<PaymentAnalytics>;
}

/// Concrete implementation of PaymentService using Unit of Work.
pub struct PaymentLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PaymentLedger<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn resolve_party_names(
        &self,
        party: IncomeParty,
        rows: Vec<crate::infra::repositories::IncomeRow>,
    ) -> AppResult<Vec<PartyIncome>> {
        let mut incomes = Vec::with_capacity(rows.len());
        for row in rows {
            let name = match party {
                IncomeParty::Student | IncomeParty::Teacher => self
                    .uow
                    .users()
                    .find_by_id(row.party_id)
                    .await?
                    .map(|u| u.name),
                IncomeParty::Course => self
                    .uow
                    .courses()
                    .find_by_id(row.party_id)
                    .await?
                    .map(|c| c.title),
            };

            incomes.push(PartyIncome {
                id: row.party_id,
                name: name.unwrap_or_else(|| "unknown".to_string()),
                total: row.total.unwrap_or_default(),
                count: row.count,
            });
        }
        Ok(incomes)
    }
}

/// First instant of the month containing `now`, and of the month before it.
fn month_windows(now: DateTime<Utc>) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let this_month = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::internal("Invalid month boundary"))?;

    let (year, month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    let last_month = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::internal("Invalid month boundary"))?;

    Ok((this_month, last_month))
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentLedger<U> {
    async fn create(&self, actor: Actor, input: CreatePayment) -> AppResult<Payment> {
        actor.ensure(Action::MakePayments)?;

        let enrollment = self
            .uow
            .enrollments()
            .find_live_for(actor.id, input.course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let course = self
            .uow
            .courses()
            .find_by_id(input.course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let session_count = input.session_count.unwrap_or(1);
        if session_count < 1 {
            return Err(AppError::validation("Session count must be at least 1"));
        }
        if input.session_count.is_some() {
            let expected = course.pricing.price_per_session * Decimal::from(session_count);
            if input.amount != expected {
                return Err(AppError::validation(
                    "Payment amount doesn't match expected amount",
                ));
            }
        }
        if input.amount < Decimal::ZERO {
            return Err(AppError::validation("Amount must not be negative"));
        }

        // First-pass duplicate guard; re-checked inside the transaction
        if self
            .uow
            .payments()
            .find_blocking_for_enrollment(enrollment.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Payment already exists for this course"));
        }

        // Only keep the payload matching the method: last-4 card snapshot
        // for card methods, proof image for offline methods
        let card = input.card.filter(|_| input.method.is_card());
        let proof_image = input.proof_image.filter(|_| input.method.is_offline());

        let now = Utc::now();
        let new_payment = NewPayment {
            enrollment_id: enrollment.id,
            student_id: actor.id,
            teacher_id: enrollment.teacher_id,
            course_id: input.course_id,
            amount: input.amount,
            currency: course.pricing.currency.clone(),
            method: input.method,
            session_count,
            card,
            proof_image,
            trial_expired: enrollment.trial_expired(now),
            notes: input.notes,
        };

        let enrollment_id = enrollment.id;
        let payment = self
            .uow
            .transaction_serializable(|ctx| {
                Box::pin(async move {
                    if ctx
                        .payments()
                        .find_blocking_for_enrollment(enrollment_id)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict(
                            "Payment already exists for this course",
                        ));
                    }

                    ctx.payments().create(new_payment).await
                })
            })
            .await?;

        tracing::info!(payment_id = %payment.id, %enrollment_id, "Payment created");

        Ok(payment)
    }

    async fn update(
        &self,
        actor: Actor,
        payment_id: Uuid,
        patch: PaymentPatch,
    ) -> AppResult<Payment> {
        actor.ensure(Action::SettlePayments)?;

        let payment = self
            .uow
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        actor.ensure_owner(payment.teacher_id)?;

        let settling = patch.status == Some(PaymentStatus::Completed)
            && payment.status != PaymentStatus::Completed;

        let updated = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    let updated = ctx.payments().apply(payment_id, patch).await?;

                    if settling {
                        let enrollment = ctx
                            .enrollments()
                            .find_by_id(updated.enrollment_id)
                            .await?
                            .ok_or(AppError::NotFound)?;

                        ctx.enrollments()
                            .record_payment(enrollment.id, updated.amount, updated.session_count)
                            .await?;

                        // A settled payment ends the trial: promote to active
                        if enrollment.status == EnrollmentStatus::Trial {
                            ctx.enrollments()
                                .set_status(enrollment.id, EnrollmentStatus::Active)
                                .await?;
                        }
                    }

                    Ok(updated)
                })
            })
            .await?;

        if settling {
            tracing::info!(
                payment_id = %updated.id,
                enrollment_id = %updated.enrollment_id,
                "Payment settled, enrollment promoted"
            );
        }

        Ok(updated)
    }

    async fn my_payments(
        &self,
        actor: Actor,
        status: Option<PaymentStatus>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        let filter = PaymentFilter {
            student_id: Some(actor.id),
            status,
            ..Default::default()
        };
        self.uow.payments().list_filtered(filter, pagination).await
    }

    async fn teacher_payments(
        &self,
        actor: Actor,
        status: Option<PaymentStatus>,
        course_id: Option<Uuid>,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        actor.ensure(Action::SettlePayments)?;

        let filter = PaymentFilter {
            teacher_id: Some(actor.id),
            status,
            course_id,
            ..Default::default()
        };
        self.uow.payments().list_filtered(filter, pagination).await
    }

    async fn earnings(&self, actor: Actor) -> AppResult<EarningsSummary> {
        actor.ensure(Action::SettlePayments)?;

        let completed = |from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>| PaymentFilter {
            teacher_id: Some(actor.id),
            status: Some(PaymentStatus::Completed),
            from,
            to,
            ..Default::default()
        };

        let (this_month_start, last_month_start) = month_windows(Utc::now())?;

        let total_earnings = self.uow.payments().sum_amount(completed(None, None)).await?;
        let this_month = self
            .uow
            .payments()
            .sum_amount(completed(Some(this_month_start), None))
            .await?;
        let last_month = self
            .uow
            .payments()
            .sum_amount(completed(Some(last_month_start), Some(this_month_start)))
            .await?;

        let pending_payments = self
            .uow
            .payments()
            .count_with(PaymentFilter {
                teacher_id: Some(actor.id),
                status: Some(PaymentStatus::Pending),
                ..Default::default()
            })
            .await?;
        let completed_payments = self
            .uow
            .payments()
            .count_with(completed(None, None))
            .await?;

        Ok(EarningsSummary {
            total_earnings,
            pending_payments,
            completed_payments,
            this_month,
            last_month,
        })
    }

    async fn admin_list(
        &self,
        actor: Actor,
        filter: PaymentFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<Payment>, u64)> {
        actor.ensure(Action::Administer)?;
        self.uow.payments().list_filtered(filter, pagination).await
    }

    async fn analytics(
        &self,
        actor: Actor,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<PaymentAnalytics> {
        actor.ensure(Action::Administer)?;

        let completed = PaymentFilter {
            status: Some(PaymentStatus::Completed),
            from,
            to,
            ..Default::default()
        };
        let any_status = PaymentFilter {
            from,
            to,
            ..Default::default()
        };

        let total_income = self.uow.payments().sum_amount(completed.clone()).await?;

        let by_student = self
            .uow
            .payments()
            .income_by_party(IncomeParty::Student, completed.clone())
            .await?;
        let by_teacher = self
            .uow
            .payments()
            .income_by_party(IncomeParty::Teacher, completed.clone())
            .await?;
        let by_course = self
            .uow
            .payments()
            .income_by_party(IncomeParty::Course, completed)
            .await?;

        let status_rows = self.uow.payments().status_breakdown(any_status).await?;

        Ok(PaymentAnalytics {
            total_income,
            income_by_student: self
                .resolve_party_names(IncomeParty::Student, by_student)
                .await?,
            income_by_teacher: self
                .resolve_party_names(IncomeParty::Teacher, by_teacher)
                .await?,
            income_by_course: self
                .resolve_party_names(IncomeParty::Course, by_course)
                .await?,
            status_summary: status_rows
                .into_iter()
                .map(|row| StatusSummary {
                    status: row.status,
                    count: row.count,
                    total: row.total.unwrap_or_default(),
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_windows_rolls_over_january() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let (this_month, last_month) = month_windows(now).unwrap();
        assert_eq!(this_month, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(last_month, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_windows_mid_year() {
        let now = Utc.with_ymd_and_hms(2025, 8, 6, 9, 30, 0).unwrap();
        let (this_month, last_month) = month_windows(now).unwrap();
        assert_eq!(this_month, Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap());
        assert_eq!(last_month, Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap());
    }
}
