//! Payment ledger handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    CardSnapshot, Payment, PaymentFilter, PaymentMethod, PaymentPatch, PaymentStatus,
};
use crate::errors::AppResult;
use crate::services::{CreatePayment, EarningsSummary, PaymentAnalytics};
use crate::types::{Created, Paginated, PaginationParams};

/// Card details accepted from the client. Only a sanitised snapshot is
/// persisted; a full PAN or CVV is never accepted.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CardBody {
    #[serde(default)]
    pub holder_name: String,
    #[validate(length(min = 4, max = 4, message = "Card last4 must be 4 digits"))]
    pub last4: String,
    #[serde(default)]
    pub brand: String,
    #[validate(range(min = 1, max = 12, message = "Expiry month must be 1-12"))]
    pub expiry_month: Option<i32>,
    pub expiry_year: Option<i32>,
}

impl From<CardBody> for CardSnapshot {
    fn from(body: CardBody) -> Self {
        CardSnapshot {
            holder_name: body.holder_name,
            last4: body.last4,
            brand: body.brand,
            expiry_month: body.expiry_month,
            expiry_year: body.expiry_year,
        }
    }
}

/// Payment creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentRequest {
    pub course_id: Uuid,
    /// credit_card, debit_card, paypal, bank_transfer, or cash
    pub payment_method: PaymentMethod,
    #[schema(value_type = String, example = "20")]
    pub amount: Decimal,
    /// Sessions the payment covers; validated against the course rate
    #[validate(range(min = 1, message = "Session count must be at least 1"))]
    pub session_count: Option<i32>,
    #[validate(nested)]
    pub card: Option<CardBody>,
    /// Base64 proof image for offline methods
    pub proof_image: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Teacher-side payment update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentRequest {
    /// pending, completed, failed, refunded, or cancelled
    pub payment_status: Option<PaymentStatus>,
    #[schema(value_type = Option<String>, example = "20")]
    pub refund_amount: Option<Decimal>,
    #[validate(length(max = 2000, message = "Refund reason is too long"))]
    pub refund_reason: Option<String>,
    pub notes: Option<String>,
}

/// Status filter for payment listings
#[derive(Debug, Deserialize)]
pub struct PaymentListQuery {
    pub status: Option<PaymentStatus>,
    pub course_id: Option<Uuid>,
}

/// Admin ledger filters
#[derive(Debug, Deserialize)]
pub struct AdminPaymentQuery {
    pub status: Option<PaymentStatus>,
    pub student_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub course_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Date window for analytics
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/mine", get(my_payments))
        .route("/teacher", get(teacher_payments))
        .route("/teacher/earnings", get(teacher_earnings))
        .route("/:id", put(update_payment))
        .route("/admin/all", get(admin_payments))
        .route("/admin/analytics", get(admin_analytics))
}

/// Student: create a payment for an own enrollment
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, description = "Amount mismatch or invalid input"),
        (status = 404, description = "No live enrollment for the course"),
        (status = 409, description = "Payment already exists")
    )
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreatePaymentRequest>,
) -> AppResult<Created<Payment>> {
    let payment = state
        .payment_service
        .create(
            current.actor(),
            CreatePayment {
                course_id: payload.course_id,
                method: payload.payment_method,
                amount: payload.amount,
                session_count: payload.session_count,
                card: payload.card.map(CardSnapshot::from),
                proof_image: payload.proof_image,
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Created(payment))
}

/// Student: own payments
#[utoipa::path(
    get,
    path = "/payments/mine",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own payments, newest first"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_payments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PaymentListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Payment>>> {
    let (payments, total) = state
        .payment_service
        .my_payments(current.actor(), query.status, &pagination)
        .await?;

    Ok(Json(Paginated::new(
        payments,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Teacher: payments for own courses
#[utoipa::path(
    get,
    path = "/payments/teacher",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payments for own courses"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn teacher_payments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PaymentListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Payment>>> {
    let (payments, total) = state
        .payment_service
        .teacher_payments(current.actor(), query.status, query.course_id, &pagination)
        .await?;

    Ok(Json(Paginated::new(
        payments,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Teacher: earnings roll-up
#[utoipa::path(
    get,
    path = "/payments/teacher/earnings",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Earnings summary"),
        (status = 403, description = "Not a teacher")
    )
)]
pub async fn teacher_earnings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<EarningsSummary>> {
    let earnings = state.payment_service.earnings(current.actor()).await?;
    Ok(Json(earnings))
}

/// Teacher: update a payment's status / refund fields. Marking it
/// completed promotes the enrollment from trial to active.
#[utoipa::path(
    put,
    path = "/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = UpdatePaymentRequest,
    responses(
        (status = 200, description = "Payment updated", body = Payment),
        (status = 403, description = "Not the payment's teacher"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn update_payment(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePaymentRequest>,
) -> AppResult<Json<Payment>> {
    let patch = PaymentPatch {
        status: payload.payment_status,
        refund_amount: payload.refund_amount,
        refund_reason: payload.refund_reason,
        notes: payload.notes,
    };

    let payment = state
        .payment_service
        .update(current.actor(), id, patch)
        .await?;

    Ok(Json(payment))
}

/// Admin: filtered ledger listing
#[utoipa::path(
    get,
    path = "/payments/admin/all",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ledger listing"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn admin_payments(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<AdminPaymentQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Payment>>> {
    let filter = PaymentFilter {
        status: query.status,
        student_id: query.student_id,
        teacher_id: query.teacher_id,
        course_id: query.course_id,
        from: query.start_date,
        to: query.end_date,
    };

    let (payments, total) = state
        .payment_service
        .admin_list(current.actor(), filter, &pagination)
        .await?;

    Ok(Json(Paginated::new(
        payments,
        pagination.page,
        pagination.limit(),
        total,
    )))
}

/// Admin: income analytics over completed payments
#[utoipa::path(
    get,
    path = "/payments/admin/analytics",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Income analytics"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn admin_analytics(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<Json<PaymentAnalytics>> {
    let analytics = state
        .payment_service
        .analytics(current.actor(), query.start_date, query.end_date)
        .await?;

    Ok(Json(analytics))
}
