//! Migration: Create the payments table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::EnrollmentId).uuid().not_null())
                    .col(ColumnDef::new(Payments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Payments::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Payments::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(Payments::Amount)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Currency).string().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Payments::SessionCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Card).json_binary().null())
                    .col(ColumnDef::new(Payments::ProofImage).text().null())
                    .col(
                        ColumnDef::new(Payments::ProofUploadedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Payments::TransactionId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::TrialExpired).boolean().not_null())
                    .col(ColumnDef::new(Payments::Notes).text().not_null())
                    .col(
                        ColumnDef::new(Payments::RefundAmount)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::RefundDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Payments::RefundReason).text().null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_enrollment_id")
                    .table(Payments::Table)
                    .col(Payments::EnrollmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_student_course")
                    .table(Payments::Table)
                    .col(Payments::StudentId)
                    .col(Payments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_teacher_date")
                    .table(Payments::Table)
                    .col(Payments::TeacherId)
                    .col(Payments::PaymentDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_status")
                    .table(Payments::Table)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    EnrollmentId,
    StudentId,
    TeacherId,
    CourseId,
    Amount,
    Currency,
    Method,
    Status,
    SessionCount,
    Card,
    ProofImage,
    ProofUploadedAt,
    TransactionId,
    PaymentDate,
    TrialExpired,
    Notes,
    RefundAmount,
    RefundDate,
    RefundReason,
    CreatedAt,
    UpdatedAt,
}
