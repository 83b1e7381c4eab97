//! Migration: Create the enrollment requests table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Requests::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Requests::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Requests::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Requests::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Requests::Message).text().not_null())
                    .col(ColumnDef::new(Requests::Status).string().not_null())
                    .col(ColumnDef::new(Requests::ResponseMessage).text().null())
                    .col(
                        ColumnDef::new(Requests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Requests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requests_student_course")
                    .table(Requests::Table)
                    .col(Requests::StudentId)
                    .col(Requests::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requests_teacher_status")
                    .table(Requests::Table)
                    .col(Requests::TeacherId)
                    .col(Requests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Requests {
    Table,
    Id,
    StudentId,
    TeacherId,
    CourseId,
    Message,
    Status,
    ResponseMessage,
    CreatedAt,
    UpdatedAt,
}
