//! Migration: Create the courses table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Subject).string().not_null())
                    .col(ColumnDef::new(Courses::GradeLevel).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Content).json_binary().not_null())
                    .col(
                        ColumnDef::new(Courses::PricePerSession)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::TotalSessions).integer().not_null())
                    .col(ColumnDef::new(Courses::FreeTrialDays).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::DiscountPercentage)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::HasTrial).boolean().not_null())
                    .col(ColumnDef::new(Courses::UpfrontPayment).boolean().not_null())
                    .col(ColumnDef::new(Courses::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Availability)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::Timezone).string().not_null())
                    .col(ColumnDef::new(Courses::MaxStudents).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::CurrentStudents)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::Status).string().not_null())
                    .col(
                        ColumnDef::new(Courses::Rating)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Courses::TotalRatings).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Courses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_teacher_id")
                    .table(Courses::Table)
                    .col(Courses::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_status")
                    .table(Courses::Table)
                    .col(Courses::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    TeacherId,
    Title,
    Subject,
    GradeLevel,
    Description,
    Content,
    PricePerSession,
    TotalSessions,
    FreeTrialDays,
    DiscountPercentage,
    HasTrial,
    UpfrontPayment,
    Currency,
    Availability,
    DurationMinutes,
    Timezone,
    MaxStudents,
    CurrentStudents,
    Status,
    Rating,
    TotalRatings,
    CreatedAt,
    UpdatedAt,
}
