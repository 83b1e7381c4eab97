//! Migration: Create the sessions table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Sessions::CourseId).uuid().not_null())
                    .col(
                        ColumnDef::new(Sessions::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::Status).string().not_null())
                    .col(ColumnDef::new(Sessions::Meeting).json_binary().not_null())
                    .col(ColumnDef::new(Sessions::Description).text().not_null())
                    .col(ColumnDef::new(Sessions::Materials).json_binary().not_null())
                    .col(ColumnDef::new(Sessions::Notes).text().not_null())
                    .col(ColumnDef::new(Sessions::Homework).text().not_null())
                    .col(
                        ColumnDef::new(Sessions::Attendance)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::Feedback).json_binary().not_null())
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sessions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_teacher_scheduled")
                    .table(Sessions::Table)
                    .col(Sessions::TeacherId)
                    .col(Sessions::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_student_status")
                    .table(Sessions::Table)
                    .col(Sessions::StudentId)
                    .col(Sessions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_course_id")
                    .table(Sessions::Table)
                    .col(Sessions::CourseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    StudentId,
    TeacherId,
    CourseId,
    ScheduledAt,
    DurationMinutes,
    Status,
    Meeting,
    Description,
    Materials,
    Notes,
    Homework,
    Attendance,
    Feedback,
    CreatedAt,
    UpdatedAt,
}
