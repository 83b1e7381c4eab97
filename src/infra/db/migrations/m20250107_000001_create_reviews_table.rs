//! Migration: Create the reviews table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::StudentId).uuid().not_null())
                    .col(ColumnDef::new(Reviews::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(Reviews::CourseId).uuid().null())
                    .col(ColumnDef::new(Reviews::Rating).small_integer().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().not_null())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One review per (student, teacher, course) triple
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_student_teacher_course")
                    .table(Reviews::Table)
                    .col(Reviews::StudentId)
                    .col(Reviews::TeacherId)
                    .col(Reviews::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_teacher_id")
                    .table(Reviews::Table)
                    .col(Reviews::TeacherId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reviews {
    Table,
    Id,
    StudentId,
    TeacherId,
    CourseId,
    Rating,
    Comment,
    CreatedAt,
    UpdatedAt,
}
