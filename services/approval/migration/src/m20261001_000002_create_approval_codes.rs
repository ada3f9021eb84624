use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApprovalCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApprovalCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApprovalCodes::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(ApprovalCodes::Code).string().not_null())
                    .col(ColumnDef::new(ApprovalCodes::IssuedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(ApprovalCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApprovalCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ApprovalCodes::UsedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ApprovalCodes::SentToEmail).string())
                    .col(ColumnDef::new(ApprovalCodes::SentAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ApprovalCodes::Table, ApprovalCodes::SubjectId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ApprovalCodes::Table)
                    .col(ApprovalCodes::SubjectId)
                    .name("idx_approval_codes_subject_id")
                    .to_owned(),
            )
            .await?;

        // Not unique: codes only need to be unique among active rows, and
        // redemption filters on used_at/expires_at.
        manager
            .create_index(
                Index::create()
                    .table(ApprovalCodes::Table)
                    .col(ApprovalCodes::Code)
                    .name("idx_approval_codes_code")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApprovalCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ApprovalCodes {
    Table,
    Id,
    SubjectId,
    Code,
    IssuedBy,
    CreatedAt,
    ExpiresAt,
    UsedAt,
    SentToEmail,
    SentAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
}
