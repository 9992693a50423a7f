use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSocialAuth::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSocialAuth::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSocialAuth::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserSocialAuth::Provider)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserSocialAuth::Uid).string_len(255).not_null())
                    .col(
                        ColumnDef::new(UserSocialAuth::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_social_auth_user")
                            .from(UserSocialAuth::Table, UserSocialAuth::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One account per provider identity
        manager
            .create_index(
                Index::create()
                    .name("idx_user_social_auth_provider_uid")
                    .table(UserSocialAuth::Table)
                    .col(UserSocialAuth::Provider)
                    .col(UserSocialAuth::Uid)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_social_auth_user_id")
                    .table(UserSocialAuth::Table)
                    .col(UserSocialAuth::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSocialAuth::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserSocialAuth {
    Table,
    Id,
    UserId,
    Provider,
    Uid,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
