/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photo::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Photo::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Photo::User).uuid().not_null())
                    .col(ColumnDef::new(Photo::FileUrl).string().not_null())
                    .col(ColumnDef::new(Photo::FileKey).string().not_null())
                    .col(ColumnDef::new(Photo::Description).text().null())
                    .col(
                        ColumnDef::new(Photo::Approved)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Photo::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-photo-user")
                            .from(Photo::Table, Photo::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photo::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Photo {
    Table,
    Id,
    User,
    FileUrl,
    FileKey,
    Description,
    Approved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
