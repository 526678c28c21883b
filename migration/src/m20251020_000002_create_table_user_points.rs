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
                    .table(UserPoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPoints::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserPoints::User)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserPoints::CurrentBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserPoints::TotalAccumulated)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(UserPoints::LastVisitDate).timestamp().null())
                    .col(ColumnDef::new(UserPoints::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(UserPoints::UpdatedAt).timestamp().not_null())
                    .check(Expr::col(UserPoints::CurrentBalance).gte(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_points-user")
                            .from(UserPoints::Table, UserPoints::User)
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
            .drop_table(Table::drop().table(UserPoints::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserPoints {
    Table,
    Id,
    User,
    CurrentBalance,
    TotalAccumulated,
    LastVisitDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
