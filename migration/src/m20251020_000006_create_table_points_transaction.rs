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
                    .table(PointsTransaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointsTransaction::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PointsTransaction::User).uuid().not_null())
                    .col(
                        ColumnDef::new(PointsTransaction::Kind)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsTransaction::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsTransaction::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsTransaction::ReferenceType)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsTransaction::ReferenceId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PointsTransaction::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .check(Expr::col(PointsTransaction::Amount).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-points_transaction-user")
                            .from(PointsTransaction::Table, PointsTransaction::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-points_transaction-user-created_at")
                    .table(PointsTransaction::Table)
                    .col(PointsTransaction::User)
                    .col(PointsTransaction::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PointsTransaction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PointsTransaction {
    Table,
    Id,
    User,
    Kind,
    Amount,
    Description,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
