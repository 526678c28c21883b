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
                    .table(Order::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Order::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Order::User).uuid().not_null())
                    .col(ColumnDef::new(Order::Kind).small_integer().not_null())
                    .col(ColumnDef::new(Order::Status).small_integer().not_null())
                    .col(ColumnDef::new(Order::ExternalOrderId).string().null())
                    .col(ColumnDef::new(Order::ExternalState).string().null())
                    .col(ColumnDef::new(Order::TotalAmount).double().null())
                    .col(ColumnDef::new(Order::CustomOrderData).json_binary().null())
                    .col(ColumnDef::new(Order::LineItems).json_binary().null())
                    .col(ColumnDef::new(Order::AdminNotes).text().null())
                    .col(ColumnDef::new(Order::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Order::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order-user")
                            .from(Order::Table, Order::User)
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
                    .name("idx-order-user")
                    .table(Order::Table)
                    .col(Order::User)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-order-status")
                    .table(Order::Table)
                    .col(Order::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Order {
    Table,
    Id,
    User,
    Kind,
    Status,
    ExternalOrderId,
    ExternalState,
    TotalAmount,
    CustomOrderData,
    LineItems,
    AdminNotes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
