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
                    .table(PointsRedemption::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointsRedemption::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PointsRedemption::User).uuid().not_null())
                    .col(ColumnDef::new(PointsRedemption::Item).uuid().null())
                    .col(ColumnDef::new(PointsRedemption::ItemName).string().not_null())
                    .col(
                        ColumnDef::new(PointsRedemption::PointCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsRedemption::Status)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsRedemption::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-points_redemption-user")
                            .from(PointsRedemption::Table, PointsRedemption::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-points_redemption-item")
                            .from(PointsRedemption::Table, PointsRedemption::Item)
                            .to(PointsShopItem::Table, PointsShopItem::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PointsRedemption::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PointsRedemption {
    Table,
    Id,
    User,
    Item,
    ItemName,
    PointCost,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum PointsShopItem {
    Table,
    Id,
}
