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
                    .table(PointsShopItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointsShopItem::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PointsShopItem::Name).string().not_null())
                    .col(ColumnDef::new(PointsShopItem::Description).text().null())
                    .col(
                        ColumnDef::new(PointsShopItem::PointCost)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsShopItem::StockQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PointsShopItem::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(PointsShopItem::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PointsShopItem::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PointsShopItem::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .check(Expr::col(PointsShopItem::PointCost).gt(0))
                    .check(Expr::col(PointsShopItem::StockQuantity).gte(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PointsShopItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PointsShopItem {
    Table,
    Id,
    Name,
    Description,
    PointCost,
    StockQuantity,
    ImageUrl,
    Active,
    CreatedAt,
    UpdatedAt,
}
