/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20251020_000001_create_table_user;
mod m20251020_000002_create_table_user_points;
mod m20251020_000003_create_table_order;
mod m20251020_000004_create_table_category;
mod m20251020_000005_create_table_product_category;
mod m20251020_000006_create_table_points_transaction;
mod m20251020_000007_create_table_points_shop_item;
mod m20251020_000008_create_table_points_redemption;
mod m20251020_000009_create_table_photo;
mod m20251020_000010_create_table_notification;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251020_000001_create_table_user::Migration),
            Box::new(m20251020_000002_create_table_user_points::Migration),
            Box::new(m20251020_000003_create_table_order::Migration),
            Box::new(m20251020_000004_create_table_category::Migration),
            Box::new(m20251020_000005_create_table_product_category::Migration),
            Box::new(m20251020_000006_create_table_points_transaction::Migration),
            Box::new(m20251020_000007_create_table_points_shop_item::Migration),
            Box::new(m20251020_000008_create_table_points_redemption::Migration),
            Box::new(m20251020_000009_create_table_photo::Migration),
            Box::new(m20251020_000010_create_table_notification::Migration),
        ]
    }
}
