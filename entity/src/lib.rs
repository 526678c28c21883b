/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod category;
pub mod notification;
pub mod order;
pub mod photo;
pub mod points_redemption;
pub mod points_shop_item;
pub mod points_transaction;
pub mod product_category;
pub mod user;
pub mod user_points;
