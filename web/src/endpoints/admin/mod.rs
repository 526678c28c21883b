/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod categories;
pub mod orders;
pub mod points_shop;
pub mod products;
pub mod users;
