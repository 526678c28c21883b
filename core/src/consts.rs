/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::ops::RangeInclusive;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

pub const VISIT_POINTS: i64 = 1;
pub const VISIT_INTERVAL_HOURS: i64 = 24;
pub const PHOTO_UPLOAD_POINTS: i64 = 5;
/// One point per this many dollars spent on a catalog order.
pub const DOLLARS_PER_POINT: f64 = 10.0;

pub const DEFAULT_TRANSACTION_LIMIT: u64 = 50;
pub const DEFAULT_LEADERBOARD_LIMIT: u64 = 100;
pub const MAX_LIST_LIMIT: u64 = 500;

pub const DEFAULT_SAFETY_MARGIN: f64 = 1.2;
pub const SAFETY_MARGIN_RANGE: RangeInclusive<f64> = 1.0..=2.0;
pub const DEFAULT_DRIVER_WATTAGE: u32 = 100;
pub const DEFAULT_WATTS_PER_METER: f64 = 8.0;

pub const DEFAULT_CUTTING_FEE: f64 = 5.50;
pub const PROFILE_BASE_LENGTH_M: f64 = 1.0;
pub const MAX_PROFILE_LENGTH_M: f64 = 10_000.0;

pub const PHOTO_FOLDER: &str = "photos";
pub const SHOP_ITEM_FOLDER: &str = "points-shop";

pub const SHOP_NAME: &str = "EFX LED Shop";
