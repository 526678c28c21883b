/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::{InputError, Validate};
use super::points::PointsError;
use super::types::*;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel, QueryOrder,
};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewShopItem {
    pub name: String,
    pub description: Option<String>,
    pub point_cost: i64,
    pub stock_quantity: i32,
    pub active: bool,
    pub image_url: Option<String>,
}

impl Validate for NewShopItem {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check(!self.name.trim().is_empty(), "name", "Name is required");
        errors.check(
            self.point_cost > 0,
            "point_cost",
            "Point cost must be greater than 0",
        );
        errors.check(
            self.stock_quantity >= 0,
            "stock_quantity",
            "Stock quantity cannot be negative",
        );
        errors.check(self.image_url.is_some(), "image", "Image is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShopItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub point_cost: Option<i64>,
    pub stock_quantity: Option<i32>,
    pub active: Option<bool>,
    pub image_url: Option<String>,
}

impl ShopItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.point_cost.is_none()
            && self.stock_quantity.is_none()
            && self.active.is_none()
            && self.image_url.is_none()
    }
}

impl Validate for ShopItemPatch {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        if let Some(name) = &self.name {
            errors.check(!name.trim().is_empty(), "name", "Name cannot be empty");
        }
        if let Some(point_cost) = self.point_cost {
            errors.check(
                point_cost > 0,
                "point_cost",
                "Point cost must be greater than 0",
            );
        }
        if let Some(stock_quantity) = self.stock_quantity {
            errors.check(
                stock_quantity >= 0,
                "stock_quantity",
                "Stock quantity cannot be negative",
            );
        }
        errors.into_result()
    }
}

/// Every item including inactive ones, newest first.
pub async fn all_shop_items<C: ConnectionTrait>(db: &C) -> Result<Vec<MPointsShopItem>, DbErr> {
    EPointsShopItem::find()
        .order_by_desc(CPointsShopItem::CreatedAt)
        .all(db)
        .await
}

pub async fn get_shop_item<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<MPointsShopItem, PointsError> {
    EPointsShopItem::find_by_id(id)
        .one(db)
        .await?
        .ok_or(PointsError::ItemNotFound)
}

pub async fn create_shop_item<C: ConnectionTrait>(
    db: &C,
    new: NewShopItem,
) -> Result<MPointsShopItem, DbErr> {
    let now = Utc::now().naive_utc();

    let item = APointsShopItem {
        id: Set(Uuid::new_v4()),
        name: Set(new.name.trim().to_string()),
        description: Set(new.description),
        point_cost: Set(new.point_cost),
        stock_quantity: Set(new.stock_quantity),
        image_url: Set(new.image_url),
        active: Set(new.active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(item = %item.id, name = %item.name, "Created points shop item");
    Ok(item)
}

/// Returns the updated item and the image URL it replaced, if any.
pub async fn update_shop_item<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    patch: ShopItemPatch,
) -> Result<(MPointsShopItem, Option<String>), PointsError> {
    let item = get_shop_item(db, id).await?;
    let mut replaced_image = None;
    let mut aitem = item.clone().into_active_model();

    if let Some(name) = patch.name {
        aitem.name = Set(name.trim().to_string());
    }
    if let Some(description) = patch.description {
        aitem.description = Set(Some(description));
    }
    if let Some(point_cost) = patch.point_cost {
        aitem.point_cost = Set(point_cost);
    }
    if let Some(stock_quantity) = patch.stock_quantity {
        aitem.stock_quantity = Set(stock_quantity);
    }
    if let Some(active) = patch.active {
        aitem.active = Set(active);
    }
    if let Some(image_url) = patch.image_url {
        replaced_image = item.image_url.clone();
        aitem.image_url = Set(Some(image_url));
    }

    aitem.updated_at = Set(Utc::now().naive_utc());
    let item = aitem.update(db).await?;

    Ok((item, replaced_image))
}

/// Hard delete. Past redemptions keep their row with the item reference
/// cleared by the foreign key.
pub async fn delete_shop_item<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<MPointsShopItem, PointsError> {
    let item = get_shop_item(db, id).await?;
    EPointsShopItem::delete_by_id(id).exec(db).await?;

    info!(item = %id, "Deleted points shop item");
    Ok(item)
}
