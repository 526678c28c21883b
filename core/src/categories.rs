/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::{InputError, Validate};
use super::types::*;
use catalog::normalize::normalize_category_id;
use catalog::{Catalog, CatalogError, Product};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Category not found")]
    NotFound,
    #[error("Product-category mapping not found")]
    MappingNotFound,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: MCategory,
    pub product_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub external_id: Option<String>,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

impl Validate for NewCategory {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check(!self.name.trim().is_empty(), "name", "Name is required");
        errors.check(
            !self.display_name.trim().is_empty(),
            "display_name",
            "Display name is required",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.display_name.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
            && self.display_order.is_none()
    }
}

impl Validate for CategoryPatch {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        if let Some(name) = &self.name {
            errors.check(!name.trim().is_empty(), "name", "Name cannot be empty");
        }
        if let Some(display_name) = &self.display_name {
            errors.check(
                !display_name.trim().is_empty(),
                "display_name",
                "Display name cannot be empty",
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncResult {
    pub created: u32,
    pub updated: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BulkAssignResult {
    pub assigned: u32,
    pub errors: u32,
}

pub async fn list_categories<C: ConnectionTrait>(
    db: &C,
    include_inactive: bool,
) -> Result<Vec<CategoryWithCount>, DbErr> {
    let mut query = ECategory::find();

    if !include_inactive {
        query = query.filter(CCategory::IsActive.eq(true));
    }

    let categories = query
        .order_by_asc(CCategory::DisplayOrder)
        .order_by_asc(CCategory::DisplayName)
        .all(db)
        .await?;

    let counts: HashMap<Uuid, i64> = EProductCategory::find()
        .select_only()
        .column(CProductCategory::Category)
        .column_as(CProductCategory::ProductId.count(), "product_count")
        .group_by(CProductCategory::Category)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(categories
        .into_iter()
        .map(|category| CategoryWithCount {
            product_count: counts.get(&category.id).copied().unwrap_or(0),
            category,
        })
        .collect())
}

/// Active categories in storefront order.
pub async fn active_categories<C: ConnectionTrait>(db: &C) -> Result<Vec<MCategory>, DbErr> {
    ECategory::find()
        .filter(CCategory::IsActive.eq(true))
        .order_by_asc(CCategory::DisplayOrder)
        .order_by_asc(CCategory::DisplayName)
        .all(db)
        .await
}

pub async fn get_category<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<MCategory, CategoryError> {
    ECategory::find_by_id(id)
        .one(db)
        .await?
        .ok_or(CategoryError::NotFound)
}

pub async fn create_category<C: ConnectionTrait>(
    db: &C,
    new: NewCategory,
) -> Result<MCategory, DbErr> {
    let now = Utc::now().naive_utc();

    ACategory {
        id: Set(Uuid::new_v4()),
        external_id: Set(new.external_id.filter(|id| !id.trim().is_empty())),
        name: Set(new.name.trim().to_string()),
        display_name: Set(new.display_name.trim().to_string()),
        description: Set(new.description),
        is_active: Set(new.is_active.unwrap_or(true)),
        display_order: Set(new.display_order.unwrap_or(0)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn update_category<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    patch: CategoryPatch,
) -> Result<MCategory, CategoryError> {
    let category = get_category(db, id).await?;

    if patch.is_empty() {
        return Ok(category);
    }

    let mut acategory = category.into_active_model();

    if let Some(name) = patch.name {
        acategory.name = Set(name.trim().to_string());
    }
    if let Some(display_name) = patch.display_name {
        acategory.display_name = Set(display_name.trim().to_string());
    }
    if let Some(description) = patch.description {
        acategory.description = Set(Some(description));
    }
    if let Some(is_active) = patch.is_active {
        acategory.is_active = Set(is_active);
    }
    if let Some(display_order) = patch.display_order {
        acategory.display_order = Set(display_order);
    }

    acategory.updated_at = Set(Utc::now().naive_utc());
    Ok(acategory.update(db).await?)
}

/// Mappings go with the category through the foreign key cascade.
pub async fn delete_category<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<(), CategoryError> {
    let result = ECategory::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(CategoryError::NotFound);
    }

    info!(%id, "Deleted category");
    Ok(())
}

/// Creates or renames one local category per catalog category.
pub async fn sync_categories<C: ConnectionTrait>(
    db: &C,
    catalog: &Catalog,
) -> Result<SyncResult, CategoryError> {
    let remote = catalog.categories().await?;
    let mut result = SyncResult::default();
    let now = Utc::now().naive_utc();

    for remote_category in remote {
        let existing = ECategory::find()
            .filter(CCategory::ExternalId.eq(remote_category.id.as_str()))
            .one(db)
            .await?;

        match existing {
            Some(category) => {
                let mut acategory = category.into_active_model();
                acategory.name = Set(remote_category.name.clone());
                acategory.display_name = Set(remote_category.name);
                acategory.updated_at = Set(now);
                acategory.update(db).await?;
                result.updated += 1;
            }
            None => {
                ACategory {
                    id: Set(Uuid::new_v4()),
                    external_id: Set(Some(remote_category.id)),
                    name: Set(remote_category.name.clone()),
                    display_name: Set(remote_category.name),
                    description: Set(None),
                    is_active: Set(true),
                    display_order: Set(0),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await?;
                result.created += 1;
            }
        }
    }

    info!(
        created = result.created,
        updated = result.updated,
        "Synced catalog categories"
    );
    Ok(result)
}

/// Explicitly mapped products, else the catalog's own assignment to the
/// category's external id.
pub async fn products_for_category<C: ConnectionTrait>(
    db: &C,
    catalog: &Catalog,
    category: &MCategory,
) -> Result<Vec<Product>, CategoryError> {
    let mapped: HashSet<String> = EProductCategory::find()
        .filter(CProductCategory::Category.eq(category.id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.product_id)
        .collect();

    if !mapped.is_empty() {
        let products = catalog.products().await?;
        return Ok(products
            .iter()
            .filter(|p| mapped.contains(&p.id))
            .cloned()
            .collect());
    }

    match &category.external_id {
        Some(external_id) => Ok(catalog
            .products_in_category(normalize_category_id(external_id))
            .await?),
        None => Ok(Vec::new()),
    }
}

pub async fn assign_product<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
    category: Uuid,
    is_primary: bool,
) -> Result<MProductCategory, CategoryError> {
    get_category(db, category).await?;

    let existing = EProductCategory::find()
        .filter(CProductCategory::ProductId.eq(product_id))
        .filter(CProductCategory::Category.eq(category))
        .one(db)
        .await?;

    if let Some(mapping) = existing {
        if mapping.is_primary == is_primary {
            return Ok(mapping);
        }

        let mut amapping = mapping.into_active_model();
        amapping.is_primary = Set(is_primary);
        return Ok(amapping.update(db).await?);
    }

    Ok(AProductCategory {
        id: Set(Uuid::new_v4()),
        product_id: Set(product_id.to_string()),
        category: Set(category),
        is_primary: Set(is_primary),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await?)
}

pub async fn unassign_product<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
    category: Uuid,
) -> Result<(), CategoryError> {
    let result = EProductCategory::delete_many()
        .filter(CProductCategory::ProductId.eq(product_id))
        .filter(CProductCategory::Category.eq(category))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(CategoryError::MappingNotFound);
    }

    Ok(())
}

pub async fn bulk_assign<C: ConnectionTrait>(
    db: &C,
    product_ids: &[String],
    category: Uuid,
) -> Result<BulkAssignResult, CategoryError> {
    get_category(db, category).await?;

    let mut result = BulkAssignResult::default();

    for product_id in product_ids {
        match assign_product(db, product_id, category, false).await {
            Ok(_) => result.assigned += 1,
            Err(e) => {
                warn!(error = %e, product_id, "Failed to assign product to category");
                result.errors += 1;
            }
        }
    }

    Ok(result)
}

/// Every mapping joined with its category, keyed by catalog product id.
pub async fn categories_by_product<C: ConnectionTrait>(
    db: &C,
) -> Result<HashMap<String, Vec<MCategory>>, DbErr> {
    let rows = EProductCategory::find()
        .find_also_related(entity::category::Entity)
        .order_by_desc(CProductCategory::IsPrimary)
        .all(db)
        .await?;

    let mut by_product: HashMap<String, Vec<MCategory>> = HashMap::new();
    for (mapping, category) in rows {
        if let Some(category) = category {
            by_product
                .entry(mapping.product_id)
                .or_default()
                .push(category);
        }
    }

    Ok(by_product)
}

/// Catalog products that have at least one local category, with their
/// catalog category ids replaced by the local ones.
pub async fn storefront_products<C: ConnectionTrait>(
    db: &C,
    catalog: &Catalog,
) -> Result<Vec<Product>, CategoryError> {
    let products = catalog.products().await?;
    let by_product = categories_by_product(db).await?;

    Ok(products
        .iter()
        .filter_map(|product| {
            let categories = by_product.get(&product.id)?;
            let mut product = product.clone();
            product.category_ids = categories.iter().map(|c| c.id.to_string()).collect();
            Some(product)
        })
        .collect())
}
