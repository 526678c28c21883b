/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::{Deserialize, Serialize};

/// Raw catalog object as returned by the list and batch-retrieve endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CatalogObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_data: Option<ItemData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_variation_data: Option<ItemVariationData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<ImageData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_data: Option<CategoryData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ItemData {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub image_ids: Vec<String>,
    #[serde(default)]
    pub variations: Vec<CatalogObject>,
    pub categories: Option<Vec<CategoryRef>>,
    /// Deprecated single-category field still returned for older items.
    pub category_id: Option<String>,
}

/// Items reference categories either by bare id or by `{ "id": .. }` object.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Id(String),
    Object { id: String },
}

impl CategoryRef {
    pub fn id(&self) -> &str {
        match self {
            CategoryRef::Id(id) => id,
            CategoryRef::Object { id } => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ItemVariationData {
    pub item_id: Option<String>,
    pub price_money: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Money {
    pub amount: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ImageData {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CategoryData {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRetrieveResponse {
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
    #[serde(default)]
    pub related_objects: Vec<CatalogObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Indoor,
    Outdoor,
    #[default]
    Both,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProductAttributes {
    pub environment: Environment,
    pub voltage: Option<String>,
}

/// Flattened storefront product built from an ITEM and its related objects.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub category_ids: Vec<String>,
    pub attributes: ProductAttributes,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogCategory {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewLineItem {
    pub catalog_object_id: String,
    pub quantity: String,
    pub name: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewOrder {
    pub reference_id: String,
    pub customer_id: Option<String>,
    pub line_items: Vec<NewLineItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CreatedOrder {
    pub id: String,
    pub state: Option<String>,
    pub total_cents: Option<i64>,
}
