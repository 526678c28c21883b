/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::types::*;
use std::collections::HashMap;

pub const UNNAMED_PRODUCT: &str = "Unnamed Product";
pub const UNNAMED_CATEGORY: &str = "Unnamed Category";

/// Builds products from a flat list of ITEM, ITEM_VARIATION and IMAGE objects.
pub fn normalize_products(objects: &[CatalogObject]) -> Vec<Product> {
    let images = image_urls(objects);

    objects
        .iter()
        .filter_map(|object| normalize_product(object, &images))
        .collect()
}

/// Normalizes a single ITEM. `images` maps IMAGE object ids to their URL.
pub fn normalize_product(
    object: &CatalogObject,
    images: &HashMap<String, String>,
) -> Option<Product> {
    if object.kind != "ITEM" {
        return None;
    }

    let item = object.item_data.as_ref()?;

    let image_url = item
        .image_ids
        .first()
        .and_then(|image_id| images.get(image_id))
        .filter(|url| !url.is_empty())
        .cloned();

    let price = item
        .variations
        .first()
        .and_then(|variation| variation.item_variation_data.as_ref())
        .and_then(|data| data.price_money.as_ref())
        .and_then(|money| money.amount)
        .filter(|amount| *amount != 0)
        .map(|amount| amount as f64 / 100.0);

    let description = item.description.clone().filter(|d| !d.is_empty());

    Some(Product {
        id: object.id.clone(),
        name: item
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED_PRODUCT.to_string()),
        attributes: extract_attributes(description.as_deref()),
        description,
        image_url,
        price,
        category_ids: category_ids(item),
    })
}

pub fn normalize_categories(objects: &[CatalogObject]) -> Vec<CatalogCategory> {
    objects
        .iter()
        .filter(|object| object.kind == "CATEGORY")
        .filter_map(|object| {
            let data = object.category_data.as_ref()?;
            Some(CatalogCategory {
                id: object.id.clone(),
                name: data
                    .name
                    .clone()
                    .unwrap_or_else(|| UNNAMED_CATEGORY.to_string()),
            })
        })
        .collect()
}

pub fn image_urls(objects: &[CatalogObject]) -> HashMap<String, String> {
    objects
        .iter()
        .filter(|object| object.kind == "IMAGE")
        .filter_map(|object| {
            let data = object.image_data.as_ref()?;
            Some((object.id.clone(), data.url.clone().unwrap_or_default()))
        })
        .collect()
}

/// Keyword matching on the free-text description. Later matches win, so an
/// "indoor/outdoor" strip ends up as outdoor and "12V or 24V" as 24V.
pub fn extract_attributes(description: Option<&str>) -> ProductAttributes {
    let mut attributes = ProductAttributes::default();

    let Some(description) = description else {
        return attributes;
    };

    let description = description.to_lowercase();

    if description.contains("indoor") {
        attributes.environment = Environment::Indoor;
    }
    if description.contains("outdoor") {
        attributes.environment = Environment::Outdoor;
    }
    if description.contains("12v") {
        attributes.voltage = Some("12V".to_string());
    }
    if description.contains("24v") {
        attributes.voltage = Some("24V".to_string());
    }

    attributes
}

fn category_ids(item: &ItemData) -> Vec<String> {
    match &item.categories {
        Some(categories) => categories
            .iter()
            .map(|category| category.id().to_string())
            .filter(|id| !id.is_empty())
            .collect(),
        None => item
            .category_id
            .iter()
            .filter(|id| !id.is_empty())
            .cloned()
            .collect(),
    }
}

pub fn normalize_category_id(id: &str) -> &str {
    id.trim_start_matches('#')
}

pub fn in_category(product: &Product, category_id: &str) -> bool {
    let wanted = normalize_category_id(category_id);

    product
        .category_ids
        .iter()
        .any(|id| id == category_id || normalize_category_id(id) == wanted)
}
