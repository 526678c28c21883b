/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::Json;
use axum::extract::{Path, State};
use catalog::{CatalogCategory, Product};
use serde::Serialize;
use shop_core::categories::{
    active_categories, get_category, products_for_category, storefront_products,
};
use shop_core::types::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

const DIAGNOSTIC_SAMPLE_SIZE: usize = 10;

#[derive(Serialize, Debug)]
pub struct ConnectionCheck {
    pub connected: bool,
    pub catalog_item_count: usize,
    pub environment: String,
    pub location_configured: bool,
}

#[derive(Serialize, Debug)]
pub struct SampleProduct {
    pub id: String,
    pub name: String,
    pub category_ids: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct CategoryDiagnostic {
    pub catalog_categories: Vec<CatalogCategory>,
    pub catalog_category_count: usize,
    pub product_count: usize,
    pub products_with_categories: usize,
    pub products_without_categories: usize,
    pub category_ids_from_products: Vec<String>,
    pub sample_products: Vec<SampleProduct>,
}

pub async fn get_test(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<ConnectionCheck>>> {
    let catalog_item_count = state.catalog.item_count().await?;

    let res = BaseResponse {
        error: false,
        message: ConnectionCheck {
            connected: true,
            catalog_item_count,
            environment: state.cli.square_environment.to_string(),
            location_configured: state.cli.square_location_id.is_some(),
        },
    };

    Ok(Json(res))
}

pub async fn get_products(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<Product>>>> {
    let res = BaseResponse {
        error: false,
        message: storefront_products(&state.db, &state.catalog).await?,
    };

    Ok(Json(res))
}

pub async fn get_product(
    state: State<Arc<ServerState>>,
    Path(product_id): Path<String>,
) -> WebResult<Json<BaseResponse<Product>>> {
    let product = state
        .catalog
        .product(&product_id)
        .await?
        .ok_or_else(|| WebError::not_found("Product"))?;

    let res = BaseResponse {
        error: false,
        message: product,
    };

    Ok(Json(res))
}

/// Active local categories, or the catalog's own when none are set up.
pub async fn get_categories(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<CatalogCategory>>>> {
    let categories = active_categories(&state.db).await?;

    let categories = if categories.is_empty() {
        state.catalog.categories().await?
    } else {
        categories
            .into_iter()
            .map(|c| CatalogCategory {
                id: c.id.to_string(),
                name: c.display_name,
            })
            .collect()
    };

    let res = BaseResponse {
        error: false,
        message: categories,
    };

    Ok(Json(res))
}

/// A UUID names a local category; anything else is a catalog category id.
pub async fn get_category_products(
    state: State<Arc<ServerState>>,
    Path(category_id): Path<String>,
) -> WebResult<Json<BaseResponse<Vec<Product>>>> {
    let products = match Uuid::parse_str(&category_id) {
        Ok(id) => {
            let category = get_category(&state.db, id).await?;
            products_for_category(&state.db, &state.catalog, &category).await?
        }
        Err(_) => state.catalog.products_in_category(&category_id).await?,
    };

    let res = BaseResponse {
        error: false,
        message: products,
    };

    Ok(Json(res))
}

pub async fn get_diagnostic(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<CategoryDiagnostic>>> {
    let catalog_categories = state.catalog.categories().await?;
    let products = state.catalog.products().await?;

    let (with_categories, without_categories): (Vec<&Product>, Vec<&Product>) =
        products.iter().partition(|p| !p.category_ids.is_empty());

    let category_ids_from_products: BTreeSet<String> = products
        .iter()
        .flat_map(|p| p.category_ids.iter().cloned())
        .collect();

    let sample_products = with_categories
        .iter()
        .take(DIAGNOSTIC_SAMPLE_SIZE)
        .map(|p| SampleProduct {
            id: p.id.clone(),
            name: p.name.clone(),
            category_ids: p.category_ids.clone(),
        })
        .collect();

    let res = BaseResponse {
        error: false,
        message: CategoryDiagnostic {
            catalog_category_count: catalog_categories.len(),
            catalog_categories,
            product_count: products.len(),
            products_with_categories: with_categories.len(),
            products_without_categories: without_categories.len(),
            category_ids_from_products: category_ids_from_products.into_iter().collect(),
            sample_products,
        },
    };

    Ok(Json(res))
}
