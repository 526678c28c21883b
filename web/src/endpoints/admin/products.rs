/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use crate::extract::{JsonBody, ValidatedJson};
use axum::Json;
use axum::extract::{Path, State};
use catalog::Product;
use serde::{Deserialize, Serialize};
use shop_core::categories::{
    BulkAssignResult, assign_product, bulk_assign, categories_by_product, unassign_product,
};
use shop_core::input::{InputError, Validate};
use shop_core::types::*;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Debug)]
pub struct ProductWithCategories {
    #[serde(flatten)]
    pub product: Product,
    pub db_category_ids: Vec<Uuid>,
    pub db_category_names: Vec<String>,
}

impl ProductWithCategories {
    fn new(product: Product, categories: &[MCategory]) -> Self {
        Self {
            product,
            db_category_ids: categories.iter().map(|c| c.id).collect(),
            db_category_names: categories.iter().map(|c| c.display_name.clone()).collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AssignCategoryRequest {
    pub category_id: Uuid,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Deserialize, Debug)]
pub struct BulkAssignRequest {
    pub product_ids: Vec<String>,
    pub category_id: Uuid,
}

impl Validate for BulkAssignRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check(
            !self.product_ids.is_empty(),
            "product_ids",
            "At least one product id is required",
        );
        errors.into_result()
    }
}

pub async fn get_products(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<ProductWithCategories>>>> {
    let products = state.catalog.products().await?;
    let by_product = categories_by_product(&state.db).await?;

    let products = products
        .iter()
        .map(|product| {
            let categories = by_product
                .get(&product.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            ProductWithCategories::new(product.clone(), categories)
        })
        .collect();

    let res = BaseResponse {
        error: false,
        message: products,
    };

    Ok(Json(res))
}

pub async fn get_product(
    state: State<Arc<ServerState>>,
    Path(product_id): Path<String>,
) -> WebResult<Json<BaseResponse<ProductWithCategories>>> {
    let product = state
        .catalog
        .product(&product_id)
        .await?
        .ok_or_else(|| WebError::not_found("Product"))?;

    let by_product = categories_by_product(&state.db).await?;
    let categories = by_product
        .get(&product.id)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let res = BaseResponse {
        error: false,
        message: ProductWithCategories::new(product, categories),
    };

    Ok(Json(res))
}

pub async fn post_product_category(
    state: State<Arc<ServerState>>,
    Path(product_id): Path<String>,
    JsonBody(body): JsonBody<AssignCategoryRequest>,
) -> WebResult<Json<BaseResponse<MProductCategory>>> {
    let res = BaseResponse {
        error: false,
        message: assign_product(&state.db, &product_id, body.category_id, body.is_primary)
            .await?,
    };

    Ok(Json(res))
}

pub async fn delete_product_category(
    state: State<Arc<ServerState>>,
    Path((product_id, category_id)): Path<(String, Uuid)>,
) -> WebResult<Json<BaseResponse<String>>> {
    unassign_product(&state.db, &product_id, category_id).await?;

    let res = BaseResponse {
        error: false,
        message: "Product removed from category".to_string(),
    };

    Ok(Json(res))
}

pub async fn post_bulk_assign(
    state: State<Arc<ServerState>>,
    ValidatedJson(body): ValidatedJson<BulkAssignRequest>,
) -> WebResult<Json<BaseResponse<BulkAssignResult>>> {
    let res = BaseResponse {
        error: false,
        message: bulk_assign(&state.db, &body.product_ids, body.category_id).await?,
    };

    Ok(Json(res))
}
