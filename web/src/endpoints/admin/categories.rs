/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use crate::extract::ValidatedJson;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use catalog::Product;
use serde::Deserialize;
use shop_core::categories::{
    CategoryPatch, CategoryWithCount, NewCategory, SyncResult, create_category, delete_category,
    get_category, list_categories, products_for_category, sync_categories, update_category,
};
use shop_core::types::*;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize, Debug, Default)]
pub struct CategoryListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

pub async fn get_categories(
    state: State<Arc<ServerState>>,
    Query(query): Query<CategoryListQuery>,
) -> WebResult<Json<BaseResponse<Vec<CategoryWithCount>>>> {
    let res = BaseResponse {
        error: false,
        message: list_categories(&state.db, query.include_inactive).await?,
    };

    Ok(Json(res))
}

pub async fn get_category_by_id(
    state: State<Arc<ServerState>>,
    Path(category_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<MCategory>>> {
    let res = BaseResponse {
        error: false,
        message: get_category(&state.db, category_id).await?,
    };

    Ok(Json(res))
}

pub async fn post_category(
    state: State<Arc<ServerState>>,
    ValidatedJson(body): ValidatedJson<NewCategory>,
) -> WebResult<(StatusCode, Json<BaseResponse<MCategory>>)> {
    let res = BaseResponse {
        error: false,
        message: create_category(&state.db, body).await?,
    };

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn put_category(
    state: State<Arc<ServerState>>,
    Path(category_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CategoryPatch>,
) -> WebResult<Json<BaseResponse<MCategory>>> {
    let res = BaseResponse {
        error: false,
        message: update_category(&state.db, category_id, body).await?,
    };

    Ok(Json(res))
}

pub async fn delete_category_by_id(
    state: State<Arc<ServerState>>,
    Path(category_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    delete_category(&state.db, category_id).await?;

    let res = BaseResponse {
        error: false,
        message: "Category deleted".to_string(),
    };

    Ok(Json(res))
}

pub async fn post_sync(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<SyncResult>>> {
    let res = BaseResponse {
        error: false,
        message: sync_categories(&state.db, &state.catalog).await?,
    };

    Ok(Json(res))
}

pub async fn get_category_products(
    state: State<Arc<ServerState>>,
    Path(category_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<Vec<Product>>>> {
    let category = get_category(&state.db, category_id).await?;

    let res = BaseResponse {
        error: false,
        message: products_for_category(&state.db, &state.catalog, &category).await?,
    };

    Ok(Json(res))
}
