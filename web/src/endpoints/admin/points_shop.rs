/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::endpoints::upload::{UploadedImage, read_shop_item_form};
use crate::error::{WebError, WebResult};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use shop_core::consts::SHOP_ITEM_FOLDER;
use shop_core::input::Validate;
use shop_core::shop::{
    NewShopItem, ShopItemPatch, all_shop_items, create_shop_item, delete_shop_item,
    update_shop_item,
};
use shop_core::storage::StoredFile;
use shop_core::types::*;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

async fn store_image(state: &ServerState, image: &UploadedImage) -> WebResult<StoredFile> {
    Ok(state
        .storage
        .save(SHOP_ITEM_FOLDER, &image.file_name, &image.bytes)
        .await?)
}

async fn remove_image(state: &ServerState, url: &str) {
    let Some(key) = state.storage.key_from_url(url) else {
        return;
    };

    if let Err(e) = state.storage.delete(key).await {
        warn!(error = %e, key = %key, "Failed to remove shop item image");
    }
}

pub async fn get_items(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<MPointsShopItem>>>> {
    let res = BaseResponse {
        error: false,
        message: all_shop_items(&state.db).await?,
    };

    Ok(Json(res))
}

pub async fn post_item(
    state: State<Arc<ServerState>>,
    multipart: Multipart,
) -> WebResult<(StatusCode, Json<BaseResponse<MPointsShopItem>>)> {
    let form = read_shop_item_form(multipart, state.cli.max_upload_size).await?;

    // Validated with the upload's name in place of its URL so nothing is
    // written to storage for a rejected form.
    let mut new = NewShopItem {
        name: form.name.unwrap_or_default(),
        description: form.description.filter(|d| !d.trim().is_empty()),
        point_cost: form.point_cost.unwrap_or_default(),
        stock_quantity: form.stock_quantity.unwrap_or_default(),
        active: form.active.unwrap_or(true),
        image_url: form.image.as_ref().map(|image| image.file_name.clone()),
    };
    new.validate()?;

    let image = form
        .image
        .ok_or_else(|| WebError::BadRequest("Image is required".to_string()))?;
    let stored = store_image(&state, &image).await?;
    new.image_url = Some(stored.url.clone());

    let item = match create_shop_item(&state.db, new).await {
        Ok(item) => item,
        Err(e) => {
            remove_image(&state, &stored.url).await;
            return Err(e.into());
        }
    };

    let res = BaseResponse {
        error: false,
        message: item,
    };

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn put_item(
    state: State<Arc<ServerState>>,
    Path(item_id): Path<Uuid>,
    multipart: Multipart,
) -> WebResult<Json<BaseResponse<MPointsShopItem>>> {
    let form = read_shop_item_form(multipart, state.cli.max_upload_size).await?;

    let mut patch = ShopItemPatch {
        name: form.name,
        description: form.description,
        point_cost: form.point_cost,
        stock_quantity: form.stock_quantity,
        active: form.active,
        image_url: None,
    };

    if patch.is_empty() && form.image.is_none() {
        return Err(WebError::no_fields());
    }
    patch.validate()?;

    let stored = match &form.image {
        Some(image) => Some(store_image(&state, image).await?),
        None => None,
    };
    patch.image_url = stored.as_ref().map(|s| s.url.clone());

    let (item, replaced_image) = match update_shop_item(&state.db, item_id, patch).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(stored) = stored {
                remove_image(&state, &stored.url).await;
            }
            return Err(e.into());
        }
    };

    if let Some(url) = replaced_image {
        remove_image(&state, &url).await;
    }

    let res = BaseResponse {
        error: false,
        message: item,
    };

    Ok(Json(res))
}

pub async fn delete_item(
    state: State<Arc<ServerState>>,
    Path(item_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    let item = delete_shop_item(&state.db, item_id).await?;

    if let Some(url) = item.image_url {
        remove_image(&state, &url).await;
    }

    let res = BaseResponse {
        error: false,
        message: "Item deleted".to_string(),
    };

    Ok(Json(res))
}
