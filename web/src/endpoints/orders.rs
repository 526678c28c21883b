/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use crate::extract::ValidatedJson;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use shop_core::orders::{
    CreateOrderRequest, CustomOrderUpdate, create_catalog_order, create_custom_order,
    get_user_order, list_user_orders, update_custom_order,
};
use shop_core::types::*;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Serialize, Debug)]
pub struct CreateOrderResponse {
    pub order: MOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<i64>,
    pub status_message: String,
}

pub async fn get_orders(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MOrder>>>> {
    let res = BaseResponse {
        error: false,
        message: list_user_orders(&state.db, user.id).await?,
    };

    Ok(Json(res))
}

pub async fn post_order(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    ValidatedJson(body): ValidatedJson<CreateOrderRequest>,
) -> WebResult<(StatusCode, Json<BaseResponse<CreateOrderResponse>>)> {
    let response = match body {
        CreateOrderRequest::Custom(request) => CreateOrderResponse {
            order: create_custom_order(&state.db, user.id, &request).await?,
            points_earned: None,
            status_message: "Order submitted successfully. It will be reviewed and approved shortly."
                .to_string(),
        },
        CreateOrderRequest::Catalog(request) => {
            let created =
                create_catalog_order(&state.db, &state.catalog, user.id, &request).await?;

            CreateOrderResponse {
                order: created.order,
                points_earned: Some(created.points_earned),
                status_message: "Order placed successfully".to_string(),
            }
        }
    };

    let res = BaseResponse {
        error: false,
        message: response,
    };

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_order(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(order_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<MOrder>>> {
    let res = BaseResponse {
        error: false,
        message: get_user_order(&state.db, user.id, order_id).await?,
    };

    Ok(Json(res))
}

pub async fn put_order(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(order_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CustomOrderUpdate>,
) -> WebResult<Json<BaseResponse<MOrder>>> {
    let res = BaseResponse {
        error: false,
        message: update_custom_order(&state.db, user.id, order_id, &body).await?,
    };

    Ok(Json(res))
}
