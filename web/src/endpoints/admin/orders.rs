/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use crate::extract::JsonBody;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use entity::order::OrderStatus;
use serde::Deserialize;
use shop_core::input::InputError;
use shop_core::orders::{
    OrderWithUser, StatusUpdateRequest, get_order, list_orders, transition_status,
};
use shop_core::types::*;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize, Debug, Default)]
pub struct StatusQuery {
    pub status: Option<String>,
}

pub async fn get_pending(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<OrderWithUser>>>> {
    let res = BaseResponse {
        error: false,
        message: list_orders(&state.db, Some(OrderStatus::Pending)).await?,
    };

    Ok(Json(res))
}

pub async fn get_orders(
    state: State<Arc<ServerState>>,
    Query(query): Query<StatusQuery>,
) -> WebResult<Json<BaseResponse<Vec<OrderWithUser>>>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(OrderStatus::from_str)
        .transpose()
        .map_err(|e| InputError::single("status", e))?;

    let res = BaseResponse {
        error: false,
        message: list_orders(&state.db, status).await?,
    };

    Ok(Json(res))
}

pub async fn get_order_by_id(
    state: State<Arc<ServerState>>,
    Path(order_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<OrderWithUser>>> {
    let res = BaseResponse {
        error: false,
        message: get_order(&state.db, order_id).await?,
    };

    Ok(Json(res))
}

pub async fn patch_approve(
    state: State<Arc<ServerState>>,
    Extension(admin): Extension<MUser>,
    Path(order_id): Path<Uuid>,
    JsonBody(body): JsonBody<StatusUpdateRequest>,
) -> WebResult<Json<BaseResponse<MOrder>>> {
    let order = transition_status(&state.db, &state.email, order_id, body).await?;

    info!(admin = %admin.id, order = %order.id, status = %order.status, "Admin updated order");

    let res = BaseResponse {
        error: false,
        message: order,
    };

    Ok(Json(res))
}
