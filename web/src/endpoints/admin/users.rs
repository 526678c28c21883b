/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use crate::extract::JsonBody;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use shop_core::types::*;
use shop_core::users::{
    PermissionsUpdate, UserWithStats, get_user_with_stats, list_users_with_stats,
    update_permissions,
};
use std::sync::Arc;
use uuid::Uuid;

pub async fn get_users(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<UserWithStats>>>> {
    let res = BaseResponse {
        error: false,
        message: list_users_with_stats(&state.db).await?,
    };

    Ok(Json(res))
}

pub async fn get_user(
    state: State<Arc<ServerState>>,
    Path(user_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<UserWithStats>>> {
    let res = BaseResponse {
        error: false,
        message: get_user_with_stats(&state.db, user_id).await?,
    };

    Ok(Json(res))
}

pub async fn patch_permissions(
    state: State<Arc<ServerState>>,
    Extension(admin): Extension<MUser>,
    Path(user_id): Path<Uuid>,
    JsonBody(body): JsonBody<PermissionsUpdate>,
) -> WebResult<Json<BaseResponse<MUser>>> {
    let res = BaseResponse {
        error: false,
        message: update_permissions(&state.db, admin.id, user_id, body).await?,
    };

    Ok(Json(res))
}
