/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use shop_core::notifications::{list_notifications, mark_read};
use shop_core::orders::list_user_orders;
use shop_core::types::*;
use shop_core::users::{UserProfile, profile};
use std::sync::Arc;
use uuid::Uuid;

pub async fn get(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<UserProfile>>> {
    let res = BaseResponse {
        error: false,
        message: profile(&state.db, user).await?,
    };

    Ok(Json(res))
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

pub async fn get_notifications(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MNotification>>>> {
    let res = BaseResponse {
        error: false,
        message: list_notifications(&state.db, user.id).await?,
    };

    Ok(Json(res))
}

pub async fn post_notification_read(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Path(notification_id): Path<Uuid>,
) -> WebResult<Json<BaseResponse<String>>> {
    if !mark_read(&state.db, user.id, notification_id).await? {
        return Err(WebError::not_found("Notification"));
    }

    let res = BaseResponse {
        error: false,
        message: "Notification marked as read".to_string(),
    };

    Ok(Json(res))
}
