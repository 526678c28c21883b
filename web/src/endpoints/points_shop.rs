/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use crate::extract::JsonBody;
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shop_core::points::{active_shop_items, redeem_item, user_redemptions};
use shop_core::types::*;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct RedeemRequest {
    pub item_id: Uuid,
}

#[derive(Serialize, Debug)]
pub struct RedeemResponse {
    pub success: bool,
    pub redemption_id: Uuid,
    pub remaining_points: i64,
}

pub async fn get_items(
    state: State<Arc<ServerState>>,
) -> WebResult<Json<BaseResponse<Vec<MPointsShopItem>>>> {
    let res = BaseResponse {
        error: false,
        message: active_shop_items(&state.db).await?,
    };

    Ok(Json(res))
}

pub async fn post_redeem(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    JsonBody(body): JsonBody<RedeemRequest>,
) -> WebResult<Json<BaseResponse<RedeemResponse>>> {
    let receipt = redeem_item(&state.db, user.id, body.item_id).await?;

    let res = BaseResponse {
        error: false,
        message: RedeemResponse {
            success: true,
            redemption_id: receipt.redemption_id,
            remaining_points: receipt.remaining_points,
        },
    };

    Ok(Json(res))
}

pub async fn get_redemptions(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MPointsRedemption>>>> {
    let res = BaseResponse {
        error: false,
        message: user_redemptions(&state.db, user.id).await?,
    };

    Ok(Json(res))
}
