/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::points::LimitQuery;
use crate::error::WebResult;
use axum::Json;
use axum::extract::{Query, State};
use shop_core::consts::DEFAULT_LEADERBOARD_LIMIT;
use shop_core::input::clamp_limit;
use shop_core::points::{LeaderboardEntry, leaderboard};
use shop_core::types::*;
use std::sync::Arc;

pub async fn get(
    state: State<Arc<ServerState>>,
    Query(query): Query<LimitQuery>,
) -> WebResult<Json<BaseResponse<Vec<LeaderboardEntry>>>> {
    let limit = clamp_limit(query.limit, DEFAULT_LEADERBOARD_LIMIT);

    let res = BaseResponse {
        error: false,
        message: leaderboard(&state.db, limit).await?,
    };

    Ok(Json(res))
}
