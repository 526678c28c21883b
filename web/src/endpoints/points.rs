/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shop_core::consts::DEFAULT_TRANSACTION_LIMIT;
use shop_core::input::clamp_limit;
use shop_core::points::{VisitResult, award_visit_points, balance, transactions};
use shop_core::types::*;
use std::sync::Arc;

#[derive(Deserialize, Debug, Default)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

pub async fn post_visit(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<VisitResult>>> {
    let res = BaseResponse {
        error: false,
        message: award_visit_points(&state.db, user.id).await?,
    };

    Ok(Json(res))
}

pub async fn get_balance(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<PointsSummary>>> {
    let res = BaseResponse {
        error: false,
        message: balance(&state.db, user.id).await?,
    };

    Ok(Json(res))
}

pub async fn get_transactions(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    Query(query): Query<LimitQuery>,
) -> WebResult<Json<BaseResponse<Vec<MPointsTransaction>>>> {
    let limit = clamp_limit(query.limit, DEFAULT_TRANSACTION_LIMIT);

    let res = BaseResponse {
        error: false,
        message: transactions(&state.db, user.id, limit).await?,
    };

    Ok(Json(res))
}
