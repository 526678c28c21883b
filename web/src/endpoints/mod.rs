/*
* SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
*
* SPDX-License-Identifier: AGPL-3.0-only
*/

pub mod admin;
pub mod auth;
pub mod calculators;
pub mod drivers;
pub mod leaderboard;
pub mod orders;
pub mod photos;
pub mod points;
pub mod points_shop;
pub mod square;
pub mod upload;
pub mod user;

use crate::error::{WebError, WebResult};
use axum::extract::Json;
use serde::Serialize;
use shop_core::consts::SHOP_NAME;
use shop_core::types::BaseResponse;

#[derive(Serialize, Debug)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub health: String,
}

pub async fn handle_404() -> WebError {
    WebError::NotFound("Not Found".to_string())
}

pub async fn get_health() -> WebResult<Json<BaseResponse<String>>> {
    let res = BaseResponse {
        error: false,
        message: "200 ALIVE".to_string(),
    };

    Ok(Json(res))
}

pub async fn get_root() -> WebResult<Json<BaseResponse<ServiceInfo>>> {
    let res = BaseResponse {
        error: false,
        message: ServiceInfo {
            name: SHOP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            health: "/api/health".to_string(),
        },
    };

    Ok(Json(res))
}
