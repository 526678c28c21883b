/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::authorization::encode_jwt;
use crate::error::{WebError, WebResult};
use crate::extract::ValidatedJson;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use shop_core::types::*;
use shop_core::users::{LoginRequest, RegisterRequest, authenticate, create_user};
use std::sync::Arc;
use tracing::info;

#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub user: MUser,
    pub token: String,
}

pub async fn post_register(
    state: State<Arc<ServerState>>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> WebResult<(StatusCode, Json<BaseResponse<AuthResponse>>)> {
    if state.cli.disable_registration {
        return Err(WebError::registration_disabled());
    }

    let user = create_user(&state.db, &body, false).await?;
    let token = encode_jwt(&state, user.id)?;

    info!(user = %user.id, "Registered new user");

    let res = BaseResponse {
        error: false,
        message: AuthResponse { user, token },
    };

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn post_login(
    state: State<Arc<ServerState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> WebResult<Json<BaseResponse<AuthResponse>>> {
    let user = authenticate(&state.db, &body.email, &body.password).await?;
    let token = encode_jwt(&state, user.id)?;

    let res = BaseResponse {
        error: false,
        message: AuthResponse { user, token },
    };

    Ok(Json(res))
}
