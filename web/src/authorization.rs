/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use shop_core::input::load_secret;
use shop_core::types::*;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub id: Uuid,
}

fn bearer_token(req: &Request) -> WebResult<&str> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| WebError::Unauthorized("Authorization header not found".to_string()))?
        .to_str()
        .map_err(|_| WebError::Unauthorized("Invalid Authorization header".to_string()))?;

    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) => Ok(token),
        _ => Err(WebError::Unauthorized(
            "Invalid Authorization header".to_string(),
        )),
    }
}

/// Resolves the bearer token to a fresh user row and stores it in the
/// request extensions.
pub async fn authorize(
    state: State<Arc<ServerState>>,
    mut req: Request,
    next: Next,
) -> WebResult<Response<Body>> {
    let token = bearer_token(&req)?.to_string();

    let token_data = decode_jwt(&state, &token)
        .map_err(|_| WebError::Unauthorized("Invalid or expired token".to_string()))?;

    let current_user = EUser::find_by_id(token_data.claims.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| WebError::Unauthorized("User not found".to_string()))?;

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Runs after [`authorize`]; the admin flag comes from the row loaded for
/// this request, never from the token.
pub async fn require_admin(req: Request, next: Next) -> WebResult<Response<Body>> {
    let is_admin = req
        .extensions()
        .get::<MUser>()
        .is_some_and(|user| user.is_admin);

    if !is_admin {
        return Err(WebError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(req).await)
}

pub fn encode_jwt(state: &ServerState, id: Uuid) -> WebResult<String> {
    let now = Utc::now();
    let expire = Duration::hours(state.cli.jwt_expiry_hours);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;

    let claim = Claims { iat, exp, id };
    let secret = load_secret(&state.cli.jwt_secret_file);

    if secret.is_empty() {
        return Err(WebError::failed_to_generate_token());
    }

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|_| WebError::failed_to_generate_token())
}

pub fn decode_jwt(
    state: &ServerState,
    jwt: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    let secret = load_secret(&state.cli.jwt_secret_file);

    if secret.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat.into());
    }

    decode(
        jwt,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
}
