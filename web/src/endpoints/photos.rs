/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::upload::read_photo_form;
use crate::error::{WebError, WebResult};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use shop_core::consts::{PHOTO_FOLDER, PHOTO_UPLOAD_POINTS};
use shop_core::photos::{record_photo, user_photos};
use shop_core::types::*;
use std::sync::Arc;
use tracing::warn;

#[derive(Serialize, Debug)]
pub struct PhotoUploadResponse {
    pub photo: MPhoto,
    pub points_awarded: i64,
    pub points: PointsSummary,
}

pub async fn post_upload(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
    multipart: Multipart,
) -> WebResult<(StatusCode, Json<BaseResponse<PhotoUploadResponse>>)> {
    let form = read_photo_form(multipart, state.cli.max_upload_size).await?;

    let photo = form
        .photo
        .ok_or_else(|| WebError::BadRequest("No photo uploaded".to_string()))?;

    let stored = state
        .storage
        .save(PHOTO_FOLDER, &photo.file_name, &photo.bytes)
        .await?;
    let key = stored.key.clone();

    let (photo, points) = match record_photo(&state.db, user.id, stored, form.description).await
    {
        Ok(recorded) => recorded,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&key).await {
                warn!(error = %cleanup, key = %key, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    let res = BaseResponse {
        error: false,
        message: PhotoUploadResponse {
            photo,
            points_awarded: PHOTO_UPLOAD_POINTS,
            points,
        },
    };

    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn get_photos(
    state: State<Arc<ServerState>>,
    Extension(user): Extension<MUser>,
) -> WebResult<Json<BaseResponse<Vec<MPhoto>>>> {
    let res = BaseResponse {
        error: false,
        message: user_photos(&state.db, user.id).await?,
    };

    Ok(Json(res))
}
