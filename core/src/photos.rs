/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::points::award_photo_points;
use super::storage::StoredFile;
use super::types::*;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

/// Records an uploaded photo and credits the upload bonus in one
/// transaction. Photos are visible without moderation.
pub async fn record_photo<C: TransactionTrait>(
    db: &C,
    user: Uuid,
    stored: StoredFile,
    description: Option<String>,
) -> Result<(MPhoto, PointsSummary), DbErr> {
    let txn = db.begin().await?;

    let photo = APhoto {
        id: Set(Uuid::new_v4()),
        user: Set(user),
        file_url: Set(stored.url),
        file_key: Set(stored.key),
        description: Set(description.filter(|d| !d.trim().is_empty())),
        approved: Set(true),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(&txn)
    .await?;

    let points = award_photo_points(&txn, user, photo.id).await?;
    txn.commit().await?;

    info!(%user, photo = %photo.id, "Photo uploaded");
    Ok((photo, points))
}

pub async fn user_photos<C: ConnectionTrait>(db: &C, user: Uuid) -> Result<Vec<MPhoto>, DbErr> {
    EPhoto::find()
        .filter(CPhoto::User.eq(user))
        .order_by_desc(CPhoto::CreatedAt)
        .all(db)
        .await
}
