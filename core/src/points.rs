/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::*;
use super::types::*;
use chrono::{TimeDelta, Utc};
use entity::points_redemption::RedemptionStatus;
use entity::points_transaction::{ReferenceType, TransactionKind};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PointsError {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Item out of stock")]
    OutOfStock,
    #[error("Insufficient points")]
    InsufficientPoints,
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisitResult {
    pub awarded: bool,
    pub points: PointsSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RedemptionReceipt {
    pub redemption_id: Uuid,
    pub remaining_points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub user_id: Uuid,
    pub email: String,
    pub company_name: Option<String>,
    pub total_accumulated: i64,
}

pub async fn ensure_user_points<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
) -> Result<MUserPoints, DbErr> {
    if let Some(points) = EUserPoints::find()
        .filter(CUserPoints::User.eq(user))
        .one(db)
        .await?
    {
        return Ok(points);
    }

    let now = Utc::now().naive_utc();

    AUserPoints {
        id: Set(Uuid::new_v4()),
        user: Set(user),
        current_balance: Set(0),
        total_accumulated: Set(0),
        last_visit_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn balance<C: ConnectionTrait>(db: &C, user: Uuid) -> Result<PointsSummary, DbErr> {
    let points = ensure_user_points(db, user).await?;
    Ok(PointsSummary::from(&points))
}

async fn record_transaction<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
    kind: TransactionKind,
    amount: i64,
    description: String,
    reference_type: ReferenceType,
    reference_id: Option<String>,
) -> Result<MPointsTransaction, DbErr> {
    APointsTransaction {
        id: Set(Uuid::new_v4()),
        user: Set(user),
        kind: Set(kind),
        amount: Set(amount),
        description: Set(description),
        reference_type: Set(reference_type),
        reference_id: Set(reference_id),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
}

/// Adds `amount` to balance and lifetime total and writes the ledger row,
/// both in one transaction.
async fn credit<C: TransactionTrait>(
    db: &C,
    user: Uuid,
    amount: i64,
    description: String,
    reference_type: ReferenceType,
    reference_id: Option<String>,
) -> Result<PointsSummary, DbErr> {
    let txn = db.begin().await?;
    ensure_user_points(&txn, user).await?;

    EUserPoints::update_many()
        .col_expr(
            CUserPoints::CurrentBalance,
            Expr::col(CUserPoints::CurrentBalance).add(amount),
        )
        .col_expr(
            CUserPoints::TotalAccumulated,
            Expr::col(CUserPoints::TotalAccumulated).add(amount),
        )
        .col_expr(CUserPoints::UpdatedAt, Expr::value(Utc::now().naive_utc()))
        .filter(CUserPoints::User.eq(user))
        .exec(&txn)
        .await?;

    record_transaction(
        &txn,
        user,
        TransactionKind::Earned,
        amount,
        description,
        reference_type,
        reference_id,
    )
    .await?;

    let summary = balance(&txn, user).await?;
    txn.commit().await?;

    Ok(summary)
}

/// Grants the daily visit point unless one was granted in the last 24 hours.
///
/// The interval is enforced by the update's WHERE clause, so two concurrent
/// visits cannot both be credited.
pub async fn award_visit_points<C: TransactionTrait>(
    db: &C,
    user: Uuid,
) -> Result<VisitResult, DbErr> {
    let txn = db.begin().await?;
    let points = ensure_user_points(&txn, user).await?;

    let now = Utc::now().naive_utc();
    let cutoff = now - TimeDelta::hours(VISIT_INTERVAL_HOURS);

    let updated = EUserPoints::update_many()
        .col_expr(
            CUserPoints::CurrentBalance,
            Expr::col(CUserPoints::CurrentBalance).add(VISIT_POINTS),
        )
        .col_expr(
            CUserPoints::TotalAccumulated,
            Expr::col(CUserPoints::TotalAccumulated).add(VISIT_POINTS),
        )
        .col_expr(CUserPoints::LastVisitDate, Expr::value(now))
        .col_expr(CUserPoints::UpdatedAt, Expr::value(now))
        .filter(CUserPoints::User.eq(user))
        .filter(
            Condition::any()
                .add(CUserPoints::LastVisitDate.is_null())
                .add(CUserPoints::LastVisitDate.lte(cutoff)),
        )
        .exec(&txn)
        .await?;

    if updated.rows_affected == 0 {
        debug!(%user, "Visit points already granted in the last day");
        txn.commit().await?;

        return Ok(VisitResult {
            awarded: false,
            points: PointsSummary::from(&points),
        });
    }

    record_transaction(
        &txn,
        user,
        TransactionKind::Earned,
        VISIT_POINTS,
        "Daily site visit".to_string(),
        ReferenceType::Visit,
        None,
    )
    .await?;

    let summary = balance(&txn, user).await?;
    txn.commit().await?;

    Ok(VisitResult {
        awarded: true,
        points: summary,
    })
}

/// One point per full ten dollars. Returns the points granted.
pub async fn award_purchase_points<C: TransactionTrait>(
    db: &C,
    user: Uuid,
    order_id: Uuid,
    total_dollars: f64,
) -> Result<i64, DbErr> {
    let points = purchase_points(total_dollars);

    if points == 0 {
        return Ok(0);
    }

    credit(
        db,
        user,
        points,
        format!("Purchase points: ${:.2}", total_dollars),
        ReferenceType::Order,
        Some(order_id.to_string()),
    )
    .await?;

    info!(%user, %order_id, points, "Awarded purchase points");
    Ok(points)
}

pub fn purchase_points(total_dollars: f64) -> i64 {
    if !total_dollars.is_finite() || total_dollars <= 0.0 {
        return 0;
    }

    (total_dollars / DOLLARS_PER_POINT).floor() as i64
}

pub async fn award_photo_points<C: TransactionTrait>(
    db: &C,
    user: Uuid,
    photo_id: Uuid,
) -> Result<PointsSummary, DbErr> {
    credit(
        db,
        user,
        PHOTO_UPLOAD_POINTS,
        "Photo upload bonus".to_string(),
        ReferenceType::Photo,
        Some(photo_id.to_string()),
    )
    .await
}

pub async fn adjust_points<C: TransactionTrait>(
    db: &C,
    user: Uuid,
    amount: i64,
    description: &str,
) -> Result<PointsSummary, DbErr> {
    credit(
        db,
        user,
        amount,
        description.to_string(),
        ReferenceType::Adjustment,
        None,
    )
    .await
}

/// Spends points on a shop item. Stock and balance are both decremented with
/// guarded updates; if either guard fails nothing is written.
pub async fn redeem_item<C: TransactionTrait>(
    db: &C,
    user: Uuid,
    item_id: Uuid,
) -> Result<RedemptionReceipt, PointsError> {
    let txn = db.begin().await?;

    let item = EPointsShopItem::find_by_id(item_id)
        .one(&txn)
        .await?
        .filter(|item| item.active)
        .ok_or(PointsError::ItemNotFound)?;

    if item.stock_quantity <= 0 {
        return Err(PointsError::OutOfStock);
    }

    let points = ensure_user_points(&txn, user).await?;

    if points.current_balance < item.point_cost {
        return Err(PointsError::InsufficientPoints);
    }

    let now = Utc::now().naive_utc();

    let stock = EPointsShopItem::update_many()
        .col_expr(
            CPointsShopItem::StockQuantity,
            Expr::col(CPointsShopItem::StockQuantity).sub(1),
        )
        .col_expr(CPointsShopItem::UpdatedAt, Expr::value(now))
        .filter(CPointsShopItem::Id.eq(item.id))
        .filter(CPointsShopItem::StockQuantity.gt(0))
        .exec(&txn)
        .await?;

    if stock.rows_affected == 0 {
        return Err(PointsError::OutOfStock);
    }

    let deducted = EUserPoints::update_many()
        .col_expr(
            CUserPoints::CurrentBalance,
            Expr::col(CUserPoints::CurrentBalance).sub(item.point_cost),
        )
        .col_expr(CUserPoints::UpdatedAt, Expr::value(now))
        .filter(CUserPoints::User.eq(user))
        .filter(CUserPoints::CurrentBalance.gte(item.point_cost))
        .exec(&txn)
        .await?;

    if deducted.rows_affected == 0 {
        return Err(PointsError::InsufficientPoints);
    }

    let redemption_id = Uuid::new_v4();

    record_transaction(
        &txn,
        user,
        TransactionKind::Spent,
        item.point_cost,
        format!("Redeemed: {}", item.name),
        ReferenceType::Redemption,
        Some(redemption_id.to_string()),
    )
    .await?;

    APointsRedemption {
        id: Set(redemption_id),
        user: Set(user),
        item: Set(Some(item.id)),
        item_name: Set(item.name.clone()),
        point_cost: Set(item.point_cost),
        status: Set(RedemptionStatus::Pending),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let remaining = balance(&txn, user).await?;
    txn.commit().await?;

    info!(%user, item = %item.id, cost = item.point_cost, "Redeemed points shop item");

    Ok(RedemptionReceipt {
        redemption_id,
        remaining_points: remaining.current,
    })
}

pub async fn transactions<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
    limit: u64,
) -> Result<Vec<MPointsTransaction>, DbErr> {
    EPointsTransaction::find()
        .filter(CPointsTransaction::User.eq(user))
        .order_by_desc(CPointsTransaction::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}

pub async fn leaderboard<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> Result<Vec<LeaderboardEntry>, DbErr> {
    let rows = EUserPoints::find()
        .find_also_related(entity::user::Entity)
        .filter(CUserPoints::TotalAccumulated.gt(0))
        .order_by_desc(CUserPoints::TotalAccumulated)
        .limit(limit)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(points, user)| user.map(|user| (points, user)))
        .enumerate()
        .map(|(index, (points, user))| LeaderboardEntry {
            rank: index as u64 + 1,
            user_id: user.id,
            email: user.email,
            company_name: user.company_name,
            total_accumulated: points.total_accumulated,
        })
        .collect())
}

pub async fn active_shop_items<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<MPointsShopItem>, DbErr> {
    EPointsShopItem::find()
        .filter(CPointsShopItem::Active.eq(true))
        .order_by_asc(CPointsShopItem::PointCost)
        .all(db)
        .await
}

pub async fn user_redemptions<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
) -> Result<Vec<MPointsRedemption>, DbErr> {
    EPointsRedemption::find()
        .filter(CPointsRedemption::User.eq(user))
        .order_by_desc(CPointsRedemption::CreatedAt)
        .all(db)
        .await
}
