/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::email::short_order_id;
use super::types::*;
use chrono::Utc;
use entity::order::OrderStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

pub fn order_status_notification(order_id: Uuid, status: OrderStatus) -> (String, String) {
    let short_id = short_order_id(order_id);

    match status {
        OrderStatus::Approved => (
            "Order Approved".to_string(),
            format!(
                "Your order #{} has been approved and is being processed.",
                short_id
            ),
        ),
        OrderStatus::Rejected => (
            "Order Rejected".to_string(),
            format!(
                "Your order #{} has been rejected. Please contact us for details.",
                short_id
            ),
        ),
        OrderStatus::PickedUp => (
            "Order Picked Up".to_string(),
            format!(
                "Your order #{} has been marked as picked up. Thank you!",
                short_id
            ),
        ),
        OrderStatus::Pending => (
            "Order Updated".to_string(),
            format!("Your order #{} status has been updated.", short_id),
        ),
    }
}

pub async fn notify_order_status<C: ConnectionTrait>(
    db: &C,
    order: &MOrder,
) -> Result<MNotification, DbErr> {
    let (title, message) = order_status_notification(order.id, order.status);

    ANotification {
        id: Set(Uuid::new_v4()),
        user: Set(order.user),
        order_id: Set(Some(order.id)),
        title: Set(title),
        message: Set(message),
        read: Set(false),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
}

pub async fn list_notifications<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
) -> Result<Vec<MNotification>, DbErr> {
    ENotification::find()
        .filter(CNotification::User.eq(user))
        .order_by_desc(CNotification::CreatedAt)
        .all(db)
        .await
}

/// Returns false when the notification does not exist or belongs to
/// someone else.
pub async fn mark_read<C: ConnectionTrait>(db: &C, user: Uuid, id: Uuid) -> Result<bool, DbErr> {
    let result = ENotification::update_many()
        .col_expr(CNotification::Read, Expr::value(true))
        .filter(CNotification::Id.eq(id))
        .filter(CNotification::User.eq(user))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_notification_titles() {
        let id = Uuid::new_v4();

        assert_eq!(
            order_status_notification(id, OrderStatus::Approved).0,
            "Order Approved"
        );
        assert_eq!(
            order_status_notification(id, OrderStatus::Rejected).0,
            "Order Rejected"
        );
        assert_eq!(
            order_status_notification(id, OrderStatus::PickedUp).0,
            "Order Picked Up"
        );
        assert_eq!(
            order_status_notification(id, OrderStatus::Pending).0,
            "Order Updated"
        );
    }

    #[test]
    fn test_notification_mentions_short_id() {
        let id = Uuid::parse_str("3f2a9c1e-0000-4000-8000-000000000000").unwrap();
        let (_, message) = order_status_notification(id, OrderStatus::Approved);

        assert!(message.contains("#3F2A9C1E"));
    }
}
