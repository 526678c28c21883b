/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::email::EmailService;
use super::input::{InputError, Validate};
use super::notifications::notify_order_status;
use super::points::award_purchase_points;
use super::types::*;
use catalog::{Catalog, CatalogError, NewLineItem, NewOrder};
use chrono::Utc;
use entity::order::{OrderKind, OrderStatus};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound,
    #[error("You can only edit your own orders")]
    NotOwner,
    #[error("Only pending orders can be edited")]
    NotPending,
    #[error("Only custom orders can be edited")]
    NotCustom,
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Failed to encode order data: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallEnvironment {
    Indoor,
    Outdoor,
    Weatherproof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    Single,
    Dual,
    Rgb,
    Rgbw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    Tail,
    Link,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StripConfig {
    pub length: f64,
    pub connection_type: ConnectionType,
    pub connection_length: f64,
}

/// Configurator answers for a custom LED order, stored verbatim as JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CustomOrderRequest {
    pub environment: InstallEnvironment,
    pub color_type: Option<ColorType>,
    pub led_type: Option<String>,
    pub length: Option<f64>,
    pub tail_wire_length: Option<f64>,
    #[serde(default)]
    pub strips: Vec<StripConfig>,
    #[serde(default)]
    pub include_driver: bool,
    #[serde(default)]
    pub include_profile: bool,
    pub selected_profile: Option<String>,
    #[serde(default)]
    pub include_end_caps: bool,
    pub notes: Option<String>,
    pub project_name: Option<String>,
    pub company: Option<String>,
    pub customer_name: Option<String>,
    pub mobile: Option<String>,
    pub recommended_driver: Option<String>,
}

fn check_dimensions(
    errors: &mut InputError,
    length: Option<f64>,
    tail_wire_length: Option<f64>,
    strips: &[StripConfig],
) {
    if let Some(length) = length {
        errors.check(
            length.is_finite() && length > 0.0,
            "length",
            "Length must be greater than 0",
        );
    }

    if let Some(tail) = tail_wire_length {
        errors.check(
            tail.is_finite() && tail >= 0.0,
            "tail_wire_length",
            "Tail wire length cannot be negative",
        );
    }

    for (i, strip) in strips.iter().enumerate() {
        errors.check(
            strip.length.is_finite() && strip.length > 0.0,
            &format!("strips[{}].length", i),
            "Strip length must be greater than 0",
        );
        errors.check(
            strip.connection_length.is_finite() && strip.connection_length >= 0.0,
            &format!("strips[{}].connection_length", i),
            "Connection length cannot be negative",
        );
    }
}

impl Validate for CustomOrderRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        check_dimensions(&mut errors, self.length, self.tail_wire_length, &self.strips);
        errors.into_result()
    }
}

/// Edit of a pending custom order. Fields left out (or `null`) keep their
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CustomOrderUpdate {
    pub environment: Option<InstallEnvironment>,
    pub color_type: Option<ColorType>,
    pub led_type: Option<String>,
    pub length: Option<f64>,
    pub tail_wire_length: Option<f64>,
    pub strips: Option<Vec<StripConfig>>,
    pub include_driver: Option<bool>,
    pub include_profile: Option<bool>,
    pub selected_profile: Option<String>,
    pub include_end_caps: Option<bool>,
    pub notes: Option<String>,
    pub project_name: Option<String>,
    pub company: Option<String>,
    pub customer_name: Option<String>,
    pub mobile: Option<String>,
    pub recommended_driver: Option<String>,
}

impl Validate for CustomOrderUpdate {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        check_dimensions(
            &mut errors,
            self.length,
            self.tail_wire_length,
            self.strips.as_deref().unwrap_or_default(),
        );
        errors.into_result()
    }
}

impl CustomOrderUpdate {
    /// Overlays the present fields onto stored configurator data.
    pub fn apply(&self, stored: Option<Value>) -> Result<CustomOrderRequest, serde_json::Error> {
        let mut merged = match stored {
            Some(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };

        if let Value::Object(changes) = serde_json::to_value(self)? {
            merged.extend(changes.into_iter().filter(|(_, v)| !v.is_null()));
        }

        serde_json::from_value(Value::Object(merged))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineItemRequest {
    pub catalog_object_id: String,
    pub quantity: String,
    pub name: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogOrderRequest {
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
    pub customer_id: Option<String>,
}

impl Validate for CatalogOrderRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();

        errors.check(
            !self.line_items.is_empty(),
            "line_items",
            "Line items are required for regular orders",
        );

        for (i, item) in self.line_items.iter().enumerate() {
            errors.check(
                !item.catalog_object_id.trim().is_empty(),
                &format!("line_items[{}].catalog_object_id", i),
                "Catalog object id is required",
            );
            errors.check(
                item.quantity.parse::<u32>().is_ok_and(|q| q > 0),
                &format!("line_items[{}].quantity", i),
                "Quantity must be a positive whole number",
            );
        }

        errors.into_result()
    }
}

/// `POST /api/orders` body: a custom order whenever `environment` is set,
/// otherwise a catalog order.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOrderRequest {
    Custom(CustomOrderRequest),
    Catalog(CatalogOrderRequest),
}

impl<'de> Deserialize<'de> for CreateOrderRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let is_custom = value.get("environment").is_some_and(|e| !e.is_null());

        if is_custom {
            serde_json::from_value(value)
                .map(CreateOrderRequest::Custom)
                .map_err(de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(CreateOrderRequest::Catalog)
                .map_err(de::Error::custom)
        }
    }
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), InputError> {
        match self {
            CreateOrderRequest::Custom(request) => request.validate(),
            CreateOrderRequest::Catalog(request) => request.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogOrderCreated {
    pub order: MOrder,
    pub points_earned: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithUser {
    #[serde(flatten)]
    pub order: MOrder,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

impl From<(MOrder, Option<MUser>)> for OrderWithUser {
    fn from((order, user): (MOrder, Option<MUser>)) -> Self {
        Self {
            order,
            user_email: user.as_ref().map(|u| u.email.clone()),
            user_name: user.and_then(|u| u.name),
        }
    }
}

pub async fn create_custom_order<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
    request: &CustomOrderRequest,
) -> Result<MOrder, OrderError> {
    let now = Utc::now().naive_utc();

    let order = AOrder {
        id: Set(Uuid::new_v4()),
        user: Set(user),
        kind: Set(OrderKind::Custom),
        status: Set(OrderStatus::Pending),
        external_order_id: Set(None),
        external_state: Set(None),
        total_amount: Set(None),
        custom_order_data: Set(Some(serde_json::to_value(request)?)),
        line_items: Set(None),
        admin_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(%user, order = %order.id, "Custom order submitted");
    Ok(order)
}

/// Places the order with the catalog first and records it locally with the
/// catalog's total, then credits purchase points. A failed credit is logged
/// and leaves `points_earned` at zero.
pub async fn create_catalog_order<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    catalog: &Catalog,
    user: Uuid,
    request: &CatalogOrderRequest,
) -> Result<CatalogOrderCreated, OrderError> {
    let created = catalog
        .create_order(NewOrder {
            reference_id: format!("user_{}", user),
            customer_id: request.customer_id.clone(),
            line_items: request
                .line_items
                .iter()
                .map(|item| NewLineItem {
                    catalog_object_id: item.catalog_object_id.clone(),
                    quantity: item.quantity.clone(),
                    name: Some(item.name.clone()),
                    note: item.note.clone(),
                })
                .collect(),
        })
        .await?;

    let total_amount = created.total_cents.map(|cents| cents as f64 / 100.0);
    let now = Utc::now().naive_utc();

    let order = AOrder {
        id: Set(Uuid::new_v4()),
        user: Set(user),
        kind: Set(OrderKind::Catalog),
        status: Set(OrderStatus::Pending),
        external_order_id: Set(Some(created.id)),
        external_state: Set(created.state),
        total_amount: Set(total_amount),
        custom_order_data: Set(None),
        line_items: Set(Some(serde_json::to_value(&request.line_items)?)),
        admin_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    let total = total_amount.unwrap_or_default();
    let points_earned = match award_purchase_points(db, user, order.id, total).await {
        Ok(points) => points,
        Err(e) => {
            warn!(error = %e, order = %order.id, "Failed to award purchase points");
            0
        }
    };

    info!(%user, order = %order.id, points_earned, "Catalog order placed");
    Ok(CatalogOrderCreated {
        order,
        points_earned,
    })
}

pub async fn list_user_orders<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
) -> Result<Vec<MOrder>, DbErr> {
    EOrder::find()
        .filter(COrder::User.eq(user))
        .order_by_desc(COrder::CreatedAt)
        .all(db)
        .await
}

/// Another user's order reads as missing.
pub async fn get_user_order<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
    id: Uuid,
) -> Result<MOrder, OrderError> {
    EOrder::find_by_id(id)
        .filter(COrder::User.eq(user))
        .one(db)
        .await?
        .ok_or(OrderError::NotFound)
}

/// Checks run in this order: existence, ownership, status, kind.
pub fn check_editable(order: &MOrder, user: Uuid) -> Result<(), OrderError> {
    if order.user != user {
        return Err(OrderError::NotOwner);
    }

    if order.status != OrderStatus::Pending {
        return Err(OrderError::NotPending);
    }

    if order.kind != OrderKind::Custom {
        return Err(OrderError::NotCustom);
    }

    Ok(())
}

pub async fn update_custom_order<C: ConnectionTrait>(
    db: &C,
    user: Uuid,
    id: Uuid,
    update: &CustomOrderUpdate,
) -> Result<MOrder, OrderError> {
    let order = EOrder::find_by_id(id)
        .one(db)
        .await?
        .ok_or(OrderError::NotFound)?;

    check_editable(&order, user)?;

    let request = update.apply(order.custom_order_data.clone())?;
    let mut aorder = order.into_active_model();
    aorder.custom_order_data = Set(Some(serde_json::to_value(&request)?));
    aorder.updated_at = Set(Utc::now().naive_utc());

    Ok(aorder.update(db).await?)
}

pub async fn list_orders<C: ConnectionTrait>(
    db: &C,
    status: Option<OrderStatus>,
) -> Result<Vec<OrderWithUser>, DbErr> {
    let mut query = EOrder::find().find_also_related(entity::user::Entity);

    if let Some(status) = status {
        query = query.filter(COrder::Status.eq(status));
    }

    Ok(query
        .order_by_desc(COrder::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(OrderWithUser::from)
        .collect())
}

pub async fn get_order<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<OrderWithUser, OrderError> {
    EOrder::find_by_id(id)
        .find_also_related(entity::user::Entity)
        .one(db)
        .await?
        .map(OrderWithUser::from)
        .ok_or(OrderError::NotFound)
}

/// Applies an admin status change, then notifies the customer.
///
/// Notification and approval mail never fail the transition.
pub async fn transition_status<C: ConnectionTrait>(
    db: &C,
    email: &EmailService,
    id: Uuid,
    request: StatusUpdateRequest,
) -> Result<MOrder, OrderError> {
    let order = EOrder::find_by_id(id)
        .one(db)
        .await?
        .ok_or(OrderError::NotFound)?;

    if !order.status.can_transition_to(request.status) {
        return Err(OrderError::InvalidTransition {
            from: order.status,
            to: request.status,
        });
    }

    let previous = order.status;
    let mut aorder = order.into_active_model();
    aorder.status = Set(request.status);
    if let Some(notes) = request.notes {
        aorder.admin_notes = Set(Some(notes));
    }
    aorder.updated_at = Set(Utc::now().naive_utc());

    let order = aorder.update(db).await?;
    info!(order = %order.id, from = %previous, to = %order.status, "Order status changed");

    if let Err(e) = notify_order_status(db, &order).await {
        warn!(error = %e, order = %order.id, "Failed to create order notification");
    }

    if order.status == OrderStatus::Approved {
        match EUser::find_by_id(order.user).one(db).await {
            Ok(Some(user)) => {
                let name = user.name.clone().unwrap_or_else(|| user.email.clone());
                if let Err(e) = email
                    .send_order_approval_email(&user.email, &name, order.id)
                    .await
                {
                    warn!(error = %e, order = %order.id, "Failed to send approval email");
                }
            }
            Ok(None) => warn!(order = %order.id, "Order owner no longer exists"),
            Err(e) => warn!(error = %e, order = %order.id, "Failed to load order owner"),
        }
    }

    Ok(order)
}
