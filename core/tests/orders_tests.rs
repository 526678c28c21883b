/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Order creation payloads, edit rules and admin status changes

use async_trait::async_trait;
use catalog::{
    BatchRetrieveResponse, Catalog, CatalogError, CatalogObject, CatalogSource, CreatedOrder,
    NewOrder,
};
use chrono::Utc;
use clap::Parser;
use entity::order::{self, OrderKind, OrderStatus};
use entity::points_transaction::{self, ReferenceType, TransactionKind};
use entity::{user, user_points};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;
use shop_core::email::EmailService;
use shop_core::input::Validate;
use shop_core::orders::*;
use shop_core::types::Cli;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Accepts every order and remembers the last one it was sent.
#[derive(Default)]
struct RecordingCatalog {
    placed: Mutex<Option<NewOrder>>,
}

#[async_trait]
impl CatalogSource for RecordingCatalog {
    async fn list_objects(&self, _types: &str) -> Result<Vec<CatalogObject>, CatalogError> {
        Ok(Vec::new())
    }

    async fn retrieve_objects(
        &self,
        _ids: Vec<String>,
    ) -> Result<BatchRetrieveResponse, CatalogError> {
        Ok(BatchRetrieveResponse::default())
    }

    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, CatalogError> {
        let id = format!("SQ-{}", order.reference_id);
        *self.placed.lock().unwrap() = Some(order);
        Ok(CreatedOrder {
            id,
            state: Some("OPEN".to_string()),
            total_cents: Some(12599),
        })
    }
}

fn user_row(email: &str) -> user::Model {
    let now = Utc::now().naive_utc();
    user::Model {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password: String::new(),
        name: Some("Jamie".to_string()),
        company_name: None,
        phone: None,
        is_admin: false,
        can_view_prices: true,
        can_order_products: true,
        created_at: now,
        updated_at: now,
    }
}

fn points_row(user: Uuid, balance: i64) -> user_points::Model {
    let now = Utc::now().naive_utc();
    user_points::Model {
        id: Uuid::new_v4(),
        user,
        current_balance: balance,
        total_accumulated: balance,
        last_visit_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn catalog_request() -> CatalogOrderRequest {
    serde_json::from_value(json!({
        "line_items": [
            { "catalog_object_id": "VAR1", "quantity": "2", "name": "Driver 100W" },
            { "catalog_object_id": "VAR2", "quantity": "1", "name": "COB Strip 5m", "note": "warm" }
        ]
    }))
    .unwrap()
}

fn order_row(user: Uuid, kind: OrderKind, status: OrderStatus) -> order::Model {
    let now = Utc::now().naive_utc();
    order::Model {
        id: Uuid::new_v4(),
        user,
        kind,
        status,
        external_order_id: None,
        external_state: None,
        total_amount: None,
        custom_order_data: Some(json!({ "environment": "indoor" })),
        line_items: None,
        admin_notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn custom_request() -> CustomOrderRequest {
    serde_json::from_value(json!({
        "environment": "outdoor",
        "color_type": "rgbw",
        "led_type": "14.4W/m COB",
        "length": 5.0,
        "tail_wire_length": 1.5,
        "strips": [
            { "length": 2.5, "connection_type": "tail", "connection_length": 1.0 },
            { "length": 2.5, "connection_type": "link", "connection_length": 0.0 }
        ],
        "include_driver": true,
        "project_name": "Shopfront"
    }))
    .unwrap()
}

fn custom_update() -> CustomOrderUpdate {
    serde_json::from_value(json!({
        "length": 4.0,
        "project_name": "Shopfront"
    }))
    .unwrap()
}

fn email_service() -> EmailService {
    let cli = Cli::try_parse_from(["efx-shop", "--jwt-secret-file", "/dev/null"]).unwrap();
    EmailService::disabled(&cli)
}

#[test]
fn test_create_request_dispatches_on_environment() {
    let custom: CreateOrderRequest = serde_json::from_value(json!({
        "environment": "indoor",
        "length": 3.0
    }))
    .unwrap();
    assert!(matches!(custom, CreateOrderRequest::Custom(_)));

    let catalog: CreateOrderRequest = serde_json::from_value(json!({
        "line_items": [
            { "catalog_object_id": "VAR1", "quantity": "2", "name": "Driver 100W" }
        ]
    }))
    .unwrap();
    assert!(matches!(catalog, CreateOrderRequest::Catalog(_)));
    assert!(catalog.validate().is_ok());

    let bad_environment = serde_json::from_value::<CreateOrderRequest>(json!({
        "environment": "underwater"
    }));
    assert!(bad_environment.is_err());
}

#[test]
fn test_catalog_order_requires_line_items() {
    let empty: CreateOrderRequest = serde_json::from_value(json!({})).unwrap();
    let errors = empty.validate().unwrap_err();

    assert_eq!(errors.errors[0].field, "line_items");
    assert_eq!(
        errors.errors[0].message,
        "Line items are required for regular orders"
    );
}

#[test]
fn test_custom_order_validation() {
    assert!(custom_request().validate().is_ok());

    let mut request = custom_request();
    request.length = Some(0.0);
    request.tail_wire_length = Some(-1.0);
    request.strips[1].length = -2.0;

    let errors = request.validate().unwrap_err();
    let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["length", "tail_wire_length", "strips[1].length"]);
}

#[test]
fn test_check_editable() {
    let owner = Uuid::new_v4();

    let pending = order_row(owner, OrderKind::Custom, OrderStatus::Pending);
    assert!(check_editable(&pending, owner).is_ok());
    assert!(matches!(
        check_editable(&pending, Uuid::new_v4()),
        Err(OrderError::NotOwner)
    ));

    let approved = order_row(owner, OrderKind::Custom, OrderStatus::Approved);
    assert!(matches!(
        check_editable(&approved, owner),
        Err(OrderError::NotPending)
    ));

    let catalog = order_row(owner, OrderKind::Catalog, OrderStatus::Pending);
    assert!(matches!(
        check_editable(&catalog, owner),
        Err(OrderError::NotCustom)
    ));
}

#[test]
fn test_update_keeps_unset_fields() {
    let stored = serde_json::to_value(custom_request()).unwrap();
    let update: CustomOrderUpdate = serde_json::from_value(json!({
        "environment": null,
        "length": 4.0,
        "include_driver": false
    }))
    .unwrap();

    let merged = update.apply(Some(stored)).unwrap();

    assert_eq!(merged.environment, InstallEnvironment::Outdoor);
    assert_eq!(merged.length, Some(4.0));
    assert!(!merged.include_driver);
    assert_eq!(merged.strips.len(), 2);
    assert_eq!(merged.project_name.as_deref(), Some("Shopfront"));
}

#[test]
fn test_update_validation() {
    assert!(CustomOrderUpdate::default().validate().is_ok());

    let update: CustomOrderUpdate = serde_json::from_value(json!({
        "length": -1.0,
        "strips": [{ "length": 1.0, "connection_type": "tail", "connection_length": -0.5 }]
    }))
    .unwrap();

    let errors = update.validate().unwrap_err();
    let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["length", "strips[0].connection_length"]);
}

#[tokio::test]
async fn test_editing_approved_order_is_rejected() {
    let owner = Uuid::new_v4();
    let approved = order_row(owner, OrderKind::Custom, OrderStatus::Approved);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![approved.clone()]])
        .into_connection();

    let result = update_custom_order(&db, owner, approved.id, &custom_update()).await;
    assert!(matches!(result, Err(OrderError::NotPending)));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(!log.contains("UPDATE"));
}

#[tokio::test]
async fn test_editing_pending_order_merges_data() {
    let owner = Uuid::new_v4();
    let pending = order_row(owner, OrderKind::Custom, OrderStatus::Pending);
    let mut updated = pending.clone();
    updated.custom_order_data = Some(json!({
        "environment": "indoor",
        "length": 4.0,
        "project_name": "Shopfront"
    }));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()], vec![updated]])
        .into_connection();

    let order = update_custom_order(&db, owner, pending.id, &custom_update())
        .await
        .unwrap();
    assert_eq!(order.custom_order_data.unwrap()["project_name"], "Shopfront");

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("indoor"));
    assert!(log.contains("Shopfront"));
}

#[tokio::test]
async fn test_editing_missing_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<order::Model>::new()])
        .into_connection();

    let result = update_custom_order(&db, Uuid::new_v4(), Uuid::new_v4(), &custom_update()).await;
    assert!(matches!(result, Err(OrderError::NotFound)));
}

#[tokio::test]
async fn test_catalog_order_records_total_and_awards_points() {
    let user = Uuid::new_v4();
    let source = Arc::new(RecordingCatalog::default());
    let catalog = Catalog::new(source.clone(), Duration::from_secs(300));

    let mut placed = order_row(user, OrderKind::Catalog, OrderStatus::Pending);
    placed.external_order_id = Some(format!("SQ-user_{}", user));
    placed.total_amount = Some(125.99);

    let ledger = points_transaction::Model {
        id: Uuid::new_v4(),
        user,
        kind: TransactionKind::Earned,
        amount: 12,
        description: "Purchase points: $125.99".to_string(),
        reference_type: ReferenceType::Order,
        reference_id: Some(placed.id.to_string()),
        created_at: Utc::now().naive_utc(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![placed.clone()]])
        .append_query_results([vec![points_row(user, 3)]])
        .append_query_results([vec![ledger]])
        .append_query_results([vec![points_row(user, 15)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let created = create_catalog_order(&db, &catalog, user, &catalog_request())
        .await
        .unwrap();

    assert_eq!(created.points_earned, 12);
    assert_eq!(created.order.total_amount, Some(125.99));

    let sent = source.placed.lock().unwrap().clone().unwrap();
    assert_eq!(sent.reference_id, format!("user_{}", user));
    assert_eq!(sent.line_items.len(), 2);
    assert_eq!(sent.line_items[0].catalog_object_id, "VAR1");
    assert_eq!(sent.line_items[0].quantity, "2");
    assert_eq!(sent.line_items[1].note.as_deref(), Some("warm"));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("INSERT INTO \\\"order\\\""));
    assert!(log.contains("Double(Some(125.99))"));
    assert!(log.contains("INSERT INTO \\\"points_transaction\\\""));
    assert!(log.contains("Purchase points: $125.99"));
}

#[tokio::test]
async fn test_catalog_order_survives_points_failure() {
    let user = Uuid::new_v4();
    let catalog = Catalog::new(
        Arc::new(RecordingCatalog::default()),
        Duration::from_secs(300),
    );

    let mut placed = order_row(user, OrderKind::Catalog, OrderStatus::Pending);
    placed.total_amount = Some(125.99);

    // Only the order insert has a result; the points lookup fails.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![placed.clone()]])
        .into_connection();

    let created = create_catalog_order(&db, &catalog, user, &catalog_request())
        .await
        .unwrap();

    assert_eq!(created.order.id, placed.id);
    assert_eq!(created.points_earned, 0);
}

#[tokio::test]
async fn test_list_orders_joins_owner() {
    let owner = user_row("jamie@example.com");
    let pending = order_row(owner.id, OrderKind::Custom, OrderStatus::Pending);
    let orphan = order_row(Uuid::new_v4(), OrderKind::Catalog, OrderStatus::Pending);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            (pending.clone(), Some(owner.clone())),
            (orphan.clone(), None),
        ]])
        .into_connection();

    let orders = list_orders(&db, Some(OrderStatus::Pending)).await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order.id, pending.id);
    assert_eq!(orders[0].user_email.as_deref(), Some("jamie@example.com"));
    assert_eq!(orders[0].user_name.as_deref(), Some("Jamie"));
    assert_eq!(orders[1].user_email, None);

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("LEFT JOIN \\\"user\\\""));
}

#[tokio::test]
async fn test_rejected_order_cannot_be_approved() {
    let rejected = order_row(Uuid::new_v4(), OrderKind::Custom, OrderStatus::Rejected);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![rejected.clone()]])
        .into_connection();

    let result = transition_status(
        &db,
        &email_service(),
        rejected.id,
        StatusUpdateRequest {
            status: OrderStatus::Approved,
            notes: None,
        },
    )
    .await;

    assert!(matches!(
        result,
        Err(OrderError::InvalidTransition {
            from: OrderStatus::Rejected,
            to: OrderStatus::Approved
        })
    ));
}

#[tokio::test]
async fn test_approval_survives_notification_failure() {
    let pending = order_row(Uuid::new_v4(), OrderKind::Custom, OrderStatus::Pending);
    let mut approved = pending.clone();
    approved.status = OrderStatus::Approved;
    approved.admin_notes = Some("Ready Friday".to_string());

    // Only the lookup and the update have results; the notification insert
    // and the owner lookup both fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![pending.clone()], vec![approved]])
        .into_connection();

    let order = transition_status(
        &db,
        &email_service(),
        pending.id,
        StatusUpdateRequest {
            status: OrderStatus::Approved,
            notes: Some("Ready Friday".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(order.status, OrderStatus::Approved);
    assert_eq!(order.admin_notes.as_deref(), Some("Ready Friday"));
}
