/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use catalog::{
    BatchRetrieveResponse, Catalog, CatalogError, CatalogObject, CatalogSource, CreatedOrder,
    ItemData, NewOrder,
};
use chrono::Utc;
use clap::Parser;
use entity::{category, user, user_points};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use shop_core::email::EmailService;
use shop_core::storage::LocalStorage;
use shop_core::types::*;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const JWT_SECRET: &str = "efx-test-secret";

/// Catalog that serves a fixed object list and accepts every order.
pub struct StaticCatalog {
    pub objects: Vec<CatalogObject>,
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn list_objects(&self, types: &str) -> Result<Vec<CatalogObject>, CatalogError> {
        Ok(self
            .objects
            .iter()
            .filter(|o| types.split(',').any(|t| t == o.kind))
            .cloned()
            .collect())
    }

    async fn retrieve_objects(
        &self,
        ids: Vec<String>,
    ) -> Result<BatchRetrieveResponse, CatalogError> {
        Ok(BatchRetrieveResponse {
            objects: self
                .objects
                .iter()
                .filter(|o| ids.contains(&o.id))
                .cloned()
                .collect(),
            related_objects: Vec::new(),
        })
    }

    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, CatalogError> {
        Ok(CreatedOrder {
            id: format!("ORDER-{}", order.reference_id),
            state: Some("OPEN".to_string()),
            total_cents: Some(12_500),
        })
    }
}

pub fn catalog_item(id: &str, name: &str) -> CatalogObject {
    CatalogObject {
        kind: "ITEM".to_string(),
        id: id.to_string(),
        item_data: Some(ItemData {
            name: Some(name.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn create_mock_cli(extra: &[&str]) -> Cli {
    let secret_file = std::env::temp_dir().join(format!("efx-jwt-{}", Uuid::new_v4()));
    std::fs::write(&secret_file, JWT_SECRET).unwrap();
    let secret_file = secret_file.to_string_lossy().to_string();

    let mut args = vec![
        "efx-shop",
        "--jwt-secret-file",
        secret_file.as_str(),
        "--database-url",
        "mock://test",
    ];
    args.extend_from_slice(extra);

    Cli::try_parse_from(args).unwrap()
}

pub fn create_mock_state_with(
    db: DatabaseConnection,
    cli: Cli,
    objects: Vec<CatalogObject>,
) -> Arc<ServerState> {
    let upload_dir = std::env::temp_dir().join(format!("efx-uploads-{}", Uuid::new_v4()));

    Arc::new(ServerState {
        catalog: Catalog::new(
            Arc::new(StaticCatalog { objects }),
            Duration::from_secs(300),
        ),
        email: EmailService::disabled(&cli),
        storage: LocalStorage::new(upload_dir, "/uploads"),
        db,
        cli,
    })
}

pub fn create_mock_state(db: DatabaseConnection) -> Arc<ServerState> {
    create_mock_state_with(db, create_mock_cli(&[]), Vec::new())
}

pub fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

pub fn test_server(state: Arc<ServerState>) -> TestServer {
    TestServer::new(web::create_router(state)).unwrap()
}

pub fn user_row(is_admin: bool) -> user::Model {
    let now = Utc::now().naive_utc();
    user::Model {
        id: Uuid::new_v4(),
        email: "jamie@example.com".to_string(),
        password: "not-a-real-hash".to_string(),
        name: Some("Jamie".to_string()),
        company_name: Some("Bright Signs".to_string()),
        phone: None,
        is_admin,
        can_view_prices: is_admin,
        can_order_products: is_admin,
        created_at: now,
        updated_at: now,
    }
}

pub fn points_row(user: Uuid, current: i64, total: i64) -> user_points::Model {
    let now = Utc::now().naive_utc();
    user_points::Model {
        id: Uuid::new_v4(),
        user,
        current_balance: current,
        total_accumulated: total,
        last_visit_date: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn category_row(name: &str) -> category::Model {
    let now = Utc::now().naive_utc();
    category::Model {
        id: Uuid::new_v4(),
        external_id: None,
        name: name.to_lowercase(),
        display_name: name.to_string(),
        description: None,
        is_active: true,
        display_order: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn token_for(state: &ServerState, user: Uuid) -> String {
    web::authorization::encode_jwt(state, user).unwrap()
}
