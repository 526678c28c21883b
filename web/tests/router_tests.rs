/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use axum::http::StatusCode;
use catalog::{CatalogObject, CategoryData};
use common::*;
use entity::{category, user_points};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{Value, json};

#[tokio::test]
async fn test_health() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server.get("/api/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"error": false, "message": "200 ALIVE"}));
}

#[tokio::test]
async fn test_root_service_info() {
    let server = test_server(create_mock_state(empty_db()));

    let body: Value = server.get("/").await.json();

    assert_eq!(body["error"], false);
    assert_eq!(body["message"]["name"], "EFX LED Shop");
    assert_eq!(body["message"]["health"], "/api/health");
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server.get("/api/does-not-exist").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body, json!({"error": true, "message": "Not Found"}));
}

#[tokio::test]
async fn test_admin_route_requires_admin() {
    let customer = user_row(false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![customer.clone()]])
        .into_connection();
    let state = create_mock_state(db);
    let token = token_for(&state, customer.id);
    let server = test_server(state);

    let response = server
        .get("/api/admin/users")
        .authorization_bearer(token)
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn test_admin_reads_category() {
    let admin = user_row(true);
    let lighting = category_row("Strip Lights");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![admin.clone()]])
        .append_query_results([vec![lighting.clone()]])
        .into_connection();
    let state = create_mock_state(db);
    let token = token_for(&state, admin.id);
    let server = test_server(state);

    let response = server
        .get(&format!("/api/admin/categories/{}", lighting.id))
        .authorization_bearer(token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["display_name"], "Strip Lights");
}

#[tokio::test]
async fn test_diagnostic_is_not_public() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server.get("/api/square/categories/diagnostic").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_storefront_categories_fall_back_to_catalog() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();
    let catalog = vec![CatalogObject {
        kind: "CATEGORY".to_string(),
        id: "CAT1".to_string(),
        category_data: Some(CategoryData {
            name: Some("Neon".to_string()),
        }),
        ..Default::default()
    }];
    let server = test_server(create_mock_state_with(db, create_mock_cli(&[]), catalog));

    let body: Value = server.get("/api/square/categories").await.json();

    assert_eq!(body["message"], json!([{"id": "CAT1", "name": "Neon"}]));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server.get("/api/square/products/MISSING").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_driver_recommendation_validation() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/drivers/recommend")
        .json(&json!({"total_watts": 0, "voltage": "48V", "safety_margin": 3}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["total_watts", "voltage", "safety_margin"]);
}

#[tokio::test]
async fn test_driver_recommendation_from_catalog() {
    let catalog = vec![
        catalog_item("D60", "LED Driver 60W"),
        catalog_item("D150", "LED Driver 150W"),
        catalog_item("S1", "Neon Strip 5m"),
    ];
    let server = test_server(create_mock_state_with(
        empty_db(),
        create_mock_cli(&[]),
        catalog,
    ));

    let response = server
        .post("/api/drivers/recommend")
        .json(&json!({"total_watts": 100, "voltage": "24v"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["recommendation"]["catalog_object_id"], "D150");
    assert_eq!(body["message"]["recommendation"]["wattage"], 150);
}

#[tokio::test]
async fn test_no_driver_in_catalog() {
    let server = test_server(create_mock_state_with(
        empty_db(),
        create_mock_cli(&[]),
        vec![catalog_item("S1", "Neon Strip 5m")],
    ));

    let response = server
        .post("/api/drivers/recommend")
        .json(&json!({"total_watts": 40, "voltage": "12V"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "No suitable driver found");
}

#[tokio::test]
async fn test_power_calculation() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/drivers/calculate")
        .json(&json!({
            "strips": [{"length": 2.5, "quantity": 2}],
            "led_type": "14.4W/m COB"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["watts_per_meter"], 14.4);
    assert_eq!(body["message"]["total_length"], 5.0);
}

#[tokio::test]
async fn test_profile_calculator() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/calculators/profile")
        .json(&json!({"required_length": 2.5, "price_per_meter": 10.0}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["base_meters"], 3);
    assert_eq!(body["message"]["cuts"], 1);
    assert_eq!(body["message"]["total_cost"], 35.5);
    assert_eq!(body["message"]["offcut_labels"], json!(["50cm"]));
    assert_eq!(body["message"]["total_length_label"], "2.5m");
}

#[tokio::test]
async fn test_profile_calculator_counts_cut_quantities() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/calculators/profile")
        .json(&json!({
            "cut_lengths": [
                {"length": 0.75, "quantity": 4},
                {"length": 0.5, "quantity": 3}
            ],
            "price_per_meter": 10.0
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"]["total_length"], 4.5);
    assert_eq!(body["message"]["base_meters"], 5);
    assert_eq!(body["message"]["cuts"], 7);
    assert_eq!(body["message"]["total_cost"], 88.5);
    assert_eq!(body["message"]["offcut_labels"], json!(["50cm"]));
}

#[tokio::test]
async fn test_profile_calculator_rejects_huge_length() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/calculators/profile")
        .json(&json!({"required_length": 5.0e9, "price_per_meter": 10.0}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "total length must not exceed 10000m");
}

#[tokio::test]
async fn test_profile_calculator_rejects_bad_length() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/calculators/profile")
        .json(&json!({"required_length": -1, "price_per_meter": 10.0}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "length must be a positive number");
}

#[tokio::test]
async fn test_invalid_json_uses_envelope() {
    let customer = user_row(false);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![customer.clone()]])
        .into_connection();
    let state = create_mock_state(db);
    let token = token_for(&state, customer.id);
    let server = test_server(state);

    let response = server
        .post("/api/points-shop/redeem")
        .authorization_bearer(token)
        .json(&json!({"item_id": "not-a-uuid"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_public_leaderboard_needs_no_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user_points::Model>::new()])
        .into_connection();
    let server = test_server(create_mock_state(db));

    let response = server.get("/api/leaderboard?limit=5").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], json!([]));
}
