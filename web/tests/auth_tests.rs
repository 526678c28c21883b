/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

mod common;

use axum::http::{HeaderValue, StatusCode, header};
use common::*;
use entity::{user, user_points};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::{Value, json};
use uuid::Uuid;
use web::authorization::{decode_jwt, encode_jwt};

#[test]
fn test_jwt_round_trip() {
    let state = create_mock_state(empty_db());
    let id = Uuid::new_v4();

    let token = encode_jwt(&state, id).unwrap();
    let decoded = decode_jwt(&state, &token).unwrap();

    assert_eq!(decoded.claims.id, id);
    assert_eq!(
        decoded.claims.exp - decoded.claims.iat,
        168 * 60 * 60,
        "default expiry is one week"
    );
}

#[test]
fn test_jwt_rejects_foreign_secret() {
    let state = create_mock_state(empty_db());
    let other = create_mock_state(empty_db());
    std::fs::write(&other.cli.jwt_secret_file, "another-secret").unwrap();

    let token = encode_jwt(&other, Uuid::new_v4()).unwrap();
    assert!(decode_jwt(&state, &token).is_err());
}

#[test]
fn test_jwt_requires_secret() {
    let state = create_mock_state(empty_db());
    let token = encode_jwt(&state, Uuid::new_v4()).unwrap();

    std::fs::write(&state.cli.jwt_secret_file, "").unwrap();

    assert!(encode_jwt(&state, Uuid::new_v4()).is_err());
    assert!(decode_jwt(&state, &token).is_err());
}

#[tokio::test]
async fn test_register_disabled() {
    let state = create_mock_state_with(
        empty_db(),
        create_mock_cli(&["--disable-registration"]),
        Vec::new(),
    );
    let server = test_server(state);

    let response = server
        .post("/api/auth/register")
        .json(&json!({"email": "jamie@example.com", "password": "led-strips-4-all"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Registration is disabled");
}

#[tokio::test]
async fn test_register_validation_details() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .post("/api/auth/register")
        .json(&json!({"email": "not-an-email", "password": "short"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid input");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_register_returns_user_and_token() {
    let mut created = user_row(false);
    created.email = "new@example.com".to_string();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([vec![created.clone()]])
        .append_query_results([Vec::<user_points::Model>::new()])
        .append_query_results([vec![points_row(created.id, 0, 0)]])
        .into_connection();
    let state = create_mock_state(db);
    let server = test_server(state.clone());

    let response = server
        .post("/api/auth/register")
        .json(&json!({"email": "New@Example.com", "password": "led-strips-4-all"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["error"], false);
    assert_eq!(body["message"]["user"]["email"], "new@example.com");
    assert!(body["message"]["user"].get("password").is_none());

    let token = body["message"]["token"].as_str().unwrap();
    assert_eq!(decode_jwt(&state, token).unwrap().claims.id, created.id);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let server = test_server(create_mock_state(db));

    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": "whatever"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server.get("/api/user").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "Authorization header not found");
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let server = test_server(create_mock_state(empty_db()));

    let response = server
        .get("/api/points")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Token abc"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/points")
        .authorization_bearer("not.a.jwt")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_deleted_user_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let state = create_mock_state(db);
    let token = token_for(&state, Uuid::new_v4());
    let server = test_server(state);

    let response = server.get("/api/user").authorization_bearer(token).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "User not found");
}
