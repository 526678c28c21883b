/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for user entity

use chrono::NaiveDate;
use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, QueryFilter, entity::prelude::*};
use uuid::Uuid;

fn sample_user(id: Uuid) -> user::Model {
    let naive_date = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    user::Model {
        id,
        email: "test@example.com".to_owned(),
        password: "hashed_password".to_owned(),
        name: Some("Test User".to_owned()),
        company_name: Some("Lights Ltd".to_owned()),
        phone: None,
        is_admin: false,
        can_view_prices: false,
        can_order_products: false,
        created_at: naive_date,
        updated_at: naive_date,
    }
}

#[tokio::test]
async fn test_user_entity_basic() -> Result<(), DbErr> {
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_user(user_id)]])
        .into_connection();

    let result = user::Entity::find_by_id(user_id).one(&db).await?;

    assert!(result.is_some());
    let user = result.unwrap();
    assert_eq!(user.email, "test@example.com");
    assert!(!user.is_admin);

    Ok(())
}

#[tokio::test]
async fn test_user_find_by_email() -> Result<(), DbErr> {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![sample_user(Uuid::new_v4())]])
        .into_connection();

    let result = user::Entity::find()
        .filter(user::Column::Email.eq("test@example.com"))
        .one(&db)
        .await?;

    assert_eq!(result.unwrap().company_name.as_deref(), Some("Lights Ltd"));

    Ok(())
}

#[test]
fn test_user_password_is_not_serialized() {
    let json = serde_json::to_value(sample_user(Uuid::new_v4())).unwrap();

    assert!(json.get("password").is_none());
    assert_eq!(json["email"], "test@example.com");
}
