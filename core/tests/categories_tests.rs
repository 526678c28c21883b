/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Category CRUD, catalog sync and product mappings

use async_trait::async_trait;
use catalog::{
    BatchRetrieveResponse, Catalog, CatalogError, CatalogObject, CatalogSource, CategoryData,
    CategoryRef, CreatedOrder, ItemData, NewOrder,
};
use chrono::Utc;
use entity::{category, product_category};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use shop_core::categories::*;
use shop_core::input::Validate;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

struct FixedCatalog(Vec<CatalogObject>);

#[async_trait]
impl CatalogSource for FixedCatalog {
    async fn list_objects(&self, types: &str) -> Result<Vec<CatalogObject>, CatalogError> {
        Ok(self
            .0
            .iter()
            .filter(|o| types.split(',').any(|t| t == o.kind))
            .cloned()
            .collect())
    }

    async fn retrieve_objects(
        &self,
        _ids: Vec<String>,
    ) -> Result<BatchRetrieveResponse, CatalogError> {
        Ok(BatchRetrieveResponse::default())
    }

    async fn create_order(&self, _order: NewOrder) -> Result<CreatedOrder, CatalogError> {
        Err(CatalogError::NotConfigured("read-only test catalog".to_string()))
    }
}

fn catalog(objects: Vec<CatalogObject>) -> Catalog {
    Catalog::new(Arc::new(FixedCatalog(objects)), Duration::from_secs(300))
}

fn remote_category(id: &str, name: &str) -> CatalogObject {
    CatalogObject {
        kind: "CATEGORY".to_string(),
        id: id.to_string(),
        category_data: Some(CategoryData {
            name: Some(name.to_string()),
        }),
        ..Default::default()
    }
}

fn remote_item(id: &str, category: &str) -> CatalogObject {
    CatalogObject {
        kind: "ITEM".to_string(),
        id: id.to_string(),
        item_data: Some(ItemData {
            name: Some(format!("Item {}", id)),
            categories: Some(vec![CategoryRef::Id(category.to_string())]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn category_row(name: &str, external_id: Option<&str>) -> category::Model {
    let now = Utc::now().naive_utc();
    category::Model {
        id: Uuid::new_v4(),
        external_id: external_id.map(str::to_string),
        name: name.to_lowercase(),
        display_name: name.to_string(),
        description: None,
        is_active: true,
        display_order: 0,
        created_at: now,
        updated_at: now,
    }
}

fn mapping_row(product_id: &str, category: Uuid, is_primary: bool) -> product_category::Model {
    product_category::Model {
        id: Uuid::new_v4(),
        product_id: product_id.to_string(),
        category,
        is_primary,
        created_at: Utc::now().naive_utc(),
    }
}

#[test]
fn test_new_category_requires_names() {
    let new: NewCategory =
        serde_json::from_value(serde_json::json!({"name": " ", "display_name": ""})).unwrap();

    let err = new.validate().unwrap_err();
    let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "display_name"]);
}

#[tokio::test]
async fn test_list_categories_with_counts() {
    let strips = category_row("Strip Lights", None);
    let drivers = category_row("Drivers", None);

    let mut count_row = BTreeMap::new();
    count_row.insert("category".to_string(), Value::from(strips.id));
    count_row.insert("product_count".to_string(), Value::from(3i64));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![strips.clone(), drivers.clone()]])
        .append_query_results([vec![count_row]])
        .into_connection();

    let categories = list_categories(&db, false).await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].product_count, 3);
    assert_eq!(categories[1].product_count, 0);
}

#[tokio::test]
async fn test_delete_missing_category() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let result = delete_category(&db, Uuid::new_v4()).await;
    assert!(matches!(result, Err(CategoryError::NotFound)));
}

#[tokio::test]
async fn test_unassign_missing_mapping() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let result = unassign_product(&db, "ITEM1", Uuid::new_v4()).await;
    assert!(matches!(result, Err(CategoryError::MappingNotFound)));
}

#[tokio::test]
async fn test_assign_existing_mapping_is_kept() {
    let strips = category_row("Strip Lights", None);
    let mapping = mapping_row("ITEM1", strips.id, true);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![strips.clone()]])
        .append_query_results([vec![mapping.clone()]])
        .into_connection();

    let result = assign_product(&db, "ITEM1", strips.id, true).await.unwrap();
    assert_eq!(result, mapping);
}

#[tokio::test]
async fn test_assign_updates_primary_flag() {
    let strips = category_row("Strip Lights", None);
    let mapping = mapping_row("ITEM1", strips.id, false);
    let mut promoted = mapping.clone();
    promoted.is_primary = true;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![strips.clone()]])
        .append_query_results([vec![mapping]])
        .append_query_results([vec![promoted.clone()]])
        .into_connection();

    let result = assign_product(&db, "ITEM1", strips.id, true).await.unwrap();
    assert!(result.is_primary);
}

#[tokio::test]
async fn test_assign_to_unknown_category() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let result = assign_product(&db, "ITEM1", Uuid::new_v4(), false).await;
    assert!(matches!(result, Err(CategoryError::NotFound)));
}

#[tokio::test]
async fn test_bulk_assign_counts_failures() {
    let strips = category_row("Strip Lights", None);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // bulk lookup
        .append_query_results([vec![strips.clone()]])
        // first product: category, no mapping yet, insert
        .append_query_results([vec![strips.clone()]])
        .append_query_results([Vec::<product_category::Model>::new()])
        .append_query_results([vec![mapping_row("ITEM1", strips.id, false)]])
        // second product: category vanished in between
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let products = vec!["ITEM1".to_string(), "ITEM2".to_string()];
    let result = bulk_assign(&db, &products, strips.id).await.unwrap();

    assert_eq!(
        result,
        BulkAssignResult {
            assigned: 1,
            errors: 1
        }
    );
}

#[tokio::test]
async fn test_sync_creates_and_renames() {
    let existing = category_row("Old Name", Some("CAT1"));
    let mut renamed = existing.clone();
    renamed.name = "Neon".to_string();
    renamed.display_name = "Neon".to_string();

    let catalog = catalog(vec![
        remote_category("CAT1", "Neon"),
        remote_category("CAT2", "Spot Free"),
    ]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing]])
        .append_query_results([vec![renamed]])
        .append_query_results([Vec::<category::Model>::new()])
        .append_query_results([vec![category_row("Spot Free", Some("CAT2"))]])
        .into_connection();

    let result = sync_categories(&db, &catalog).await.unwrap();

    assert_eq!(
        result,
        SyncResult {
            created: 1,
            updated: 1
        }
    );
}

#[tokio::test]
async fn test_storefront_only_lists_mapped_products() {
    let strips = category_row("Strip Lights", None);
    let catalog = catalog(vec![remote_item("A", "CAT1"), remote_item("B", "CAT1")]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(mapping_row("A", strips.id, true), strips.clone())]])
        .into_connection();

    let products = storefront_products(&db, &catalog).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, "A");
    assert_eq!(products[0].category_ids, vec![strips.id.to_string()]);
}

#[tokio::test]
async fn test_category_products_fall_back_to_external_id() {
    let neon = category_row("Neon", Some("#CAT1"));
    let catalog = catalog(vec![remote_item("A", "CAT1"), remote_item("B", "CAT2")]);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<product_category::Model>::new()])
        .into_connection();

    let products = products_for_category(&db, &catalog, &neon).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, "A");
}
