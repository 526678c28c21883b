/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::cache::CatalogSource;
use super::error::CatalogError;
use super::types::*;
use async_trait::async_trait;
use reqwest::{Method, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};
use uuid::Uuid;

pub const PRODUCTION_URL: &str = "https://connect.squareup.com";
pub const SANDBOX_URL: &str = "https://connect.squareupsandbox.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquareEnvironment {
    Production,
    #[default]
    Sandbox,
}

impl SquareEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            SquareEnvironment::Production => PRODUCTION_URL,
            SquareEnvironment::Sandbox => SANDBOX_URL,
        }
    }
}

impl std::fmt::Display for SquareEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SquareEnvironment::Production => f.write_str("production"),
            SquareEnvironment::Sandbox => f.write_str("sandbox"),
        }
    }
}

impl std::str::FromStr for SquareEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(SquareEnvironment::Production),
            "sandbox" => Ok(SquareEnvironment::Sandbox),
            _ => Err(format!("Unknown Square environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SquareConfig {
    pub access_token: String,
    pub environment: SquareEnvironment,
    pub location_id: Option<String>,
    pub api_version: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SquareClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    api_version: String,
    location_id: Option<String>,
}

impl SquareClient {
    pub fn new(config: SquareConfig) -> Result<Self, CatalogError> {
        Self::with_base_url(config.environment.base_url(), config)
    }

    pub fn with_base_url(base_url: &str, config: SquareConfig) -> Result<Self, CatalogError> {
        let http = reqwest::ClientBuilder::new()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
            api_version: config.api_version,
            location_id: config.location_id,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<T, CatalogError> {
        if self.access_token.is_empty() {
            return Err(CatalogError::NotConfigured(
                "access token is empty".to_string(),
            ));
        }

        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.access_token)
            .header("Square-Version", &self.api_version)
            .header(header::ACCEPT, "application/json")
            .query(query);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogSource for SquareClient {
    #[instrument(skip(self))]
    async fn list_objects(&self, types: &str) -> Result<Vec<CatalogObject>, CatalogError> {
        let mut objects = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("types", types)];
            if let Some(cursor) = &cursor {
                query.push(("cursor", cursor.as_str()));
            }

            let page: ListResponse = self
                .request(Method::GET, "/v2/catalog/list", &query, None)
                .await?;
            debug!(count = page.objects.len(), "Fetched catalog page");
            objects.extend(page.objects);

            match page.cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(objects)
    }

    #[instrument(skip(self))]
    async fn retrieve_objects(
        &self,
        ids: Vec<String>,
    ) -> Result<BatchRetrieveResponse, CatalogError> {
        self.request(
            Method::POST,
            "/v2/catalog/batch-retrieve",
            &[],
            Some(json!({
                "object_ids": ids,
                "include_related_objects": true,
            })),
        )
        .await
    }

    #[instrument(skip(self, order), fields(reference_id = %order.reference_id))]
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, CatalogError> {
        let location_id = self
            .location_id
            .clone()
            .ok_or_else(|| CatalogError::NotConfigured("location id is not set".to_string()))?;

        let line_items: Vec<Value> = order
            .line_items
            .iter()
            .map(|item| {
                json!({
                    "catalog_object_id": item.catalog_object_id,
                    "quantity": item.quantity,
                    "note": item.note,
                })
            })
            .collect();

        let mut body = json!({
            "idempotency_key": Uuid::new_v4().to_string(),
            "order": {
                "location_id": location_id,
                "line_items": line_items,
                "reference_id": order.reference_id,
            },
        });

        if let Some(customer_id) = order.customer_id {
            body["order"]["customer_id"] = Value::String(customer_id);
        }

        let response: Value = self
            .request(Method::POST, "/v2/orders", &[], Some(body))
            .await?;
        let created = &response["order"];

        let id = created["id"]
            .as_str()
            .ok_or_else(|| CatalogError::Decode("order response has no id".to_string()))?;

        Ok(CreatedOrder {
            id: id.to_string(),
            state: created["state"].as_str().map(str::to_string),
            total_cents: created["total_money"]["amount"].as_i64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            SquareEnvironment::from_str("production").unwrap(),
            SquareEnvironment::Production
        );
        assert_eq!(
            SquareEnvironment::from_str("Sandbox").unwrap(),
            SquareEnvironment::Sandbox
        );
        assert!(SquareEnvironment::from_str("staging").is_err());
    }

    #[test]
    fn test_environment_base_url() {
        assert_eq!(SquareEnvironment::Production.base_url(), PRODUCTION_URL);
        assert_eq!(SquareEnvironment::Sandbox.base_url(), SANDBOX_URL);
    }

    #[tokio::test]
    async fn test_empty_token_is_not_configured() {
        let client = SquareClient::new(SquareConfig {
            access_token: String::new(),
            environment: SquareEnvironment::Sandbox,
            location_id: None,
            api_version: "2024-01-18".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        let result = client.list_objects("ITEM").await;
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }
}
