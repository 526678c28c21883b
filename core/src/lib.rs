/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod categories;
pub mod consts;
pub mod database;
pub mod drivers;
pub mod email;
pub mod input;
pub mod maintenance;
pub mod notifications;
pub mod orders;
pub mod photos;
pub mod points;
pub mod power;
pub mod profile;
pub mod shop;
pub mod storage;
pub mod types;
pub mod users;

use anyhow::{Context, Result};
use catalog::{Catalog, SquareClient, SquareConfig};
use database::connect_db;
use email::EmailService;
use input::load_secret;
use std::sync::Arc;
use std::time::Duration;
use storage::{LocalStorage, StorageProvider};
use tracing::{info, warn};
use types::*;

pub fn init_catalog(cli: &Cli) -> Result<Catalog> {
    let access_token = cli
        .square_access_token_file
        .as_deref()
        .map(load_secret)
        .unwrap_or_default();

    if access_token.is_empty() {
        warn!("No catalog access token configured, catalog requests will fail");
    }

    let client = SquareClient::new(SquareConfig {
        access_token,
        environment: cli.square_environment,
        location_id: cli.square_location_id.clone(),
        api_version: cli.square_api_version.clone(),
        timeout: Duration::from_secs(cli.http_timeout),
    })
    .context("Failed to create catalog client")?;

    Ok(Catalog::new(
        Arc::new(client),
        Duration::from_secs(cli.catalog_cache_ttl),
    ))
}

pub async fn init_state(cli: Cli) -> Result<Arc<ServerState>> {
    if cli.storage_provider != StorageProvider::Local {
        anyhow::bail!(
            "Storage provider {:?} is not supported, use local",
            cli.storage_provider
        );
    }

    let db = connect_db(&cli).await?;
    let catalog = init_catalog(&cli)?;
    let email = EmailService::new(&cli)
        .await
        .context("Failed to initialize email service")?;
    let storage = LocalStorage::new(&cli.upload_dir, &cli.upload_url_prefix);

    info!(
        environment = %cli.square_environment,
        email = email.is_enabled(),
        upload_dir = %cli.upload_dir,
        "Initialized server state"
    );

    Ok(Arc::new(ServerState {
        db,
        cli,
        catalog,
        email,
        storage,
    }))
}
