/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use migration::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::time::Duration;
use tracing::info;
use tracing::log::LevelFilter;

use super::input::load_secret;
use super::types::Cli;

pub fn database_url(cli: &Cli) -> Result<String> {
    if let Some(file) = &cli.database_url_file {
        let url = load_secret(file);
        if url.is_empty() {
            anyhow::bail!("Database url file {} is empty or unreadable", file);
        }
        Ok(url)
    } else if let Some(url) = &cli.database_url {
        Ok(url.clone())
    } else {
        anyhow::bail!("No database url provided")
    }
}

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url(cli)?);

    // SQL statement logging only at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    info!("Database connected and migrated");
    Ok(db)
}
