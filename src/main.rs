/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::Result;
use clap::Parser;
use shop_core::database::connect_db;
use shop_core::init_state;
use shop_core::maintenance::run_command;
use shop_core::types::Cli;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
pub async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(command) = cli.command.take() {
        let db = connect_db(&cli).await?;
        return run_command(&db, command).await;
    }

    let state = init_state(cli).await?;
    web::serve_web(state).await
}
