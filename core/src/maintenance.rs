/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Operator tasks run from the command line instead of the HTTP server.

use super::input::Validate;
use super::points::adjust_points;
use super::types::*;
use super::users::{RegisterRequest, create_user, find_by_email, grant_admin, list_users_with_stats};
use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

pub async fn run_command(db: &DatabaseConnection, command: Command) -> Result<()> {
    match command {
        Command::CreateUser {
            email,
            password,
            name,
            company_name,
            admin,
        } => {
            let request = RegisterRequest {
                email,
                password,
                name,
                company_name,
                phone: None,
            };
            request.validate()?;

            let user = create_user(db, &request, admin)
                .await
                .context("Failed to create user")?;
            println!(
                "Created user {} ({}){}",
                user.email,
                user.id,
                if user.is_admin { " with admin rights" } else { "" }
            );
        }

        Command::GrantAdmin { emails } => {
            let missing = grant_admin(db, &emails)
                .await
                .context("Failed to grant admin")?;

            for email in &emails {
                if !missing.contains(email) {
                    println!("Granted admin to {}", email);
                }
            }

            if !missing.is_empty() {
                anyhow::bail!("No user found for: {}", missing.join(", "));
            }
        }

        Command::ListUsers => {
            let users = list_users_with_stats(db)
                .await
                .context("Failed to list users")?;

            println!(
                "{:<38} {:<32} {:<6} {:<6} {:<6} {:>8} {:>8}",
                "ID", "EMAIL", "ADMIN", "PRICES", "ORDER", "POINTS", "TOTAL"
            );
            for entry in users {
                println!(
                    "{:<38} {:<32} {:<6} {:<6} {:<6} {:>8} {:>8}",
                    entry.user.id,
                    entry.user.email,
                    entry.user.is_admin,
                    entry.user.can_view_prices,
                    entry.user.can_order_products,
                    entry.points_balance,
                    entry.points_total
                );
            }
        }

        Command::AddPoints {
            email,
            amount,
            description,
        } => {
            let user = find_by_email(db, &email)
                .await?
                .with_context(|| format!("No user found for {}", email))?;

            let summary = adjust_points(db, user.id, amount, &description)
                .await
                .context("Failed to add points")?;
            println!(
                "Added {} points to {}: balance {}, total {}",
                amount, user.email, summary.current, summary.total
            );
        }
    }

    Ok(())
}
