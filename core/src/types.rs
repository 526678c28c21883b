/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::email::EmailService;
use super::input::{greater_than_zero, port_in_range};
use super::storage::{LocalStorage, StorageProvider};
use catalog::{Catalog, SquareEnvironment};
use clap::{Parser, Subcommand};
use entity::*;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug, Clone)]
#[command(name = "EFX Shop", display_name = "EFX Shop", bin_name = "efx-shop", author = "Wavelens", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "EFX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "EFX_IP", default_value = "127.0.0.1")]
    pub ip: String,
    #[arg(long, env = "EFX_PORT", value_parser = port_in_range, default_value_t = 3001)]
    pub port: u16,
    /// Comma-separated list of origins allowed by CORS.
    #[arg(long, env = "EFX_FRONTEND_URL", default_value = "http://localhost:5173")]
    pub frontend_url: String,
    #[arg(long, env = "EFX_DEBUG", default_value = "false")]
    pub debug: bool,
    #[arg(long, env = "EFX_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "EFX_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "EFX_JWT_SECRET_FILE")]
    pub jwt_secret_file: String,
    #[arg(long, env = "EFX_JWT_EXPIRY_HOURS", value_parser = greater_than_zero::<i64>, default_value = "168")]
    pub jwt_expiry_hours: i64,
    #[arg(long, env = "EFX_DISABLE_REGISTRATION", default_value = "false")]
    pub disable_registration: bool,
    #[arg(long, env = "EFX_SQUARE_ACCESS_TOKEN_FILE")]
    pub square_access_token_file: Option<String>,
    #[arg(long, env = "EFX_SQUARE_ENVIRONMENT", default_value = "sandbox")]
    pub square_environment: SquareEnvironment,
    #[arg(long, env = "EFX_SQUARE_LOCATION_ID")]
    pub square_location_id: Option<String>,
    #[arg(long, env = "EFX_SQUARE_API_VERSION", default_value = "2024-01-18")]
    pub square_api_version: String,
    #[arg(long, env = "EFX_CATALOG_CACHE_TTL", value_parser = greater_than_zero::<u64>, default_value = "300")]
    pub catalog_cache_ttl: u64,
    #[arg(long, env = "EFX_HTTP_TIMEOUT", value_parser = greater_than_zero::<u64>, default_value = "30")]
    pub http_timeout: u64,
    #[arg(long, env = "EFX_STORAGE_PROVIDER", default_value = "local")]
    pub storage_provider: StorageProvider,
    #[arg(long, env = "EFX_UPLOAD_DIR", default_value = "./uploads")]
    pub upload_dir: String,
    #[arg(long, env = "EFX_UPLOAD_URL_PREFIX", default_value = "/uploads")]
    pub upload_url_prefix: String,
    #[arg(long, env = "EFX_MAX_UPLOAD_SIZE", value_parser = greater_than_zero::<usize>, default_value = "10485760")]
    pub max_upload_size: usize,
    #[arg(long, env = "EFX_EMAIL_ENABLED", default_value = "false")]
    pub email_enabled: bool,
    #[arg(long, env = "EFX_EMAIL_SMTP_HOST")]
    pub email_smtp_host: Option<String>,
    #[arg(long, env = "EFX_EMAIL_SMTP_PORT", default_value = "587")]
    pub email_smtp_port: u16,
    #[arg(long, env = "EFX_EMAIL_SMTP_USERNAME")]
    pub email_smtp_username: Option<String>,
    #[arg(long, env = "EFX_EMAIL_SMTP_PASSWORD_FILE")]
    pub email_smtp_password_file: Option<String>,
    #[arg(long, env = "EFX_EMAIL_FROM_ADDRESS")]
    pub email_from_address: Option<String>,
    #[arg(long, env = "EFX_EMAIL_FROM_NAME", default_value = "EFX LED Shop")]
    pub email_from_name: String,
    #[arg(long, env = "EFX_EMAIL_DISABLE_TLS", default_value = "false")]
    pub email_disable_tls: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Maintenance tasks run instead of the HTTP server.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a user account.
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long, default_value = "false")]
        admin: bool,
    },
    /// Grant admin rights and both catalog permissions to existing users.
    GrantAdmin {
        #[arg(required = true)]
        emails: Vec<String>,
    },
    /// Print all users with their flags and points.
    ListUsers,
    /// Credit points to a user.
    AddPoints {
        email: String,
        #[arg(value_parser = greater_than_zero::<i64>)]
        amount: i64,
        #[arg(long, default_value = "Manual adjustment")]
        description: String,
    },
}

pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
    pub catalog: Catalog,
    pub email: EmailService,
    pub storage: LocalStorage,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BaseResponse<T> {
    pub error: bool,
    pub message: T,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PointsSummary {
    pub current: i64,
    pub total: i64,
}

impl From<&MUserPoints> for PointsSummary {
    fn from(points: &MUserPoints) -> Self {
        Self {
            current: points.current_balance,
            total: points.total_accumulated,
        }
    }
}

pub type ECategory = category::Entity;
pub type ENotification = notification::Entity;
pub type EOrder = order::Entity;
pub type EPhoto = photo::Entity;
pub type EPointsRedemption = points_redemption::Entity;
pub type EPointsShopItem = points_shop_item::Entity;
pub type EPointsTransaction = points_transaction::Entity;
pub type EProductCategory = product_category::Entity;
pub type EUser = user::Entity;
pub type EUserPoints = user_points::Entity;

pub type MCategory = category::Model;
pub type MNotification = notification::Model;
pub type MOrder = order::Model;
pub type MPhoto = photo::Model;
pub type MPointsRedemption = points_redemption::Model;
pub type MPointsShopItem = points_shop_item::Model;
pub type MPointsTransaction = points_transaction::Model;
pub type MProductCategory = product_category::Model;
pub type MUser = user::Model;
pub type MUserPoints = user_points::Model;

pub type ACategory = category::ActiveModel;
pub type ANotification = notification::ActiveModel;
pub type AOrder = order::ActiveModel;
pub type APhoto = photo::ActiveModel;
pub type APointsRedemption = points_redemption::ActiveModel;
pub type APointsShopItem = points_shop_item::ActiveModel;
pub type APointsTransaction = points_transaction::ActiveModel;
pub type AProductCategory = product_category::ActiveModel;
pub type AUser = user::ActiveModel;
pub type AUserPoints = user_points::ActiveModel;

pub type CCategory = category::Column;
pub type CNotification = notification::Column;
pub type COrder = order::Column;
pub type CPhoto = photo::Column;
pub type CPointsRedemption = points_redemption::Column;
pub type CPointsShopItem = points_shop_item::Column;
pub type CPointsTransaction = points_transaction::Column;
pub type CProductCategory = product_category::Column;
pub type CUser = user::Column;
pub type CUserPoints = user_points::Column;
