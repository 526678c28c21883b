/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::{InputError, Validate, normalize_email, validate_email, validate_password};
use super::points::ensure_user_points;
use super::types::*;
use chrono::Utc;
use password_auth::{generate_hash, verify_password};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("No fields to update")]
    NoFields,
    #[error("Cannot remove your own admin status")]
    SelfDemotion,
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub phone: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check_result(validate_email(&self.email), "email");
        errors.check_result(validate_password(&self.password), "password");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check_result(validate_email(&self.email), "email");
        errors.check(!self.password.is_empty(), "password", "Password is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermissionsUpdate {
    pub can_view_prices: Option<bool>,
    pub can_order_products: Option<bool>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: MUser,
    pub points: PointsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: MUser,
    pub points_balance: i64,
    pub points_total: i64,
    pub order_count: i64,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Creates the account and its points row together. Admins start with both
/// catalog permissions.
pub async fn create_user<C: TransactionTrait>(
    db: &C,
    request: &RegisterRequest,
    is_admin: bool,
) -> Result<MUser, UserError> {
    let email = normalize_email(&request.email);
    let txn = db.begin().await?;

    if EUser::find()
        .filter(CUser::Email.eq(email.as_str()))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(UserError::EmailTaken);
    }

    let now = Utc::now().naive_utc();

    let user = AUser {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password: Set(generate_hash(&request.password)),
        name: Set(non_empty(&request.name)),
        company_name: Set(non_empty(&request.company_name)),
        phone: Set(non_empty(&request.phone)),
        is_admin: Set(is_admin),
        can_view_prices: Set(is_admin),
        can_order_products: Set(is_admin),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::EmailTaken,
        _ => UserError::Database(e),
    })?;

    ensure_user_points(&txn, user.id).await?;
    txn.commit().await?;

    info!(user = %user.id, is_admin, "Created user");
    Ok(user)
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<MUser>, DbErr> {
    EUser::find()
        .filter(CUser::Email.eq(normalize_email(email)))
        .one(db)
        .await
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
) -> Result<MUser, UserError> {
    let user = find_by_email(db, email)
        .await?
        .ok_or(UserError::InvalidCredentials)?;

    verify_password(password, &user.password).map_err(|_| UserError::InvalidCredentials)?;

    Ok(user)
}

pub async fn profile<C: ConnectionTrait>(db: &C, user: MUser) -> Result<UserProfile, DbErr> {
    let points = ensure_user_points(db, user.id).await?;

    Ok(UserProfile {
        points: PointsSummary::from(&points),
        user,
    })
}

async fn order_counts<C: ConnectionTrait>(db: &C) -> Result<HashMap<Uuid, i64>, DbErr> {
    Ok(EOrder::find()
        .select_only()
        .column(COrder::User)
        .column_as(COrder::Id.count(), "order_count")
        .group_by(COrder::User)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect())
}

fn with_stats(
    user: MUser,
    points: Option<&MUserPoints>,
    counts: &HashMap<Uuid, i64>,
) -> UserWithStats {
    UserWithStats {
        points_balance: points.map(|p| p.current_balance).unwrap_or(0),
        points_total: points.map(|p| p.total_accumulated).unwrap_or(0),
        order_count: counts.get(&user.id).copied().unwrap_or(0),
        user,
    }
}

pub async fn list_users_with_stats<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<UserWithStats>, DbErr> {
    let users = EUser::find()
        .find_also_related(entity::user_points::Entity)
        .order_by_desc(CUser::CreatedAt)
        .all(db)
        .await?;
    let counts = order_counts(db).await?;

    Ok(users
        .into_iter()
        .map(|(user, points)| with_stats(user, points.as_ref(), &counts))
        .collect())
}

pub async fn get_user_with_stats<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<UserWithStats, UserError> {
    let (user, points) = EUser::find_by_id(id)
        .find_also_related(entity::user_points::Entity)
        .one(db)
        .await?
        .ok_or(UserError::NotFound)?;
    let counts = order_counts(db).await?;

    Ok(with_stats(user, points.as_ref(), &counts))
}

/// Granting admin implies both catalog permissions unless they are set
/// explicitly in the same update.
pub async fn update_permissions<C: ConnectionTrait>(
    db: &C,
    actor: Uuid,
    target: Uuid,
    update: PermissionsUpdate,
) -> Result<MUser, UserError> {
    if update.can_view_prices.is_none()
        && update.can_order_products.is_none()
        && update.is_admin.is_none()
    {
        return Err(UserError::NoFields);
    }

    if actor == target && update.is_admin == Some(false) {
        return Err(UserError::SelfDemotion);
    }

    let user = EUser::find_by_id(target)
        .one(db)
        .await?
        .ok_or(UserError::NotFound)?;

    let granting_admin = update.is_admin == Some(true);
    let mut auser = user.into_active_model();

    if let Some(is_admin) = update.is_admin {
        auser.is_admin = Set(is_admin);
    }

    match update.can_view_prices {
        Some(value) => auser.can_view_prices = Set(value),
        None if granting_admin => auser.can_view_prices = Set(true),
        None => {}
    }

    match update.can_order_products {
        Some(value) => auser.can_order_products = Set(value),
        None if granting_admin => auser.can_order_products = Set(true),
        None => {}
    }

    auser.updated_at = Set(Utc::now().naive_utc());
    let user = auser.update(db).await?;

    info!(%actor, user = %user.id, is_admin = user.is_admin, "Updated user permissions");
    Ok(user)
}

/// Returns the emails that matched no account.
pub async fn grant_admin<C: ConnectionTrait>(
    db: &C,
    emails: &[String],
) -> Result<Vec<String>, DbErr> {
    let mut missing = Vec::new();

    for email in emails {
        let Some(user) = find_by_email(db, email).await? else {
            missing.push(email.clone());
            continue;
        };

        let mut auser = user.into_active_model();
        auser.is_admin = Set(true);
        auser.can_view_prices = Set(true);
        auser.can_order_products = Set(true);
        auser.updated_at = Set(Utc::now().naive_utc());
        let user = auser.update(db).await?;

        info!(user = %user.id, email = %user.email, "Granted admin");
    }

    Ok(missing)
}
