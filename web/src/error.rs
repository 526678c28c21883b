/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::Error as AnyhowError;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use sea_orm::DbErr;
use serde::Serialize;
use shop_core::categories::CategoryError;
use shop_core::input::{FieldError, InputError};
use shop_core::orders::OrderError;
use shop_core::points::PointsError;
use shop_core::profile::ProfileError;
use shop_core::users::UserError;
use std::fmt;

#[derive(Debug)]
pub enum WebError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    PayloadTooLarge(String),
    Database(DbErr),
    Catalog(CatalogError),
    InputValidation(InputError),
    JsonParsing(JsonRejection),
    Internal(AnyhowError),
}

/// Error envelope; `details` only appears for field validation failures.
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            WebError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            WebError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            WebError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            WebError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            WebError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {}", msg),
            WebError::Database(err) => write!(f, "Database error: {}", err),
            WebError::Catalog(err) => write!(f, "Catalog error: {}", err),
            WebError::InputValidation(err) => write!(f, "Input validation error: {}", err),
            WebError::JsonParsing(err) => write!(f, "JSON parsing error: {}", err),
            WebError::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WebError::Database(err) => Some(err),
            WebError::Catalog(err) => Some(err),
            WebError::InputValidation(err) => Some(err),
            WebError::JsonParsing(err) => Some(err),
            WebError::Internal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<DbErr> for WebError {
    fn from(err: DbErr) -> Self {
        WebError::Database(err)
    }
}

impl From<InputError> for WebError {
    fn from(err: InputError) -> Self {
        WebError::InputValidation(err)
    }
}

impl From<JsonRejection> for WebError {
    fn from(err: JsonRejection) -> Self {
        WebError::JsonParsing(err)
    }
}

impl From<AnyhowError> for WebError {
    fn from(err: AnyhowError) -> Self {
        WebError::Internal(err)
    }
}

impl From<CatalogError> for WebError {
    fn from(err: CatalogError) -> Self {
        WebError::Catalog(err)
    }
}

impl From<MultipartError> for WebError {
    fn from(err: MultipartError) -> Self {
        WebError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

impl From<PointsError> for WebError {
    fn from(err: PointsError) -> Self {
        match err {
            PointsError::ItemNotFound => WebError::NotFound(err.to_string()),
            PointsError::OutOfStock | PointsError::InsufficientPoints => {
                WebError::BadRequest(err.to_string())
            }
            PointsError::Database(err) => WebError::Database(err),
        }
    }
}

impl From<OrderError> for WebError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound => WebError::NotFound(err.to_string()),
            OrderError::NotOwner => WebError::Forbidden(err.to_string()),
            OrderError::NotPending
            | OrderError::NotCustom
            | OrderError::InvalidTransition { .. } => WebError::BadRequest(err.to_string()),
            OrderError::Encoding(err) => WebError::Internal(err.into()),
            OrderError::Catalog(err) => WebError::Catalog(err),
            OrderError::Database(err) => WebError::Database(err),
        }
    }
}

impl From<UserError> for WebError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken | UserError::NoFields | UserError::SelfDemotion => {
                WebError::BadRequest(err.to_string())
            }
            UserError::InvalidCredentials => WebError::Unauthorized(err.to_string()),
            UserError::NotFound => WebError::NotFound(err.to_string()),
            UserError::Database(err) => WebError::Database(err),
        }
    }
}

impl From<CategoryError> for WebError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound | CategoryError::MappingNotFound => {
                WebError::NotFound(err.to_string())
            }
            CategoryError::Catalog(err) => WebError::Catalog(err),
            CategoryError::Database(err) => WebError::Database(err),
        }
    }
}

impl From<ProfileError> for WebError {
    fn from(err: ProfileError) -> Self {
        WebError::BadRequest(err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let mut details = None;

        let (status, error_message) = match self {
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            WebError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            WebError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            WebError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            WebError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            WebError::Catalog(CatalogError::NotConfigured(reason)) => {
                tracing::error!("Catalog not configured: {}", reason);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Catalog is not configured".to_string(),
                )
            }
            WebError::Catalog(err) => {
                tracing::error!("Catalog error: {}", err);
                (
                    StatusCode::BAD_GATEWAY,
                    "Catalog request failed".to_string(),
                )
            }
            WebError::InputValidation(err) => {
                details = Some(err.errors);
                (StatusCode::BAD_REQUEST, "Invalid input".to_string())
            }
            WebError::JsonParsing(err) => {
                (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", err))
            }
            WebError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: true,
            message: error_message,
            details,
        });

        (status, body).into_response()
    }
}

pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn not_found(resource: &str) -> Self {
        WebError::NotFound(format!("{} not found", resource))
    }

    pub fn registration_disabled() -> Self {
        WebError::Forbidden("Registration is disabled".to_string())
    }

    pub fn failed_to_generate_token() -> Self {
        WebError::Internal(anyhow::anyhow!("Failed to generate token"))
    }

    pub fn no_fields() -> Self {
        WebError::BadRequest("No fields to update".to_string())
    }
}
