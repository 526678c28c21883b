/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod authorization;
pub mod endpoints;
pub mod error;
pub mod extract;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get, patch, post, put};
use axum::{Router, middleware};
use endpoints::*;
use shop_core::types::ServerState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Headroom for multipart boundaries and text fields around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn cors_layer(state: &ServerState) -> CorsLayer {
    if state.cli.debug {
        return CorsLayer::very_permissive();
    }

    let origins: Vec<HeaderValue> = state
        .cli
        .frontend_url
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

fn admin_routes() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/api/admin/orders", get(admin::orders::get_orders))
        .route("/api/admin/orders/pending", get(admin::orders::get_pending))
        .route(
            "/api/admin/orders/{order}",
            get(admin::orders::get_order_by_id),
        )
        .route(
            "/api/admin/orders/{order}/approve",
            patch(admin::orders::patch_approve),
        )
        .route("/api/admin/users", get(admin::users::get_users))
        .route("/api/admin/users/{user}", get(admin::users::get_user))
        .route(
            "/api/admin/users/{user}/permissions",
            patch(admin::users::patch_permissions),
        )
        .route(
            "/api/admin/categories",
            get(admin::categories::get_categories).post(admin::categories::post_category),
        )
        .route(
            "/api/admin/categories/sync",
            post(admin::categories::post_sync),
        )
        .route(
            "/api/admin/categories/{category}",
            get(admin::categories::get_category_by_id)
                .put(admin::categories::put_category)
                .delete(admin::categories::delete_category_by_id),
        )
        .route(
            "/api/admin/categories/{category}/products",
            get(admin::categories::get_category_products),
        )
        .route("/api/admin/products", get(admin::products::get_products))
        .route(
            "/api/admin/products/bulk-assign",
            post(admin::products::post_bulk_assign),
        )
        .route(
            "/api/admin/products/{product}",
            get(admin::products::get_product),
        )
        .route(
            "/api/admin/products/{product}/categories",
            post(admin::products::post_product_category),
        )
        .route(
            "/api/admin/products/{product}/categories/{category}",
            delete(admin::products::delete_product_category),
        )
        .route(
            "/api/admin/points-shop/items",
            get(admin::points_shop::get_items).post(admin::points_shop::post_item),
        )
        .route(
            "/api/admin/points-shop/items/{item}",
            put(admin::points_shop::put_item)
                .delete(admin::points_shop::delete_item),
        )
        .route(
            "/api/square/categories/diagnostic",
            get(square::get_diagnostic),
        )
        .route_layer(middleware::from_fn(authorization::require_admin))
}

fn user_routes() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/api/user", get(user::get))
        .route("/api/user/me", get(user::get))
        .route("/api/user/orders", get(user::get_orders))
        .route("/api/user/notifications", get(user::get_notifications))
        .route(
            "/api/user/notifications/{notification}/read",
            post(user::post_notification_read),
        )
        .route(
            "/api/orders",
            get(orders::get_orders).post(orders::post_order),
        )
        .route(
            "/api/orders/{order}",
            get(orders::get_order).put(orders::put_order),
        )
        .route("/api/photos", get(photos::get_photos))
        .route("/api/photos/upload", post(photos::post_upload))
        .route("/api/points", get(points::get_balance))
        .route("/api/points/balance", get(points::get_balance))
        .route("/api/points/visit", post(points::post_visit))
        .route("/api/points/transactions", get(points::get_transactions))
        .route("/api/points-shop/redeem", post(points_shop::post_redeem))
        .route(
            "/api/points-shop/redemptions",
            get(points_shop::get_redemptions),
        )
}

pub fn create_router(state: Arc<ServerState>) -> Router {
    let body_limit = state.cli.max_upload_size + MULTIPART_OVERHEAD;

    let authenticated = user_routes()
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            authorization::authorize,
        ));

    Router::new()
        .merge(authenticated)
        .route("/", get(get_root))
        .route("/api/health", get(get_health))
        .route("/api/auth/register", post(auth::post_register))
        .route("/api/auth/login", post(auth::post_login))
        .route("/api/square/test", get(square::get_test))
        .route("/api/square/products", get(square::get_products))
        .route("/api/square/products/{product}", get(square::get_product))
        .route("/api/square/categories", get(square::get_categories))
        .route(
            "/api/square/categories/{category}/products",
            get(square::get_category_products),
        )
        .route("/api/drivers/recommend", post(drivers::post_recommend))
        .route("/api/drivers/calculate", post(drivers::post_calculate))
        .route("/api/calculators/profile", post(calculators::post_profile))
        .route("/api/points-shop/items", get(points_shop::get_items))
        .route("/api/leaderboard", get(leaderboard::get))
        .nest_service(
            state.storage.url_prefix(),
            ServeDir::new(state.storage.root()),
        )
        .fallback(handle_404)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve_web(state: Arc<ServerState>) -> Result<()> {
    let server_url = format!("{}:{}", state.cli.ip, state.cli.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&server_url)
        .await
        .with_context(|| format!("Failed to bind {}", server_url))?;

    info!("Listening on {}", server_url);
    axum::serve(listener, app)
        .await
        .context("HTTP server stopped unexpectedly")
}
