/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("catalog is not configured: {0}")]
    NotConfigured(String),
    #[error("unexpected catalog response: {0}")]
    Decode(String),
}
