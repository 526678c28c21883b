/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Read access to the point-of-sale catalog and order creation against it.
//!
//! [`SquareClient`] speaks the REST API, [`normalize`] turns raw catalog
//! objects into [`Product`]s and [`Catalog`] keeps the product list cached
//! in memory for a fixed time-to-live.

pub mod cache;
pub mod error;
pub mod normalize;
pub mod square;
pub mod types;

pub use cache::{Catalog, CatalogSource};
pub use error::CatalogError;
pub use square::{SquareClient, SquareConfig, SquareEnvironment};
pub use types::*;
