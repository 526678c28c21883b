/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::DEFAULT_DRIVER_WATTAGE;
use catalog::Product;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

const DRIVER_KEYWORDS: [&str; 4] = ["driver", "power supply", "transformer", "adapter"];

static DRIVER_WATTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*W").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverRecommendation {
    pub catalog_object_id: String,
    pub name: String,
    pub wattage: u32,
    pub voltage: Option<String>,
    pub price: Option<f64>,
    pub reason: String,
}

struct Candidate<'a> {
    product: &'a Product,
    wattage: u32,
}

impl Candidate<'_> {
    fn recommend(&self, reason: String) -> DriverRecommendation {
        DriverRecommendation {
            catalog_object_id: self.product.id.clone(),
            name: self.product.name.clone(),
            wattage: self.wattage,
            voltage: self.product.attributes.voltage.clone(),
            price: self.product.price,
            reason,
        }
    }
}

pub fn is_driver(product: &Product) -> bool {
    let name = product.name.to_lowercase();
    DRIVER_KEYWORDS.iter().any(|k| name.contains(k))
}

/// First `<n>W` in the product name, else the default driver size.
pub fn driver_wattage(name: &str) -> u32 {
    DRIVER_WATTAGE
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_DRIVER_WATTAGE)
}

fn voltage_compatible(product: &Product, voltage: &str) -> bool {
    let driver_voltage = product
        .attributes
        .voltage
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();
    let voltage = voltage.to_lowercase();

    driver_voltage.contains(&voltage)
        || voltage.contains(&driver_voltage)
        || driver_voltage == "universal"
}

/// Picks a catalog driver for `total_watts` of strip at `voltage`.
///
/// `None` only when the catalog carries no drivers at all.
pub fn recommend_driver(
    products: &[Product],
    total_watts: f64,
    voltage: &str,
    safety_margin: f64,
) -> Option<DriverRecommendation> {
    let required = total_watts * safety_margin;

    let drivers: Vec<Candidate> = products
        .iter()
        .filter(|p| is_driver(p))
        .map(|product| Candidate {
            product,
            wattage: driver_wattage(&product.name),
        })
        .collect();

    if drivers.is_empty() {
        return None;
    }

    let compatible: Vec<&Candidate> = drivers
        .iter()
        .filter(|d| voltage_compatible(d.product, voltage))
        .collect();

    if compatible.is_empty() {
        return best_driver(drivers.iter().collect(), required);
    }

    let in_range = compatible
        .iter()
        .filter(|d| {
            let wattage = f64::from(d.wattage);
            wattage >= required && wattage <= required * 2.0
        })
        .min_by_key(|d| d.wattage);

    if let Some(driver) = in_range {
        return Some(driver.recommend(format!(
            "{}W driver covers {:.1}W with a {}x safety margin",
            driver.wattage, required, safety_margin
        )));
    }

    best_driver(compatible, required)
}

fn best_driver(drivers: Vec<&Candidate>, required: f64) -> Option<DriverRecommendation> {
    if let Some(driver) = drivers
        .iter()
        .filter(|d| f64::from(d.wattage) >= required)
        .min_by_key(|d| d.wattage)
    {
        return Some(driver.recommend(format!(
            "Smallest available driver covering {:.1}W",
            required
        )));
    }

    // First listed wins a tie.
    drivers.iter().rev().max_by_key(|d| d.wattage).map(|driver| {
        driver.recommend(format!(
            "Largest available driver; {:.1}W may need multiple drivers",
            required
        ))
    })
}
