/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Strip power draw and driver sizing against the fixed BNV driver range.

use super::consts::{DEFAULT_SAFETY_MARGIN, DEFAULT_WATTS_PER_METER};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DriverSpec {
    pub model: &'static str,
    pub voltage: &'static str,
    pub current: f64,
    pub max_watts: f64,
    pub specification: &'static str,
}

/// Ascending by `max_watts`.
pub const DRIVER_SPECS: [DriverSpec; 7] = [
    DriverSpec {
        model: "BNV-15-24",
        voltage: "24VDC",
        current: 0.625,
        max_watts: 15.0,
        specification: "24VDC 0.625A 15W",
    },
    DriverSpec {
        model: "BNV-40-24",
        voltage: "24VDC",
        current: 1.67,
        max_watts: 40.0,
        specification: "24VDC 1.67A 40W",
    },
    DriverSpec {
        model: "BNV-75-24",
        voltage: "24VDC",
        current: 3.125,
        max_watts: 75.0,
        specification: "24VDC 3.125A 75W",
    },
    DriverSpec {
        model: "BNV-100-24",
        voltage: "24VDC",
        current: 4.17,
        max_watts: 100.0,
        specification: "24VDC 4.17A 100W",
    },
    DriverSpec {
        model: "BNV-150-24",
        voltage: "24VDC",
        current: 6.25,
        max_watts: 150.0,
        specification: "24VDC 6.25A 150W",
    },
    DriverSpec {
        model: "BNV-200-24",
        voltage: "24VDC",
        current: 8.33,
        max_watts: 200.0,
        specification: "24VDC 8.33A 200W",
    },
    DriverSpec {
        model: "BNV-300-24",
        voltage: "24VDC",
        current: 12.5,
        max_watts: 300.0,
        specification: "24VDC 12.5A 300W",
    },
];

static WATTS_PER_METER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*W/m").expect("valid regex"));
static WATTS_SLASH_METER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*W\s*/\s*m").expect("valid regex"));
static BARE_WATTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*W(/)?").expect("valid regex"));

/// Watts per metre from a strip type label such as `"14.4W/m COB"`.
///
/// Explicit `W/m` figures win, then a bare wattage, then known product
/// keywords; anything else is assumed to draw the default 8 W/m.
pub fn extract_watts_per_meter(label: Option<&str>) -> f64 {
    let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
        return 0.0;
    };

    for regex in [&*WATTS_PER_METER, &*WATTS_SLASH_METER] {
        if let Some(value) = regex
            .captures(label)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            return value;
        }
    }

    // The regex crate has no lookahead; skip matches followed by a slash.
    for captures in BARE_WATTS.captures_iter(label) {
        if captures.get(2).is_some() {
            continue;
        }
        if let Some(value) = captures
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
        {
            return value;
        }
    }

    let lower = label.to_lowercase();

    if lower.contains("6w") || lower.contains("neon") {
        6.0
    } else if lower.contains("8w") || lower.contains("spot free") {
        8.0
    } else if lower.contains("11w") {
        11.0
    } else if lower.contains("14.4w") {
        14.4
    } else {
        DEFAULT_WATTS_PER_METER
    }
}

pub fn calculate_strip_power(length_m: f64, watts_per_meter: f64) -> f64 {
    length_m * watts_per_meter
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StripRun {
    pub length: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCalculation {
    pub watts_per_meter: f64,
    pub total_length: f64,
    pub total_watts: f64,
    pub required_watts: f64,
    pub driver: Option<DriverSpec>,
    /// More than one driver is needed when even the largest one is too small.
    pub drivers_needed: u32,
}

pub fn calculate_total_power(strips: &[StripRun], led_type: Option<&str>) -> PowerCalculation {
    let watts_per_meter = extract_watts_per_meter(led_type);

    let total_length: f64 = strips
        .iter()
        .map(|s| s.length * f64::from(s.quantity))
        .sum();
    let total_watts = calculate_strip_power(total_length, watts_per_meter);
    let required_watts = total_watts * DEFAULT_SAFETY_MARGIN;

    let driver = if total_watts > 0.0 {
        Some(select_driver(required_watts))
    } else {
        None
    };

    let drivers_needed = match driver {
        Some(driver) => (required_watts / driver.max_watts).ceil().max(1.0) as u32,
        None => 0,
    };

    PowerCalculation {
        watts_per_meter,
        total_length,
        total_watts,
        required_watts,
        driver,
        drivers_needed,
    }
}

/// Smallest driver covering `required_watts`, else the largest one.
pub fn select_driver(required_watts: f64) -> DriverSpec {
    DRIVER_SPECS
        .iter()
        .find(|d| d.max_watts >= required_watts)
        .copied()
        .unwrap_or(DRIVER_SPECS[DRIVER_SPECS.len() - 1])
}

pub fn driver_by_model(model: &str) -> Option<DriverSpec> {
    DRIVER_SPECS
        .iter()
        .find(|d| d.model.eq_ignore_ascii_case(model))
        .copied()
}
