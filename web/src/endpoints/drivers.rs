/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::{WebError, WebResult};
use crate::extract::ValidatedJson;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use shop_core::consts::{DEFAULT_SAFETY_MARGIN, SAFETY_MARGIN_RANGE};
use shop_core::drivers::{DriverRecommendation, recommend_driver};
use shop_core::input::{InputError, Validate};
use shop_core::power::{PowerCalculation, StripRun, calculate_total_power};
use shop_core::types::*;
use std::sync::Arc;

const SUPPORTED_VOLTAGES: [&str; 2] = ["12V", "24V"];

#[derive(Deserialize, Debug)]
pub struct RecommendRequest {
    pub total_watts: f64,
    pub voltage: String,
    pub safety_margin: Option<f64>,
}

impl Validate for RecommendRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check(
            self.total_watts.is_finite() && self.total_watts > 0.0,
            "total_watts",
            "Total watts must be greater than 0",
        );
        errors.check(
            SUPPORTED_VOLTAGES
                .iter()
                .any(|v| v.eq_ignore_ascii_case(self.voltage.trim())),
            "voltage",
            "Voltage must be 12V or 24V",
        );
        if let Some(margin) = self.safety_margin {
            errors.check(
                SAFETY_MARGIN_RANGE.contains(&margin),
                "safety_margin",
                "Safety margin must be between 1 and 2",
            );
        }
        errors.into_result()
    }
}

#[derive(Deserialize, Debug)]
pub struct CalculateRequest {
    pub strips: Vec<StripRun>,
    pub led_type: Option<String>,
}

impl Validate for CalculateRequest {
    fn validate(&self) -> Result<(), InputError> {
        let mut errors = InputError::new();
        errors.check(!self.strips.is_empty(), "strips", "At least one strip is required");
        for (index, strip) in self.strips.iter().enumerate() {
            errors.check(
                strip.length.is_finite() && strip.length > 0.0,
                &format!("strips[{}].length", index),
                "Length must be greater than 0",
            );
        }
        errors.into_result()
    }
}

#[derive(Serialize, Debug)]
pub struct RecommendResponse {
    pub total_watts: f64,
    pub required_watts: f64,
    pub recommendation: DriverRecommendation,
}

pub async fn post_recommend(
    state: State<Arc<ServerState>>,
    ValidatedJson(body): ValidatedJson<RecommendRequest>,
) -> WebResult<Json<BaseResponse<RecommendResponse>>> {
    let safety_margin = body.safety_margin.unwrap_or(DEFAULT_SAFETY_MARGIN);
    let voltage = body.voltage.trim().to_uppercase();
    let products = state.catalog.products().await?;

    let recommendation = recommend_driver(&products, body.total_watts, &voltage, safety_margin)
        .ok_or_else(|| WebError::NotFound("No suitable driver found".to_string()))?;

    let res = BaseResponse {
        error: false,
        message: RecommendResponse {
            total_watts: body.total_watts,
            required_watts: body.total_watts * safety_margin,
            recommendation,
        },
    };

    Ok(Json(res))
}

pub async fn post_calculate(
    ValidatedJson(body): ValidatedJson<CalculateRequest>,
) -> WebResult<Json<BaseResponse<PowerCalculation>>> {
    let res = BaseResponse {
        error: false,
        message: calculate_total_power(&body.strips, body.led_type.as_deref()),
    };

    Ok(Json(res))
}
