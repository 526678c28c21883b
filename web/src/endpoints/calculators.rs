/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::error::WebResult;
use crate::extract::JsonBody;
use axum::Json;
use serde::{Deserialize, Serialize};
use shop_core::consts::DEFAULT_CUTTING_FEE;
use shop_core::profile::{
    CutLength, ProfileRequirements, calculate_profile_requirements, format_length,
};
use shop_core::types::BaseResponse;

#[derive(Deserialize, Debug)]
pub struct ProfileRequest {
    #[serde(default)]
    pub required_length: f64,
    #[serde(default)]
    pub cut_lengths: Vec<CutLength>,
    pub price_per_meter: f64,
    pub cutting_fee: Option<f64>,
}

#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub requirements: ProfileRequirements,
    pub total_length_label: String,
    pub offcut_labels: Vec<String>,
}

pub async fn post_profile(
    JsonBody(body): JsonBody<ProfileRequest>,
) -> WebResult<Json<BaseResponse<ProfileResponse>>> {
    let requirements = calculate_profile_requirements(
        body.required_length,
        &body.cut_lengths,
        body.price_per_meter,
        body.cutting_fee.unwrap_or(DEFAULT_CUTTING_FEE),
    )?;

    let res = BaseResponse {
        error: false,
        message: ProfileResponse {
            total_length_label: format_length(requirements.total_length),
            offcut_labels: requirements
                .offcuts
                .iter()
                .map(|o| format_length(*o))
                .collect(),
            requirements,
        },
    };

    Ok(Json(res))
}
