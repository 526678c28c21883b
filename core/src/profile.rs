/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Aluminium profile sold in 1 m base lengths and cut to order.

use super::consts::{MAX_PROFILE_LENGTH_M, PROFILE_BASE_LENGTH_M};
use serde::{Deserialize, Serialize};

/// One piece of the cut list, needed `quantity` times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutLength {
    pub length: f64,
    #[serde(default = "single_piece")]
    pub quantity: u32,
}

fn single_piece() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRequirements {
    pub total_length: f64,
    pub base_meters: u32,
    pub cuts: u32,
    pub cutting_fee: f64,
    pub offcuts: Vec<f64>,
    pub total_cutting_fees: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("length must be a positive number")]
    InvalidLength,
    #[error("total length must not exceed {}m", MAX_PROFILE_LENGTH_M)]
    TooLong,
    #[error("cut length must be a positive number and quantity at least 1")]
    InvalidCut,
    #[error("price and fee must not be negative")]
    InvalidPrice,
}

/// Base lengths, cuts and cost for a profile order.
///
/// Without a cut list the whole `required_length` is one piece. Every piece
/// is one cut; whatever is left of the last base length is a single offcut.
pub fn calculate_profile_requirements(
    required_length: f64,
    cut_lengths: &[CutLength],
    price_per_meter: f64,
    cutting_fee: f64,
) -> Result<ProfileRequirements, ProfileError> {
    if !price_per_meter.is_finite()
        || !cutting_fee.is_finite()
        || price_per_meter < 0.0
        || cutting_fee < 0.0
    {
        return Err(ProfileError::InvalidPrice);
    }

    if cut_lengths
        .iter()
        .any(|c| !c.length.is_finite() || c.length <= 0.0 || c.quantity == 0)
    {
        return Err(ProfileError::InvalidCut);
    }

    let (total_length, cuts) = if cut_lengths.is_empty() {
        if !required_length.is_finite() || required_length <= 0.0 {
            return Err(ProfileError::InvalidLength);
        }
        (required_length, 1)
    } else {
        let total = cut_lengths
            .iter()
            .map(|c| c.length * f64::from(c.quantity))
            .sum::<f64>();
        let cuts = cut_lengths
            .iter()
            .try_fold(0u32, |acc, c| acc.checked_add(c.quantity))
            .ok_or(ProfileError::TooLong)?;
        (total, cuts)
    };

    if total_length > MAX_PROFILE_LENGTH_M {
        return Err(ProfileError::TooLong);
    }

    let base_meters = u32::try_from((total_length / PROFILE_BASE_LENGTH_M).ceil() as u64)
        .map_err(|_| ProfileError::TooLong)?;
    let supplied = f64::from(base_meters) * PROFILE_BASE_LENGTH_M;
    let leftover = round_mm(supplied - total_length);

    let offcuts = if leftover > 0.0 { vec![leftover] } else { Vec::new() };

    let total_cutting_fees = round_cents(f64::from(cuts) * cutting_fee);
    let total_cost = round_cents(f64::from(base_meters) * price_per_meter + total_cutting_fees);

    Ok(ProfileRequirements {
        total_length,
        base_meters,
        cuts,
        cutting_fee,
        offcuts,
        total_cutting_fees,
        total_cost,
    })
}

/// `"85cm"` below one metre, otherwise metres with up to two decimals.
pub fn format_length(meters: f64) -> String {
    if meters < 1.0 {
        format!("{}cm", (meters * 100.0).round() as i64)
    } else {
        let formatted = format!("{:.2}", meters);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        format!("{}m", trimmed)
    }
}

fn round_mm(meters: f64) -> f64 {
    (meters * 1000.0).round() / 1000.0
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
