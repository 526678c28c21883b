/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Multipart form parsing shared by photo and shop item uploads.

use crate::error::{WebError, WebResult};
use axum::extract::Multipart;
use axum::extract::multipart::Field;
use shop_core::input::InputError;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Reads an `image/*` field, refusing it once it grows past `max_size`.
pub async fn read_image(mut field: Field<'_>, max_size: usize) -> WebResult<UploadedImage> {
    let content_type = field.content_type().unwrap_or_default().to_string();

    if !content_type.starts_with("image/") {
        return Err(WebError::BadRequest(
            "Only image files are allowed".to_string(),
        ));
    }

    let file_name = field.file_name().unwrap_or("upload").to_string();
    let mut bytes = Vec::new();

    while let Some(chunk) = field.chunk().await? {
        if bytes.len() + chunk.len() > max_size {
            return Err(WebError::PayloadTooLarge(format!(
                "File exceeds the {} byte limit",
                max_size
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err(WebError::BadRequest("Uploaded file is empty".to_string()));
    }

    Ok(UploadedImage {
        file_name,
        content_type,
        bytes,
    })
}

pub fn parse_number<T: FromStr>(field: &str, value: &str) -> Result<T, InputError> {
    value
        .trim()
        .parse()
        .map_err(|_| InputError::single(field, "Must be a whole number"))
}

pub fn parse_flag(field: &str, value: &str) -> Result<bool, InputError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(InputError::single(field, "Must be true or false")),
    }
}

#[derive(Debug, Default)]
pub struct PhotoForm {
    pub photo: Option<UploadedImage>,
    pub description: Option<String>,
}

pub async fn read_photo_form(mut multipart: Multipart, max_size: usize) -> WebResult<PhotoForm> {
    let mut form = PhotoForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("photo") => form.photo = Some(read_image(field, max_size).await?),
            Some("description") => form.description = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}

/// Shop item fields as sent by the admin form; absent fields stay `None`.
#[derive(Debug, Default)]
pub struct ShopItemForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub point_cost: Option<i64>,
    pub stock_quantity: Option<i32>,
    pub active: Option<bool>,
    pub image: Option<UploadedImage>,
}

pub async fn read_shop_item_form(
    mut multipart: Multipart,
    max_size: usize,
) -> WebResult<ShopItemForm> {
    let mut form = ShopItemForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => form.image = Some(read_image(field, max_size).await?),
            "name" => form.name = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            "point_cost" => form.point_cost = Some(parse_number(&name, &field.text().await?)?),
            "stock_quantity" => {
                form.stock_quantity = Some(parse_number(&name, &field.text().await?)?)
            }
            "active" => form.active = Some(parse_flag(&name, &field.text().await?)?),
            _ => {}
        }
    }

    Ok(form)
}
