/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::*;
use email_address::EmailAddress;
use serde::Serialize;
use std::fmt;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

/// Reads a secret from a file, trimming whitespace. Missing files read as empty.
pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if EmailAddress::is_valid(email.trim()) {
        Ok(())
    } else {
        Err("Invalid email address".to_string())
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password cannot exceed {} characters",
            MAX_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

pub fn clamp_limit(limit: Option<u64>, default: u64) -> u64 {
    limit.unwrap_or(default).clamp(1, MAX_LIST_LIMIT)
}

/// Keeps ASCII alphanumerics, dots, dashes and underscores so uploaded file
/// names can never escape their folder.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.');

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level validation failures for one request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputError {
    pub errors: Vec<FieldError>,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "Invalid input ({})", fields)
    }
}

impl std::error::Error for InputError {}

impl InputError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn check(&mut self, condition: bool, field: &str, message: impl Into<String>) {
        if !condition {
            self.add(field, message);
        }
    }

    pub fn check_result(&mut self, result: Result<(), String>, field: &str) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), InputError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Implemented by request bodies that carry field-level rules beyond what
/// deserialization enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), InputError>;
}
