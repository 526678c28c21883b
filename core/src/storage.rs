/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::input::sanitize_file_name;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Local,
    S3,
    Spaces,
}

impl std::str::FromStr for StorageProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageProvider::Local),
            "s3" => Ok(StorageProvider::S3),
            "spaces" => Ok(StorageProvider::Spaces),
            _ => Err(format!("Unknown storage provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub key: String,
    pub url: String,
}

/// Uploads written below a directory that the web layer serves statically.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix, key)
    }

    pub fn key_for(folder: &str, original_name: &str) -> String {
        format!(
            "{}/{}-{}",
            folder,
            Utc::now().timestamp_millis(),
            sanitize_file_name(original_name)
        )
    }

    pub async fn save(&self, folder: &str, original_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        let key = Self::key_for(folder, original_name);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create upload directory {:?}", parent))?;
        }

        fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write upload {:?}", path))?;

        debug!(key = %key, size = bytes.len(), "Stored upload");

        Ok(StoredFile {
            url: self.url_for(&key),
            key,
        })
    }

    /// Removes a stored file. A file that is already gone is not an error.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let path = self.root.join(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(key = %key, "Upload to delete was already missing");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to delete upload {:?}", path)),
        }
    }

    /// Maps a public URL produced by [`LocalStorage::url_for`] back to its key.
    pub fn key_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.url_prefix.as_str())?
            .strip_prefix('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_storage_provider_from_str() {
        assert_eq!(StorageProvider::from_str("local").unwrap(), StorageProvider::Local);
        assert_eq!(StorageProvider::from_str("S3").unwrap(), StorageProvider::S3);
        assert!(StorageProvider::from_str("ftp").is_err());
    }

    #[test]
    fn test_key_for_sanitizes_name() {
        let key = LocalStorage::key_for("photos", "../../etc/my photo.png");

        assert!(key.starts_with("photos/"));
        assert!(key.ends_with("-my_photo.png"));
        assert!(!key.contains(".."));
    }

    #[test]
    fn test_url_round_trip() {
        let storage = LocalStorage::new("/tmp/uploads", "/uploads/");
        let url = storage.url_for("photos/1-a.png");

        assert_eq!(url, "/uploads/photos/1-a.png");
        assert_eq!(storage.key_from_url(&url), Some("photos/1-a.png"));
        assert_eq!(storage.key_from_url("https://elsewhere/a.png"), None);
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let root = std::env::temp_dir().join(format!("efx-storage-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&root, "/uploads");

        let stored = storage.save("photos", "strip.jpg", b"jpeg").await.unwrap();
        let on_disk = tokio::fs::read(root.join(&stored.key)).await.unwrap();
        assert_eq!(on_disk, b"jpeg");

        storage.delete(&stored.key).await.unwrap();
        storage.delete(&stored.key).await.unwrap();

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
