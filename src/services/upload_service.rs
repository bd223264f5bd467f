//! Image upload storage
//!
//! Files land in the configured upload directory under a generated name
//! `{unix_millis}-{random}-{sanitized original name}` and are served back
//! from `/uploads/{name}`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::config::UploadsConfig;
use crate::errors::{LinkpageError, Result};
use crate::utils::generate_random_code;

pub const UPLOAD_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub url: String,
}

/// Keep only `[A-Za-z0-9.-]`, everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Names produced by [`UploadService::store`] only; anything else is refused.
pub fn is_servable_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

pub struct UploadService {
    dir: PathBuf,
    max_bytes: usize,
    allowed_types: Vec<String>,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize, allowed_types: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            allowed_types,
        }
    }

    pub fn from_config(config: &UploadsConfig) -> Self {
        Self::new(
            &config.dir,
            config.max_bytes,
            config.allowed_types.clone(),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn is_allowed_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_types.iter().any(|t| t.eq_ignore_ascii_case(&essence))
    }

    /// Validate and write one uploaded image.
    pub async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<UploadedFile> {
        if data.is_empty() {
            return Err(LinkpageError::upload_rejected("No file uploaded"));
        }
        if data.len() > self.max_bytes {
            return Err(LinkpageError::upload_rejected(format!(
                "File size exceeds {}MB limit",
                self.max_bytes / (1024 * 1024)
            )));
        }
        if !self.is_allowed_type(content_type) {
            return Err(LinkpageError::upload_rejected(format!(
                "Invalid file type: {}. Allowed: {}",
                content_type,
                self.allowed_types.join(", ")
            )));
        }

        let file_name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            generate_random_code(8).to_lowercase(),
            sanitize_file_name(original_name)
        );

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            LinkpageError::file_operation(format!(
                "Failed to create upload directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, data).await.map_err(|e| {
            LinkpageError::file_operation(format!("Failed to save {}: {}", path.display(), e))
        })?;

        info!("Stored upload {} ({} bytes)", file_name, data.len());
        Ok(UploadedFile {
            url: format!("{}/{}", UPLOAD_URL_PREFIX, file_name),
        })
    }

    /// Path of a previously stored file, if the name is acceptable.
    pub fn stored_path(&self, name: &str) -> Option<PathBuf> {
        is_servable_name(name).then(|| self.dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\cat.jpg"), "cat.jpg");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "upload");
        assert_eq!(sanitize_file_name("사진.webp"), "__.webp");
    }

    #[test]
    fn test_is_servable_name() {
        assert!(is_servable_name("1700000000000-abcd1234-cat.png"));
        assert!(!is_servable_name("../secret"));
        assert!(!is_servable_name(".env"));
        assert!(!is_servable_name("a/b.png"));
        assert!(!is_servable_name(""));
    }

    #[test]
    fn test_allowed_type_ignores_parameters_and_case() {
        let service = UploadService::new(
            "uploads",
            1024,
            vec!["image/png".to_string(), "image/svg+xml".to_string()],
        );
        assert!(service.is_allowed_type("image/PNG"));
        assert!(service.is_allowed_type("image/svg+xml; charset=utf-8"));
        assert!(!service.is_allowed_type("application/pdf"));
        assert!(!service.is_allowed_type(""));
    }
}
