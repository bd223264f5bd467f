//! URL 校验
//!
//! 链接与社交链接只接受 http/https；图片还可以是站内路径（如 /uploads/xxx.png）。

use url::Url;

use crate::errors::{LinkpageError, Result};

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 校验外部链接地址
pub fn validate_url(url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(LinkpageError::validation("URL cannot be empty"));
    }

    let lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| lower.starts_with(*p)) {
        return Err(LinkpageError::validation(format!(
            "URL protocol is not allowed: {}",
            proto
        )));
    }

    let parsed = Url::parse(url)
        .map_err(|e| LinkpageError::validation(format!("Invalid URL format: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(LinkpageError::validation("URL must include a host")),
        other => Err(LinkpageError::validation(format!(
            "URL must start with http:// or https:// (got {}:)",
            other
        ))),
    }
}

/// 校验图片引用：外部 http(s) 地址或以 `/` 开头的站内路径
pub fn validate_image_ref(reference: &str) -> Result<()> {
    let reference = reference.trim();
    if reference.starts_with('/') && !reference.starts_with("//") {
        if reference.contains("..") {
            return Err(LinkpageError::validation("Image path must not contain '..'"));
        }
        return Ok(());
    }
    validate_url(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/path?q=1").is_ok());
        assert!(validate_url("  https://youtube.com  ").is_ok());
    }

    #[test]
    fn test_rejected_urls() {
        assert!(validate_url("").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("example.com").is_err());
        assert!(validate_url("mailto:hello@example.com").is_err());
    }

    #[test]
    fn test_image_refs() {
        assert!(validate_image_ref("/uploads/1700000000000-ab12-cat.png").is_ok());
        assert!(validate_image_ref("https://github.com/shadcn.png").is_ok());
        assert!(validate_image_ref("/uploads/../config.toml").is_err());
        assert!(validate_image_ref("//evil.example.com/x.png").is_err());
        assert!(validate_image_ref("data:image/png;base64,AAAA").is_err());
    }
}
