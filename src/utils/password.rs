//! 管理员密码
//!
//! 配置中的密码可以是 Argon2 哈希（推荐），也可以是明文。
//! 明文比较使用常量时间算法。

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use subtle::ConstantTimeEq;

#[derive(Debug)]
pub enum PasswordError {
    HashError(String),
    VerifyError(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashError(msg) => write!(f, "Password hash error: {}", msg),
            Self::VerifyError(msg) => write!(f, "Password verify error: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Argon2id 哈希
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::VerifyError(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn is_argon2_hash(s: &str) -> bool {
    s.starts_with("$argon2")
}

/// 校验登录密码
///
/// `configured` 为空时拒绝所有登录。
pub fn verify_admin_password(input: &str, configured: &str) -> Result<bool, PasswordError> {
    if configured.is_empty() {
        return Ok(false);
    }
    if is_argon2_hash(configured) {
        return verify_password(input, configured);
    }
    Ok(input.as_bytes().ct_eq(configured.as_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("s3cret-pass").expect("hash should succeed");

        assert!(is_argon2_hash(&hash));
        assert!(verify_password("s3cret-pass", &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_admin_password_plaintext() {
        assert!(verify_admin_password("admin1234", "admin1234").unwrap());
        assert!(!verify_admin_password("admin123", "admin1234").unwrap());
        assert!(!verify_admin_password("", "admin1234").unwrap());
    }

    #[test]
    fn test_admin_password_hashed() {
        let hash = hash_password("letmein").unwrap();
        assert!(verify_admin_password("letmein", &hash).unwrap());
        assert!(!verify_admin_password("$argon2", &hash).unwrap());
    }

    #[test]
    fn test_admin_password_empty_config_rejects() {
        assert!(!verify_admin_password("", "").unwrap());
        assert!(!verify_admin_password("anything", "").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_admin_password("x", "$argon2id$broken").is_err());
    }
}
