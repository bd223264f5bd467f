use crate::api::AppState;
use crate::config::{DEFAULT_ADMIN_PASSWORD, get_config};
use crate::services::UploadService;
use crate::storage::StorageFactory;
use crate::utils::password::is_argon2_hash;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub state: AppState,
}

/// Warn about admin settings that are unsafe in production
fn check_admin_config() {
    let config = get_config();

    if config.admin.password.is_empty() {
        warn!("admin.password is empty: admin login is disabled");
    } else if config.admin.password == DEFAULT_ADMIN_PASSWORD {
        warn!(
            "admin.password is the default '{}'. Change it (see `linkpage hash-password`).",
            DEFAULT_ADMIN_PASSWORD
        );
    } else if !is_argon2_hash(&config.admin.password) {
        warn!("admin.password is stored in plaintext; consider an Argon2 hash");
    }

    if config.admin.jwt_secret.is_empty() {
        warn!("admin.jwt_secret is empty: sessions will not survive a restart");
    }
}

/// 准备服务器启动的上下文：存储、上传目录、共享服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let profile = storage
        .get_or_create_profile()
        .await
        .context("Failed to load profile")?;
    debug!("Profile ready: {}", profile.name);

    let uploads = UploadService::from_config(&config.uploads);
    tokio::fs::create_dir_all(uploads.dir())
        .await
        .with_context(|| format!("Failed to create upload directory {}", uploads.dir().display()))?;
    debug!("Upload directory ready: {}", uploads.dir().display());

    check_admin_config();

    let state = AppState::new(storage, uploads);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(StartupContext { state })
}
