//! Visit and click recording
//!
//! Recording is best-effort for click-through: a failed insert is logged
//! and the visitor is still redirected.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::visibility::resolve;
use crate::analytics::EventStore;
use crate::errors::{LinkpageError, Result};
use crate::storage::SeaOrmStorage;

/// What a click-through request resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Redirect(String),
    Locked { open_at: DateTime<Utc> },
}

pub struct TrackingService {
    storage: Arc<SeaOrmStorage>,
    events: Arc<dyn EventStore>,
}

impl TrackingService {
    pub fn new(storage: Arc<SeaOrmStorage>, events: Arc<dyn EventStore>) -> Self {
        Self { storage, events }
    }

    pub async fn record_visit(&self, now: DateTime<Utc>) -> Result<()> {
        self.events.record_visit(now).await
    }

    /// Resolve a public click on `link_id`.
    ///
    /// Missing and inactive links are both `NotFound`. A click is recorded
    /// only when the link is open.
    pub async fn click_through(&self, link_id: i32, now: DateTime<Utc>) -> Result<ClickOutcome> {
        let link = self
            .storage
            .get_link(link_id)
            .await?
            .filter(|l| l.is_active)
            .ok_or_else(|| LinkpageError::not_found(format!("Link not found: {}", link_id)))?;

        let visibility = resolve(&link, now);
        if let Some(open_at) = visibility.open_at.filter(|_| visibility.locked) {
            debug!("Link {} is locked until {}", link_id, open_at);
            return Ok(ClickOutcome::Locked { open_at });
        }

        if let Err(e) = self.events.record_click(link_id, now).await {
            warn!("Failed to record click for link {}: {}", link_id, e);
        }

        Ok(ClickOutcome::Redirect(link.url))
    }
}
