//! Link visibility resolution
//!
//! Decides whether an active link can be followed right now or is shown
//! locked until its start date. Inactive links never reach this point;
//! they are filtered out when the public listing is loaded.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::Link;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub clickable: bool,
    pub locked: bool,
    /// Set only while locked
    pub open_at: Option<DateTime<Utc>>,
}

impl Visibility {
    pub const OPEN: Visibility = Visibility {
        clickable: true,
        locked: false,
        open_at: None,
    };

    pub fn locked_until(open_at: DateTime<Utc>) -> Self {
        Self {
            clickable: false,
            locked: true,
            open_at: Some(open_at),
        }
    }
}

/// Resolve the visibility of `link` at `now`.
///
/// `end_date` is stored and displayed but never hides or locks a link.
pub fn resolve(link: &Link, now: DateTime<Utc>) -> Visibility {
    resolve_start(link.start_date, now)
}

/// Same rule, for callers that only hold the start date.
pub fn resolve_start(start_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Visibility {
    match start_date {
        Some(start) if start > now => Visibility::locked_until(start),
        _ => Visibility::OPEN,
    }
}
