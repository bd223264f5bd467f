//! Public page arrangement
//!
//! Sorts the active links and lays them out by group the way the public
//! page renders them: groups in ascending order, each with its links,
//! then the ungrouped links.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::visibility::{Visibility, resolve};
use crate::errors::Result;
use crate::storage::{Group, Link, Profile, SeaOrmStorage};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    /// By start date; links without one always go last
    #[default]
    Date,
    /// By title, case-insensitive
    Name,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A link as the public sees it.
#[derive(Debug, Clone, Serialize)]
pub struct PublicLink {
    pub id: i32,
    pub title: String,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub visibility: Visibility,
    /// Click-through path, absent while locked
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicGroup {
    pub id: i32,
    pub name: String,
    pub links: Vec<PublicLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPage {
    pub profile: Profile,
    pub groups: Vec<PublicGroup>,
    pub ungrouped: Vec<PublicLink>,
    pub sort: SortKey,
    pub order: SortOrder,
}

pub fn click_through_path(link_id: i32) -> String {
    format!("/go/{}", link_id)
}

fn compare(a: &Link, b: &Link, key: SortKey, order: SortOrder) -> Ordering {
    let directed = |ord: Ordering| match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    };

    match key {
        SortKey::Date => match (a.start_date, b.start_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => directed(x.cmp(&y)),
        },
        SortKey::Name => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
    }
}

/// Stable sort; links that compare equal keep their manual order.
pub fn sort_links(links: &mut [Link], key: SortKey, order: SortOrder) {
    links.sort_by(|a, b| compare(a, b, key, order));
}

fn to_public(link: Link, now: DateTime<Utc>) -> PublicLink {
    let visibility = resolve(&link, now);
    PublicLink {
        href: visibility.clickable.then(|| click_through_path(link.id)),
        id: link.id,
        title: link.title,
        icon: link.icon,
        image: link.image,
        description: link.description,
        start_date: link.start_date,
        end_date: link.end_date,
        visibility,
    }
}

/// Lay out active links by group.
///
/// Groups with no links are left out. A link whose group no longer
/// exists is shown as ungrouped.
pub fn arrange(
    mut links: Vec<Link>,
    mut groups: Vec<Group>,
    key: SortKey,
    order: SortOrder,
    now: DateTime<Utc>,
) -> (Vec<PublicGroup>, Vec<PublicLink>) {
    links.retain(|l| l.is_active);
    sort_links(&mut links, key, order);
    groups.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));

    let mut by_group: HashMap<i32, Vec<PublicLink>> = HashMap::new();
    let mut ungrouped = Vec::new();
    let known: HashSet<i32> = groups.iter().map(|g| g.id).collect();

    for link in links {
        match link.group_id.filter(|id| known.contains(id)) {
            Some(group_id) => by_group
                .entry(group_id)
                .or_default()
                .push(to_public(link, now)),
            None => ungrouped.push(to_public(link, now)),
        }
    }

    let grouped = groups
        .into_iter()
        .filter_map(|group| {
            by_group.remove(&group.id).map(|links| PublicGroup {
                id: group.id,
                name: group.name,
                links,
            })
        })
        .collect();

    (grouped, ungrouped)
}

/// Loads everything the public page shows.
pub struct PublicPageService {
    storage: Arc<SeaOrmStorage>,
}

impl PublicPageService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn page(
        &self,
        key: SortKey,
        order: SortOrder,
        now: DateTime<Utc>,
    ) -> Result<PublicPage> {
        let profile = self.storage.get_or_create_profile().await?;
        let links = self.storage.list_active_links().await?;
        let groups = self.storage.list_groups().await?;

        let (groups, ungrouped) = arrange(links, groups, key, order, now);
        Ok(PublicPage {
            profile,
            groups,
            ungrouped,
            sort: key,
            order,
        })
    }
}
