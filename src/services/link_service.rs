//! Link and group management service
//!
//! Validates admin input before it reaches storage. Shared by the HTTP
//! handlers and the `seed` command.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{LinkpageError, Result};
use crate::storage::models::double_option;
use crate::storage::{Group, GroupPatch, Link, LinkPatch, NewGroup, NewLink, SeaOrmStorage};
use crate::utils::{parse_schedule_date, validate_image_ref, validate_url};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_ICON_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_GROUP_NAME_LEN: usize = 100;

// ============ Request DTOs ============

/// Request to create a link
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub group_id: Option<i32>,
    /// Defaults to true
    #[serde(default)]
    pub is_active: Option<bool>,
    /// RFC3339 or YYYY-MM-DD; unparseable values are dropped
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Partial update. Nullable fields accept `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub group_id: Option<Option<i32>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<String>>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// A group with the ids of the links it currently holds
#[derive(Debug, Clone, Serialize)]
pub struct GroupWithLinks {
    #[serde(flatten)]
    pub group: Group,
    pub link_ids: Vec<i32>,
}

// ============ Validation helpers ============

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn check_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(LinkpageError::validation("Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(LinkpageError::validation(format!(
            "Title exceeds {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

fn check_url(url: &str) -> Result<String> {
    validate_url(url)?;
    Ok(url.trim().to_string())
}

fn check_icon(icon: Option<String>) -> Result<Option<String>> {
    let icon = non_blank(icon);
    if let Some(ref name) = icon
        && name.chars().count() > MAX_ICON_LEN
    {
        return Err(LinkpageError::validation(format!(
            "Icon name exceeds {} characters",
            MAX_ICON_LEN
        )));
    }
    Ok(icon)
}

fn check_image(image: Option<String>) -> Result<Option<String>> {
    let image = non_blank(image);
    if let Some(ref reference) = image {
        validate_image_ref(reference)?;
    }
    Ok(image)
}

fn check_description(description: Option<String>) -> Result<Option<String>> {
    let description = non_blank(description);
    if let Some(ref text) = description
        && text.chars().count() > MAX_DESCRIPTION_LEN
    {
        return Err(LinkpageError::validation(format!(
            "Description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(description)
}

fn check_group_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LinkpageError::validation("Group name cannot be empty"));
    }
    if name.chars().count() > MAX_GROUP_NAME_LEN {
        return Err(LinkpageError::validation(format!(
            "Group name exceeds {} characters",
            MAX_GROUP_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

// ============ LinkService ============

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn ensure_group_exists(&self, group_id: i32) -> Result<()> {
        match self.storage.get_group(group_id).await? {
            Some(_) => Ok(()),
            None => Err(LinkpageError::validation(format!(
                "Group does not exist: {}",
                group_id
            ))),
        }
    }

    pub async fn list_links(&self) -> Result<Vec<Link>> {
        self.storage.list_links().await
    }

    pub async fn get_link(&self, id: i32) -> Result<Link> {
        self.storage
            .get_link(id)
            .await?
            .ok_or_else(|| LinkpageError::not_found(format!("Link not found: {}", id)))
    }

    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<Link> {
        let new_link = NewLink {
            title: check_title(&req.title)?,
            url: check_url(&req.url)?,
            icon: check_icon(req.icon)?,
            image: check_image(req.image)?,
            description: check_description(req.description)?,
            group_id: req.group_id,
            is_active: req.is_active.unwrap_or(true),
            start_date: parse_schedule_date("start_date", req.start_date.as_deref()),
            end_date: parse_schedule_date("end_date", req.end_date.as_deref()),
        };

        if let Some(group_id) = new_link.group_id {
            self.ensure_group_exists(group_id).await?;
        }

        self.storage.create_link(&new_link).await
    }

    pub async fn update_link(&self, id: i32, req: UpdateLinkRequest) -> Result<Link> {
        let patch = LinkPatch {
            title: req.title.as_deref().map(check_title).transpose()?,
            url: req.url.as_deref().map(check_url).transpose()?,
            icon: req.icon.map(check_icon).transpose()?,
            image: req.image.map(check_image).transpose()?,
            description: req.description.map(check_description).transpose()?,
            group_id: req.group_id,
            is_active: req.is_active,
            start_date: req
                .start_date
                .map(|v| parse_schedule_date("start_date", v.as_deref())),
            end_date: req
                .end_date
                .map(|v| parse_schedule_date("end_date", v.as_deref())),
            order: req.order,
        };

        if let Some(Some(group_id)) = patch.group_id {
            self.ensure_group_exists(group_id).await?;
        }

        if patch.is_empty() {
            return self.get_link(id).await;
        }

        self.storage.update_link(id, &patch).await
    }

    pub async fn delete_link(&self, id: i32) -> Result<()> {
        self.storage.delete_link(id).await
    }

    // ---------- groups ----------

    pub async fn list_groups(&self) -> Result<Vec<GroupWithLinks>> {
        let groups = self.storage.list_groups().await?;
        let links = self.storage.list_links().await?;

        Ok(groups
            .into_iter()
            .map(|group| {
                let link_ids = links
                    .iter()
                    .filter(|l| l.group_id == Some(group.id))
                    .map(|l| l.id)
                    .collect();
                GroupWithLinks { group, link_ids }
            })
            .collect())
    }

    pub async fn create_group(&self, req: NewGroup) -> Result<Group> {
        let req = NewGroup {
            name: check_group_name(&req.name)?,
            order: req.order,
        };
        self.storage.create_group(&req).await
    }

    pub async fn update_group(&self, id: i32, req: GroupPatch) -> Result<Group> {
        let req = GroupPatch {
            name: req.name.as_deref().map(check_group_name).transpose()?,
            order: req.order,
        };
        self.storage.update_group(id, &req).await
    }

    /// Links in the group become ungrouped; they are never deleted.
    pub async fn delete_group(&self, id: i32) -> Result<()> {
        self.storage.delete_group(id).await
    }

    pub async fn set_group_links(&self, group_id: i32, link_ids: &[i32]) -> Result<()> {
        self.storage.set_group_links(group_id, link_ids).await?;
        info!("Updated membership of group {}", group_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_title() {
        assert_eq!(check_title("  Blog ").unwrap(), "Blog");
        assert!(check_title("   ").is_err());
        assert!(check_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
        assert!(check_title(&"가".repeat(MAX_TITLE_LEN)).is_ok());
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        assert_eq!(check_icon(Some("  ".to_string())).unwrap(), None);
        assert_eq!(check_image(Some(String::new())).unwrap(), None);
        assert_eq!(
            check_description(Some(" hi ".to_string())).unwrap(),
            Some("hi".to_string())
        );
    }

    #[test]
    fn test_update_request_null_vs_missing() {
        let req: UpdateLinkRequest =
            serde_json::from_str(r#"{"group_id":null,"start_date":"2030-01-01"}"#).unwrap();
        assert_eq!(req.group_id, Some(None));
        assert_eq!(req.start_date, Some(Some("2030-01-01".to_string())));
        assert_eq!(req.icon, None);
        assert_eq!(req.title, None);
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"title":"Site","url":"https://example.com"}"#).unwrap();
        assert_eq!(req.is_active, None);
        assert_eq!(req.group_id, None);
    }
}
