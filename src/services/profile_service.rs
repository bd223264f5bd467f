//! Profile service
//!
//! The profile is a single record created on first access. Updates are
//! validated as a whole before anything is written.

use std::sync::Arc;

use crate::errors::{LinkpageError, Result};
use crate::storage::{Profile, ProfileUpdate, SeaOrmStorage, SocialLink};
use crate::utils::{validate_image_ref, validate_url};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_BIO_LEN: usize = 1500;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_PLATFORM_LEN: usize = 50;

pub struct ProfileService {
    storage: Arc<SeaOrmStorage>,
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn too_long(field: &str, max: usize) -> LinkpageError {
    LinkpageError::validation(format!("{} exceeds {} characters", field, max))
}

/// Check every field and normalise blanks to `None`.
pub fn validate_update(update: ProfileUpdate) -> Result<ProfileUpdate> {
    let name = match update.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(LinkpageError::validation("Name cannot be empty"));
            }
            if name.chars().count() > MAX_NAME_LEN {
                return Err(too_long("Name", MAX_NAME_LEN));
            }
            Some(name)
        }
        None => None,
    };

    let bio = update.bio.map(trimmed_or_none);
    if let Some(Some(ref text)) = bio
        && text.chars().count() > MAX_BIO_LEN
    {
        return Err(too_long("Bio", MAX_BIO_LEN));
    }

    let image = update.image.map(trimmed_or_none);
    if let Some(Some(ref reference)) = image {
        validate_image_ref(reference)?;
    }

    let banner = update.banner.map(trimmed_or_none);
    if let Some(Some(ref reference)) = banner {
        validate_image_ref(reference)?;
    }

    let email = update.email.map(trimmed_or_none);
    if let Some(Some(ref address)) = email
        && address.chars().count() > MAX_EMAIL_LEN
    {
        return Err(too_long("Email", MAX_EMAIL_LEN));
    }

    let social_links = match update.social_links {
        Some(links) => Some(validate_social_links(links)?),
        None => None,
    };

    Ok(ProfileUpdate {
        name,
        bio,
        image,
        banner,
        email,
        social_links,
    })
}

/// Social links keep their submitted position when no explicit order is set.
fn validate_social_links(links: Vec<SocialLink>) -> Result<Vec<SocialLink>> {
    let explicit_order = links.iter().any(|l| l.order != 0);

    links
        .into_iter()
        .enumerate()
        .map(|(position, link)| {
            let platform = link.platform.trim().to_string();
            if platform.is_empty() {
                return Err(LinkpageError::validation("Social platform cannot be empty"));
            }
            if platform.chars().count() > MAX_PLATFORM_LEN {
                return Err(too_long("Social platform", MAX_PLATFORM_LEN));
            }
            validate_url(&link.url)?;

            Ok(SocialLink {
                platform,
                url: link.url.trim().to_string(),
                order: if explicit_order {
                    link.order
                } else {
                    position as i32
                },
            })
        })
        .collect()
}

impl ProfileService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_profile(&self) -> Result<Profile> {
        self.storage.get_or_create_profile().await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile> {
        let update = validate_update(update)?;
        self.storage.update_profile(&update).await
    }
}
