//! Demo data
//!
//! Replaces all links, groups and clicks with a small sample set. The
//! profile is only filled in when none exists yet.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::link_service::{CreateLinkRequest, LinkService};
use crate::errors::Result;
use crate::storage::{NewGroup, ProfileUpdate, SeaOrmStorage, SocialLink};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub profile_created: bool,
    pub groups: usize,
    pub links: usize,
}

fn demo_profile() -> ProfileUpdate {
    ProfileUpdate {
        name: Some("Jooyeon Jo".to_string()),
        bio: Some(Some("AI Engineer & Creator".to_string())),
        image: Some(Some("https://github.com/shadcn.png".to_string())),
        banner: Some(Some(
            "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800&q=80".to_string(),
        )),
        email: Some(Some("mailto:hello@example.com".to_string())),
        social_links: Some(vec![
            SocialLink {
                platform: "instagram".to_string(),
                url: "https://instagram.com/hellojooyeon".to_string(),
                order: 0,
            },
            SocialLink {
                platform: "blog".to_string(),
                url: "https://blog.naver.com/hellojooyeon".to_string(),
                order: 1,
            },
        ]),
    }
}

fn demo_link(title: &str, url: &str, icon: &str, group_id: Option<i32>) -> CreateLinkRequest {
    CreateLinkRequest {
        title: title.to_string(),
        url: url.to_string(),
        icon: Some(icon.to_string()),
        group_id,
        is_active: Some(true),
        ..Default::default()
    }
}

pub async fn seed_demo_data(storage: Arc<SeaOrmStorage>) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if !storage.has_profile().await? {
        super::ProfileService::new(storage.clone())
            .update_profile(demo_profile())
            .await?;
        report.profile_created = true;
    }

    storage.clear_links_and_groups().await?;

    let links = LinkService::new(storage.clone());
    let socials = links
        .create_group(NewGroup {
            name: "Socials".to_string(),
            order: Some(1),
        })
        .await?;
    let work = links
        .create_group(NewGroup {
            name: "Work".to_string(),
            order: Some(2),
        })
        .await?;
    report.groups = 2;

    let requests = vec![
        demo_link("Official Website", "https://example.com", "Globe", Some(work.id)),
        demo_link(
            "Latest YouTube Video",
            "https://youtube.com",
            "Youtube",
            Some(socials.id),
        ),
        CreateLinkRequest {
            start_date: Some("2030-01-01".to_string()),
            ..demo_link(
                "Open Soon Project",
                "https://example.com/project",
                "Rocket",
                Some(work.id),
            )
        },
        demo_link("My Portfolio", "https://portfolio.example.com", "Briefcase", None),
        CreateLinkRequest {
            is_active: Some(false),
            ..demo_link(
                "Coming Soon (Inactive)",
                "https://example.com/coming-soon",
                "Star",
                None,
            )
        },
    ];

    for request in requests {
        links.create_link(request).await?;
        report.links += 1;
    }

    info!(
        "Seeded {} groups and {} links (profile created: {})",
        report.groups, report.links, report.profile_created
    );
    Ok(report)
}
