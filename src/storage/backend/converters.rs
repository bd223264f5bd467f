use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::storage::models::{Group, Link, LinkPatch, NewLink, Profile, SocialLink};
use migration::entities::{link, link_group, profile, social_link};

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        title: model.title,
        url: model.url,
        icon: model.icon,
        image: model.image,
        description: model.description,
        group_id: model.group_id,
        is_active: model.is_active,
        start_date: model.start_date,
        end_date: model.end_date,
        order: model.sort_order,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_group(model: link_group::Model) -> Group {
    Group {
        id: model.id,
        name: model.name,
        order: model.sort_order,
    }
}

pub fn social_link_from_model(model: social_link::Model) -> SocialLink {
    SocialLink {
        platform: model.platform,
        url: model.url,
        order: model.sort_order,
    }
}

pub fn model_to_profile(model: profile::Model, social_links: Vec<social_link::Model>) -> Profile {
    Profile {
        name: model.name,
        bio: model.bio,
        image: model.image,
        banner: model.banner,
        email: model.email,
        social_links: social_links.into_iter().map(social_link_from_model).collect(),
        updated_at: model.updated_at,
    }
}

/// 新建链接（id 由数据库生成）
pub fn new_link_to_active_model(
    link: &NewLink,
    order: i32,
    now: DateTime<Utc>,
) -> link::ActiveModel {
    link::ActiveModel {
        id: NotSet,
        title: Set(link.title.clone()),
        url: Set(link.url.clone()),
        icon: Set(link.icon.clone()),
        image: Set(link.image.clone()),
        description: Set(link.description.clone()),
        group_id: Set(link.group_id),
        is_active: Set(link.is_active),
        start_date: Set(link.start_date),
        end_date: Set(link.end_date),
        sort_order: Set(order),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// 部分更新：只有 patch 中出现的字段被设置
pub fn patch_to_active_model(id: i32, patch: &LinkPatch, now: DateTime<Utc>) -> link::ActiveModel {
    fn set_if<T: Clone + Into<sea_orm::Value>>(v: &Option<T>) -> sea_orm::ActiveValue<T> {
        match v {
            Some(value) => Set(value.clone()),
            None => NotSet,
        }
    }

    link::ActiveModel {
        id: Set(id),
        title: set_if(&patch.title),
        url: set_if(&patch.url),
        icon: set_if(&patch.icon),
        image: set_if(&patch.image),
        description: set_if(&patch.description),
        group_id: set_if(&patch.group_id),
        is_active: set_if(&patch.is_active),
        start_date: set_if(&patch.start_date),
        end_date: set_if(&patch.end_date),
        sort_order: set_if(&patch.order),
        created_at: NotSet,
        updated_at: Set(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::ActiveValue;

    fn sample_model() -> link::Model {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        link::Model {
            id: 5,
            title: "Blog".to_string(),
            url: "https://blog.example.com".to_string(),
            icon: Some("Globe".to_string()),
            image: None,
            description: None,
            group_id: Some(2),
            is_active: true,
            start_date: None,
            end_date: None,
            sort_order: 3,
            created_at: t,
            updated_at: t,
        }
    }

    #[test]
    fn test_model_to_link_maps_sort_order() {
        let link = model_to_link(sample_model());
        assert_eq!(link.id, 5);
        assert_eq!(link.order, 3);
        assert_eq!(link.group_id, Some(2));
    }

    #[test]
    fn test_patch_only_sets_present_fields() {
        let patch = LinkPatch {
            title: Some("New".to_string()),
            group_id: Some(None),
            ..Default::default()
        };
        let am = patch_to_active_model(5, &patch, Utc::now());

        assert!(matches!(am.title, ActiveValue::Set(ref t) if t == "New"));
        assert!(matches!(am.group_id, ActiveValue::Set(None)));
        assert!(matches!(am.url, ActiveValue::NotSet));
        assert!(matches!(am.start_date, ActiveValue::NotSet));
        assert!(matches!(am.created_at, ActiveValue::NotSet));
        assert!(matches!(am.updated_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_new_link_uses_given_order() {
        let now = Utc::now();
        let new = NewLink {
            title: "Shop".to_string(),
            url: "https://shop.example.com".to_string(),
            is_active: true,
            ..Default::default()
        };
        let am = new_link_to_active_model(&new, 9, now);
        assert!(matches!(am.id, ActiveValue::NotSet));
        assert!(matches!(am.sort_order, ActiveValue::Set(9)));
        assert!(matches!(am.is_active, ActiveValue::Set(true)));
    }
}
