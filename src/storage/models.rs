use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// 公开页上的一条链接
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub group_id: Option<i32>,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    /// 仅作为描述信息保存，不影响可见性
    pub end_date: Option<DateTime<Utc>>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub order: i32,
}

/// 个人资料（全局唯一）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub banner: Option<String>,
    pub email: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub updated_at: DateTime<Utc>,
}

/// 新建链接的输入
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub group_id: Option<i32>,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// 链接部分更新
///
/// 外层 None 表示不修改；可空字段的 `Some(None)` 表示清空。
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub group_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
    pub order: Option<i32>,
}

impl LinkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.icon.is_none()
            && self.image.is_none()
            && self.description.is_none()
            && self.group_id.is_none()
            && self.is_active.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.order.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGroup {
    pub name: String,
    /// 省略时排在最后
    #[serde(default)]
    pub order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// 个人资料更新（整体提交，全部成功或全部失败）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub banner: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    /// Some 时整体替换社交链接列表
    #[serde(default)]
    pub social_links: Option<Vec<SocialLink>>,
}

/// 区分 "字段缺省" 与 "字段为 null"
///
/// 配合 `#[serde(default)]` 使用：缺省 → None，null → Some(None)，值 → Some(Some(v))
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_distinguishes_null_and_missing() {
        let update: ProfileUpdate =
            serde_json::from_str(r#"{"name":"Jo","bio":null}"#).expect("valid json");
        assert_eq!(update.name.as_deref(), Some("Jo"));
        assert_eq!(update.bio, Some(None));
        assert_eq!(update.image, None);
        assert!(update.social_links.is_none());
    }

    #[test]
    fn test_social_link_order_defaults_to_zero() {
        let link: SocialLink =
            serde_json::from_str(r#"{"platform":"instagram","url":"https://instagram.com/x"}"#)
                .expect("valid json");
        assert_eq!(link.order, 0);
    }

    #[test]
    fn test_empty_patch() {
        assert!(LinkPatch::default().is_empty());
        let patch = LinkPatch {
            icon: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
