//! 个人资料（全局唯一一条记录）

use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::model_to_profile;
use crate::errors::{LinkpageError, Result};
use crate::storage::models::{Profile, ProfileUpdate};

use migration::entities::{profile, social_link};

/// 首次访问时创建的默认名称
pub const DEFAULT_PROFILE_NAME: &str = "My Page";

/// 单例资料行使用的固定主键
pub const PROFILE_ID: i32 = 1;

async fn first_profile<C: ConnectionTrait>(
    conn: &C,
) -> std::result::Result<Option<profile::Model>, sea_orm::DbErr> {
    profile::Entity::find()
        .order_by_asc(profile::Column::Id)
        .one(conn)
        .await
}

/// 取资料记录，没有时以固定主键插入默认记录
///
/// 并发插入只有一条生效，其余被主键冲突忽略，随后都读到同一行。
async fn find_or_insert<C: ConnectionTrait>(conn: &C) -> std::result::Result<profile::Model, sea_orm::DbErr> {
    if let Some(existing) = first_profile(conn).await? {
        return Ok(existing);
    }

    let inserted = profile::Entity::insert(profile::ActiveModel {
        id: Set(PROFILE_ID),
        name: Set(DEFAULT_PROFILE_NAME.to_string()),
        bio: Set(None),
        image: Set(None),
        banner: Set(None),
        email: Set(None),
        updated_at: Set(Utc::now()),
    })
    .on_conflict(
        OnConflict::column(profile::Column::Id)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(conn)
    .await?;
    if inserted > 0 {
        info!("Created default profile");
    }

    first_profile(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("profile".to_string()))
}

async fn load_social_links<C: ConnectionTrait>(
    conn: &C,
    profile_id: i32,
) -> std::result::Result<Vec<social_link::Model>, sea_orm::DbErr> {
    social_link::Entity::find()
        .filter(social_link::Column::ProfileId.eq(profile_id))
        .order_by_asc(social_link::Column::SortOrder)
        .order_by_asc(social_link::Column::Id)
        .all(conn)
        .await
}

impl SeaOrmStorage {
    pub async fn has_profile(&self) -> Result<bool> {
        let found = profile::Entity::find()
            .one(&self.db)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("读取个人资料失败: {}", e)))?;
        Ok(found.is_some())
    }

    pub async fn get_or_create_profile(&self) -> Result<Profile> {
        let model = find_or_insert(&self.db)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("读取个人资料失败: {}", e)))?;
        let socials = load_social_links(&self.db, model.id)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("读取社交链接失败: {}", e)))?;

        Ok(model_to_profile(model, socials))
    }

    /// 更新资料；提供 social_links 时整体替换
    ///
    /// 所有修改在同一事务中完成，任一步失败则全部不生效。
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("开始事务失败: {}", e)))?;

        let current = find_or_insert(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("读取个人资料失败: {}", e)))?;
        let profile_id = current.id;

        let mut am: profile::ActiveModel = current.into();
        if let Some(name) = &update.name {
            am.name = Set(name.clone());
        }
        if let Some(bio) = &update.bio {
            am.bio = Set(bio.clone());
        }
        if let Some(image) = &update.image {
            am.image = Set(image.clone());
        }
        if let Some(banner) = &update.banner {
            am.banner = Set(banner.clone());
        }
        if let Some(email) = &update.email {
            am.email = Set(email.clone());
        }
        am.updated_at = Set(Utc::now());

        let updated = am
            .update(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("更新个人资料失败: {}", e)))?;

        if let Some(links) = &update.social_links {
            social_link::Entity::delete_many()
                .filter(social_link::Column::ProfileId.eq(profile_id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    LinkpageError::database_operation(format!("清除社交链接失败: {}", e))
                })?;

            if !links.is_empty() {
                let rows = links.iter().map(|l| social_link::ActiveModel {
                    id: NotSet,
                    profile_id: Set(profile_id),
                    platform: Set(l.platform.clone()),
                    url: Set(l.url.clone()),
                    sort_order: Set(l.order),
                });
                social_link::Entity::insert_many(rows)
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        LinkpageError::database_operation(format!("写入社交链接失败: {}", e))
                    })?;
            }
        }

        let socials = load_social_links(&txn, profile_id)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("读取社交链接失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Profile updated: {}", updated.name);
        Ok(model_to_profile(updated, socials))
    }
}
