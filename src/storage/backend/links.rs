//! 链接读写

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::info;

use super::converters::{model_to_link, new_link_to_active_model, patch_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{LinkpageError, Result};
use crate::storage::models::{Link, LinkPatch, NewLink};

use migration::entities::link;

impl SeaOrmStorage {
    /// 所有链接，按 order 升序
    pub async fn list_links(&self) -> Result<Vec<Link>> {
        let db = &self.db;
        let models = retry::with_retry("list_links", self.retry_config, || async {
            link::Entity::find()
                .order_by_asc(link::Column::SortOrder)
                .order_by_asc(link::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("查询链接列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    /// 公开页可见的链接（is_active = true）
    pub async fn list_active_links(&self) -> Result<Vec<Link>> {
        let db = &self.db;
        let models = retry::with_retry("list_active_links", self.retry_config, || async {
            link::Entity::find()
                .filter(link::Column::IsActive.eq(true))
                .order_by_asc(link::Column::SortOrder)
                .order_by_asc(link::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("查询启用链接失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn get_link(&self, id: i32) -> Result<Option<Link>> {
        let db = &self.db;
        let model = retry::with_retry(&format!("get_link({})", id), self.retry_config, || async {
            link::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("查询链接失败: {}", e)))?;

        Ok(model.map(model_to_link))
    }

    /// 当前最大 order + 1（空表时为 1）
    async fn next_link_order(&self) -> Result<i32> {
        let max: Option<Option<i32>> = link::Entity::find()
            .select_only()
            .column_as(link::Column::SortOrder.max(), "max_order")
            .into_tuple::<Option<i32>>()
            .one(&self.db)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("查询最大排序值失败: {}", e)))?;

        Ok(max.flatten().unwrap_or(0) + 1)
    }

    /// 新建链接，排在所有现有链接之后
    pub async fn create_link(&self, new_link: &NewLink) -> Result<Link> {
        let order = self.next_link_order().await?;
        let now = Utc::now();
        let db = &self.db;

        let model = retry::with_retry("create_link", self.retry_config, || async {
            new_link_to_active_model(new_link, order, now).insert(db).await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("创建链接失败: {}", e)))?;

        info!("Link created: id={} title={}", model.id, model.title);
        Ok(model_to_link(model))
    }

    /// 部分更新（单条 UPDATE，全部字段一起生效）
    pub async fn update_link(&self, id: i32, patch: &LinkPatch) -> Result<Link> {
        let now = Utc::now();
        let db = &self.db;

        let result = retry::with_retry(&format!("update_link({})", id), self.retry_config, || async {
            patch_to_active_model(id, patch, now).update(db).await
        })
        .await;

        match result {
            Ok(model) => Ok(model_to_link(model)),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
                Err(LinkpageError::not_found(format!("链接不存在: {}", id)))
            }
            Err(e) => Err(LinkpageError::database_operation(format!(
                "更新链接失败: {}",
                e
            ))),
        }
    }

    /// 删除链接；已记录的点击保留
    pub async fn delete_link(&self, id: i32) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_link({})", id), self.retry_config, || async {
            link::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("删除链接失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(LinkpageError::not_found(format!("链接不存在: {}", id)));
        }

        info!("Link deleted: {}", id);
        Ok(())
    }

    /// 批量查询链接标题，不存在的 id 不出现在结果中
    pub async fn link_titles(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let db = &self.db;
        let rows: Vec<(i32, String)> =
            retry::with_retry("link_titles", self.retry_config, || async {
                link::Entity::find()
                    .select_only()
                    .column(link::Column::Id)
                    .column(link::Column::Title)
                    .filter(link::Column::Id.is_in(ids.iter().copied()))
                    .into_tuple::<(i32, String)>()
                    .all(db)
                    .await
            })
            .await
            .map_err(|e| LinkpageError::database_operation(format!("查询链接标题失败: {}", e)))?;

        Ok(rows.into_iter().collect())
    }
}
