//! 分组读写
//!
//! 分组与链接的归属只存在 links.group_id 一侧，分组自身不保存链接列表。

use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, sea_query::Expr,
};
use sea_orm::ActiveValue::{NotSet, Set};
use tracing::info;

use super::converters::model_to_group;
use super::{SeaOrmStorage, retry};
use crate::errors::{LinkpageError, Result};
use crate::storage::models::{Group, GroupPatch, NewGroup};

use migration::entities::{link, link_click, link_group};

impl SeaOrmStorage {
    /// 所有分组，按 order 升序
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let db = &self.db;
        let models = retry::with_retry("list_groups", self.retry_config, || async {
            link_group::Entity::find()
                .order_by_asc(link_group::Column::SortOrder)
                .order_by_asc(link_group::Column::Id)
                .all(db)
                .await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("查询分组列表失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_group).collect())
    }

    pub async fn get_group(&self, id: i32) -> Result<Option<Group>> {
        let model = link_group::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("查询分组失败: {}", e)))?;
        Ok(model.map(model_to_group))
    }

    pub async fn create_group(&self, new_group: &NewGroup) -> Result<Group> {
        let order = match new_group.order {
            Some(order) => order,
            None => {
                let max: Option<Option<i32>> = link_group::Entity::find()
                    .select_only()
                    .column_as(link_group::Column::SortOrder.max(), "max_order")
                    .into_tuple::<Option<i32>>()
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        LinkpageError::database_operation(format!("查询最大排序值失败: {}", e))
                    })?;
                max.flatten().unwrap_or(0) + 1
            }
        };

        let db = &self.db;
        let model = retry::with_retry("create_group", self.retry_config, || async {
            link_group::ActiveModel {
                id: NotSet,
                name: Set(new_group.name.clone()),
                sort_order: Set(order),
            }
            .insert(db)
            .await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("创建分组失败: {}", e)))?;

        info!("Group created: id={} name={}", model.id, model.name);
        Ok(model_to_group(model))
    }

    pub async fn update_group(&self, id: i32, patch: &GroupPatch) -> Result<Group> {
        if patch.name.is_none() && patch.order.is_none() {
            return self
                .get_group(id)
                .await?
                .ok_or_else(|| LinkpageError::not_found(format!("分组不存在: {}", id)));
        }

        let am = link_group::ActiveModel {
            id: Set(id),
            name: patch.name.clone().map(Set).unwrap_or(NotSet),
            sort_order: patch.order.map(Set).unwrap_or(NotSet),
        };

        match am.update(&self.db).await {
            Ok(model) => Ok(model_to_group(model)),
            Err(DbErr::RecordNotUpdated) | Err(DbErr::RecordNotFound(_)) => {
                Err(LinkpageError::not_found(format!("分组不存在: {}", id)))
            }
            Err(e) => Err(LinkpageError::database_operation(format!(
                "更新分组失败: {}",
                e
            ))),
        }
    }

    /// 删除分组：同一事务内先把组内链接改为未分组，再删除分组本身
    pub async fn delete_group(&self, id: i32) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("开始事务失败: {}", e)))?;

        let detached = link::Entity::update_many()
            .col_expr(link::Column::GroupId, Expr::value(Option::<i32>::None))
            .filter(link::Column::GroupId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("解除分组链接失败: {}", e)))?;

        let deleted = link_group::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("删除分组失败: {}", e)))?;

        if deleted.rows_affected == 0 {
            // txn drop 时回滚
            return Err(LinkpageError::not_found(format!("分组不存在: {}", id)));
        }

        txn.commit()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("提交事务失败: {}", e)))?;

        info!(
            "Group deleted: {} ({} links moved to ungrouped)",
            id, detached.rows_affected
        );
        Ok(())
    }

    /// 整体设置分组成员：组内原有链接先移出，再把列出的链接加入
    ///
    /// 任一 link id 不存在时整个操作不生效。
    pub async fn set_group_links(&self, group_id: i32, link_ids: &[i32]) -> Result<()> {
        let wanted: BTreeSet<i32> = link_ids.iter().copied().collect();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("开始事务失败: {}", e)))?;

        if link_group::Entity::find_by_id(group_id)
            .one(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("查询分组失败: {}", e)))?
            .is_none()
        {
            return Err(LinkpageError::not_found(format!("分组不存在: {}", group_id)));
        }

        link::Entity::update_many()
            .col_expr(link::Column::GroupId, Expr::value(Option::<i32>::None))
            .filter(link::Column::GroupId.eq(group_id))
            .exec(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("解除分组链接失败: {}", e)))?;

        if !wanted.is_empty() {
            let attached = link::Entity::update_many()
                .col_expr(link::Column::GroupId, Expr::value(Some(group_id)))
                .filter(link::Column::Id.is_in(wanted.iter().copied()))
                .exec(&txn)
                .await
                .map_err(|e| {
                    LinkpageError::database_operation(format!("设置分组链接失败: {}", e))
                })?;

            if attached.rows_affected != wanted.len() as u64 {
                return Err(LinkpageError::not_found(format!(
                    "部分链接不存在: 期望 {} 条，实际 {} 条",
                    wanted.len(),
                    attached.rows_affected
                )));
            }
        }

        txn.commit()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Group {} now holds {} links", group_id, wanted.len());
        Ok(())
    }

    /// 清空链接、分组和点击记录（seed 使用），访问记录与个人资料保留
    pub async fn clear_links_and_groups(&self) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("开始事务失败: {}", e)))?;

        link_click::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("清空点击记录失败: {}", e)))?;
        link::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("清空链接失败: {}", e)))?;
        link_group::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| LinkpageError::database_operation(format!("清空分组失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| LinkpageError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Cleared links, groups and clicks");
        Ok(())
    }
}
