//! 访问/点击事件表
//!
//! 只追加，不更新也不删除。聚合在 analytics 模块中完成，这里只按时间范围取原始行。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use super::{SeaOrmStorage, retry};
use crate::analytics::{ClickEvent, EventStore, LinkTitleLookup, TimeRange};
use crate::errors::{LinkpageError, Result};

use migration::entities::{link_click, visit};

#[async_trait::async_trait]
impl EventStore for SeaOrmStorage {
    async fn record_visit(&self, at: DateTime<Utc>) -> Result<()> {
        let db = &self.db;
        retry::with_retry("record_visit", self.retry_config, || async {
            visit::Entity::insert(visit::ActiveModel {
                id: NotSet,
                visited_at: Set(at),
            })
            .exec(db)
            .await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("记录访问失败: {}", e)))?;

        debug!("Visit recorded at {}", at);
        Ok(())
    }

    async fn record_click(&self, link_id: i32, at: DateTime<Utc>) -> Result<()> {
        let db = &self.db;
        retry::with_retry(
            &format!("record_click({})", link_id),
            self.retry_config,
            || async {
                link_click::Entity::insert(link_click::ActiveModel {
                    id: NotSet,
                    link_id: Set(link_id),
                    clicked_at: Set(at),
                })
                .exec(db)
                .await
            },
        )
        .await
        .map_err(|e| LinkpageError::database_operation(format!("记录点击失败: {}", e)))?;

        debug!("Click recorded: link={} at {}", link_id, at);
        Ok(())
    }

    async fn visit_timestamps(&self, range: &TimeRange) -> Result<Vec<DateTime<Utc>>> {
        let db = &self.db;
        retry::with_retry("visit_timestamps", self.retry_config, || async {
            visit::Entity::find()
                .select_only()
                .column(visit::Column::VisitedAt)
                .filter(visit::Column::VisitedAt.gte(range.start))
                .filter(visit::Column::VisitedAt.lte(range.end))
                .order_by_asc(visit::Column::VisitedAt)
                .into_tuple::<DateTime<Utc>>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| LinkpageError::database_operation(format!("查询访问记录失败: {}", e)))
    }

    async fn click_events(
        &self,
        range: &TimeRange,
        link_id: Option<i32>,
    ) -> Result<Vec<ClickEvent>> {
        let db = &self.db;
        let rows: Vec<(i32, DateTime<Utc>)> =
            retry::with_retry("click_events", self.retry_config, || async {
                let mut query = link_click::Entity::find()
                    .select_only()
                    .column(link_click::Column::LinkId)
                    .column(link_click::Column::ClickedAt)
                    .filter(link_click::Column::ClickedAt.gte(range.start))
                    .filter(link_click::Column::ClickedAt.lte(range.end));
                if let Some(id) = link_id {
                    query = query.filter(link_click::Column::LinkId.eq(id));
                }
                query
                    .order_by_asc(link_click::Column::ClickedAt)
                    .into_tuple::<(i32, DateTime<Utc>)>()
                    .all(db)
                    .await
            })
            .await
            .map_err(|e| LinkpageError::database_operation(format!("查询点击记录失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|(link_id, timestamp)| ClickEvent { link_id, timestamp })
            .collect())
    }
}

#[async_trait::async_trait]
impl LinkTitleLookup for SeaOrmStorage {
    async fn link_titles(&self, ids: &[i32]) -> Result<HashMap<i32, String>> {
        SeaOrmStorage::link_titles(self, ids).await
    }
}
