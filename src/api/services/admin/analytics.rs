//! Analytics API 端点
//!
//! 访问/点击按天分桶及链接点击排行

use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::Utc;
use tracing::trace;

use crate::config::get_config;
use crate::services::AnalyticsService;

use super::helpers::{api_result, error_from_linkpage, parse_range_params};
use super::types::StatsQuery;

/// `GET /stats?days=30` 或 `GET /stats?start_date=..&end_date=..`
pub async fn get_stats(
    query: web::Query<StatsQuery>,
    analytics: web::Data<AnalyticsService>,
) -> ActixResult<HttpResponse> {
    let range = match parse_range_params(query.start_date.as_deref(), query.end_date.as_deref()) {
        Ok(range) => range,
        Err(e) => return Ok(error_from_linkpage(&e)),
    };

    let result = match range {
        Some(range) => {
            trace!("Admin API: statistics for {:?}", range);
            analytics.statistics(range).await
        }
        None => {
            let days = query
                .days
                .unwrap_or_else(|| get_config().analytics.default_days);
            trace!("Admin API: statistics for last {} days", days);
            analytics.statistics_for_days(days, Utc::now()).await
        }
    };

    Ok(api_result(result))
}
