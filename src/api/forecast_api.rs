// ==========================================
// 炼钢生产计划 - 钢种产量预测 API
// ==========================================
// 职责: 目标月钢种级炉数预测
// 流程: 月份校验 → 读订单预测 → 读历史产量(折算炉数) → 引擎分解
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ForecastConfigReader};
use crate::domain::forecast::GroupForecast;
use crate::domain::production::{OrderForecastRow, ProductionRow};
use crate::domain::types::YearMonth;
use crate::engine::ForecastBreakdownEngine;
use crate::repository::{MonthSteelProductionRepository, OrderForecastRepository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 响应元信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// 预测响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub meta: ResponseMeta,
    /// YYYY-MM
    pub month: String,
    pub groups: Vec<GroupForecast>,
}

// ==========================================
// ForecastApi
// ==========================================
pub struct ForecastApi {
    order_forecast_repo: Arc<OrderForecastRepository>,
    production_repo: Arc<MonthSteelProductionRepository>,
    config_manager: Arc<ConfigManager>,
}

impl ForecastApi {
    pub fn new(
        order_forecast_repo: Arc<OrderForecastRepository>,
        production_repo: Arc<MonthSteelProductionRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            order_forecast_repo,
            production_repo,
            config_manager,
        }
    }

    /// 预测目标月各质量组的钢种炉数
    ///
    /// # 参数
    /// - month: YYYY-MM
    ///
    /// # 返回
    /// - Err(InvalidInput): 月份格式错误
    /// - Err(NotFound): 目标月无订单预测
    /// - Err(Internal): 引擎失败或任一质量组分解失败
    #[instrument(skip(self))]
    pub fn forecast_grade_production(&self, month: &str) -> ApiResult<ForecastResponse> {
        let target_month = YearMonth::parse_strict(month).ok_or_else(|| {
            ApiError::InvalidInput(format!("月份格式错误(应为 YYYY-MM): {}", month))
        })?;

        let orders = self.order_forecast_repo.list_by_month(target_month)?;
        if orders.is_empty() {
            return Err(ApiError::NotFound(format!(
                "No order forecast data for {}",
                month
            )));
        }

        let config = self.config_manager.load_forecast_config()?;
        let order_rows: Vec<OrderForecastRow> = orders.iter().map(OrderForecastRow::from).collect();
        let production_rows: Vec<ProductionRow> = self
            .production_repo
            .list_all()?
            .iter()
            .map(|entry| ProductionRow::from_entry(entry, config.tons_per_heat))
            .collect();

        let engine = ForecastBreakdownEngine::new(&config)?;
        let report = engine.forecast_grade_breakdown(&order_rows, &production_rows, target_month)?;

        if !report.is_complete() {
            let reasons: Vec<String> = report
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.quality_group, f.reason))
                .collect();
            warn!(failed = reasons.len(), "存在分解失败的质量组");
            return Err(ApiError::internal(reasons.join("; ")));
        }

        info!(month = %target_month, groups = report.groups.len(), "预测完成");

        Ok(ForecastResponse {
            meta: ResponseMeta {
                timestamp: Utc::now(),
                version: crate::VERSION.to_string(),
            },
            month: target_month.to_string(),
            groups: report.groups,
        })
    }
}
