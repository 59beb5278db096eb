use super::apportion::IntegerApportioner;
use super::assembler::ResultAssembler;
use super::normalizer::ProportionNormalizer;
use super::proportion::ProportionDeriver;
use super::smoothing::TrendSmoother;
use crate::config::ForecastConfig;
use crate::domain::forecast::GroupForecast;
use crate::domain::production::{
    HistoricalProductionRecord, OrderForecastRecord, OrderForecastRow, ProductionRow,
};
use crate::domain::types::{QualityGroup, YearMonth};
use crate::engine::error::{ForecastError, ForecastResult};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

// ==========================================
// BreakdownReport - 单次预测结果
// ==========================================

/// 单质量组失败记录
#[derive(Debug, Clone, Serialize)]
pub struct GroupFailure {
    pub quality_group: QualityGroup,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownReport {
    pub target_month: YearMonth,
    pub groups: Vec<GroupForecast>,
    pub failures: Vec<GroupFailure>,
}

impl BreakdownReport {
    /// 所有有订单预测的质量组均成功分解
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ==========================================
// ForecastBreakdownEngine - 钢种分解引擎
// ==========================================
pub struct ForecastBreakdownEngine {
    deriver: ProportionDeriver,
    smoother: TrendSmoother,
    normalizer: ProportionNormalizer,
    apportioner: IntegerApportioner,
    assembler: ResultAssembler,
}

impl ForecastBreakdownEngine {
    /// 按配置创建引擎
    pub fn new(config: &ForecastConfig) -> ForecastResult<Self> {
        config.validate().map_err(ForecastError::InvalidConfig)?;
        Self::with_alpha(config.smoothing_alpha)
    }

    /// 指定平滑系数创建引擎
    pub fn with_alpha(alpha: f64) -> ForecastResult<Self> {
        Ok(Self {
            deriver: ProportionDeriver::new(),
            smoother: TrendSmoother::new(alpha)?,
            normalizer: ProportionNormalizer::new(),
            apportioner: IntegerApportioner::new(),
            assembler: ResultAssembler::new(),
        })
    }

    pub fn smoothing_alpha(&self) -> f64 {
        self.smoother.alpha()
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 预测目标月各质量组的钢种分解
    ///
    /// # 参数
    /// - order_rows: 目标月订单预测（调用方已按月过滤,非目标月行被忽略）
    /// - production_rows: 全量历史产量
    /// - target_month: 目标月
    ///
    /// # 返回
    /// - Ok(BreakdownReport): 成功组 + 失败组（单组失败不影响其他组）
    /// - Err(MalformedMonth): 任一月份无法解析,整次调用失败
    #[instrument(skip(self, order_rows, production_rows), fields(
        month = %target_month,
        orders = order_rows.len(),
        history = production_rows.len()
    ))]
    pub fn forecast_grade_breakdown(
        &self,
        order_rows: &[OrderForecastRow],
        production_rows: &[ProductionRow],
        target_month: YearMonth,
    ) -> ForecastResult<BreakdownReport> {
        // === 步骤 0: 月份解析（全局预处理）===
        let orders = parse_order_rows(order_rows)?;
        let history = parse_production_rows(production_rows)?;

        let (orders, ignored): (Vec<_>, Vec<_>) =
            orders.into_iter().partition(|o| o.month == target_month);
        if !ignored.is_empty() {
            debug!(ignored = ignored.len(), "忽略非目标月订单预测行");
        }

        // === 步骤 1: 历史比例 ===
        let proportions = self.deriver.derive(&history);

        // === 步骤 2: 趋势平滑 ===
        let mut predicted = self.smoother.predict(&proportions);

        // === 步骤 3-5: 按质量组归一化 → 分配 → 组装 ===
        let totals = self.assembler.group_totals(&orders);
        let mut groups = Vec::with_capacity(totals.len());
        let mut failures = Vec::new();

        for (quality_group, total) in totals {
            let raw = predicted.remove(&quality_group).unwrap_or_default();
            if raw.is_empty() {
                debug!(group = %quality_group, "无历史钢种数据, 输出空分解");
            }

            let shares = self.normalizer.normalize(raw);
            match self.apportioner.apportion(quality_group, &shares, total) {
                Ok(grades) => {
                    groups.push(self.assembler.assemble(quality_group, total, grades));
                }
                Err(e) if e.is_group_local() => {
                    error!(group = %quality_group, error = %e, "质量组分解失败, 已跳过");
                    failures.push(GroupFailure {
                        quality_group,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            groups = groups.len(),
            failed = failures.len(),
            "钢种分解完成"
        );

        Ok(BreakdownReport {
            target_month,
            groups,
            failures,
        })
    }
}

fn parse_month(value: &str) -> ForecastResult<YearMonth> {
    YearMonth::parse_lenient(value).ok_or_else(|| ForecastError::MalformedMonth {
        value: value.to_string(),
    })
}

fn parse_order_rows(rows: &[OrderForecastRow]) -> ForecastResult<Vec<OrderForecastRecord>> {
    rows.iter()
        .map(|row| {
            Ok(OrderForecastRecord {
                month: parse_month(&row.month)?,
                quality_group: row.quality_group,
                heats_orders_forecasted: row.heats_orders_forecasted,
            })
        })
        .collect()
}

fn parse_production_rows(rows: &[ProductionRow]) -> ForecastResult<Vec<HistoricalProductionRecord>> {
    rows.iter()
        .map(|row| {
            Ok(HistoricalProductionRecord {
                month: parse_month(&row.month)?,
                quality_group: row.quality_group,
                grade: row.grade.clone(),
                heats_produced: row.heats_produced,
            })
        })
        .collect()
}
