// ==========================================
// 炼钢生产计划 - 生产与订单数据实体
// ==========================================
// 职责: 导入层产出、仓储层读写、引擎层输入的行记录
// ==========================================

use crate::domain::types::{QualityGroup, YearMonth};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// 入库实体（导入层产出）
// ==========================================

/// 月度钢种产量（短吨）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProductionEntry {
    pub month: YearMonth,
    pub quality_group: QualityGroup,
    pub grade: String,
    pub short_tons: i64,
}

impl MonthProductionEntry {
    /// 折算炉数（整除，与入库口径一致）
    pub fn heats_produced(&self, tons_per_heat: i64) -> i64 {
        if tons_per_heat <= 0 {
            return 0;
        }
        self.short_tons / tons_per_heat
    }
}

/// 月度质量组订单预测（炉数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderForecastEntry {
    pub month: YearMonth,
    pub quality_group: QualityGroup,
    pub heats_orders_forecasted: i64,
}

/// 日装炉计划条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeScheduleEntry {
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub grade: Option<String>,
    pub mould_size: Option<String>,
}

// ==========================================
// 引擎输入行（月份保持原始字符串，由引擎统一解析）
// ==========================================

/// 历史产量行: (month, quality_group, grade, heats_produced)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRow {
    pub month: String,
    pub quality_group: QualityGroup,
    pub grade: String,
    pub heats_produced: i64,
}

impl ProductionRow {
    pub fn from_entry(entry: &MonthProductionEntry, tons_per_heat: i64) -> Self {
        Self {
            month: entry.month.first_day().format("%Y-%m-%d").to_string(),
            quality_group: entry.quality_group,
            grade: entry.grade.clone(),
            heats_produced: entry.heats_produced(tons_per_heat),
        }
    }
}

/// 订单预测行: (month, quality_group, heats_orders_forecasted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderForecastRow {
    pub month: String,
    pub quality_group: QualityGroup,
    pub heats_orders_forecasted: i64,
}

impl From<&OrderForecastEntry> for OrderForecastRow {
    fn from(entry: &OrderForecastEntry) -> Self {
        Self {
            month: entry.month.first_day().format("%Y-%m-%d").to_string(),
            quality_group: entry.quality_group,
            heats_orders_forecasted: entry.heats_orders_forecasted,
        }
    }
}

// ==========================================
// 引擎内部类型化记录（月份已解析）
// ==========================================

/// 历史产量记录
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalProductionRecord {
    pub month: YearMonth,
    pub quality_group: QualityGroup,
    pub grade: String,
    pub heats_produced: i64,
}

/// 订单预测记录
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForecastRecord {
    pub month: YearMonth,
    pub quality_group: QualityGroup,
    pub heats_orders_forecasted: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heats_produced_integer_division() {
        let entry = MonthProductionEntry {
            month: YearMonth::new(2024, 6).unwrap(),
            quality_group: QualityGroup::Rebar,
            grade: "A615".to_string(),
            short_tons: 1_290,
        };
        assert_eq!(entry.heats_produced(100), 12);
        assert_eq!(entry.heats_produced(0), 0);

        let row = ProductionRow::from_entry(&entry, 100);
        assert_eq!(row.month, "2024-06-01");
        assert_eq!(row.heats_produced, 12);
    }
}
