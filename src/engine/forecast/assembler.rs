// ==========================================
// 结果组装 (Result Assembler)
// ==========================================
// 只输出有订单预测的质量组;
// 无历史钢种数据的组 → heats = 预测总炉数, grades 为空
// ==========================================

use crate::domain::forecast::{GradeForecast, GroupForecast};
use crate::domain::production::OrderForecastRecord;
use crate::domain::types::QualityGroup;
use std::collections::BTreeMap;
use tracing::warn;

pub struct ResultAssembler;

impl ResultAssembler {
    pub fn new() -> Self {
        Self
    }

    /// 质量组 → 预测总炉数（同组重复行取第一行）
    pub fn group_totals(&self, records: &[OrderForecastRecord]) -> BTreeMap<QualityGroup, i64> {
        let mut totals = BTreeMap::new();
        for record in records {
            if let Some(existing) = totals.get(&record.quality_group) {
                warn!(
                    group = %record.quality_group,
                    kept = existing,
                    ignored = record.heats_orders_forecasted,
                    "订单预测存在重复质量组, 保留第一行"
                );
                continue;
            }
            totals.insert(record.quality_group, record.heats_orders_forecasted);
        }
        totals
    }

    pub fn assemble(
        &self,
        quality_group: QualityGroup,
        heats: i64,
        grades: Vec<GradeForecast>,
    ) -> GroupForecast {
        GroupForecast {
            quality_group,
            heats,
            grades,
        }
    }
}

impl Default for ResultAssembler {
    fn default() -> Self {
        Self::new()
    }
}
