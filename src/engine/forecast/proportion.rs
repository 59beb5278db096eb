// ==========================================
// 比例推导 (Proportion Deriver)
// ==========================================
// 按 (month, quality_group) 分桶,桶内每个钢种比例 = 钢种炉数 / 桶总炉数
// 桶总炉数为 0 时比例无定义,整桶排除
// ==========================================

use crate::domain::production::HistoricalProductionRecord;
use crate::domain::types::{QualityGroup, YearMonth};
use std::collections::BTreeMap;
use tracing::debug;

/// 某月某质量组内单钢种的历史比例
#[derive(Debug, Clone, PartialEq)]
pub struct GradeProportion {
    pub month: YearMonth,
    pub quality_group: QualityGroup,
    pub grade: String,
    pub proportion: f64,
}

pub struct ProportionDeriver;

impl ProportionDeriver {
    pub fn new() -> Self {
        Self
    }

    /// 计算历史比例
    ///
    /// 同一 (month, quality_group, grade) 出现多行时炉数累加。
    /// 输出按 (month, quality_group, grade) 升序。
    pub fn derive(&self, records: &[HistoricalProductionRecord]) -> Vec<GradeProportion> {
        let mut buckets: BTreeMap<(YearMonth, QualityGroup), BTreeMap<String, i64>> =
            BTreeMap::new();

        for record in records {
            *buckets
                .entry((record.month, record.quality_group))
                .or_default()
                .entry(record.grade.clone())
                .or_insert(0) += record.heats_produced;
        }

        let mut proportions = Vec::new();
        for ((month, quality_group), grades) in buckets {
            let total: i64 = grades.values().sum();
            if total == 0 {
                debug!(month = %month, group = %quality_group, "桶总炉数为 0, 比例无定义, 排除");
                continue;
            }

            for (grade, heats) in grades {
                proportions.push(GradeProportion {
                    month,
                    quality_group,
                    grade,
                    proportion: heats as f64 / total as f64,
                });
            }
        }

        proportions
    }
}

impl Default for ProportionDeriver {
    fn default() -> Self {
        Self::new()
    }
}
