// ==========================================
// 炼钢生产计划 - 预测结果实体
// ==========================================
// 不变量:
// - sum(grades.heats) == heats（无舍入漂移）
// - grades 非空时 sum(grades.proportion) ≈ 1.0
// ==========================================

use crate::domain::types::QualityGroup;
use serde::{Deserialize, Serialize};

/// 钢种级预测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeForecast {
    /// 钢种代码，例如 A36
    pub grade: String,
    /// 预测炉数
    pub heats: i64,
    /// 占质量组比例 [0, 1]
    pub proportion: f64,
}

/// 质量组级预测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupForecast {
    #[serde(rename = "group")]
    pub quality_group: QualityGroup,
    pub heats: i64,
    pub grades: Vec<GradeForecast>,
}

impl GroupForecast {
    pub fn allocated_heats(&self) -> i64 {
        self.grades.iter().map(|g| g.heats).sum()
    }

    pub fn proportion_sum(&self) -> f64 {
        self.grades.iter().map(|g| g.proportion).sum()
    }
}
