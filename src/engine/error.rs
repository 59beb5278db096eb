// ==========================================
// 炼钢生产计划 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::QualityGroup;
use thiserror::Error;

/// 预测引擎错误类型
#[derive(Error, Debug)]
pub enum ForecastError {
    // ===== 全局预处理错误（整次调用失败）=====
    #[error("月份格式错误: {value}")]
    MalformedMonth { value: String },

    #[error("引擎配置无效: {0}")]
    InvalidConfig(String),

    // ===== 单质量组错误（跳过该组并上报）=====
    #[error("质量组 {group} 订单预测炉数为负: {total}")]
    NegativeTotal { group: QualityGroup, total: i64 },

    #[error("质量组 {group} 分配炉数不守恒: 期望 {expected}, 实际 {actual}")]
    ApportionmentMismatch {
        group: QualityGroup,
        expected: i64,
        actual: i64,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForecastError {
    /// 是否为单质量组局部错误
    pub fn is_group_local(&self) -> bool {
        matches!(
            self,
            ForecastError::NegativeTotal { .. } | ForecastError::ApportionmentMismatch { .. }
        )
    }
}

/// Result 类型别名
pub type ForecastResult<T> = Result<T, ForecastError>;
