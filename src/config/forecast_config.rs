// ==========================================
// 炼钢生产计划 - 预测配置
// ==========================================
// 职责: 预测/导入参数的默认值与校验
// 来源: config_kv 表覆写, 缺省使用默认值
// ==========================================

use crate::repository::error::RepositoryResult;
use serde::{Deserialize, Serialize};

/// 默认平滑系数
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.3;

/// 默认每炉短吨数
pub const DEFAULT_TONS_PER_HEAT: i64 = 100;

/// 默认单列最大缺失值个数（超过则整列丢弃）
pub const DEFAULT_MAX_MISSING_PER_COLUMN: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// 指数平滑系数 α ∈ (0, 1]
    pub smoothing_alpha: f64,
    /// 短吨 → 炉数 折算系数
    pub tons_per_heat: i64,
    pub max_missing_per_column: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            tons_per_heat: DEFAULT_TONS_PER_HEAT,
            max_missing_per_column: DEFAULT_MAX_MISSING_PER_COLUMN,
        }
    }
}

impl ForecastConfig {
    /// α ∈ (0, 1]
    pub fn is_valid_smoothing_alpha(alpha: f64) -> bool {
        alpha.is_finite() && alpha > 0.0 && alpha <= 1.0
    }

    pub fn is_valid_tons_per_heat(tons_per_heat: i64) -> bool {
        tons_per_heat > 0
    }

    /// 校验配置取值范围
    ///
    /// # 返回
    /// - Ok(()): 合法
    /// - Err(String): 违规说明
    pub fn validate(&self) -> Result<(), String> {
        if !Self::is_valid_smoothing_alpha(self.smoothing_alpha) {
            return Err(format!(
                "smoothing_alpha 必须在 (0, 1] 内, 实际 {}",
                self.smoothing_alpha
            ));
        }
        if !Self::is_valid_tons_per_heat(self.tons_per_heat) {
            return Err(format!("tons_per_heat 必须为正数, 实际 {}", self.tons_per_heat));
        }
        Ok(())
    }
}

// ==========================================
// ForecastConfigReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv）, ForecastConfig（固定值,测试用）
pub trait ForecastConfigReader: Send + Sync {
    fn load_forecast_config(&self) -> RepositoryResult<ForecastConfig>;
}

impl ForecastConfigReader for ForecastConfig {
    fn load_forecast_config(&self) -> RepositoryResult<ForecastConfig> {
        Ok(self.clone())
    }
}

impl<T> ForecastConfigReader for std::sync::Arc<T>
where
    T: ForecastConfigReader + ?Sized,
{
    fn load_forecast_config(&self) -> RepositoryResult<ForecastConfig> {
        (**self).load_forecast_config()
    }
}
