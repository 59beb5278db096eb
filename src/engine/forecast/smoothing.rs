// ==========================================
// 趋势平滑 (Trend Smoother)
// ==========================================
// 简单指数平滑（仅水平项,adjust=false）:
//   s0 = x0
//   st = α·xt + (1−α)·s(t−1)
// 最后一个平滑值即目标月预测比例
// ==========================================

use crate::config::ForecastConfig;
use crate::domain::types::{QualityGroup, YearMonth};
use crate::engine::error::{ForecastError, ForecastResult};
use crate::engine::forecast::proportion::GradeProportion;
use std::collections::BTreeMap;

pub struct TrendSmoother {
    alpha: f64,
}

impl TrendSmoother {
    /// 创建平滑器（α ∈ (0, 1]）
    pub fn new(alpha: f64) -> ForecastResult<Self> {
        if !ForecastConfig::is_valid_smoothing_alpha(alpha) {
            return Err(ForecastError::InvalidConfig(format!(
                "smoothing_alpha 必须在 (0, 1] 内, 实际 {}",
                alpha
            )));
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// 对按月份升序的序列做平滑,空序列返回 None
    pub fn smooth(&self, series: &[f64]) -> Option<f64> {
        let (first, rest) = series.split_first()?;
        Some(
            rest.iter()
                .fold(*first, |level, x| self.alpha * x + (1.0 - self.alpha) * level),
        )
    }

    /// 每个 (quality_group, grade) 的历史比例序列 → 预测比例
    ///
    /// 返回按质量组分组、组内按钢种升序的 (grade, predicted) 列表
    pub fn predict(
        &self,
        proportions: &[GradeProportion],
    ) -> BTreeMap<QualityGroup, Vec<(String, f64)>> {
        let mut series: BTreeMap<(QualityGroup, String), Vec<(YearMonth, f64)>> = BTreeMap::new();
        for p in proportions {
            series
                .entry((p.quality_group, p.grade.clone()))
                .or_default()
                .push((p.month, p.proportion));
        }

        let mut predicted: BTreeMap<QualityGroup, Vec<(String, f64)>> = BTreeMap::new();
        for ((quality_group, grade), mut points) in series {
            points.sort_by_key(|(month, _)| *month);
            let values: Vec<f64> = points.into_iter().map(|(_, v)| v).collect();
            if let Some(level) = self.smooth(&values) {
                predicted
                    .entry(quality_group)
                    .or_default()
                    .push((grade, level));
            }
        }

        predicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_observation_unchanged() {
        let smoother = TrendSmoother::new(0.3).unwrap();
        assert_eq!(smoother.smooth(&[0.42]), Some(0.42));
        assert_eq!(smoother.smooth(&[]), None);
    }

    #[test]
    fn test_recency_weighting() {
        let smoother = TrendSmoother::new(0.3).unwrap();
        let level = smoother.smooth(&[0.5, 0.6, 0.7]).unwrap();
        assert!((level - 0.581).abs() < 1e-9);

        // α = 1 退化为最后一个观测值
        let last_only = TrendSmoother::new(1.0).unwrap();
        assert_eq!(last_only.smooth(&[0.1, 0.9]), Some(0.9));
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        assert!(TrendSmoother::new(0.0).is_err());
        assert!(TrendSmoother::new(1.5).is_err());
        assert!(TrendSmoother::new(f64::NAN).is_err());
    }
}
