// ==========================================
// 整数分配 (Integer Apportioner)
// ==========================================
// 最大余数法（Hamilton）:
// 1) raw  = proportion × total
// 2) base = floor(raw)
// 3) remainder = total − Σ base
// 4) 排序: 小数部分降序, 钢种代码升序（确定性平局裁决）
// 5) 前 remainder 个钢种各 +1
// 后置条件: Σ heats == total（违反即报错,不输出）
// ==========================================

use crate::domain::forecast::GradeForecast;
use crate::domain::types::QualityGroup;
use crate::engine::error::{ForecastError, ForecastResult};
use std::cmp::Ordering;
use tracing::trace;

struct Allocation {
    grade: String,
    proportion: f64,
    heats: i64,
    fraction: f64,
}

pub struct IntegerApportioner;

impl IntegerApportioner {
    pub fn new() -> Self {
        Self
    }

    /// 将归一化比例分配为整数炉数
    ///
    /// # 参数
    /// - group: 质量组（用于错误上报）
    /// - shares: 归一化后的 (grade, proportion)
    /// - total: 质量组预测总炉数
    ///
    /// # 返回
    /// 按钢种代码升序的 GradeForecast 列表; proportion 按 heats / total 重算
    /// （total == 0 时保留归一化比例）
    pub fn apportion(
        &self,
        group: QualityGroup,
        shares: &[(String, f64)],
        total: i64,
    ) -> ForecastResult<Vec<GradeForecast>> {
        if total < 0 {
            return Err(ForecastError::NegativeTotal { group, total });
        }
        if shares.is_empty() {
            return Ok(Vec::new());
        }

        let mut allocations: Vec<Allocation> = shares
            .iter()
            .map(|(grade, proportion)| {
                let raw = proportion * total as f64;
                let base = raw.floor();
                Allocation {
                    grade: grade.clone(),
                    proportion: *proportion,
                    heats: base as i64,
                    fraction: raw - base,
                }
            })
            .collect();

        let floored: i64 = allocations.iter().map(|a| a.heats).sum();
        let remainder = total - floored;
        trace!(group = %group, total, floored, remainder, "向下取整完成");

        if remainder > 0 {
            allocations.sort_by(Self::compare_remainder);
            for allocation in allocations.iter_mut().take(remainder as usize) {
                allocation.heats += 1;
            }
        }

        let actual: i64 = allocations.iter().map(|a| a.heats).sum();
        if actual != total {
            return Err(ForecastError::ApportionmentMismatch {
                group,
                expected: total,
                actual,
            });
        }

        allocations.sort_by(|a, b| a.grade.cmp(&b.grade));

        Ok(allocations
            .into_iter()
            .map(|a| GradeForecast {
                proportion: if total > 0 {
                    a.heats as f64 / total as f64
                } else {
                    a.proportion
                },
                grade: a.grade,
                heats: a.heats,
            })
            .collect())
    }

    /// 余数排序: 小数部分降序, 平局按钢种代码升序
    fn compare_remainder(a: &Allocation, b: &Allocation) -> Ordering {
        b.fraction
            .total_cmp(&a.fraction)
            .then_with(|| a.grade.cmp(&b.grade))
    }
}

impl Default for IntegerApportioner {
    fn default() -> Self {
        Self::new()
    }
}
