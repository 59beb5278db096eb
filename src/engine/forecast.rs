// ==========================================
// 炼钢生产计划 - 钢种分解预测引擎
// ==========================================
// 职责: 质量组订单预测炉数 → 钢种级整数炉数
// 输入: 目标月订单预测 + 全量历史产量
// 输出: 每个有订单预测的质量组一条 GroupForecast
// ==========================================
// 流程: 比例推导 → 趋势平滑 → 归一化 → 整数分配 → 组装
// 各质量组独立计算,单组失败不影响其他组
// ==========================================

mod apportion;
mod assembler;
mod core;
mod normalizer;
mod proportion;
mod smoothing;


pub use apportion::IntegerApportioner;
pub use assembler::ResultAssembler;
pub use self::core::{BreakdownReport, ForecastBreakdownEngine, GroupFailure};
pub use normalizer::ProportionNormalizer;
pub use proportion::{GradeProportion, ProportionDeriver};
pub use smoothing::TrendSmoother;
