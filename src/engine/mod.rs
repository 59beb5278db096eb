// ==========================================
// 炼钢生产计划 - 引擎层
// ==========================================
// 职责: 纯计算,不做 I/O,不拼 SQL
// 并发: 无共享可变状态,每次调用独立分配中间结构
// ==========================================

pub mod error;
pub mod forecast;

// 重导出核心引擎
pub use error::{ForecastError, ForecastResult};
pub use forecast::{
    BreakdownReport, ForecastBreakdownEngine, GradeProportion, GroupFailure, IntegerApportioner,
    ProportionDeriver, ProportionNormalizer, ResultAssembler, TrendSmoother,
};
