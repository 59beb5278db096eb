// ==========================================
// 炼钢生产计划 - 领域层
// ==========================================
// 职责: 实体与值类型,不含 I/O
// ==========================================

pub mod forecast;
pub mod production;
pub mod types;

pub use forecast::{GradeForecast, GroupForecast};
pub use production::{
    ChargeScheduleEntry, HistoricalProductionRecord, MonthProductionEntry, OrderForecastEntry,
    OrderForecastRecord, OrderForecastRow, ProductionRow,
};
pub use types::{QualityGroup, UploadFileType, YearMonth};
