// ==========================================
// 炼钢生产计划 - 数据仓储层
// ==========================================
// 职责: 数据访问,不含业务逻辑
// 存储: SQLite（rusqlite）
// ==========================================

pub mod charge_schedule_repo;
pub mod error;
pub mod order_forecast_repo;
pub mod production_repo;

pub use charge_schedule_repo::ChargeScheduleRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use order_forecast_repo::OrderForecastRepository;
pub use production_repo::MonthSteelProductionRepository;
