// ==========================================
// 炼钢生产计划 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 由质量组订单预测推导钢种级炉数预测
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 预测计算
pub mod engine;

// 导入层 - 表格文件
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{QualityGroup, UploadFileType, YearMonth};

// 领域实体
pub use domain::{
    ChargeScheduleEntry, GradeForecast, GroupForecast, MonthProductionEntry, OrderForecastEntry,
    OrderForecastRow, ProductionRow,
};

// 引擎
pub use engine::{BreakdownReport, ForecastBreakdownEngine, ForecastError};

// API
pub use api::{ApiError, ForecastApi, ForecastResponse, ImportApi, UploadFileResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "炼钢生产计划";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
