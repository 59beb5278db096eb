// ==========================================
// 炼钢生产计划 - 配置层
// ==========================================
// 职责: 预测/导入参数管理,支持 global 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod forecast_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use forecast_config::{ForecastConfig, ForecastConfigReader};
