// ==========================================
// 炼钢生产计划 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ForecastApi, ImportApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::{ProductionDataImporterImpl, UniversalFileParser};
use crate::repository::{
    ChargeScheduleRepository, MonthSteelProductionRepository, OrderForecastRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源（单个共享连接）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 预测API
    pub forecast_api: Arc<ForecastApi>,

    /// 文件上传API
    pub import_api: Arc<ImportApi>,

    /// 配置管理器（global 覆写）
    pub config_manager: Arc<ConfigManager>,

    /// 日装炉计划仓储（查询用）
    pub charge_schedule_repo: Arc<ChargeScheduleRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开连接并建表（幂等）
    /// 2. 初始化Repository与配置管理器
    /// 3. 创建API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let production_repo = Arc::new(MonthSteelProductionRepository::from_connection(conn.clone()));
        let order_forecast_repo = Arc::new(OrderForecastRepository::from_connection(conn.clone()));
        let charge_schedule_repo = Arc::new(ChargeScheduleRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let importer = ProductionDataImporterImpl::new(
            config_manager.clone(),
            Box::new(UniversalFileParser),
            production_repo.clone(),
            order_forecast_repo.clone(),
            charge_schedule_repo.clone(),
        );
        let import_api = Arc::new(ImportApi::new(Arc::new(importer)));
        let forecast_api = Arc::new(ForecastApi::new(
            order_forecast_repo,
            production_repo,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            forecast_api,
            import_api,
            config_manager,
            charge_schedule_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: STEEL_PLANS_DB_PATH 环境变量 > 用户数据目录 > ./steel_plans.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("STEEL_PLANS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./steel_plans.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("steel-plans");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("steel_plans.db");
        }
    }

    path.to_string_lossy().to_string()
}
