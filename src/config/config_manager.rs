// ==========================================
// 炼钢生产计划 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::forecast_config::{
    ForecastConfig, ForecastConfigReader, DEFAULT_MAX_MISSING_PER_COLUMN,
    DEFAULT_SMOOTHING_ALPHA, DEFAULT_TONS_PER_HEAT,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 预测
    pub const SMOOTHING_ALPHA: &str = "forecast/smoothing_alpha";
    pub const TONS_PER_HEAT: &str = "forecast/tons_per_heat";

    // 导入清洗
    pub const MAX_MISSING_PER_COLUMN: &str = "import/max_missing_per_column";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取并解析配置; 缺失或格式错误时使用默认值
    fn get_parsed_or_default<T>(
        &self,
        key: &str,
        default: T,
        valid: impl Fn(&T) -> bool,
    ) -> RepositoryResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) if valid(&v) => Ok(v),
            _ => {
                warn!(config_key = key, raw_value = %raw, default = %default, "配置值无效，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// ForecastConfigReader Trait 实现
// ==========================================
impl ForecastConfigReader for ConfigManager {
    fn load_forecast_config(&self) -> RepositoryResult<ForecastConfig> {
        Ok(ForecastConfig {
            smoothing_alpha: self.get_parsed_or_default(
                config_keys::SMOOTHING_ALPHA,
                DEFAULT_SMOOTHING_ALPHA,
                |a| ForecastConfig::is_valid_smoothing_alpha(*a),
            )?,
            tons_per_heat: self.get_parsed_or_default(
                config_keys::TONS_PER_HEAT,
                DEFAULT_TONS_PER_HEAT,
                |t| ForecastConfig::is_valid_tons_per_heat(*t),
            )?,
            max_missing_per_column: self.get_parsed_or_default(
                config_keys::MAX_MISSING_PER_COLUMN,
                DEFAULT_MAX_MISSING_PER_COLUMN,
                |_| true,
            )?,
        })
    }
}
